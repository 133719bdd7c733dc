//! Satellite image metadata from the weather.com.cn JSONP endpoint
use crate::error::Result;
use crate::jsonp;
use crate::provider::Provider;
use crate::radar::RadarList;
use chrono::Utc;
use tracing::info;
use url::Url;

const METADATA_API: &str = "https://d1.weather.com.cn/satellite2015/JC_YT_DL_WXZXCSYT_4B.html";
const CALLBACK_TOKEN: &str = "18208455971171376718";

/// Builds the metadata URL. The current time in milliseconds goes into both
/// the jQuery callback name and the `_` cache buster.
pub fn metadata_url() -> Result<Url> {
    let callback = format!("jQuery{}_{}", CALLBACK_TOKEN, Utc::now().timestamp_millis());
    let cache_buster = Utc::now().timestamp_millis().to_string();
    let url = Url::parse_with_params(
        METADATA_API,
        &[
            ("jsoncallback", "readSatellite"),
            ("callback", callback.as_str()),
            ("_", cache_buster.as_str()),
        ],
    )?;
    Ok(url)
}

/// Fetches and parses the current list of satellite images.
pub async fn fetch_radar_list(provider: &impl Provider) -> Result<RadarList> {
    let url = metadata_url()?;
    let text = provider.get_text(&url).await?;

    let payload = jsonp::strip_callback(&text)?;
    println!("{}", payload);

    let list: RadarList = jsonp::parse(payload)?;
    info!(name: "metadata.parsed", count = list.radars.len(), "parsed radar list");
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SatError;
    use crate::radar::RadarDescriptor;
    use std::sync::Mutex;

    struct StaticProvider {
        body: std::result::Result<String, u16>,
        requested: Mutex<Vec<Url>>,
    }

    impl Provider for StaticProvider {
        async fn get_text(&self, url: &Url) -> Result<String> {
            self.requested.lock().unwrap().push(url.clone());
            self.body.clone().map_err(|status| SatError::Status {
                url: url.to_string(),
                status,
            })
        }

        async fn get_bytes(&self, _url: &Url) -> Result<Vec<u8>> {
            unreachable!("metadata fetch never downloads images")
        }
    }

    fn provider(body: std::result::Result<&str, u16>) -> StaticProvider {
        StaticProvider {
            body: body.map(str::to_string),
            requested: Mutex::new(vec![]),
        }
    }

    #[test]
    fn test_metadata_url() {
        let before = Utc::now().timestamp_millis();
        let url = metadata_url().unwrap();
        let after = Utc::now().timestamp_millis();

        assert!(url
            .as_str()
            .starts_with("https://d1.weather.com.cn/satellite2015/JC_YT_DL_WXZXCSYT_4B.html?jsoncallback=readSatellite&callback=jQuery18208455971171376718_"));

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(params.len(), 3);
        let ts1: i64 = params[1].1.rsplit('_').next().unwrap().parse().unwrap();
        let ts2: i64 = params[2].1.parse().unwrap();
        assert_eq!(params[2].0, "_");
        for ts in [ts1, ts2] {
            assert!(before <= ts && ts <= after);
        }
    }

    #[tokio::test]
    async fn test_fetch_radar_list() {
        let provider = provider(Ok(
            "readSatellite({'radars':[{'fn':'C002','ft':'20240101120000'},{'fn':'C002','ft':'20240101121500'}]})",
        ));
        let list = fetch_radar_list(&provider).await.unwrap();
        assert_eq!(
            list.radars,
            vec![
                RadarDescriptor::new("C002", "20240101120000"),
                RadarDescriptor::new("C002", "20240101121500"),
            ]
        );
        assert_eq!(provider.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_radar_list_status_error() {
        let provider = provider(Err(503));
        let err = fetch_radar_list(&provider).await.unwrap_err();
        assert!(matches!(err, SatError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_radar_list_missing_radars() {
        let provider = provider(Ok("readSatellite({'images':[]})"));
        let err = fetch_radar_list(&provider).await.unwrap_err();
        assert!(matches!(err, SatError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_radar_list_not_jsonp() {
        let provider = provider(Ok("<html>maintenance</html>"));
        let err = fetch_radar_list(&provider).await.unwrap_err();
        assert!(matches!(err, SatError::Jsonp));
    }
}
