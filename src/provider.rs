use crate::config::Settings;
use crate::error::{Result, SatError};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, ClientBuilder, Response};
use tracing::{debug, warn};
use url::Url;

const REFERER_URL: &str = "http://www.weather.com.cn/satellite/";

/// Read access to the weather provider. Both the metadata request and the
/// image requests go through this trait.
pub trait Provider {
    async fn get_text(&self, url: &Url) -> Result<String>;

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>>;
}

pub struct WeatherCn {
    client: Client,
}

impl WeatherCn {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = client_builder(settings)
            .build()
            .map_err(SatError::Client)?;
        Ok(Self::new(client))
    }

    async fn get(&self, url: &Url) -> Result<Response> {
        debug!(name: "provider.request", url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| transport(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SatError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Provider for WeatherCn {
    async fn get_text(&self, url: &Url) -> Result<String> {
        let text = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|source| transport(url, source))?;
        Ok(text)
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|source| transport(url, source))?;
        Ok(bytes.to_vec())
    }
}

/// Referer, User-Agent, timeout and TLS policy shared by every request.
fn client_builder(settings: &Settings) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));

    if settings.insecure {
        warn!(name: "provider.tls.disabled", "TLS certificate verification is disabled");
    }

    Client::builder()
        .default_headers(headers)
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout())
        .danger_accept_invalid_certs(settings.insecure)
}

fn transport(url: &Url, source: reqwest::Error) -> SatError {
    SatError::Transport {
        url: url.to_string(),
        source,
    }
}
