use crate::error::{Result, SatError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use url::Url;

const IMAGE_BASE: &str = "https://pi.weather.com.cn/i/product/pic/";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RadarDescriptor {
    #[serde(rename = "fn")]
    pub code: String,
    #[serde(default)]
    pub ft: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RadarList {
    pub radars: Vec<RadarDescriptor>,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

impl RadarDescriptor {
    pub fn new(code: &str, ft: &str) -> Self {
        Self {
            code: code.to_string(),
            ft: ft.to_string(),
        }
    }

    /// `ft` ends up as a file name and both fields end up in a URL path, so
    /// anything beyond plain word characters is rejected.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("fn", &self.code), ("ft", &self.ft)] {
            if !token_pattern().is_match(value) {
                return Err(SatError::InvalidDescriptor(format!(
                    "{field} has unexpected value {value:?}"
                )));
            }
        }
        Ok(())
    }

    /// e.g. `https://pi.weather.com.cn/i/product/pic/l/sevp_nsmc_ABCD_lno_py_20240101120000.jpg`
    pub fn image_url(&self, size: &str) -> Result<Url> {
        let url = format!(
            "{IMAGE_BASE}{size}/sevp_nsmc_{}_lno_py_{}.jpg",
            self.code, self.ft
        );
        Ok(Url::parse(&url)?)
    }

    pub fn file_name(&self) -> String {
        format!("{}.jpg", self.ft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        let radar = RadarDescriptor::new("ABCD", "20240101120000");
        assert_eq!(
            radar.image_url("l").unwrap().as_str(),
            "https://pi.weather.com.cn/i/product/pic/l/sevp_nsmc_ABCD_lno_py_20240101120000.jpg"
        );
        assert_eq!(radar.file_name(), "20240101120000.jpg");
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let list: RadarList = serde_json::from_str(
            r#"{"radars":[{"fn":"C002","ft":"20240101120000","fs":"12:00","extra":1}],"total":1}"#,
        )
        .unwrap();
        assert_eq!(list.radars, vec![RadarDescriptor::new("C002", "20240101120000")]);
    }

    #[test]
    fn test_missing_radars_is_error() {
        assert!(serde_json::from_str::<RadarList>(r#"{"images":[]}"#).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(RadarDescriptor::new("ABCD", "20240101120000").validate().is_ok());
        assert!(RadarDescriptor::new("ABCD", "../etc/passwd").validate().is_err());
        assert!(RadarDescriptor::new("AB/CD", "2024").validate().is_err());
        assert!(RadarDescriptor::new("ABCD", "").validate().is_err());
    }
}
