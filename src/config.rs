use crate::error::{Result, SatError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "satfetch.toml";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/72.0.3626.109 Safari/537.36";

/// What to do when a single image download fails.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the remaining downloads.
    #[default]
    FailFast,
    /// Log the failure and keep going; the run still fails at the end.
    Continue,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Skip TLS certificate verification on every request.
    pub insecure: bool,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Size token in the image path (`l` or `m`).
    pub image_size: String,
    pub failure_policy: FailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout_secs: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            image_size: "l".to_string(),
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

impl Settings {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SatError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let settings: Self = toml::from_str(&content).map_err(|e| SatError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(settings)
    }

    /// Reads the settings file if it exists, otherwise falls back to defaults.
    pub fn read_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().is_file() {
            Self::read(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| SatError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, content).map_err(|e| SatError::filesystem(path, e))?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
