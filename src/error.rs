use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SatError {
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unable to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("payload is not wrapped in a JSONP callback")]
    Jsonp,
    #[error("unable to parse metadata payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid radar descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("unable to write {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to load settings from {path}: {reason}")]
    Config { path: PathBuf, reason: String },
    #[error("{failed} of {total} image downloads failed")]
    BatchIncomplete {
        failed: usize,
        total: usize,
        /// Kind of the first collected failure.
        first_kind: ErrorKind,
    },
}

/// Coarse classification used when reporting why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Filesystem,
    Config,
}

impl SatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { .. } | Self::Transport { .. } | Self::Client(_) => ErrorKind::Fetch,
            Self::Jsonp | Self::Json(_) | Self::Url(_) | Self::InvalidDescriptor(_) => {
                ErrorKind::Parse
            }
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::Config { .. } => ErrorKind::Config,
            Self::BatchIncomplete { first_kind, .. } => *first_kind,
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SatError>;
