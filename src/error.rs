use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Model returned no text: {0}")]
    EmptyResponse(String),

    #[error("Failed to read asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed asset {path}: {source}")]
    AssetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// HTTP status the presentation layer reports for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) | Self::InvalidImage(_) => 400,
            Self::Auth(_) => 401,
            Self::ContentBlocked(_) => 422,
            Self::RateLimited { .. } => 429,
            Self::Api { .. } | Self::EmptyResponse(_) | Self::Network(_) => 502,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;
