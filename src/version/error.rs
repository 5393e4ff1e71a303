use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Empty version token")]
    Empty,

    #[error("Not a calendar date: {0}")]
    InvalidDate(String),

    #[error("Unrecognized version token: {0}")]
    Unrecognized(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Dataset filename does not match the expected pattern: {filename}")]
    UnrecognizedPattern { filename: String },

    #[error("Invalid version {token:?} in dataset filename {filename}: {reason}")]
    InvalidToken {
        filename: String,
        token: String,
        reason: TokenError,
    },
}

impl ParseError {
    /// The filename that failed to parse
    pub fn filename(&self) -> &str {
        match self {
            ParseError::UnrecognizedPattern { filename } => filename,
            ParseError::InvalidToken { filename, .. } => filename,
        }
    }
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("No release version found at {url}")]
    VersionNotFound { url: String },

    #[error("Invalid release version {token:?} at {url}: {reason}")]
    InvalidVersion {
        url: String,
        token: String,
        reason: TokenError,
    },
}

impl RemoteError {
    /// Whether another attempt has a chance of succeeding.
    ///
    /// A page that no longer contains a recognizable version will not change
    /// between attempts, so extraction failures are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network(_) | RemoteError::Timeout(_) | RemoteError::RateLimited { .. } => {
                true
            }
            RemoteError::Status { status, .. } => *status >= 500,
            RemoteError::VersionNotFound { .. } | RemoteError::InvalidVersion { .. } => false,
        }
    }
}
