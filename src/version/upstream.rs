//! Upstream trait for fetching the latest release of a source database

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::parser::types::Source;
use crate::version::error::RemoteError;
use crate::version::token::VersionToken;

/// Latest release published by an upstream source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamRelease {
    pub source: Source,
    pub version: VersionToken,
    /// When the release information was retrieved
    pub retrieved_at: DateTime<Utc>,
    /// Page the version was read from
    pub url: String,
}

/// Trait for looking up the latest release of one upstream database
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Upstream: Send + Sync {
    /// Returns the source this implementation handles
    fn source(&self) -> Source;

    /// Fetches the latest published release
    ///
    /// # Returns
    /// * `Ok(UpstreamRelease)` - The latest release and when it was seen
    /// * `Err(RemoteError)` - Network failure, timeout, or a response the
    ///   version could not be read from
    async fn fetch_remote_version(&self) -> Result<UpstreamRelease, RemoteError>;
}
