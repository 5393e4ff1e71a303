//! HMDB release lookup
//!
//! The downloads page lists the "All Metabolites" XML archive together with
//! its release date:
//!
//! ```text
//! <td>All Metabolites</td><td>2021-11-17</td><td><a ... data-whatever="/system/downloads/current/hmdb_metabolites.zip">
//! ```

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::parser::types::Source;
use crate::version::error::RemoteError;
use crate::version::upstream::{Upstream, UpstreamRelease};
use crate::version::upstreams::page::ReleasePage;

pub const DEFAULT_HMDB_URL: &str = "https://hmdb.ca/downloads";

/// HMDB downloads page client
pub struct HmdbUpstream {
    page: ReleasePage,
}

impl Default for HmdbUpstream {
    fn default() -> Self {
        Self::new(DEFAULT_HMDB_URL.to_string())
    }
}

impl HmdbUpstream {
    pub fn new(url: String) -> Self {
        let pattern = Regex::new(
            r"(?is)All Metabolites\s*</td>\s*<td>\s*(\d{4}-\d{2}-\d{2})\s*</td>\s*<td>\s*<a[^>]*hmdb_metabolites\.zip",
        )
        .unwrap();

        Self {
            page: ReleasePage::new(url, pattern),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.page.set_timeout(timeout);
        self
    }
}

#[async_trait]
impl Upstream for HmdbUpstream {
    fn source(&self) -> Source {
        Source::Hmdb
    }

    async fn fetch_remote_version(&self) -> Result<UpstreamRelease, RemoteError> {
        self.page.fetch_release(Source::Hmdb).await
    }
}
