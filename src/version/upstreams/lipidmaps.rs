//! LIPID MAPS release lookup
//!
//! The LMSD download page links the current archive as `LMSD 2025-09-21 (ZIP)`.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::parser::types::Source;
use crate::version::error::RemoteError;
use crate::version::upstream::{Upstream, UpstreamRelease};
use crate::version::upstreams::page::ReleasePage;

pub const DEFAULT_LIPIDMAPS_URL: &str = "https://lipidmaps.org/databases/lmsd/download";

/// LIPID MAPS Structure Database download page client
pub struct LipidMapsUpstream {
    page: ReleasePage,
}

impl Default for LipidMapsUpstream {
    fn default() -> Self {
        Self::new(DEFAULT_LIPIDMAPS_URL.to_string())
    }
}

impl LipidMapsUpstream {
    pub fn new(url: String) -> Self {
        let pattern = Regex::new(r"(?i)>\s*LMSD\s+([\d-]+)\s+\(ZIP\)").unwrap();

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
impl Upstream for LipidMapsUpstream {
    fn source(&self) -> Source {
        Source::LipidMaps
    }

    async fn fetch_remote_version(&self) -> Result<UpstreamRelease, RemoteError> {
        self.page.fetch_release(Source::LipidMaps).await
    }
}
