//! Upstream test utilities

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use metabo_version_check::parser::types::Source;
use metabo_version_check::version::error::RemoteError;
use metabo_version_check::version::upstream::{Upstream, UpstreamRelease};

enum Response {
    Release(&'static str),
    Unreachable,
    Hang,
}

/// Upstream returning a fixed response without network access
pub struct StaticUpstream {
    source: Source,
    response: Response,
    calls: AtomicUsize,
}

impl StaticUpstream {
    pub fn release(source: Source, version: &'static str) -> Self {
        Self::with_response(source, Response::Release(version))
    }

    /// Fails every call with a retryable network-style error
    pub fn unreachable(source: Source) -> Self {
        Self::with_response(source, Response::Unreachable)
    }

    /// Never answers; only a deadline ends the call
    pub fn hanging(source: Source) -> Self {
        Self::with_response(source, Response::Hang)
    }

    fn with_response(source: Source, response: Response) -> Self {
        Self {
            source,
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for StaticUpstream {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch_remote_version(&self) -> Result<UpstreamRelease, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.response {
            Response::Release(version) => Ok(UpstreamRelease {
                source: self.source,
                version: version.parse().expect("valid test version"),
                retrieved_at: Utc::now(),
                url: format!("static://{}", self.source.as_str()),
            }),
            Response::Unreachable => Err(RemoteError::Status {
                status: 503,
                url: format!("static://{}", self.source.as_str()),
            }),
            Response::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("hanging upstream must be cancelled by a deadline")
            }
        }
    }
}
