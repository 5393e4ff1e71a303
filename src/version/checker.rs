//! Version comparison between the local dataset and upstream releases

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use crate::config::{FETCH_STAGGER_DELAY_MS, FetchConfig};
use crate::parser::types::{DatasetVersion, Source};
use crate::version::error::RemoteError;
use crate::version::token::VersionToken;
use crate::version::upstream::{Upstream, UpstreamRelease};

/// Status of one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStatus {
    /// Local version is the latest release, or newer
    UpToDate,
    /// A newer upstream release exists
    Outdated,
    /// Could not be decided (remote failure, no local version, incomparable tokens)
    Unknown,
}

impl SourceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SourceStatus::UpToDate => "UP TO DATE",
            SourceStatus::Outdated => "OUTDATED",
            SourceStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Comparison for a single source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: Source,
    pub status: SourceStatus,
    pub local_version: Option<VersionToken>,
    pub remote_version: Option<VersionToken>,
    pub retrieved_at: Option<DateTime<Utc>>,
    /// Why the status is unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Outcome of one update check, per source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub dataset: String,
    pub checked_at: DateTime<Utc>,
    pub reports: Vec<SourceReport>,
}

impl ReconciliationResult {
    pub fn report(&self, source: Source) -> Option<&SourceReport> {
        self.reports.iter().find(|r| r.source == source)
    }

    /// True when any source has a newer upstream release
    pub fn update_available(&self) -> bool {
        self.reports
            .iter()
            .any(|r| r.status == SourceStatus::Outdated)
    }

    /// True when any source is not known to be up to date
    pub fn needs_attention(&self) -> bool {
        self.reports
            .iter()
            .any(|r| r.status != SourceStatus::UpToDate)
    }
}

/// Retry and deadline settings for remote lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Deadline for a single attempt
    pub timeout: Duration,
    /// Extra attempts after a retryable failure
    pub retries: u32,
    pub retry_delay: Duration,
}

impl From<&FetchConfig> for FetchPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

/// Compare two tokens. Equal or newer local versions are up to date.
pub fn compare_tokens(local: &VersionToken, remote: &VersionToken) -> SourceStatus {
    match local.compare(remote) {
        Some(Ordering::Less) => SourceStatus::Outdated,
        Some(Ordering::Equal | Ordering::Greater) => SourceStatus::UpToDate,
        None => SourceStatus::Unknown,
    }
}

/// Compare the local dataset against one upstream release
pub fn compare(local: &DatasetVersion, remote: &UpstreamRelease) -> SourceReport {
    let local_version = local.version_of(remote.source).cloned();

    let (status, detail) = match &local_version {
        Some(token) => {
            let status = compare_tokens(token, &remote.version);
            let detail = (status == SourceStatus::Unknown).then(|| {
                format!(
                    "Local version {} and remote version {} are not comparable",
                    token, remote.version
                )
            });
            (status, detail)
        }
        None => (
            SourceStatus::Unknown,
            Some(format!("{} encodes no {} version", local.filename, remote.source)),
        ),
    };

    SourceReport {
        source: remote.source,
        status,
        local_version,
        remote_version: Some(remote.version.clone()),
        retrieved_at: Some(remote.retrieved_at),
        detail,
    }
}

/// Report for a source whose release could not be fetched
fn unknown_remote(local: &DatasetVersion, source: Source, error: &RemoteError) -> SourceReport {
    SourceReport {
        source,
        status: SourceStatus::Unknown,
        local_version: local.version_of(source).cloned(),
        remote_version: None,
        retrieved_at: None,
        detail: Some(error.to_string()),
    }
}

/// Fetch with a per-attempt deadline, retrying transient failures
pub async fn fetch_with_retry(
    upstream: &dyn Upstream,
    policy: &FetchPolicy,
) -> Result<UpstreamRelease, RemoteError> {
    let mut attempt = 0;

    loop {
        let result = match timeout(policy.timeout, upstream.fetch_remote_version()).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(policy.timeout)),
        };

        match result {
            Err(e) if e.is_retryable() && attempt < policy.retries => {
                attempt += 1;
                warn!(
                    "Fetching {} release failed ({}), retrying ({}/{})",
                    upstream.source(),
                    e,
                    attempt,
                    policy.retries
                );
                sleep(retry_delay(&e, policy)).await;
            }
            other => return other,
        }
    }
}

/// Wait at least as long as the upstream asked for on a 429
fn retry_delay(error: &RemoteError, policy: &FetchPolicy) -> Duration {
    match error {
        RemoteError::RateLimited {
            retry_after_secs: Some(secs),
        } => policy.retry_delay.max(Duration::from_secs(*secs)),
        _ => policy.retry_delay,
    }
}

/// Check the local dataset against every upstream.
///
/// Lookups run concurrently with staggered starts. A failed lookup becomes an
/// `Unknown` report for its source and does not affect the others.
pub async fn reconcile(
    local: &DatasetVersion,
    upstreams: &[Arc<dyn Upstream>],
    policy: &FetchPolicy,
) -> ReconciliationResult {
    let futures = upstreams.iter().enumerate().map(|(i, upstream)| {
        let delay = Duration::from_millis(FETCH_STAGGER_DELAY_MS * i as u64);
        async move {
            sleep(delay).await;
            let source = upstream.source();
            match fetch_with_retry(upstream.as_ref(), policy).await {
                Ok(release) => {
                    let report = compare(local, &release);
                    info!(
                        "{}: local {:?}, remote {} -> {}",
                        source,
                        report.local_version.as_ref().map(|v| v.to_string()),
                        release.version,
                        report.status.label()
                    );
                    report
                }
                Err(e) => {
                    warn!("{}: could not determine remote version: {}", source, e);
                    unknown_remote(local, source, &e)
                }
            }
        }
    });

    let reports = join_all(futures).await;

    ReconciliationResult {
        dataset: local.filename.clone(),
        checked_at: Utc::now(),
        reports,
    }
}
