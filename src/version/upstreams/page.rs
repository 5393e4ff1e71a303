//! Release page scraper shared by the upstream implementations
//!
//! Neither HMDB nor LIPID MAPS publishes a release API; both list the current
//! download with its release date on an HTML page. The version is read from
//! the first capture group of a source-specific pattern.

use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

use crate::config::{FETCH_TIMEOUT_MS, USER_AGENT};
use crate::parser::types::Source;
use crate::version::error::RemoteError;
use crate::version::token::VersionToken;
use crate::version::upstream::UpstreamRelease;

pub(crate) struct ReleasePage {
    client: Client,
    url: String,
    pattern: Regex,
    timeout: Duration,
}

impl ReleasePage {
    pub(crate) fn new(url: String, pattern: Regex) -> Self {
        Self {
            client: Client::new(),
            url,
            pattern,
            timeout: Duration::from_millis(FETCH_TIMEOUT_MS),
        }
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub(crate) async fn fetch_release(&self, source: Source) -> Result<UpstreamRelease, RemoteError> {
        debug!("Fetching {} release page: {}", source, self.url);

        let body = self.fetch_body().await?;
        let token = self.extract(&body)?;

        let version = token.parse::<VersionToken>().map_err(|reason| RemoteError::InvalidVersion {
            url: self.url.clone(),
            token: token.to_string(),
            reason,
        })?;

        debug!("Found {} release {} at {}", source, version, self.url);

        Ok(UpstreamRelease {
            source,
            version,
            retrieved_at: Utc::now(),
            url: self.url.clone(),
        })
    }

    async fn fetch_body(&self) -> Result<String, RemoteError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RemoteError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        // `text()` honours the charset of the Content-Type header
        response.text().await.map_err(|e| self.map_send_error(e))
    }

    fn extract<'a>(&self, body: &'a str) -> Result<&'a str, RemoteError> {
        self.pattern
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| RemoteError::VersionNotFound {
                url: self.url.clone(),
            })
    }

    fn map_send_error(&self, error: reqwest::Error) -> RemoteError {
        if error.is_timeout() {
            RemoteError::Timeout(self.timeout)
        } else {
            RemoteError::Network(error)
        }
    }
}
