//! Version tokens as published by the upstream databases
//!
//! HMDB and LIPID MAPS both stamp their releases with a calendar date, so
//! `Date` is the common case. `Release` exists for numeric tags such as `5.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::sync::LazyLock;

use crate::version::error::TokenError;

const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

static RELEASE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[.-]\d+)*$").expect("valid release regex"));

/// A validated version token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionToken {
    /// Calendar date release (`2024-03-01`)
    Date(NaiveDate),
    /// Numeric release tag split into segments (`5.0` -> [5, 0])
    Release { raw: String, segments: Vec<u64> },
}

impl VersionToken {
    /// Dates order chronologically, releases segment by segment with missing
    /// segments read as zero. A date and a release are incomparable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (VersionToken::Date(a), VersionToken::Date(b)) => Some(a.cmp(b)),
            (
                VersionToken::Release { segments: a, .. },
                VersionToken::Release { segments: b, .. },
            ) => Some(compare_segments(a, b)),
            _ => None,
        }
    }
}

impl FromStr for VersionToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TokenError::Empty);
        }

        // A date-shaped token must be a real date; it is never demoted to a release.
        if DATE_SHAPE.is_match(s) {
            return NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(VersionToken::Date)
                .map_err(|_| TokenError::InvalidDate(s.to_string()));
        }

        if !RELEASE_SHAPE.is_match(s) {
            return Err(TokenError::Unrecognized(s.to_string()));
        }

        let segments = s
            .split(['.', '-'])
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| TokenError::Unrecognized(s.to_string()))?;

        Ok(VersionToken::Release {
            raw: s.to_string(),
            segments,
        })
    }
}

fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let left = a.get(i).copied().unwrap_or(0);
            let right = b.get(i).copied().unwrap_or(0);
            left.cmp(&right)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionToken::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            VersionToken::Release { raw, .. } => f.write_str(raw),
        }
    }
}

impl Serialize for VersionToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
