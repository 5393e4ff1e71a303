//! Active dataset selection
//!
//! The data directory may hold several Parquet snapshots. The active one is
//! the snapshot whose filename encodes the newest upstream versions.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::parser::filename::parse_local_version;
use crate::parser::types::{DatasetVersion, Source};
use crate::version::error::ParseError;

const PARQUET_EXTENSION: &str = "parquet";

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("Failed to read data directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No .parquet files found in {0:?}")]
    NoDataset(PathBuf),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The selected dataset file and its parsed versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDataset {
    pub path: PathBuf,
    pub version: DatasetVersion,
}

struct Candidate {
    path: PathBuf,
    modified: SystemTime,
    parsed: Result<DatasetVersion, ParseError>,
}

/// Select the active dataset in `dir`.
///
/// Files whose names do not parse are skipped with a warning. If none parse,
/// the parse error of the most recently modified file is returned.
pub fn locate_dataset(dir: &Path) -> Result<LocatedDataset, LocateError> {
    let io_err = |source| LocateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();

        let is_parquet = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PARQUET_EXTENSION));
        if !is_parquet || !path.is_file() {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let name = entry.file_name().to_string_lossy().into_owned();
        debug!("Found dataset candidate {}", name);

        candidates.push(Candidate {
            path,
            modified,
            parsed: parse_local_version(&name),
        });
    }

    if candidates.is_empty() {
        return Err(LocateError::NoDataset(dir.to_path_buf()));
    }

    for candidate in &candidates {
        if let Err(e) = &candidate.parsed {
            warn!("Skipping dataset candidate: {}", e);
        }
    }

    let best = candidates
        .iter()
        .filter_map(|c| c.parsed.as_ref().ok().map(|v| (c, v)))
        .max_by(|(a, va), (b, vb)| newer(va, vb).then(a.modified.cmp(&b.modified)));

    if let Some((candidate, version)) = best {
        info!("Using dataset {:?}", candidate.path);
        return Ok(LocatedDataset {
            path: candidate.path.clone(),
            version: version.clone(),
        });
    }

    // Nothing parsed: surface the error of the file an operator most likely meant
    let latest = candidates
        .into_iter()
        .max_by_key(|c| c.modified)
        .map(|c| c.parsed);

    match latest {
        Some(Err(e)) => Err(LocateError::Parse(e)),
        _ => Err(LocateError::NoDataset(dir.to_path_buf())),
    }
}

/// Order two datasets by their versions, HMDB first, then LIPID MAPS, then
/// revision. A source present in only one of them counts as newer.
fn newer(a: &DatasetVersion, b: &DatasetVersion) -> Ordering {
    Source::ALL
        .iter()
        .map(|source| match (a.version_of(*source), b.version_of(*source)) {
            (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        })
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.revision.cmp(&b.revision))
}
