//! Dataset filename parser
//!
//! The active dataset encodes its upstream versions in its filename.
//! Two layouts are recognized:
//!
//! - Combined, as written by the enrichment pipeline:
//!   `2021-11-17_hmdb_metabolites_classy_np_lm_2025-09-21_v5.parquet`
//!   (HMDB release, free-form enrichment tags, LIPID MAPS release, revision)
//! - Single source: `hmdb_2024-03-01.parquet`, `lipidmaps_2025-09-21.parquet`
//!
//! Grammar:
//!
//! ```text
//! filename := combined | single
//! combined := DATE "_hmdb_metabolites" ("_" WORD)* "_lm_" DATE ["_v" DIGITS] ".parquet"
//! single   := SOURCE "_" TOKEN ".parquet"
//! SOURCE   := "hmdb" | "lipidmaps" | "lm"
//! WORD     := [a-z0-9]+
//! TOKEN    := DATE | DIGITS (("." | "-") DIGITS)*
//! ```

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::parser::types::{DatasetVersion, Source};
use crate::version::error::ParseError;
use crate::version::token::VersionToken;

static DEFAULT_PARSER: LazyLock<DatasetFilenameParser> = LazyLock::new(DatasetFilenameParser::new);

/// Parse the versions encoded in a dataset filename.
///
/// Only the final path component is considered, so a full path may be passed.
pub fn parse_local_version(filename: &str) -> Result<DatasetVersion, ParseError> {
    DEFAULT_PARSER.parse(filename)
}

/// Parser for dataset filenames
pub struct DatasetFilenameParser {
    /// Pipeline output: `<hmdb date>_hmdb_metabolites[_tag...]_lm_<lm date>[_vN].parquet`
    combined_re: Regex,
    /// Single source: `<source>_<token>.parquet`
    single_re: Regex,
}

impl DatasetFilenameParser {
    pub fn new() -> Self {
        Self {
            combined_re: Regex::new(
                r"(?i)^(\d{4}-\d{2}-\d{2})_hmdb_metabolites(?:_[a-z0-9]+)*?_lm_(\d{4}-\d{2}-\d{2})(?:_v(\d+))?\.parquet$",
            )
            .unwrap(),
            single_re: Regex::new(r"(?i)^(hmdb|lipidmaps|lm)_(\d+(?:[.-]\d+)*)\.parquet$").unwrap(),
        }
    }

    pub fn parse(&self, filename: &str) -> Result<DatasetVersion, ParseError> {
        let name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(filename);

        if let Some(caps) = self.combined_re.captures(name) {
            let hmdb = parse_token(name, &caps[1])?;
            let lipidmaps = parse_token(name, &caps[2])?;
            let revision = caps
                .get(3)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .map_err(|_| unrecognized(name))?;

            return Ok(DatasetVersion {
                filename: name.to_string(),
                versions: IndexMap::from([(Source::Hmdb, hmdb), (Source::LipidMaps, lipidmaps)]),
                revision,
            });
        }

        if let Some(caps) = self.single_re.captures(name) {
            let source = caps[1].parse::<Source>().map_err(|_| unrecognized(name))?;
            let token = parse_token(name, &caps[2])?;

            return Ok(DatasetVersion {
                filename: name.to_string(),
                versions: IndexMap::from([(source, token)]),
                revision: None,
            });
        }

        Err(unrecognized(name))
    }
}

impl Default for DatasetFilenameParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_token(filename: &str, raw: &str) -> Result<VersionToken, ParseError> {
    raw.parse::<VersionToken>().map_err(|reason| ParseError::InvalidToken {
        filename: filename.to_string(),
        token: raw.to_string(),
        reason,
    })
}

fn unrecognized(filename: &str) -> ParseError {
    ParseError::UnrecognizedPattern {
        filename: filename.to_string(),
    }
}
