//! Common types for dataset filename parsing

use indexmap::IndexMap;
use serde::Serialize;

use crate::version::token::VersionToken;

/// Upstream database a dataset is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Human Metabolome Database (hmdb.ca)
    Hmdb,
    /// LIPID MAPS Structure Database (lipidmaps.org)
    LipidMaps,
}

impl Source {
    /// Every known source, in report order
    pub const ALL: [Source; 2] = [Source::Hmdb, Source::LipidMaps];

    /// Returns the machine key of the source
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Hmdb => "hmdb",
            Source::LipidMaps => "lipidmaps",
        }
    }

    /// Returns the name shown to administrators
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Hmdb => "HMDB",
            Source::LipidMaps => "LIPID MAPS",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Source {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hmdb" => Ok(Source::Hmdb),
            "lipidmaps" | "lipid maps" | "lm" => Ok(Source::LipidMaps),
            _ => Err(()),
        }
    }
}

/// Versions parsed out of a local dataset filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetVersion {
    /// Filename the versions were read from
    pub filename: String,
    /// Version per source, in the order they appear in the filename
    pub versions: IndexMap<Source, VersionToken>,
    /// Pipeline revision (`_v5` suffix), if present
    pub revision: Option<u32>,
}

impl DatasetVersion {
    /// Local version for `source`, if the filename encodes one
    pub fn version_of(&self, source: Source) -> Option<&VersionToken> {
        self.versions.get(&source)
    }
}
