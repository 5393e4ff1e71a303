//! Dataset filename parsing
//!
//! Extracts upstream release versions from the filename of a local Parquet
//! snapshot.

pub mod filename;
pub mod types;

pub use filename::{DatasetFilenameParser, parse_local_version};
pub use types::{DatasetVersion, Source};
