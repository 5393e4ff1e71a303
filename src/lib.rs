//! Dataset version reconciliation for a local HMDB / LIPID MAPS snapshot
//!
//! - [`parser`]: Versions encoded in dataset filenames
//! - [`dataset`]: Selection of the active dataset in the data directory
//! - [`version`]: Upstream lookups and comparison
//! - [`report`]: Table and JSON rendering
//! - [`pipeline`]: Launcher for the external enrichment pipeline

pub mod config;
pub mod dataset;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod version;
