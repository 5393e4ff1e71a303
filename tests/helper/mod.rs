//! Shared test utilities

#![allow(dead_code)]

pub mod dataset;
pub mod upstream;

pub use dataset::create_data_dir;
pub use upstream::StaticUpstream;
