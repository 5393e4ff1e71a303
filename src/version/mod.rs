//! Version reconciliation layer
//!
//! Fetches the latest upstream releases and compares them with the versions
//! encoded in the local dataset filename.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Upstream   │────▶│   Checker   │◀────│   Parser    │
//! │  (fetch)    │     │  (compare)  │     │ (filename)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │  Upstreams  │     │    Token    │
//! │(hmdb, lmsd) │     │ (ordering)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`checker`]: Per-source comparison and concurrent reconciliation
//! - [`error`]: Error types for tokens, filenames and remote lookups
//! - [`token`]: Validated version tokens and their ordering
//! - [`upstream`]: Upstream trait for fetching the latest release
//! - [`upstreams`]: Concrete upstreams (HMDB, LIPID MAPS)

pub mod checker;
pub mod error;
pub mod token;
pub mod upstream;
pub mod upstreams;
