//! Data directory test utilities

use std::fs::File;

use tempfile::TempDir;

/// Create a data directory containing empty files with the given names
pub fn create_data_dir(filenames: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().expect("create temp dir");
    for name in filenames {
        File::create(temp_dir.path().join(name)).expect("create dataset file");
    }
    temp_dir
}
