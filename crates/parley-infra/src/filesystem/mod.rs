//! Filesystem adapters for Parley.
//!
//! Implements the `SnapshotStore` trait from `parley-core` as a single JSON
//! file, and resolves the data directory that holds it.

pub mod json_store;

use std::path::PathBuf;

pub use json_store::JsonFileStore;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLEY_DATA_DIR` environment variable
/// 2. `~/.parley`
/// 3. `.parley` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    PathBuf::from(".parley")
}
