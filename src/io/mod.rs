use anyhow::Result;
use std::path::Path;

pub mod cache;
pub mod loader;

pub use cache::DatasetCache;
pub use loader::{parse_timestamp, DatasetLoader};

/// Write any serialisable view as pretty JSON, creating parent directories.
pub fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
