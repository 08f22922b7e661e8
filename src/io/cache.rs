//! Dataset memoisation for long-running callers that serve many renders from
//! one file. One-shot callers such as `tdash` load through
//! [`DatasetLoader`] directly.

use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use super::loader::DatasetLoader;
use crate::config::ColumnMapping;
use crate::error::{DashboardError, Result};
use crate::model::RecordSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    columns: ColumnMapping,
}

struct CachedDataset {
    modified: SystemTime,
    records: Arc<RecordSet>,
}

/// Memoises loaded datasets by source identity.
///
/// An entry is reused only while the file's modification time is unchanged.
/// Only whole datasets are cached here; derived views are always recomputed.
#[derive(Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<CacheKey, CachedDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<P: AsRef<Path>>(
        &self,
        path: P,
        columns: &ColumnMapping,
    ) -> Result<Arc<RecordSet>> {
        let source_name = path.as_ref().display().to_string();
        let load_error = |e: std::io::Error| DashboardError::Load {
            source_name: source_name.clone(),
            reason: e.to_string(),
        };

        let canonical = fs::canonicalize(path.as_ref()).map_err(load_error)?;
        let modified = fs::metadata(&canonical)
            .and_then(|m| m.modified())
            .map_err(load_error)?;
        let key = CacheKey {
            path: canonical,
            columns: columns.clone(),
        };

        if let Some(cached) = self.lock().get(&key) {
            if cached.modified == modified {
                debug!("Dataset cache hit for {}", key.path.display());
                return Ok(Arc::clone(&cached.records));
            }
            info!("{} changed on disk, reloading", key.path.display());
        }

        let records = Arc::new(DatasetLoader::new(columns.clone())?.load_path(&key.path)?);
        self.lock().insert(
            key,
            CachedDataset {
                modified,
                records: Arc::clone(&records),
            },
        );
        Ok(records)
    }

    /// Drop every cached mapping of `path`.
    pub fn invalidate<P: AsRef<Path>>(&self, path: P) {
        let target =
            fs::canonicalize(path.as_ref()).unwrap_or_else(|_| path.as_ref().to_path_buf());
        self.lock().retain(|key, _| key.path != target);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CachedDataset>> {
        // Entries are only ever replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    const BODY: &str = "text,airline_sentiment,airline,tweet_created\n\
                        hi,positive,Delta,2015-02-24 11:00:00 -0800\n";

    #[test]
    fn test_reuses_loaded_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        fs::write(&path, BODY).unwrap();

        let cache = DatasetCache::new();
        let first = cache.get_or_load(&path, &ColumnMapping::default()).unwrap();
        let second = cache.get_or_load(&path, &ColumnMapping::default()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reloads_after_modification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        fs::write(&path, BODY).unwrap();

        let cache = DatasetCache::new();
        let first = cache.get_or_load(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(first.len(), 1);

        fs::write(
            &path,
            format!("{}yo,negative,United,2015-02-24 12:00:00 -0800\n", BODY),
        )
        .unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        let second = cache.get_or_load(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(second.len(), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        fs::write(&path, BODY).unwrap();

        let cache = DatasetCache::new();
        cache.get_or_load(&path, &ColumnMapping::default()).unwrap();
        cache.invalidate(&path);
        assert!(cache.is_empty());

        let err = cache
            .get_or_load(dir.path().join("nope.csv"), &ColumnMapping::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
    }
}
