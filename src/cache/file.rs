// src/cache/file.rs
// =============================================================================
// On-disk cache: one file per key inside a single directory.
//
// Layout:
//   <dir>/<key>.md   plain text, exactly what the tag returned
//
// There is no metadata file. The file's modification time *is* the storage
// timestamp, and expiry is checked when reading (no background sweeping).
//
// Several site builds may run at once and share this directory. Writes go to
// a temporary file in the same directory first and are then renamed over the
// target, so a reader sees either the old entry or the new one, never half
// of a file.
// =============================================================================

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{sanitize, CacheStore};
use crate::error::CacheError;

const ENTRY_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // Keys are sanitized again here so a caller passing a raw string can
    // never escape the cache directory.
    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", sanitize(key), ENTRY_EXTENSION))
    }

    fn read_fresh(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(key);

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let modified = metadata
            .modified()
            .map_err(|source| CacheError::Io { path: path.clone(), source })?;

        // An mtime in the future (clock skew between machines) counts as fresh
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age > self.ttl {
            debug!(key, age_secs = age.as_secs(), "cache entry expired");
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|source| CacheError::Io { path, source })?;

        Ok(Some(content))
    }

    fn write(&self, key: &str, content: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let io_err = |source| CacheError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;

        let path = self.entry_path(key);
        tmp.persist(&path)
            .map_err(|source| CacheError::Persist { path, source })?;

        Ok(())
    }

    // Removes every cache entry in the directory. Returns how many were
    // deleted. A missing directory just means there is nothing to purge.
    pub fn purge(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|source| CacheError::Io {
                    path: self.dir.clone(),
                    source,
                })?
                .path();

            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }

            fs::remove_file(&path).map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }

        Ok(removed)
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_fresh(key) {
            Ok(Some(content)) => {
                debug!(key, "cache hit");
                Some(content)
            }
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    fn put(&self, key: &str, content: &str) {
        match self.write(key, content) {
            Ok(()) => debug!(key, bytes = content.len(), "cache entry stored"),
            Err(e) => warn!(key, error = %e, "cache write failed, skipping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn backdate(path: &Path, by: Duration) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[test]
    fn test_put_then_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));

        cache.put("octo_demo_main", "# Demo\n");
        assert_eq!(cache.get("octo_demo_main").as_deref(), Some("# Demo\n"));
    }

    #[test]
    fn test_missing_entry_is_none() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));
        assert_eq!(cache.get("nothing_here"), None);
    }

    #[test]
    fn test_creates_directory_on_put() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = FileCache::new(&nested, Duration::from_secs(3600));

        cache.put("k", "v");
        assert!(nested.join("k.md").is_file());
    }

    #[test]
    fn test_stale_entry_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));

        cache.put("k", "old");
        backdate(&cache.entry_path("k"), Duration::from_secs(2 * 3600));

        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_entry_just_inside_ttl_is_fresh() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));

        cache.put("k", "recent");
        backdate(&cache.entry_path("k"), Duration::from_secs(3500));

        assert_eq!(cache.get("k").as_deref(), Some("recent"));
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));

        cache.put("k", "first");
        cache.put("k", "second");
        assert_eq!(cache.get("k").as_deref(), Some("second"));

        // no temp files left behind
        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_unsanitized_key_stays_inside_dir() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));

        cache.put("../escape", "x");
        assert!(dir.path().join("___escape.md").is_file());
        assert_eq!(cache.get("../escape").as_deref(), Some("x"));
    }

    #[test]
    fn test_unwritable_location_is_swallowed() {
        let dir = TempDir::new().unwrap();
        // a regular file where the cache directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let cache = FileCache::new(&blocker, Duration::from_secs(3600));
        cache.put("k", "v");
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_purge_removes_entries() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(3600));

        cache.put("a", "1");
        cache.put("b", "2");
        fs::write(dir.path().join("keep.txt"), "unrelated").unwrap();

        assert_eq!(cache.purge().unwrap(), 2);
        assert_eq!(cache.get("a"), None);
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_purge_missing_dir() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("nope"), Duration::from_secs(3600));
        assert_eq!(cache.purge().unwrap(), 0);
    }
}
