// src/cache/memory.rs
// In-process cache. Same TTL rules as the file cache, nothing survives exit.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use super::CacheStore;

#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (SystemTime, String)>>,
    ttl: Duration,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    #[cfg(test)]
    fn backdate(&self, key: &str, by: Duration) {
        if let Ok(mut entries) = self.entries.write() {
            if let Some((stored_at, _)) = entries.get_mut(key) {
                *stored_at -= by;
            }
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let (stored_at, content) = entries.get(key)?;

        let age = stored_at.elapsed().unwrap_or(Duration::ZERO);
        if age > self.ttl {
            return None;
        }

        Some(content.clone())
    }

    fn put(&self, key: &str, content: &str) {
        // A poisoned lock means some other thread panicked mid-write; skip
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), (SystemTime::now(), content.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.put("k", "v");
        assert_eq!(cache.get("k").as_deref(), Some("v"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.put("k", "v");
        cache.backdate("k", Duration::from_secs(61));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }
}
