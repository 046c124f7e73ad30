// src/cache/mod.rs
// =============================================================================
// A small, time-expiring key -> text store.
//
// Fetching a README costs one GitHub API call, and anonymous callers only get
// 60 of those per hour. A site build that embeds the same README on several
// pages (or is rebuilt a few times while someone edits CSS) would burn
// through that quickly. So the README tag keeps its output for an hour.
//
// The cache is purely an optimization: every failure inside it is logged and
// treated as a miss (get) or a no-op (put). Nothing here can break a build.
//
// Implementations:
// - file: one plain-text file per key, freshness from the file's mtime
// - memory: a HashMap behind a lock, for tests and --no-cache runs
// =============================================================================

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use std::time::Duration;

/// How long a cached README stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Storage for rendered documents, keyed by a sanitized identity string.
///
/// Implementations must never panic and never surface errors: an unreadable
/// or expired entry is simply `None`, and a failed write is dropped.
pub trait CacheStore: Send + Sync {
    /// Returns the stored text if it exists and is younger than the TTL.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores (or replaces) the text for `key`.
    fn put(&self, key: &str, content: &str);
}

// Builds the cache key for a README request.
//
// owner/repo/ref are joined with '/' and then every character outside
// [A-Za-z0-9_] becomes '_'. Keys are therefore safe file names.
//
// Two requests that only differ in punctuation ("my-repo" vs "my.repo") end
// up with the same key. That is a known limitation, not something we try to
// fix here.
pub fn derive_key(owner: &str, repo: &str, git_ref: &str) -> String {
    sanitize(&format!("{}/{}/{}", owner, repo, git_ref))
}

// Replaces every character outside [A-Za-z0-9_] with '_'.
// Idempotent: sanitize(sanitize(s)) == sanitize(s).
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_shape() {
        assert_eq!(derive_key("octo", "demo", "main"), "octo_demo_main");
        assert_eq!(
            derive_key("rust-lang", "rust", "release/1.80"),
            "rust_lang_rust_release_1_80"
        );
    }

    #[test]
    fn test_derive_key_deterministic() {
        assert_eq!(
            derive_key("a.b", "c-d", "v1.0"),
            derive_key("a.b", "c-d", "v1.0")
        );
    }

    #[test]
    fn test_sanitize_idempotent() {
        for raw in ["octo/demo/main", "ünïcode repo", "../../etc/passwd", "plain_key"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_sanitize_maps_each_char_once() {
        // multi-byte characters collapse to a single underscore
        assert_eq!(sanitize("é-x"), "__x");
    }

    #[test]
    fn test_punctuation_only_differences_collide() {
        // accepted limitation
        assert_eq!(
            derive_key("octo", "my-repo", "main"),
            derive_key("octo", "my.repo", "main")
        );
    }
}
