// src/tag/mod.rs
// =============================================================================
// The two tags a site template can use.
//
// - readme: cache -> fetch -> normalize -> rewrite links -> add a source
//   header -> cache -> Markdown
// - wiki:   fetch -> normalize -> Markdown to HTML (no cache, no header)
//
// Both always return text. Failures come back as a readable diagnostic with
// an Outcome telling the caller what happened.
// =============================================================================

mod diagnostics;
mod readme;
mod wiki;

pub use readme::ReadmeTag;
pub use wiki::WikiTag;

use serde::Serialize;

use crate::github::FetchFailure;

/// What a tag invocation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Served from the cache without touching the network
    Cached,
    /// Fetched from GitHub
    Fetched,
    InvalidParams,
    NotFound,
    RateLimited,
    TransientError,
    Timeout,
}

impl Outcome {
    pub fn is_content(&self) -> bool {
        matches!(self, Outcome::Cached | Outcome::Fetched)
    }
}

impl From<&FetchFailure> for Outcome {
    fn from(failure: &FetchFailure) -> Self {
        match failure {
            FetchFailure::NotFound => Outcome::NotFound,
            FetchFailure::RateLimited(_) => Outcome::RateLimited,
            FetchFailure::Transient(_) => Outcome::TransientError,
            FetchFailure::Timeout => Outcome::Timeout,
        }
    }
}

/// Text to substitute into the page, plus how we got it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOutput {
    pub outcome: Outcome,
    pub text: String,
}

impl TagOutput {
    fn new(outcome: Outcome, text: String) -> Self {
        Self { outcome, text }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    // A DocumentSource double that hands out a fixed result and counts calls.

    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::github::{DocumentSource, FetchRequest, FetchResult};

    pub struct StubSource {
        result: FetchResult,
        calls: AtomicUsize,
        last_token: Mutex<Option<String>>,
    }

    impl StubSource {
        pub fn new(result: FetchResult) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
                last_token: Mutex::new(None),
            }
        }

        pub fn success(text: &str, download_url: Option<&str>) -> Self {
            Self::new(FetchResult::Success {
                content: text.as_bytes().to_vec(),
                download_url: download_url.map(str::to_string),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_token(&self) -> Option<String> {
            self.last_token.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DocumentSource for StubSource {
        async fn fetch(&self, _req: &FetchRequest, token: Option<&str>) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_token.lock().unwrap() = token.map(str::to_string);
            self.result.clone()
        }
    }
}
