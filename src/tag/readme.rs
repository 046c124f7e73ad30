// src/tag/readme.rs
// =============================================================================
// The README tag: `{% github_readme octo, demo, main %}`.
//
// Per invocation:
// 1. Cache lookup. A fresh entry is returned as-is, no network.
// 2. Fetch the README through the contents API.
// 3. On success: normalize the encoding, rewrite relative links against the
//    directory the README was downloaded from, prepend a "Source:" header,
//    store the result in the cache and return it.
// 4. On anything else: return a diagnostic. Diagnostics are never cached,
//    so the next build tries again.
// =============================================================================

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::diagnostics::{describe, invalid_params};
use super::{Outcome, TagOutput};
use crate::cache::CacheStore;
use crate::content::{normalize, rewrite, RewriteContext};
use crate::github::{DocumentSource, Endpoints, FetchRequest};

pub const TAG_NAME: &str = "github_readme";

pub struct ReadmeTag {
    source: Arc<dyn DocumentSource>,
    cache: Arc<dyn CacheStore>,
    endpoints: Endpoints,
    token: Option<String>,
}

impl ReadmeTag {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        cache: Arc<dyn CacheStore>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            source,
            cache,
            endpoints,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    // Renders the tag for "owner, repo[, ref]".
    pub async fn render(&self, params: &str) -> TagOutput {
        self.render_at(params, Utc::now()).await
    }

    // Same as render, with an explicit clock for the rate-limit message.
    pub async fn render_at(&self, params: &str, now: DateTime<Utc>) -> TagOutput {
        let req = match FetchRequest::parse_readme(params) {
            Ok(req) => req,
            Err(e) => {
                return TagOutput::new(Outcome::InvalidParams, invalid_params(TAG_NAME, &e))
            }
        };

        let key = req.cache_key();
        if let Some(text) = self.cache.get(&key) {
            debug!(repo = %req.slug(), key, "serving README from cache");
            return TagOutput::new(Outcome::Cached, text);
        }

        let result = self.source.fetch(&req, self.token.as_deref()).await;

        match result.into_document() {
            Ok(doc) => {
                let text = self.format(&req, &doc.content, doc.download_url.as_deref());
                self.cache.put(&key, &text);
                TagOutput::new(Outcome::Fetched, text)
            }
            Err(failure) => {
                TagOutput::new(Outcome::from(&failure), describe(&req, &failure, now))
            }
        }
    }

    // normalize -> rewrite links -> source header
    fn format(&self, req: &FetchRequest, content: &[u8], download_url: Option<&str>) -> String {
        let text = normalize(content);

        let base_url = download_url
            .and_then(parent_url)
            .unwrap_or_else(|| self.endpoints.raw_tree_url(req));
        let ctx = RewriteContext::new(&base_url, &req.owner, &req.repo)
            .with_web_base(&self.endpoints.web_base);

        let body = rewrite(&text, &ctx);

        format!(
            "> Source: [{}]({})\n\n{}",
            req.slug(),
            self.endpoints.repo_page(req),
            body
        )
    }
}

// "https://raw.../octo/demo/main/docs/README.md?token=x"
//   -> "https://raw.../octo/demo/main/docs"
//
// The query is dropped: private repositories get a short-lived token there
// which must not leak into image URLs.
fn parent_url(download_url: &str) -> Option<String> {
    let mut url = Url::parse(download_url).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut().ok()?.pop();

    Some(url.as_str().trim_end_matches('/').to_string())
}
