// src/tag/wiki.rs
// =============================================================================
// The wiki tag: `{% github_wiki octo, demo, Getting-Started %}`.
//
// Unlike the README tag this one renders straight to HTML, does not add a
// source header and does not cache. Wiki pages come from the raw content
// host (no API quota involved), so every build fetches them again.
//
// Diagnostics go through the same Markdown renderer as content, so the
// caller always gets an HTML fragment back.
// =============================================================================

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::diagnostics::{describe, invalid_params};
use super::{Outcome, TagOutput};
use crate::content::{markdown_to_html, normalize};
use crate::github::{DocumentSource, FetchRequest};

pub const TAG_NAME: &str = "github_wiki";

pub struct WikiTag {
    source: Arc<dyn DocumentSource>,
}

impl WikiTag {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    // Renders the tag for "owner, repo[, page]".
    pub async fn render(&self, params: &str) -> TagOutput {
        self.render_at(params, Utc::now()).await
    }

    pub async fn render_at(&self, params: &str, now: DateTime<Utc>) -> TagOutput {
        let req = match FetchRequest::parse_wiki(params) {
            Ok(req) => req,
            Err(e) => {
                return TagOutput::new(
                    Outcome::InvalidParams,
                    markdown_to_html(&invalid_params(TAG_NAME, &e)),
                )
            }
        };

        // Wiki pages never carry a token
        let result = self.source.fetch(&req, None).await;

        let (outcome, markdown) = match result.into_document() {
            Ok(doc) => (Outcome::Fetched, normalize(&doc.content)),
            Err(failure) => (Outcome::from(&failure), describe(&req, &failure, now)),
        };

        TagOutput::new(outcome, markdown_to_html(&markdown))
    }
}
