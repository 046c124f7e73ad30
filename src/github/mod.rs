// src/github/mod.rs
// =============================================================================
// This module handles fetching documents from GitHub.
//
// Currently implements:
// - Parsing tag parameters into a FetchRequest (request.rs)
// - README fetching through the REST contents API (fetch.rs)
// - Wiki page fetching from raw.githubusercontent.com (fetch.rs)
// - Reading X-RateLimit-* headers on 403 responses (rate_limit.rs)
// =============================================================================

mod fetch;
mod rate_limit;
mod request;

pub use fetch::{DocumentSource, FetchFailure, FetchResult, GithubFetcher, Timeouts};
pub use rate_limit::{describe_wait, RateLimit};
pub use request::{Endpoints, FetchRequest, DEFAULT_API_BASE, DEFAULT_RAW_BASE, DEFAULT_WEB_BASE};
