// src/github/fetch.rs
// =============================================================================
// Talks to GitHub and turns whatever happens into a FetchResult.
//
// Strategy:
// - README: GET the contents API, which answers with a JSON envelope holding
//   the file base64-encoded plus a download_url we use for link rewriting
// - Wiki: GET the raw page from the raw content host, body is the page
// - Every outcome (HTTP status, network error, timeout, bad JSON) becomes
//   exactly one FetchResult variant. Nothing escapes as an error.
//
// Timeouts:
// - connect timeout on the client (opening the connection)
// - read timeout on every wait for the server: once for the response head,
//   then again for each body chunk. A steady slow download is fine, a stall
//   is not.
// =============================================================================

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::rate_limit::RateLimit;
use super::request::{Endpoints, FetchRequest};
use crate::error::EnvelopeError;

pub const USER_AGENT: &str = concat!("forge-include/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github.v3+json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// The outcome of one fetch attempt. Exactly one of these per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// HTTP 200. `content` is the decoded document (still raw bytes).
    Success {
        content: Vec<u8>,
        /// Where GitHub serves the raw file (README only)
        download_url: Option<String>,
    },
    /// HTTP 404
    NotFound,
    /// HTTP 403 with X-RateLimit-Remaining: 0
    RateLimited(RateLimit),
    /// Network failures, other statuses, malformed envelopes
    TransientError { message: String },
    /// Connect or read timeout
    Timeout,
}

impl FetchResult {
    fn transient(message: impl Into<String>) -> Self {
        Self::TransientError {
            message: message.into(),
        }
    }

    /// Splits a result into the fetched document or the reason there is none.
    pub fn into_document(self) -> Result<Document, FetchFailure> {
        match self {
            Self::Success {
                content,
                download_url,
            } => Ok(Document {
                content,
                download_url,
            }),
            Self::NotFound => Err(FetchFailure::NotFound),
            Self::RateLimited(limit) => Err(FetchFailure::RateLimited(limit)),
            Self::TransientError { message } => Err(FetchFailure::Transient(message)),
            Self::Timeout => Err(FetchFailure::Timeout),
        }
    }
}

/// The payload of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: Vec<u8>,
    pub download_url: Option<String>,
}

/// Every way a fetch can end without a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    NotFound,
    RateLimited(RateLimit),
    Transient(String),
    Timeout,
}

/// Anything that can produce a document for a request.
///
/// The real implementation is [`GithubFetcher`]; tests plug in doubles.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, req: &FetchRequest, token: Option<&str>) -> FetchResult;
}

/// Connect and read timeouts for one request.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_TIMEOUT,
            read: DEFAULT_TIMEOUT,
        }
    }
}

// Why an exchange stopped before a full response was read.
#[derive(Debug, Error)]
enum ExchangeError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("server sent nothing for {0:?}")]
    ReadTimeout(Duration),
}

pub struct GithubFetcher {
    client: Client,
    endpoints: Endpoints,
    timeouts: Timeouts,
}

impl GithubFetcher {
    pub fn new(endpoints: Endpoints, timeouts: Timeouts) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoints,
            timeouts,
        })
    }

    // Sends the request and reads the whole body, giving the server at most
    // `read` for the response head and for each chunk after it.
    async fn exchange(
        &self,
        url: Url,
        is_wiki: bool,
        token: Option<&str>,
    ) -> Result<(StatusCode, HeaderMap, Vec<u8>), ExchangeError> {
        let read = self.timeouts.read;
        let stalled = |_: tokio::time::error::Elapsed| ExchangeError::ReadTimeout(read);

        let mut request = self.client.get(url);

        if !is_wiki {
            request = request.header(ACCEPT, GITHUB_JSON);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let mut response = tokio::time::timeout(read, request.send())
            .await
            .map_err(stalled)??;
        let status = response.status();
        let headers = response.headers().clone();

        let mut body = Vec::new();
        while let Some(chunk) = tokio::time::timeout(read, response.chunk())
            .await
            .map_err(stalled)??
        {
            body.extend_from_slice(&chunk);
        }

        Ok((status, headers, body))
    }
}

#[async_trait]
impl DocumentSource for GithubFetcher {
    async fn fetch(&self, req: &FetchRequest, token: Option<&str>) -> FetchResult {
        let url = self.endpoints.url_for(req);
        debug!(%url, authenticated = token.is_some(), "fetching document");

        let result = match self.exchange(url, req.is_wiki(), token).await {
            Ok((status, headers, body)) => classify(req.is_wiki(), status, &headers, &body),
            Err(ExchangeError::Http(e)) => categorize_error(e),
            Err(e @ ExchangeError::ReadTimeout(_)) => {
                debug!(error = %e, "read timeout");
                FetchResult::Timeout
            }
        };

        match &result {
            FetchResult::Success { content, .. } => {
                info!(repo = %req.slug(), bytes = content.len(), "fetched document")
            }
            other => warn!(repo = %req.slug(), outcome = ?other, "fetch did not succeed"),
        }

        result
    }
}

// Maps a finished HTTP exchange onto a FetchResult.
//
// HTTP status codes:
// - 200: success (README body is a JSON envelope, wiki body is the page)
// - 404: the README / wiki page does not exist
// - 403: rate limited if X-RateLimit-Remaining is 0, else access denied
// - anything else: transient error carrying the status
pub fn classify(is_wiki: bool, status: StatusCode, headers: &HeaderMap, body: &[u8]) -> FetchResult {
    match status {
        StatusCode::OK if is_wiki => FetchResult::Success {
            content: body.to_vec(),
            download_url: None,
        },
        StatusCode::OK => match decode_envelope(body) {
            Ok((content, download_url)) => FetchResult::Success {
                content,
                download_url,
            },
            Err(e) => FetchResult::transient(e.to_string()),
        },
        StatusCode::NOT_FOUND => FetchResult::NotFound,
        StatusCode::FORBIDDEN => match RateLimit::from_headers(headers) {
            Some(limit) if limit.is_exhausted() => FetchResult::RateLimited(limit),
            _ => FetchResult::transient("access denied (HTTP 403)"),
        },
        other => FetchResult::transient(format!("HTTP {}", other)),
    }
}

// The part of the contents API response we care about.
#[derive(Debug, Deserialize)]
struct ReadmeEnvelope {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

// Extracts the document bytes and download URL from a README envelope.
//
// GitHub wraps the base64 payload at 60 columns, so whitespace is removed
// before decoding. Non-base64 encodings are passed through as-is.
fn decode_envelope(body: &[u8]) -> Result<(Vec<u8>, Option<String>), EnvelopeError> {
    let envelope: ReadmeEnvelope = serde_json::from_slice(body)?;

    let content = match envelope.encoding.as_deref() {
        None | Some("base64") => {
            let compact: String = envelope
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            base64::engine::general_purpose::STANDARD.decode(compact)?
        }
        Some(_) => envelope.content.into_bytes(),
    };

    Ok((content, envelope.download_url))
}

// Categorizes reqwest errors into FetchResult variants.
fn categorize_error(error: reqwest::Error) -> FetchResult {
    if error.is_timeout() {
        FetchResult::Timeout
    } else if error.is_connect() {
        FetchResult::transient(format!("connection failed: {}", error))
    } else {
        FetchResult::transient(error.to_string())
    }
}
