// src/error.rs
// =============================================================================
// Error types for the fallible helpers of forge-include.
//
// None of these ever reach the templating layer: the fetcher turns transport
// problems into FetchResult variants, the cache logs and swallows its own
// errors, and config problems fall back to "no token". They exist so the
// helpers can use `?` internally and so the logs say what went wrong.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Problems reading the site configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read site config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse site config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Problems touching the on-disk cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not move cache entry into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Problems decoding the README JSON envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid JSON envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Tag parameters that cannot be turned into a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("expected \"owner, repo[, {expected}]\" but got {got:?}")]
    Malformed { expected: &'static str, got: String },
}
