// src/config.rs
// =============================================================================
// Runtime settings: where the cache lives, how long to wait for GitHub, which
// host to talk to, and which token (if any) to send.
//
// Token resolution, first present value wins:
//   1. GITHUB_TOKEN environment variable
//   2. github.token in the site configuration (_config.yml)
//   3. nothing: anonymous requests (60 per hour per IP)
//
// Only the README tag uses the token. Wiki pages come from the raw content
// host which does not need one.
// =============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::github::{Endpoints, Timeouts};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

// Just the part of _config.yml we read. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct SiteConfig {
    #[serde(default)]
    github: Option<GithubSection>,
}

#[derive(Debug, Default, Deserialize)]
struct GithubSection {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub token: Option<String>,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub use_disk_cache: bool,
    pub timeouts: Timeouts,
    pub endpoints: Endpoints,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let endpoints = Endpoints::new(&cli.api_base, &cli.raw_base, &cli.web_base)
            .context("invalid forge endpoint URL")?;

        let site_token = match load_site_token(&cli.config) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "ignoring site config");
                None
            }
        };
        let token = resolve_token(std::env::var(TOKEN_ENV).ok(), site_token);
        debug!(authenticated = token.is_some(), "resolved GitHub token");

        let timeout = Duration::from_secs(cli.timeout);

        Ok(Self {
            token,
            cache_dir: cli.cache_dir.clone(),
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            use_disk_cache: !cli.no_cache,
            timeouts: Timeouts {
                connect: timeout,
                read: timeout,
            },
            endpoints,
        })
    }
}

// Picks the first usable token. Blank strings count as absent.
pub fn resolve_token(env_value: Option<String>, site_value: Option<String>) -> Option<String> {
    [env_value, site_value]
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

// Reads github.token from the site config. A missing file is not an error,
// the site simply has no token configured.
pub fn load_site_token(path: &Path) -> Result<Option<String>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no site config");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if raw.trim().is_empty() {
        return Ok(None);
    }

    let config: SiteConfig = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(config.github.and_then(|github| github.token))
}
