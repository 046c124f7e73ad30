// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// A site generator calls us once per tag:
//
//   forge-include readme octo, demo, main    -> Markdown on stdout
//   forge-include wiki octo, demo, Home      -> HTML on stdout
//   forge-include cache purge                -> empty the cache directory
//
// Every flag can also come from an environment variable so a build script
// can set them once instead of repeating them on every call.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cache::DEFAULT_TTL;
use crate::github::{DEFAULT_API_BASE, DEFAULT_RAW_BASE, DEFAULT_WEB_BASE};

#[derive(Parser, Debug)]
#[command(
    name = "forge-include",
    version,
    about = "Embed a GitHub README or wiki page into a static site",
    long_about = "forge-include fetches a repository README (through the GitHub API) or a wiki page \
                  (from the raw content host), fixes relative links and caches READMEs for an hour \
                  so repeated site builds do not exhaust the API rate limit."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site configuration file; only `github.token` is read from it
    #[arg(long, global = true, env = "FORGE_INCLUDE_CONFIG", default_value = "_config.yml")]
    pub config: PathBuf,

    /// Directory holding cached READMEs
    #[arg(
        long,
        global = true,
        env = "FORGE_INCLUDE_CACHE_DIR",
        default_value = ".forge-include-cache"
    )]
    pub cache_dir: PathBuf,

    /// Seconds a cached README stays fresh
    #[arg(long, global = true, env = "FORGE_INCLUDE_CACHE_TTL", default_value_t = DEFAULT_TTL.as_secs())]
    pub cache_ttl: u64,

    /// Connect and read timeout in seconds (each)
    #[arg(long, global = true, env = "FORGE_INCLUDE_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// GitHub REST API base URL
    #[arg(long, global = true, env = "FORGE_INCLUDE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Raw content host base URL
    #[arg(long, global = true, env = "FORGE_INCLUDE_RAW_BASE", default_value = DEFAULT_RAW_BASE)]
    pub raw_base: String,

    /// GitHub web host, used for "Source:" headers and repository links
    #[arg(long, global = true, env = "FORGE_INCLUDE_WEB_BASE", default_value = DEFAULT_WEB_BASE)]
    pub web_base: String,

    /// Keep the cache in memory only (nothing is read from or written to disk)
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Print a JSON report instead of the bare document
    #[arg(long, global = true)]
    pub json: bool,

    /// Exit with code 1 when a diagnostic was printed instead of content
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a repository README as Markdown
    ///
    /// Example: forge-include readme rust-lang, rust, master
    Readme {
        /// "owner, repo[, ref]" (ref defaults to main)
        ///
        /// Words are joined with spaces, so quoting is optional
        #[arg(required = true, num_args = 1..)]
        params: Vec<String>,
    },

    /// Print a wiki page as HTML
    ///
    /// Example: forge-include wiki rust-lang, rust, Home
    Wiki {
        /// "owner, repo[, page]" (page defaults to Home)
        #[arg(required = true, num_args = 1..)]
        params: Vec<String>,
    },

    /// Inspect or clear the README cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print the cache directory
    Path,
    /// Delete every cached README
    Purge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readme_params_are_collected() {
        let cli = Cli::parse_from(["forge-include", "readme", "octo,", "demo,", "v2"]);
        match cli.command {
            Commands::Readme { params } => assert_eq!(params.join(" "), "octo, demo, v2"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["forge-include", "wiki", "octo, demo"]);
        assert_eq!(cli.cache_ttl, 3600);
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.api_base, "https://api.github.com");
        assert!(!cli.json && !cli.strict && !cli.no_cache);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["forge-include", "readme", "octo, demo", "--json", "--no-cache"]);
        assert!(cli.json);
        assert!(cli.no_cache);
    }

    #[test]
    fn test_cache_purge() {
        let cli = Cli::parse_from(["forge-include", "cache", "purge"]);
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheAction::Purge
            }
        ));
    }

    #[test]
    fn test_params_required() {
        assert!(Cli::try_parse_from(["forge-include", "readme"]).is_err());
    }
}
