// src/main.rs
// =============================================================================
// This is the entry point of forge-include.
//
// What happens here:
// 1. Set up logging (stderr only, stdout is reserved for the document)
// 2. Parse command-line arguments using clap and resolve settings
// 3. Run the README tag, the wiki tag or a cache command
// 4. Print the result and exit
//
// Exit codes:
//   0 = content or a diagnostic was printed (the page build carries on)
//   1 = a diagnostic was printed and --strict was given
//   2 = start-up error (bad flags, HTTP client could not be built)
// =============================================================================

mod cache;
mod cli;
mod config;
mod content;
mod error;
mod github;
mod tag;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cache::{CacheStore, FileCache, MemoryCache};
use cli::{CacheAction, Cli, Commands};
use config::Settings;
use github::GithubFetcher;
use tag::{ReadmeTag, TagOutput, WikiTag};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG controls verbosity; quiet (warnings only) by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;

    match &cli.command {
        Commands::Readme { params } => {
            let params = params.join(" ");
            let output = render_readme(&settings, &params).await?;
            emit("readme", &params, &output, &cli)
        }
        Commands::Wiki { params } => {
            let params = params.join(" ");
            let output = render_wiki(&settings, &params).await?;
            emit("wiki", &params, &output, &cli)
        }
        Commands::Cache { action } => handle_cache(&settings, action),
    }
}

async fn render_readme(settings: &Settings, params: &str) -> Result<TagOutput> {
    let fetcher = GithubFetcher::new(settings.endpoints.clone(), settings.timeouts)
        .context("could not build HTTP client")?;

    let cache: Arc<dyn CacheStore> = if settings.use_disk_cache {
        Arc::new(FileCache::new(&settings.cache_dir, settings.cache_ttl))
    } else {
        Arc::new(MemoryCache::new(settings.cache_ttl))
    };

    let tag = ReadmeTag::new(Arc::new(fetcher), cache, settings.endpoints.clone())
        .with_token(settings.token.clone());

    Ok(tag.render(params).await)
}

async fn render_wiki(settings: &Settings, params: &str) -> Result<TagOutput> {
    let fetcher = GithubFetcher::new(settings.endpoints.clone(), settings.timeouts)
        .context("could not build HTTP client")?;

    Ok(WikiTag::new(Arc::new(fetcher)).render(params).await)
}

// What --json prints
#[derive(Serialize)]
struct Report<'a> {
    tag: &'a str,
    params: &'a str,
    #[serde(flatten)]
    output: &'a TagOutput,
}

// Prints the tag output and picks the exit code.
fn emit(tag: &str, params: &str, output: &TagOutput, cli: &Cli) -> Result<i32> {
    let mut stdout = std::io::stdout().lock();

    if cli.json {
        let report = Report { tag, params, output };
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else {
        stdout.write_all(output.text.as_bytes())?;
    }
    stdout.flush()?;

    if cli.strict && !output.outcome.is_content() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn handle_cache(settings: &Settings, action: &CacheAction) -> Result<i32> {
    let cache = FileCache::new(&settings.cache_dir, settings.cache_ttl);

    match action {
        CacheAction::Path => println!("{}", cache.dir().display()),
        CacheAction::Purge => {
            let removed = cache
                .purge()
                .with_context(|| format!("could not purge {}", cache.dir().display()))?;
            eprintln!("Removed {} cached README(s)", removed);
        }
    }

    Ok(0)
}
