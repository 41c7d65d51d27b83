//! WebSearch-RS command line entry point
//!
//! Runs one search against the configured provider and prints the results.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use websearch_rs::{
    config,
    events::TracingSink,
    metrics::SearchMetrics,
    providers::{create_provider, ProviderOptions, BRAVE_PROVIDER_NAME},
    SearchResult,
};

/// A rate-limited, retrying web search API client
///
/// The API key is read from BRAVE_API_KEY; WEBSEARCH_* variables override
/// settings.yml. Log output is filtered with RUST_LOG (default: info).
#[derive(Parser, Debug)]
#[command(name = "websearch-rs", version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = config::SETTINGS_PATH_ENV)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Search query
    #[arg(required = true)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let query = args.query.join(" ");

    info!("Starting WebSearch-RS v{}", websearch_rs::VERSION);

    let settings = config::load_settings(args.config.as_deref())?;
    let metrics = Arc::new(SearchMetrics::new());
    let options = ProviderOptions::from_settings(&settings)
        .sink(Arc::new(TracingSink::new(BRAVE_PROVIDER_NAME)))
        .sink(metrics.clone());

    let provider = create_provider(options)?;
    let results = provider.search(&query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }

    debug!(metrics = ?metrics.snapshot(), "search metrics");
    Ok(())
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results.");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        println!("{}. {}", i + 1, result.title);
        println!("   {}", result.url);
        println!("   {}", result.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_words_and_flags() {
        let args = Args::try_parse_from(["websearch-rs", "--json", "rust", "async", "io"]).unwrap();
        assert!(args.json);
        assert_eq!(args.query.join(" "), "rust async io");

        let args =
            Args::try_parse_from(["websearch-rs", "-c", "/tmp/settings.yml", "tokio"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/settings.yml")));
    }

    #[test]
    fn test_query_is_required() {
        assert!(Args::try_parse_from(["websearch-rs", "--json"]).is_err());
    }
}
