//! identity-fetch - print the merged identity behind an account address
//!
//! Provider endpoints come from the environment (see `FetcherConfig`).
//! The result is written to stdout as JSON; logs go to stderr.

mod error;

use clap::Parser;
use identity_fetcher::{EnrichmentPolicy, FetcherConfig, IdentityFetcher};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "identity-fetch")]
#[command(about = "Resolve an account address into a merged identity")]
#[command(version)]
struct Args {
    /// Account address to resolve
    address: String,

    /// Print only the merged identity, without per-provider status
    #[arg(long)]
    identity_only: bool,

    /// Single-line JSON instead of pretty printed
    #[arg(long)]
    compact: bool,

    /// What a failed POAP co-attendee lookup does: abort or partial
    #[arg(long)]
    enrichment_policy: Option<String>,

    /// POAP events enriched at once
    #[arg(long)]
    enrichment_concurrency: Option<usize>,
}

impl Args {
    /// Environment configuration with command line overrides applied
    fn config(&self) -> Result<FetcherConfig> {
        let mut config = FetcherConfig::from_env();

        if let Some(policy) = &self.enrichment_policy {
            config.enrichment_policy = EnrichmentPolicy::parse(policy).ok_or_else(|| {
                CliError::Config(format!("unknown enrichment policy: {}", policy))
            })?;
        }
        if let Some(concurrency) = self.enrichment_concurrency {
            if concurrency == 0 {
                return Err(CliError::Config(
                    "enrichment concurrency must be at least 1".to_string(),
                ));
            }
            config.enrichment_concurrency = concurrency;
        }

        Ok(config)
    }
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "identity_fetcher=info,identity_fetch=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    let config = args.config()?;
    info!(
        policy = ?config.enrichment_policy,
        concurrency = config.enrichment_concurrency,
        "Resolving {}",
        args.address
    );

    let fetcher = IdentityFetcher::new(&config)?;
    let report = fetcher.fetch(&args.address).await;

    if report.all_failed() {
        warn!("Every identity provider failed");
    }

    let output = if args.identity_only {
        render(&report.identity, args.compact)?
    } else {
        render(&report, args.compact)?
    };
    println!("{}", output);

    Ok(())
}
