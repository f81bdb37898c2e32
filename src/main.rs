//! Spur Context enricher CLI.

use anyhow::{Context, Result};
use clap::Parser;
use spur_context_enricher::{Config, EnrichmentEngine, Entity, SpurProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spur-context-enricher")]
#[command(about = "Enrich IPv4 addresses with context from the Spur Context API")]
#[command(version)]
struct Args {
    /// IPv4 addresses to look up
    ips: Vec<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "spur-context.yaml")]
    config: PathBuf,

    /// File with one address per line ('#' starts a comment)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short = 'L', long)]
    log_level: Option<String>,

    /// Print example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --print-config
    if args.print_config {
        println!("{}", Config::example());
        return Ok(());
    }

    // Load configuration before logging so the file can set the level
    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(config = %args.config.display(), "Configuration loaded");

    // Handle --validate
    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    let mut values = args.ips.clone();
    if let Some(path) = &args.input {
        values.extend(read_addresses(path)?);
    }
    let entities: Vec<Entity> = values.into_iter().map(Entity::ipv4).collect();

    let provider = SpurProvider::from_config(&config)?;
    let engine = EnrichmentEngine::new(Arc::new(provider));

    let batch = engine.enrich(&entities, &config.lookup_options()).await?;
    info!(results = batch.len(), "Lookup complete");

    println!("{}", serde_json::to_string_pretty(&batch.into_display())?);

    Ok(())
}

/// Read addresses from a file, one per line.
fn read_addresses(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    Ok(content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
