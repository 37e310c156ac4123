//! Osprey CLI
//!
//! Classifies a file of URLs against a JSON rule file and prints one
//! `<url> -> <result>` line per non-blank input line.

use anyhow::{Context, Result};
use clap::Parser;
use osprey_engine::{BatchConfig, BatchProcessor, RuleEngine};
use osprey_rules::RuleLoader;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "osprey")]
#[command(about = "Osprey - indexed URL classification engine", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON rule file
    rules: PathBuf,

    /// URL file, one URL per line
    urls: PathBuf,

    /// Log level (logs go to stderr; results to stdout)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Worker threads for batch evaluation (defaults to available cores)
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let rules = RuleLoader::load_from_file(&cli.rules)
        .with_context(|| format!("loading rules from {}", cli.rules.display()))?;
    info!(count = rules.len(), "Rules loaded");

    let engine = RuleEngine::new(rules).context("building rule engine")?;

    let config = match cli.threads {
        Some(worker_threads) => BatchConfig { worker_threads },
        None => BatchConfig::default(),
    };
    let processor = BatchProcessor::with_config(&engine, config);

    let outcomes = processor
        .process_file(&cli.urls)
        .with_context(|| format!("processing URLs from {}", cli.urls.display()))?;

    for outcome in &outcomes {
        println!("{} -> {}", outcome.url, outcome.result);
    }

    Ok(())
}

fn setup_logging(level: &str) -> Result<()> {
    let level = level.parse::<Level>().unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(())
}
