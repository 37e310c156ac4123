//! Osprey Performance Benchmark Suite
//!
//! Standalone harness measuring index build time, batch throughput, and
//! per-URL latency against a seeded synthetic corpus. `--generate` writes
//! the corpus to disk for use with the `osprey` CLI.

mod generator;
mod latency;
mod throughput;
mod utils;

pub use generator::{generate_rules, generate_url_lines, GeneratorConfig};

use anyhow::{Context, Result};
use std::env;
use std::time::Instant;

fn print_header() {
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║             Osprey Performance Benchmark Suite             ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
}

fn print_usage() {
    println!("Usage: osprey-benchmark [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --all           Run all benchmarks (default)");
    println!("  --throughput    Run batch throughput benchmarks");
    println!("  --latency       Run per-URL latency benchmarks");
    println!("  --generate      Write the synthetic corpus to ./bench-data");
    println!("  --help          Show this help message");
    println!();
}

fn generate_corpus() -> Result<()> {
    let config = GeneratorConfig::default();
    let dir = std::path::Path::new("bench-data");
    std::fs::create_dir_all(dir).context("creating bench-data directory")?;

    let rules = generate_rules(&config);
    let rules_path = dir.join("rules.json");
    let json = serde_json::to_string_pretty(&rules).context("encoding rules")?;
    std::fs::write(&rules_path, json).context("writing rules.json")?;
    println!("  wrote {} rules to {}", rules.len(), rules_path.display());

    let lines = generate_url_lines(&config);
    let urls_path = dir.join("urls.txt");
    std::fs::write(&urls_path, lines.join("\n")).context("writing urls.txt")?;
    println!("  wrote {} urls to {}", lines.len(), urls_path.display());

    Ok(())
}

fn main() -> Result<()> {
    print_header();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("--all");

    let start = Instant::now();
    match mode {
        "--all" | "" => {
            throughput::run();
            println!();
            latency::run();
        }
        "--throughput" => throughput::run(),
        "--latency" => latency::run(),
        "--generate" => generate_corpus()?,
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        _ => {
            println!("Unknown option: {mode}");
            print_usage();
            return Ok(());
        }
    }

    println!();
    println!("Completed in {:?}", start.elapsed());
    Ok(())
}
