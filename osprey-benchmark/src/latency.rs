//! Per-URL evaluation latency on a single thread with a warm context.

use crate::generator::{generate_rules, generate_url_lines, GeneratorConfig};
use crate::utils::calculate_percentiles;
use osprey_engine::RuleEngine;
use osprey_index::QueryContext;
use std::time::Instant;

pub fn run() {
    println!("── Latency ─────────────────────────────────────────────────");

    let config = GeneratorConfig {
        url_count: 20_000,
        ..Default::default()
    };
    let rules = generate_rules(&config);
    let engine = RuleEngine::new(rules).expect("generated rules should be valid");

    let urls: Vec<_> = generate_url_lines(&config)
        .iter()
        .map(|line| osprey_url::parse(line).expect("generated URLs should parse"))
        .collect();

    let mut ctx = QueryContext::new(engine.rule_count());

    // Warmup pass so scratch buffers reach steady-state size.
    for url in &urls {
        engine.evaluate_with(url, &mut ctx);
    }

    let mut samples = Vec::with_capacity(urls.len());
    for url in &urls {
        let start = Instant::now();
        let result = engine.evaluate_with(url, &mut ctx);
        samples.push(start.elapsed());
        std::hint::black_box(result);
    }

    let (p50, p95, p99) = calculate_percentiles(&mut samples);
    println!("  samples: {}", samples.len());
    println!("  p50: {p50:?}  p95: {p95:?}  p99: {p99:?}");
}
