//! Batch throughput: URLs classified per second, single-threaded and with
//! the full worker pool.

use crate::generator::{generate_rules, generate_url_lines, GeneratorConfig};
use crate::utils::format_rate;
use osprey_engine::{BatchConfig, BatchProcessor, RuleEngine};
use std::time::Instant;

pub fn run() {
    println!("── Throughput ──────────────────────────────────────────────");

    let config = GeneratorConfig::default();
    let rules = generate_rules(&config);
    let lines = generate_url_lines(&config);

    let build_start = Instant::now();
    let engine = RuleEngine::new(rules).expect("generated rules should be valid");
    println!(
        "  index build: {} rules in {:?}",
        engine.rule_count(),
        build_start.elapsed()
    );

    for workers in [1, BatchConfig::default().worker_threads] {
        let processor = BatchProcessor::with_config(&engine, BatchConfig { worker_threads: workers });

        // Warm the per-worker contexts before timing.
        processor.process_lines(lines.iter().take(1_000).map(String::as_str));

        let start = Instant::now();
        let outcomes = processor.process_lines(lines.iter().map(String::as_str));
        let elapsed = start.elapsed();

        let matched = outcomes
            .iter()
            .filter(|o| o.result != osprey_engine::NO_MATCH)
            .count();
        println!(
            "  {workers:>2} worker(s): {} urls in {elapsed:?} ({}), {matched} matched",
            outcomes.len(),
            format_rate(outcomes.len(), elapsed),
        );
    }
}
