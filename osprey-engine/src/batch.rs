//! Batch URL processing.
//!
//! Reads URLs one per line, evaluates each against a shared [`RuleEngine`],
//! and reports one outcome per non-blank line in input order. The engine is
//! immutable during queries, so the batch fans out across a fixed pool of
//! scoped worker threads, each with its own query context; ordering is
//! preserved by assigning workers contiguous chunks of the input.

use crate::RuleEngine;
use osprey_index::QueryContext;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use thiserror::Error;
use tracing::{debug, info};

/// Result string for URLs that match no rule.
pub const NO_MATCH: &str = "NO_MATCH";

/// Result string for lines that fail URL parsing.
pub const INVALID_URL: &str = "INVALID_URL";

/// Errors surfaced while reading a URL file.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read URL file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The outcome of evaluating a single URL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOutcome {
    /// The trimmed input line.
    pub url: String,
    /// The winning rule's result, [`NO_MATCH`], or [`INVALID_URL`].
    pub result: String,
}

/// Batch processor configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of worker threads for fan-out. One worker runs everything
    /// inline on the calling thread.
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            worker_threads: thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

/// Evaluates batches of URL lines against a [`RuleEngine`].
pub struct BatchProcessor<'e> {
    engine: &'e RuleEngine,
    config: BatchConfig,
}

impl<'e> BatchProcessor<'e> {
    /// Creates a processor with the default worker pool size.
    pub fn new(engine: &'e RuleEngine) -> Self {
        Self::with_config(engine, BatchConfig::default())
    }

    /// Creates a processor with an explicit configuration.
    pub fn with_config(engine: &'e RuleEngine, config: BatchConfig) -> Self {
        Self { engine, config }
    }

    /// Reads URLs from a file (one per line) and evaluates each.
    pub fn process_file(&self, path: &Path) -> Result<Vec<UrlOutcome>, BatchError> {
        let content = fs::read_to_string(path).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.process_lines(content.lines()))
    }

    /// Evaluates URL lines, skipping blanks, preserving input order.
    pub fn process_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<UrlOutcome> {
        let inputs: Vec<&str> = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if inputs.is_empty() {
            return Vec::new();
        }

        let workers = self.config.worker_threads.clamp(1, inputs.len());
        info!(urls = inputs.len(), workers, "Processing URL batch");

        let outcomes = if workers == 1 {
            self.evaluate_chunk(&inputs)
        } else {
            let chunk_len = inputs.len().div_ceil(workers);
            thread::scope(|scope| {
                let handles: Vec<_> = inputs
                    .chunks(chunk_len)
                    .map(|chunk| scope.spawn(move || self.evaluate_chunk(chunk)))
                    .collect();
                handles
                    .into_iter()
                    .flat_map(|handle| handle.join().expect("batch worker panicked"))
                    .collect()
            })
        };

        debug!(outcomes = outcomes.len(), "Batch complete");
        outcomes
    }

    fn evaluate_chunk(&self, chunk: &[&str]) -> Vec<UrlOutcome> {
        let mut ctx = QueryContext::new(self.engine.rule_count());
        chunk
            .iter()
            .map(|&line| self.evaluate_line(line, &mut ctx))
            .collect()
    }

    fn evaluate_line(&self, line: &str, ctx: &mut QueryContext) -> UrlOutcome {
        let result = match osprey_url::parse(line) {
            Ok(parsed) => self
                .engine
                .evaluate_with(&parsed, ctx)
                .unwrap_or(NO_MATCH)
                .to_string(),
            Err(_) => INVALID_URL.to_string(),
        };
        UrlOutcome {
            url: line.to_string(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osprey_rules::{Condition, Operator, Rule};
    use osprey_url::UrlPart;

    fn engine() -> RuleEngine {
        RuleEngine::new(vec![
            Rule::new(
                "canada-sport",
                10,
                vec![
                    Condition::new(UrlPart::Host, Operator::EndsWith, ".ca", false),
                    Condition::new(UrlPart::Path, Operator::Contains, "sport", false),
                ],
                "Canada Sport",
            ),
            Rule::new(
                "any-com",
                1,
                vec![Condition::new(UrlPart::Host, Operator::EndsWith, ".com", false)],
                "Com",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_outcomes_preserve_input_order() {
        let engine = engine();
        let processor = BatchProcessor::new(&engine);

        let outcomes = processor.process_lines([
            "https://shop.example.ca/category/sport/items",
            "https://example.com/",
            "https://example.org/",
        ]);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].result, "Canada Sport");
        assert_eq!(outcomes[1].result, "Com");
        assert_eq!(outcomes[2].result, NO_MATCH);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let engine = engine();
        let processor = BatchProcessor::new(&engine);

        let outcomes = processor.process_lines(["", "  ", "https://example.com/", ""]);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].url, "https://example.com/");
    }

    #[test]
    fn test_unparseable_line_reports_invalid_url() {
        let engine = engine();
        let processor = BatchProcessor::new(&engine);

        let outcomes = processor.process_lines(["://broken"]);
        assert_eq!(outcomes[0].result, INVALID_URL);
    }

    #[test]
    fn test_single_worker_matches_pool_output() {
        let engine = engine();
        let lines: Vec<String> = (0..200)
            .map(|i| match i % 4 {
                0 => format!("https://shop{i}.ca/sport/{i}"),
                1 => format!("https://site{i}.com/page/{i}"),
                2 => format!("https://site{i}.org/page/{i}"),
                _ => "://bad".to_string(),
            })
            .collect();

        let serial = BatchProcessor::with_config(&engine, BatchConfig { worker_threads: 1 });
        let pooled = BatchProcessor::with_config(&engine, BatchConfig { worker_threads: 7 });

        let expected = serial.process_lines(lines.iter().map(String::as_str));
        let actual = pooled.process_lines(lines.iter().map(String::as_str));
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_empty_input_yields_no_outcomes() {
        let engine = engine();
        let processor = BatchProcessor::new(&engine);
        assert!(processor.process_lines(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let engine = engine();
        let processor = BatchProcessor::new(&engine);
        assert!(matches!(
            processor.process_file(Path::new("/nonexistent/urls.txt")),
            Err(BatchError::Io { .. })
        ));
    }
}
