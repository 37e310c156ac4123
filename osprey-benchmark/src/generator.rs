//! Synthetic rule and URL corpus generation.
//!
//! Seeded so that every run of the suite measures the same workload. The
//! corpora lean ASCII and URL-shaped on purpose: hosts built from word
//! pools and TLDs, paths from segment pools, a sprinkling of negated
//! conditions and multi-condition rules.

use osprey_rules::{Condition, Operator, Rule};
use osprey_url::UrlPart;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &[
    "shop", "news", "sport", "travel", "media", "cloud", "data", "store", "portal", "example",
];
const TLDS: &[&str] = &[".com", ".ca", ".org", ".net", ".io"];
const SEGMENTS: &[&str] = &[
    "api", "category", "sport", "admin", "products", "blog", "users", "items", "search", "static",
];
const FILES: &[&str] = &["index.html", "main.css", "app.js", "feed.xml", "items", "page"];
const QUERIES: &[&str] = &["lang=en", "lang=fr", "q=search", "page=2", "sort=asc", "debug=1"];

/// Corpus shape knobs.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub rule_count: usize,
    pub url_count: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rule_count: 1_000,
            url_count: 100_000,
            seed: 0x05_0b_0e_75,
        }
    }
}

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn random_condition(rng: &mut StdRng) -> Condition {
    let part = UrlPart::ALL[rng.gen_range(0..UrlPart::ALL.len())];
    let (operator, value) = match part {
        UrlPart::Host => match rng.gen_range(0..3) {
            0 => (Operator::Equals, format!("{}{}", pick(rng, WORDS), pick(rng, TLDS))),
            1 => (Operator::EndsWith, pick(rng, TLDS).to_string()),
            _ => (Operator::Contains, pick(rng, WORDS).to_string()),
        },
        UrlPart::Path => match rng.gen_range(0..3) {
            0 => (Operator::StartsWith, format!("/{}", pick(rng, SEGMENTS))),
            1 => (Operator::Contains, pick(rng, SEGMENTS).to_string()),
            _ => (
                Operator::Equals,
                format!("/{}/{}", pick(rng, SEGMENTS), pick(rng, SEGMENTS)),
            ),
        },
        UrlPart::File => match rng.gen_range(0..2) {
            0 => (Operator::EndsWith, {
                let file = pick(rng, FILES);
                file.rfind('.').map_or(file.to_string(), |dot| file[dot..].to_string())
            }),
            _ => (Operator::Equals, pick(rng, FILES).to_string()),
        },
        UrlPart::Query => match rng.gen_range(0..2) {
            0 => (Operator::Contains, pick(rng, QUERIES).to_string()),
            _ => (Operator::StartsWith, pick(rng, QUERIES).to_string()),
        },
    };
    // Roughly one condition in ten is negated.
    let negated = rng.gen_range(0..10) == 0;
    Condition::new(part, operator, value, negated)
}

/// Generates a deterministic rule corpus.
pub fn generate_rules(config: &GeneratorConfig) -> Vec<Rule> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.rule_count)
        .map(|i| {
            let condition_count = rng.gen_range(1..=3);
            let conditions = (0..condition_count)
                .map(|_| random_condition(&mut rng))
                .collect();
            Rule::new(
                format!("rule-{i:05}"),
                rng.gen_range(0..100),
                conditions,
                format!("result-{i:05}"),
            )
        })
        .collect()
}

/// Generates a deterministic URL corpus, shaped like the rules so a
/// realistic fraction of queries match.
pub fn generate_url_lines(config: &GeneratorConfig) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    (0..config.url_count)
        .map(|_| {
            let host = format!("{}{}", pick(&mut rng, WORDS), pick(&mut rng, TLDS));
            let depth = rng.gen_range(0..3);
            let mut path = String::new();
            for _ in 0..depth {
                path.push('/');
                path.push_str(pick(&mut rng, SEGMENTS));
            }
            if rng.gen_range(0..3) == 0 {
                path.push('/');
                path.push_str(pick(&mut rng, FILES));
            }
            if rng.gen_range(0..2) == 0 {
                format!("https://{host}{path}?{}", pick(&mut rng, QUERIES))
            } else {
                format!("https://{host}{path}")
            }
        })
        .collect()
}
