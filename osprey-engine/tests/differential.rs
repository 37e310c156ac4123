//! Differential testing: the indexed engine must agree with a naive
//! evaluator (scan rules in priority order, test every condition with the
//! direct string operators) on every URL.
//!
//! The rule and URL corpora are generated deterministically so failures
//! reproduce; the combinations are built to exercise every operator, every
//! part, negation, empty values, duplicate conditions, and priority ties.

use osprey_engine::RuleEngine;
use osprey_rules::{Condition, Operator, Rule};
use osprey_url::{ParsedUrl, UrlPart};

/// Reference semantics: highest priority first, definition order on ties,
/// every condition checked directly.
fn naive_evaluate<'r>(rules: &'r [Rule], url: &ParsedUrl) -> Option<&'r str> {
    let mut order: Vec<usize> = (0..rules.len()).collect();
    order.sort_by(|&a, &b| rules[b].priority.cmp(&rules[a].priority));
    order
        .into_iter()
        .map(|i| &rules[i])
        .find(|rule| rule.matches(url))
        .map(|rule| rule.result.as_str())
}

fn operators() -> [Operator; 4] {
    [
        Operator::Equals,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ]
}

fn value_pool(part: UrlPart) -> &'static [&'static str] {
    match part {
        UrlPart::Host => &["example.com", ".com", ".ca", "shop", "example", ""],
        UrlPart::Path => &["/", "/api", "sport", "/category/sport", "items", ""],
        UrlPart::File => &["index.html", ".html", "items", ""],
        UrlPart::Query => &["lang=en", "lang", "q=hello", ""],
    }
}

fn url_corpus() -> Vec<ParsedUrl> {
    vec![
        ParsedUrl::new("example.com", "/", "", ""),
        ParsedUrl::new("example.com", "/api/users", "users", "q=hello"),
        ParsedUrl::new("shop.example.ca", "/category/sport/items", "items", "lang=en"),
        ParsedUrl::new("example.org", "/index.html", "index.html", ""),
        ParsedUrl::new("sport.com", "/items", "items", "lang=en&q=hello"),
        ParsedUrl::new("", "", "", ""),
        ParsedUrl::new("a.ca", "/sport", "sport", "lang=fr"),
        ParsedUrl::new("example.com", "/category/sport/", "", ""),
    ]
}

/// One rule per (part, operator, value, negated) combination.
fn single_condition_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut priority = 0;
    for part in UrlPart::ALL {
        for op in operators() {
            for &value in value_pool(part) {
                for negated in [false, true] {
                    priority += 1;
                    rules.push(Rule::new(
                        format!("{part}-{op}-{value}-{negated}"),
                        priority % 7, // collide priorities to exercise tie-breaking
                        vec![Condition::new(part, op, value, negated)],
                        format!("result-{priority}"),
                    ));
                }
            }
        }
    }
    rules
}

/// Conjunction rules pairing conditions across parts and operators.
fn two_condition_rules() -> Vec<Rule> {
    let firsts = [
        Condition::new(UrlPart::Host, Operator::EndsWith, ".ca", false),
        Condition::new(UrlPart::Host, Operator::Equals, "example.com", false),
        Condition::new(UrlPart::Host, Operator::Contains, "example", true),
    ];
    let seconds = [
        Condition::new(UrlPart::Path, Operator::Contains, "sport", false),
        Condition::new(UrlPart::Query, Operator::StartsWith, "lang", false),
        Condition::new(UrlPart::File, Operator::EndsWith, ".html", true),
        Condition::new(UrlPart::Path, Operator::Equals, "/", false),
    ];

    let mut rules = Vec::new();
    for (i, first) in firsts.iter().enumerate() {
        for (j, second) in seconds.iter().enumerate() {
            rules.push(Rule::new(
                format!("pair-{i}-{j}"),
                ((i + j) % 5) as i32,
                vec![first.clone(), second.clone()],
                format!("pair-result-{i}-{j}"),
            ));
        }
    }
    rules
}

fn assert_engine_agrees_with_naive(rules: Vec<Rule>) {
    let engine = RuleEngine::new(rules.clone()).unwrap();
    for url in url_corpus() {
        let expected = naive_evaluate(&rules, &url);
        let actual = engine.evaluate(&url);
        assert_eq!(
            actual, expected,
            "engine and naive evaluator disagree on {url:?}"
        );
    }
}

#[test]
fn agrees_on_single_condition_rules() {
    assert_engine_agrees_with_naive(single_condition_rules());
}

#[test]
fn agrees_on_two_condition_rules() {
    assert_engine_agrees_with_naive(two_condition_rules());
}

#[test]
fn agrees_on_combined_rule_set() {
    let mut rules = single_condition_rules();
    rules.extend(two_condition_rules());
    assert_engine_agrees_with_naive(rules);
}

#[test]
fn agrees_on_duplicate_condition_rules() {
    let dup = Condition::new(UrlPart::Host, Operator::EndsWith, ".com", false);
    let rules = vec![
        Rule::new("dup", 3, vec![dup.clone(), dup.clone()], "dup"),
        Rule::new("dup-mixed", 2, vec![dup.clone(), dup, Condition::new(
            UrlPart::Path,
            Operator::StartsWith,
            "/api",
            false,
        )], "dup-mixed"),
    ];
    assert_engine_agrees_with_naive(rules);
}

#[test]
fn agrees_on_all_negated_rules() {
    let rules = vec![
        Rule::new(
            "no-ca",
            2,
            vec![Condition::new(UrlPart::Host, Operator::EndsWith, ".ca", true)],
            "NotCanada",
        ),
        Rule::new(
            "no-sport-no-html",
            1,
            vec![
                Condition::new(UrlPart::Path, Operator::Contains, "sport", true),
                Condition::new(UrlPart::File, Operator::EndsWith, ".html", true),
            ],
            "Plain",
        ),
    ];
    assert_engine_agrees_with_naive(rules);
}
