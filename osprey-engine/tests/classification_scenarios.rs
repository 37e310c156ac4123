//! End-to-end classification scenarios running the full pipeline:
//! JSON rule loading -> engine construction -> URL parsing -> evaluation.

use osprey_engine::{BatchProcessor, RuleEngine, NO_MATCH};
use osprey_rules::RuleLoader;

fn classify(rules_json: &str, url: &str) -> String {
    let rules = RuleLoader::load_from_str(rules_json).unwrap();
    let engine = RuleEngine::new(rules).unwrap();
    let processor = BatchProcessor::new(&engine);
    let outcomes = processor.process_lines([url]);
    assert_eq!(outcomes.len(), 1);
    outcomes.into_iter().next().unwrap().result
}

#[test]
fn canada_sport_url_matches_conjunction() {
    let rules = r#"[{
        "name": "Canada Sport", "priority": 10,
        "conditions": [
            {"part": "host", "operator": "ends_with", "value": ".ca"},
            {"part": "path", "operator": "contains", "value": "sport"}
        ],
        "result": "Canada Sport"
    }]"#;
    assert_eq!(
        classify(rules, "https://shop.example.ca/category/sport/items"),
        "Canada Sport"
    );
}

#[test]
fn exact_host_and_root_path() {
    let rules = r#"[{
        "name": "Example Home", "priority": 5,
        "conditions": [
            {"part": "host", "operator": "equals", "value": "example.com"},
            {"part": "path", "operator": "equals", "value": "/"}
        ],
        "result": "Home"
    }]"#;
    assert_eq!(classify(rules, "https://example.com/"), "Home");
}

#[test]
fn negated_prefix_rejects_admin_path() {
    let rules = r#"[{
        "name": "Not Admin", "priority": 3,
        "conditions": [
            {"part": "path", "operator": "starts_with", "value": "/admin", "negated": true}
        ],
        "result": "NotAdmin"
    }]"#;
    assert_eq!(classify(rules, "https://x.com/admin/panel"), NO_MATCH);
    assert_eq!(classify(rules, "https://x.com/public"), "NotAdmin");
}

#[test]
fn high_priority_non_matching_rule_defers_to_low() {
    let rules = r#"[
        {
            "name": "Special", "priority": 10,
            "conditions": [{"part": "host", "operator": "equals", "value": "special.com"}],
            "result": "High"
        },
        {
            "name": "Any Com", "priority": 1,
            "conditions": [{"part": "host", "operator": "ends_with", "value": ".com"}],
            "result": "Low"
        }
    ]"#;
    assert_eq!(classify(rules, "https://example.com/"), "Low");
    assert_eq!(classify(rules, "https://special.com/"), "High");
}

#[test]
fn equal_priorities_resolve_to_first_defined() {
    let rules = r#"[
        {
            "name": "First", "priority": 5,
            "conditions": [{"part": "host", "operator": "ends_with", "value": ".com"}],
            "result": "First"
        },
        {
            "name": "Second", "priority": 5,
            "conditions": [{"part": "host", "operator": "ends_with", "value": ".com"}],
            "result": "Second"
        }
    ]"#;
    assert_eq!(classify(rules, "https://example.com/"), "First");
}

#[test]
fn file_part_sees_only_the_last_segment() {
    let rules = r#"[{
        "name": "HTML", "priority": 1,
        "conditions": [{"part": "file", "operator": "ends_with", "value": ".html"}],
        "result": "HTML"
    }]"#;
    assert_eq!(classify(rules, "https://x.com/a/b/index.html"), "HTML");
    assert_eq!(classify(rules, "https://x.com/index.html/sub"), NO_MATCH);
}

#[test]
fn empty_rule_set_yields_no_match_for_everything() {
    assert_eq!(classify("[]", "https://example.com/"), NO_MATCH);
    assert_eq!(classify("[]", "https://x.ca/sport"), NO_MATCH);
}

#[test]
fn malformed_line_in_batch_reports_invalid_url() {
    let rules = RuleLoader::load_from_str("[]").unwrap();
    let engine = RuleEngine::new(rules).unwrap();
    let processor = BatchProcessor::new(&engine);

    let outcomes = processor.process_lines(["://nope", "https://ok.com/"]);
    assert_eq!(outcomes[0].result, "INVALID_URL");
    assert_eq!(outcomes[1].result, NO_MATCH);
}

#[test]
fn query_conditions_match_decoded_query_part() {
    let rules = r#"[{
        "name": "English", "priority": 2,
        "conditions": [{"part": "query", "operator": "contains", "value": "lang=en"}],
        "result": "English"
    }]"#;
    assert_eq!(classify(rules, "https://x.com/page?q=hi&lang=en"), "English");
    assert_eq!(classify(rules, "https://x.com/page?lang=fr"), NO_MATCH);
}

#[test]
fn host_matching_is_case_insensitive_via_lowercasing() {
    let rules = r#"[{
        "name": "Example", "priority": 1,
        "conditions": [{"part": "host", "operator": "equals", "value": "example.com"}],
        "result": "Example"
    }]"#;
    assert_eq!(classify(rules, "https://EXAMPLE.com/"), "Example");
}
