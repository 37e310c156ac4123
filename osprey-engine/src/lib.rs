//! Osprey Rule Engine
//!
//! Evaluates parsed URLs against a prioritized rule set and returns the
//! result of the highest-priority matching rule.
//!
//! The engine front-loads all the work it can: at construction it builds
//! the [`RuleIndex`] over every non-negated condition and sorts the rules
//! by descending priority (stable, so definition order breaks ties). A
//! query then runs one indexed pass over the URL's parts and scans the
//! sorted rules, skipping any rule the index proved impossible; negated
//! conditions, which the index cannot represent, are verified directly on
//! the few surviving candidates.
//!
//! The engine is immutable after construction and freely shareable across
//! threads; per-query state lives in a thread-local [`QueryContext`] so
//! steady-state evaluation performs no allocation.

use osprey_index::{QueryContext, RuleId, RuleIndex};
use osprey_rules::Rule;
use osprey_url::ParsedUrl;
use std::cell::RefCell;
use thiserror::Error;
use tracing::info;

pub mod batch;
pub use batch::{BatchConfig, BatchProcessor, UrlOutcome, INVALID_URL, NO_MATCH};

/// Errors surfaced while constructing an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule with no conditions has no defined matching semantics and is
    /// rejected rather than treated as match-all.
    #[error("rule {name:?} has no conditions")]
    EmptyRule { name: String },
}

/// One entry of the priority-ordered scan, with everything the hot loop
/// needs precomputed.
#[derive(Debug)]
struct ScanEntry {
    definition_index: usize,
    rule_id: RuleId,
    /// All-negated rules never touch the index; the scan must consider
    /// them even when their counter is zero.
    all_negated: bool,
}

/// Evaluates parsed URLs against an immutable, indexed rule set.
#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    entries: Vec<ScanEntry>,
    index: RuleIndex,
}

thread_local! {
    static QUERY_CONTEXT: RefCell<Option<QueryContext>> = const { RefCell::new(None) };
}

impl RuleEngine {
    /// Builds an engine over the given rules.
    ///
    /// Rule IDs are assigned by position in `rules`; priority ties resolve
    /// in favor of the earlier definition.
    pub fn new(rules: Vec<Rule>) -> Result<Self, EngineError> {
        for rule in &rules {
            if rule.conditions.is_empty() {
                return Err(EngineError::EmptyRule {
                    name: rule.name.clone(),
                });
            }
        }

        let index = RuleIndex::new(&rules);

        let mut order: Vec<usize> = (0..rules.len()).collect();
        // Stable sort: equal priorities keep definition order.
        order.sort_by(|&a, &b| rules[b].priority.cmp(&rules[a].priority));

        let entries = order
            .into_iter()
            .map(|definition_index| ScanEntry {
                definition_index,
                rule_id: index.rule_id(definition_index),
                all_negated: rules[definition_index].all_negated(),
            })
            .collect();

        info!(rules = rules.len(), "Rule engine ready");

        Ok(Self {
            rules,
            entries,
            index,
        })
    }

    /// Number of rules the engine evaluates.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// The rules in definition order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluates a URL and returns the winning rule's result, or `None`
    /// when no rule matches.
    ///
    /// Uses (and lazily creates) the calling thread's cached query context.
    pub fn evaluate(&self, url: &ParsedUrl) -> Option<&str> {
        QUERY_CONTEXT.with(|cell| {
            let mut slot = cell.borrow_mut();
            match &mut *slot {
                Some(ctx) if ctx.rule_count() == self.rule_count() => {
                    self.evaluate_with(url, ctx)
                }
                // First query on this thread, or a context sized for a
                // different engine.
                stale => {
                    let ctx = stale.insert(QueryContext::new(self.rule_count()));
                    self.evaluate_with(url, ctx)
                }
            }
        })
    }

    /// Evaluates a URL using an explicit query context.
    ///
    /// The context must be sized to this engine's rule count.
    pub fn evaluate_with<'e>(&'e self, url: &ParsedUrl, ctx: &mut QueryContext) -> Option<&'e str> {
        self.index.query_into(url, ctx);
        let candidates = ctx.candidates();
        let expected = self.index.expected_counts();

        for entry in &self.entries {
            if !candidates.is_candidate(entry.rule_id) && !entry.all_negated {
                continue;
            }
            if candidates.all_satisfied(entry.rule_id, expected) {
                let rule = &self.rules[entry.definition_index];
                if !Self::any_negated_condition_matches(rule, url) {
                    return Some(&rule.result);
                }
            }
        }
        None
    }

    /// Direct verification of a candidate's negated conditions: if any
    /// negated condition's operator matches, negation fails the rule.
    fn any_negated_condition_matches(rule: &Rule, url: &ParsedUrl) -> bool {
        rule.conditions
            .iter()
            .any(|cond| cond.negated && cond.operator_matches(url))
    }
}
