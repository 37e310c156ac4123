//! The per-(part, operator) rule index.
//!
//! Construction distributes every non-negated condition into the structure
//! selected by its operator, keyed under its URL part's ordinal. A query
//! walks each part of a URL through the structures for that part and
//! accumulates per-rule counters in the caller's [`QueryContext`]; a rule's
//! non-negated conditions all hold exactly when its counter equals its
//! expected count.
//!
//! Each condition contributes exactly one (key, tag) insertion, and each
//! structure emits a given insertion at most once per query of the part it
//! was filed under, so the counter can never overshoot: equality is
//! equivalent to full satisfaction. Duplicate conditions within a rule are
//! harmless because they raise the expected count and the emission count in
//! lockstep.

use crate::candidates::CandidateSet;
use crate::prefix::PrefixTrie;
use crate::substring::{SubstringBuilder, SubstringDfa};
use crate::RuleId;
use ahash::AHashMap;
use osprey_rules::{Operator, Rule};
use osprey_url::{ParsedUrl, UrlPart, URL_PART_COUNT};
use tracing::debug;

/// Reusable per-thread query state: the candidate counters plus the scratch
/// buffer the ENDS_WITH walk reverses URL parts into.
///
/// A context is sized to one index's rule count; callers cache one per
/// thread and a thread's first query pays the only allocation.
#[derive(Debug)]
pub struct QueryContext {
    pub(crate) candidates: CandidateSet,
    pub(crate) reverse_scratch: Vec<char>,
}

impl QueryContext {
    /// Creates a context sized to the given rule count.
    pub fn new(rule_count: usize) -> Self {
        Self {
            candidates: CandidateSet::new(rule_count),
            reverse_scratch: Vec::new(),
        }
    }

    /// The rule count this context was sized for.
    pub fn rule_count(&self) -> usize {
        self.candidates.rule_count()
    }

    /// The counters filled by the most recent query.
    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }
}

/// Immutable per-(part, operator) dispatch over a rule set's non-negated
/// conditions.
///
/// Rule IDs are positional: the rule at definition index `i` has ID `i`.
/// Per-operator structures live in flat arrays indexed by part ordinal, and
/// per-part occupancy flags let the query loop skip empty indexes without
/// touching them.
#[derive(Debug)]
pub struct RuleIndex {
    equals: [AHashMap<String, Box<[RuleId]>>; URL_PART_COUNT],
    starts_with: [PrefixTrie; URL_PART_COUNT],
    ends_with: [PrefixTrie; URL_PART_COUNT],
    contains: [SubstringDfa; URL_PART_COUNT],

    has_equals: [bool; URL_PART_COUNT],
    has_starts_with: [bool; URL_PART_COUNT],
    has_ends_with: [bool; URL_PART_COUNT],
    has_contains: [bool; URL_PART_COUNT],

    expected: Box<[u32]>,
}

impl RuleIndex {
    /// Builds the index from a rule list.
    ///
    /// Rules are identified by their position in the list; the mapping is
    /// stable for the lifetime of the index.
    pub fn new(rules: &[Rule]) -> Self {
        let mut expected = vec![0u32; rules.len()];
        let mut equals: [AHashMap<String, Vec<RuleId>>; URL_PART_COUNT] =
            std::array::from_fn(|_| AHashMap::new());
        let mut starts_with: [PrefixTrie; URL_PART_COUNT] = std::array::from_fn(|_| PrefixTrie::new());
        let mut ends_with: [PrefixTrie; URL_PART_COUNT] = std::array::from_fn(|_| PrefixTrie::new());
        let mut contains: [SubstringBuilder; URL_PART_COUNT] =
            std::array::from_fn(|_| SubstringBuilder::new());

        let mut indexed = 0usize;
        let mut reversed = String::new();
        for (definition_index, rule) in rules.iter().enumerate() {
            let id = definition_index as RuleId;
            for cond in &rule.conditions {
                if cond.negated {
                    continue;
                }
                expected[definition_index] += 1;
                indexed += 1;
                let p = cond.part.ordinal();
                match cond.operator {
                    Operator::Equals => {
                        equals[p].entry(cond.value.clone()).or_default().push(id);
                    }
                    Operator::StartsWith => starts_with[p].insert(&cond.value, id),
                    Operator::EndsWith => {
                        // Stored reversed; queried against the reversed part.
                        reversed.clear();
                        reversed.extend(cond.value.chars().rev());
                        ends_with[p].insert(&reversed, id);
                    }
                    Operator::Contains => contains[p].insert(&cond.value, id),
                }
            }
        }

        let has_equals = std::array::from_fn(|p| !equals[p].is_empty());
        let has_starts_with = std::array::from_fn(|p| !starts_with[p].is_empty());
        let has_ends_with = std::array::from_fn(|p| !ends_with[p].is_empty());
        let has_contains = std::array::from_fn(|p| !contains[p].is_empty());

        let contains = contains.map(SubstringBuilder::build);
        // Freeze the posting lists.
        let equals: [AHashMap<String, Box<[RuleId]>>; URL_PART_COUNT] = equals.map(|m| {
            m.into_iter()
                .map(|(key, ids)| (key, ids.into_boxed_slice()))
                .collect()
        });

        debug!(
            rules = rules.len(),
            indexed_conditions = indexed,
            "Built rule index"
        );

        Self {
            equals,
            starts_with,
            ends_with,
            contains,
            has_equals,
            has_starts_with,
            has_ends_with,
            has_contains,
            expected: expected.into_boxed_slice(),
        }
    }

    /// Number of rules in the index.
    pub fn rule_count(&self) -> usize {
        self.expected.len()
    }

    /// The dense ID of the rule at the given definition index.
    pub fn rule_id(&self, definition_index: usize) -> RuleId {
        debug_assert!(definition_index < self.rule_count());
        definition_index as RuleId
    }

    /// Per-rule non-negated condition counts, indexed by rule ID.
    pub fn expected_counts(&self) -> &[u32] {
        &self.expected
    }

    /// Allocating convenience query; see [`query_into`] for the reusable
    /// hot path.
    ///
    /// [`query_into`]: RuleIndex::query_into
    pub fn query_candidates(&self, url: &ParsedUrl) -> CandidateSet {
        let mut ctx = QueryContext::new(self.rule_count());
        self.query_into(url, &mut ctx);
        ctx.candidates
    }

    /// Accumulates match counters for every non-negated condition that
    /// holds for the URL, into the context's candidate set.
    ///
    /// The context must be sized to this index's rule count. Resets the
    /// counters first; allocation-free apart from scratch growth on a
    /// longer-than-ever URL part.
    pub fn query_into(&self, url: &ParsedUrl, ctx: &mut QueryContext) {
        debug_assert_eq!(ctx.rule_count(), self.rule_count());
        let QueryContext {
            candidates,
            reverse_scratch,
        } = ctx;
        candidates.reset();

        for part in UrlPart::ALL {
            let p = part.ordinal();
            let value = url.part(part);

            if self.has_equals[p] {
                if let Some(ids) = self.equals[p].get(value) {
                    for &id in ids.iter() {
                        candidates.increment(id);
                    }
                }
            }

            if self.has_starts_with[p] {
                self.starts_with[p].find_prefixes_of(value, &mut |id| candidates.increment(id));
            }

            if self.has_ends_with[p] {
                reverse_scratch.clear();
                reverse_scratch.extend(value.chars().rev());
                self.ends_with[p]
                    .find_prefixes_of_chars(reverse_scratch, &mut |id| candidates.increment(id));
            }

            if self.has_contains[p] {
                self.contains[p].search(value, &mut |id| candidates.increment(id));
            }
        }
    }
}
