//! Osprey Rule Model
//!
//! This crate defines the declarative rule vocabulary: string-matching
//! operators, conditions targeting one URL part each, and named prioritized
//! rules. It also provides the direct (unindexed) evaluation of a condition
//! against a parsed URL, which the engine uses for negated conditions and
//! which doubles as the reference semantics the indexed path must agree
//! with.
//!
//! Rule loading from JSON lives in [`loader`].

use osprey_url::{ParsedUrl, UrlPart};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub mod loader;
pub use loader::{RuleLoader, RuleSetError};

/// String-matching operators supported by rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl Operator {
    /// Canonical lowercase name, as used in rule files.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
        }
    }

    /// Applies the operator to a haystack/needle pair.
    ///
    /// Negation is not applied here; it belongs to the condition.
    pub fn evaluate(self, haystack: &str, needle: &str) -> bool {
        match self {
            Operator::Equals => haystack == needle,
            Operator::Contains => haystack.contains(needle),
            Operator::StartsWith => haystack.starts_with(needle),
            Operator::EndsWith => haystack.ends_with(needle),
        }
    }
}

impl std::str::FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [Operator; 4] = [
            Operator::Equals,
            Operator::Contains,
            Operator::StartsWith,
            Operator::EndsWith,
        ];
        for op in ALL {
            if s.eq_ignore_ascii_case(op.name()) {
                return Ok(op);
            }
        }
        Err(UnknownOperator(s.to_string()))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a rule file names an operator that does not exist.
#[derive(Debug, Clone, Error)]
#[error("unknown operator: {0:?} (expected equals, contains, starts_with, or ends_with)")]
pub struct UnknownOperator(pub String);

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// Operator names in rule files are case-insensitive.
impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A single condition within a rule: one URL part, one operator, one value,
/// optionally negated.
///
/// Conditions are value objects; two conditions with equal fields are
/// interchangeable. The empty value is permitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub part: UrlPart,
    pub operator: Operator,
    pub value: String,
    #[serde(default)]
    pub negated: bool,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(part: UrlPart, operator: Operator, value: impl Into<String>, negated: bool) -> Self {
        Self {
            part,
            operator,
            value: value.into(),
            negated,
        }
    }

    /// Returns the raw operator result against the URL, ignoring negation.
    pub fn operator_matches(&self, url: &ParsedUrl) -> bool {
        self.operator.evaluate(url.part(self.part), &self.value)
    }

    /// Returns whether the condition holds against the URL, negation
    /// included.
    pub fn holds(&self, url: &ParsedUrl) -> bool {
        self.operator_matches(url) != self.negated
    }
}

/// A named rule: a conjunction of conditions, a priority, and the result
/// string reported when the rule fires.
///
/// Higher priority wins; ties are broken by definition order (the position
/// of the rule in the loaded list).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub priority: i32,
    pub conditions: Vec<Condition>,
    pub result: String,
}

impl Rule {
    /// Creates a new rule.
    pub fn new(
        name: impl Into<String>,
        priority: i32,
        conditions: Vec<Condition>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            conditions,
            result: result.into(),
        }
    }

    /// Returns whether every condition of this rule holds for the URL.
    ///
    /// This is the unindexed reference semantics; the engine's indexed path
    /// must return exactly the same answers.
    pub fn matches(&self, url: &ParsedUrl) -> bool {
        self.conditions.iter().all(|c| c.holds(url))
    }

    /// Number of non-negated conditions (duplicates each count).
    pub fn non_negated_count(&self) -> usize {
        self.conditions.iter().filter(|c| !c.negated).count()
    }

    /// Returns `true` if every condition of this rule is negated.
    pub fn all_negated(&self) -> bool {
        self.conditions.iter().all(|c| c.negated)
    }
}
