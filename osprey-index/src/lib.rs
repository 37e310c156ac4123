//! Osprey Matching Indexes
//!
//! This crate provides the indexed core of the classification engine: the
//! data structures that answer "which rules could match this URL?" in time
//! sublinear in the rule count.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                    RuleIndex                       │
//! │   (per-(part, operator) dispatch + expected        │
//! │    non-negated condition counts)                   │
//! └────────┬──────────┬──────────────┬─────────────────┘
//!          │          │              │
//!          v          v              v
//!   equals maps   PrefixTrie    SubstringDfa
//!   (exact keys)  (starts_with, (Aho-Corasick DFA,
//!                 reversed for   contains)
//!                 ends_with)
//!          │          │              │
//!          └──────────┴──────┬───────┘
//!                            v
//!                      CandidateSet
//!           (per-rule satisfaction counters,
//!            sparse reset via dirty list)
//! ```
//!
//! Every non-negated condition is inserted into exactly one structure,
//! tagged with its rule's dense ID. A query walks each URL part through the
//! structures for that part and counts emissions per rule; a rule's
//! non-negated conditions are all satisfied exactly when its counter equals
//! its expected count. Negated conditions are not indexed; the engine
//! verifies them directly.
//!
//! All structures are immutable after construction and safe for
//! unsynchronized concurrent reads. The only per-query mutable state lives
//! in a [`QueryContext`], which callers cache per thread.

mod candidates;
mod index;
mod prefix;
mod substring;

pub use candidates::CandidateSet;
pub use index::{QueryContext, RuleIndex};
pub use prefix::PrefixTrie;
pub use substring::{SubstringBuilder, SubstringDfa};

/// Dense rule identifier, assigned by the [`RuleIndex`] in definition order.
///
/// Used as an array index throughout the hot path.
pub type RuleId = u32;
