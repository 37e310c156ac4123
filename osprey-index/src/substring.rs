//! Substring automaton.
//!
//! A hand-built Aho-Corasick DFA answering "which inserted patterns occur
//! anywhere in this input?" in one table lookup per character. The
//! automaton is constructed in two phases with a consuming builder:
//! patterns go into a [`SubstringBuilder`], and [`SubstringBuilder::build`]
//! produces the immutable, searchable [`SubstringDfa`]. Because `build`
//! takes the builder by value, inserting after build or searching before
//! build cannot be expressed.
//!
//! The build eliminates failure links entirely: every state's transition
//! row is completed by inheriting from its failure state, and every state's
//! output list is pre-merged with the outputs of all its suffix states.
//! Search therefore never chases links, which is what keeps the hot loop to
//! an array load and an output-range scan per character.

use crate::RuleId;
use ahash::AHashMap;
use std::collections::VecDeque;

const ASCII_RANGE: usize = 128;
const NO_STATE: u32 = u32::MAX;

/// Mutable trie state used only during construction.
struct BuildState {
    ascii: [u32; ASCII_RANGE],
    wide: Option<AHashMap<char, u32>>,
    tags: Vec<RuleId>,
}

impl BuildState {
    fn new() -> Self {
        Self {
            ascii: [NO_STATE; ASCII_RANGE],
            wide: None,
            tags: Vec::new(),
        }
    }
}

/// Accumulates patterns for a [`SubstringDfa`].
pub struct SubstringBuilder {
    states: Vec<BuildState>,
    empty_tags: Vec<RuleId>,
    pattern_count: usize,
}

impl SubstringBuilder {
    /// Creates a builder with only the root state.
    pub fn new() -> Self {
        Self {
            states: vec![BuildState::new()],
            empty_tags: Vec::new(),
            pattern_count: 0,
        }
    }

    /// Returns `true` if no patterns have been inserted.
    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }

    /// Inserts a pattern with an associated rule-ID tag.
    ///
    /// The empty pattern is legal and fires once per search per insertion.
    pub fn insert(&mut self, pattern: &str, tag: RuleId) {
        self.pattern_count += 1;
        if pattern.is_empty() {
            self.empty_tags.push(tag);
            return;
        }
        let mut state = 0u32;
        for c in pattern.chars() {
            state = self.child_or_create(state, c);
        }
        self.states[state as usize].tags.push(tag);
    }

    /// Constructs the searchable DFA.
    ///
    /// Runs the classic phases: depth-one failure links with root
    /// self-loops, BFS failure-link computation with output merging, and a
    /// final pass that completes every transition row so search needs no
    /// failure chasing. Build-phase scratch is released; the survivors are
    /// flat transition and output tables.
    pub fn build(self) -> SubstringDfa {
        let state_count = self.states.len();
        let mut ascii: Vec<[u32; ASCII_RANGE]> = Vec::with_capacity(state_count);
        let mut wide: Vec<Option<AHashMap<char, u32>>> = Vec::with_capacity(state_count);
        let mut tags: Vec<Vec<RuleId>> = Vec::with_capacity(state_count);
        for state in self.states {
            ascii.push(state.ascii);
            wide.push(state.wide);
            tags.push(state.tags);
        }

        let mut failure = vec![0u32; state_count];
        let mut queue: VecDeque<u32> = VecDeque::new();

        // Depth one: missing root transitions self-loop; real children fail
        // to the root and seed the BFS.
        for c in 0..ASCII_RANGE {
            match ascii[0][c] {
                NO_STATE => ascii[0][c] = 0,
                child => queue.push_back(child),
            }
        }
        if let Some(map) = &wide[0] {
            for &child in map.values() {
                queue.push_back(child);
            }
        }

        // BFS failure computation. For a child t of s on character c, the
        // failure of t is the deepest proper-suffix state with a c-edge.
        // Output lists merge downward so each state already enumerates
        // every pattern ending at it or at any of its suffix states.
        let mut bfs_order: Vec<u32> = Vec::with_capacity(state_count.saturating_sub(1));
        while let Some(state) = queue.pop_front() {
            bfs_order.push(state);
            let s = state as usize;

            for c in 0..ASCII_RANGE {
                let child = ascii[s][c];
                if child != NO_STATE {
                    let f = fallback_target(&ascii, &wide, &failure, state, ascii_char(c));
                    failure[child as usize] = f;
                    merge_tags(&mut tags, child as usize, f as usize);
                    queue.push_back(child);
                }
            }
            if let Some(map) = wide[s].clone() {
                for (&c, &child) in &map {
                    let f = fallback_target(&ascii, &wide, &failure, state, c);
                    failure[child as usize] = f;
                    merge_tags(&mut tags, child as usize, f as usize);
                    queue.push_back(child);
                }
            }
        }

        // DFA completion, in the same breadth-first order so each state's
        // failure row is already complete when inherited from. The root was
        // completed by the depth-one pass.
        for &state in &bfs_order {
            let s = state as usize;
            let f = failure[s] as usize;
            for c in 0..ASCII_RANGE {
                if ascii[s][c] == NO_STATE {
                    ascii[s][c] = ascii[f][c];
                }
            }
            if let Some(inherited) = wide[f].clone() {
                let own = wide[s].get_or_insert_with(AHashMap::new);
                for (c, target) in inherited {
                    own.entry(c).or_insert(target);
                }
            }
        }

        // Flatten output lists into one contiguous tag array with per-state
        // ranges; the emission loop then touches a single allocation.
        let mut outputs: Vec<RuleId> = Vec::new();
        let mut output_ranges: Vec<(u32, u32)> = Vec::with_capacity(state_count);
        for state_tags in &tags {
            output_ranges.push((outputs.len() as u32, state_tags.len() as u32));
            outputs.extend_from_slice(state_tags);
        }

        SubstringDfa {
            transitions: ascii,
            wide,
            outputs: outputs.into_boxed_slice(),
            output_ranges: output_ranges.into_boxed_slice(),
            empty_tags: self.empty_tags.into_boxed_slice(),
            pattern_count: self.pattern_count,
        }
    }

    fn child_or_create(&mut self, state: u32, c: char) -> u32 {
        let s = state as usize;
        if (c as u32) < ASCII_RANGE as u32 {
            let existing = self.states[s].ascii[c as usize];
            if existing != NO_STATE {
                return existing;
            }
            let next = self.states.len() as u32;
            self.states.push(BuildState::new());
            self.states[s].ascii[c as usize] = next;
            next
        } else {
            if let Some(existing) = self.states[s].wide.as_ref().and_then(|m| m.get(&c).copied()) {
                return existing;
            }
            let next = self.states.len() as u32;
            self.states.push(BuildState::new());
            self.states[s]
                .wide
                .get_or_insert_with(AHashMap::new)
                .insert(c, next);
            next
        }
    }
}

impl Default for SubstringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn ascii_char(c: usize) -> char {
    c as u8 as char
}

/// Walks failure links from `parent` until a state with a `c`-transition is
/// found, returning that transition's target (the root if none exists).
/// Only called during build, before rows are completed.
fn fallback_target(
    ascii: &[[u32; ASCII_RANGE]],
    wide: &[Option<AHashMap<char, u32>>],
    failure: &[u32],
    parent: u32,
    c: char,
) -> u32 {
    let mut state = failure[parent as usize];
    while state != 0 && raw_transition(ascii, wide, state, c) == NO_STATE {
        state = failure[state as usize];
    }
    match raw_transition(ascii, wide, state, c) {
        NO_STATE => 0,
        target => target,
    }
}

fn raw_transition(
    ascii: &[[u32; ASCII_RANGE]],
    wide: &[Option<AHashMap<char, u32>>],
    state: u32,
    c: char,
) -> u32 {
    if (c as u32) < ASCII_RANGE as u32 {
        ascii[state as usize][c as usize]
    } else {
        wide[state as usize]
            .as_ref()
            .and_then(|m| m.get(&c).copied())
            .unwrap_or(NO_STATE)
    }
}

fn merge_tags(tags: &mut [Vec<RuleId>], state: usize, fail_state: usize) {
    if tags[fail_state].is_empty() {
        return;
    }
    let inherited = tags[fail_state].clone();
    tags[state].extend(inherited);
}

/// Immutable Aho-Corasick DFA over rule-ID-tagged patterns.
///
/// Safe for unsynchronized concurrent searches; search reads only the
/// flattened transition and output tables.
#[derive(Debug)]
pub struct SubstringDfa {
    transitions: Vec<[u32; ASCII_RANGE]>,
    wide: Vec<Option<AHashMap<char, u32>>>,
    outputs: Box<[RuleId]>,
    /// Per-state (offset, len) into `outputs`.
    output_ranges: Box<[(u32, u32)]>,
    empty_tags: Box<[RuleId]>,
    pattern_count: usize,
}

impl SubstringDfa {
    /// Returns `true` if the automaton holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }

    /// Number of inserted patterns, empty patterns included.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of DFA states.
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    /// Invokes the sink once per pattern occurrence in `text`.
    ///
    /// A pattern occurring at several positions emits at each; a tag
    /// inserted twice under the same pattern emits twice per occurrence.
    /// Empty-pattern tags emit exactly once per call.
    pub fn search(&self, text: &str, sink: &mut impl FnMut(RuleId)) {
        for &tag in self.empty_tags.iter() {
            sink(tag);
        }
        let mut state = 0u32;
        for c in text.chars() {
            state = self.step(state, c);
            let (offset, len) = self.output_ranges[state as usize];
            for &tag in &self.outputs[offset as usize..(offset + len) as usize] {
                sink(tag);
            }
        }
    }

    fn step(&self, state: u32, c: char) -> u32 {
        if (c as u32) < ASCII_RANGE as u32 {
            self.transitions[state as usize][c as usize]
        } else {
            // Unknown non-ASCII characters restart at the root.
            self.wide[state as usize]
                .as_ref()
                .and_then(|m| m.get(&c).copied())
                .unwrap_or(0)
        }
    }
}
