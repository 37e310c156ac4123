//! Prefix automaton.
//!
//! A character-indexed trie mapping keys to rule-ID tags, queried with
//! "which inserted keys are prefixes of this input?" in one pass over the
//! input. Serves STARTS_WITH directly and, fed reversed keys and walked
//! over a reversed input, ENDS_WITH.

use crate::RuleId;
use ahash::AHashMap;
use smallvec::SmallVec;

const ASCII_RANGE: usize = 128;
const NO_NODE: u32 = u32::MAX;

/// Arena node. ASCII children are direct-indexed; anything above 0x7F goes
/// through a lazily allocated map. URL parts are ASCII-dominated, so the
/// flat array is the hot tier.
#[derive(Debug)]
struct Node {
    ascii: [u32; ASCII_RANGE],
    wide: Option<AHashMap<char, u32>>,
    tags: SmallVec<[RuleId; 2]>,
}

impl Node {
    fn new() -> Self {
        Self {
            ascii: [NO_NODE; ASCII_RANGE],
            wide: None,
            tags: SmallVec::new(),
        }
    }

    fn child(&self, c: char) -> Option<u32> {
        if (c as u32) < ASCII_RANGE as u32 {
            match self.ascii[c as usize] {
                NO_NODE => None,
                next => Some(next),
            }
        } else {
            self.wide.as_ref().and_then(|m| m.get(&c).copied())
        }
    }
}

/// Multi-key trie answering prefix queries over tagged keys.
///
/// Keys of length zero are tagged on the root and therefore emitted for
/// every input. Inserting the same (key, tag) pair twice emits it twice per
/// matching query; the candidate counters rely on emission count equalling
/// insertion count.
#[derive(Debug)]
pub struct PrefixTrie {
    nodes: Vec<Node>,
    key_count: usize,
}

impl PrefixTrie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            key_count: 0,
        }
    }

    /// Returns `true` if no keys have been inserted.
    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Inserts a key with an associated rule-ID tag.
    pub fn insert(&mut self, key: &str, tag: RuleId) {
        self.key_count += 1;
        let mut node = 0u32;
        for c in key.chars() {
            node = self.child_or_create(node, c);
        }
        self.nodes[node as usize].tags.push(tag);
    }

    /// Invokes the sink once per tag whose key is a prefix of `input`.
    ///
    /// Emission order is unspecified.
    pub fn find_prefixes_of(&self, input: &str, sink: &mut impl FnMut(RuleId)) {
        self.walk(input.chars(), sink);
    }

    /// Char-slice variant of [`find_prefixes_of`], for walking a reversed
    /// input held in a caller-owned scratch buffer.
    ///
    /// [`find_prefixes_of`]: PrefixTrie::find_prefixes_of
    pub fn find_prefixes_of_chars(&self, input: &[char], sink: &mut impl FnMut(RuleId)) {
        self.walk(input.iter().copied(), sink);
    }

    fn walk(&self, chars: impl Iterator<Item = char>, sink: &mut impl FnMut(RuleId)) {
        // Root tags are the empty keys; the empty string prefixes anything.
        let mut node = &self.nodes[0];
        for &tag in &node.tags {
            sink(tag);
        }
        for c in chars {
            match node.child(c) {
                Some(next) => {
                    node = &self.nodes[next as usize];
                    for &tag in &node.tags {
                        sink(tag);
                    }
                }
                None => return,
            }
        }
    }

    fn child_or_create(&mut self, node: u32, c: char) -> u32 {
        let n = node as usize;
        if (c as u32) < ASCII_RANGE as u32 {
            let existing = self.nodes[n].ascii[c as usize];
            if existing != NO_NODE {
                return existing;
            }
            let next = self.nodes.len() as u32;
            self.nodes.push(Node::new());
            self.nodes[n].ascii[c as usize] = next;
            next
        } else {
            if let Some(existing) = self.nodes[n].wide.as_ref().and_then(|m| m.get(&c).copied()) {
                return existing;
            }
            let next = self.nodes.len() as u32;
            self.nodes.push(Node::new());
            self.nodes[n]
                .wide
                .get_or_insert_with(AHashMap::new)
                .insert(c, next);
            next
        }
    }
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}
