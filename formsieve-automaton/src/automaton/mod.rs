//! Aho-Corasick automaton over Unicode code points.
//!
//! The trie lives in an arena-indexed node table: nodes are stored in a
//! `Vec`, children are addressed through a small sorted map, and failure
//! links are plain indices into the same table. Construction is
//! O(sum of pattern lengths); a scan is O(text length + occurrences).
//!
//! License: MIT OR Apache-2.0

use std::collections::{BTreeMap, VecDeque};

use log::debug;

const ROOT: u32 = 0;

/// A single occurrence of a pattern in a scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Index of the pattern, in the order patterns were added.
    pub pattern: usize,
    /// Byte offset of the first code point of the occurrence.
    pub start: usize,
    /// Byte offset one past the last code point of the occurrence.
    pub end: usize,
}

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<char, u32>,
    failure: u32,
    /// Ids of every pattern terminated at this node, including patterns
    /// inherited from the failure chain (suffixes of this node's path).
    outputs: Vec<usize>,
}

/// A trie augmented with failure links, enabling single-pass multi-pattern
/// search.
///
/// Immutable once built, so it is safe to share read-only across threads
/// scanning different texts against the same term set.
#[derive(Debug)]
pub struct AhoCorasick {
    nodes: Vec<Node>,
    patterns: Vec<String>,
}

impl AhoCorasick {
    /// Builds the automaton from `patterns`.
    ///
    /// Empty patterns are skipped. Duplicate patterns collapse onto a single
    /// trie path and are recorded once, so a scan reports each distinct
    /// pattern string at most once per terminating position.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut automaton = Self {
            nodes: vec![Node::default()],
            patterns: Vec::new(),
        };
        for pattern in patterns {
            automaton.insert(pattern.into());
        }
        automaton.build_failure_links();
        debug!(
            "built automaton: {} patterns, {} nodes",
            automaton.patterns.len(),
            automaton.nodes.len()
        );
        automaton
    }

    /// Number of distinct patterns the automaton was built from.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of nodes in the trie, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the automaton holds no patterns and every scan is a no-op.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The pattern string for a `Match::pattern` id.
    pub fn pattern(&self, id: usize) -> &str {
        &self.patterns[id]
    }

    /// All patterns in insertion order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    fn insert(&mut self, pattern: String) {
        if pattern.is_empty() {
            return;
        }
        let mut current = ROOT;
        for c in pattern.chars() {
            current = match self.nodes[current as usize].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len() as u32;
                    self.nodes.push(Node::default());
                    self.nodes[current as usize].children.insert(c, next);
                    next
                }
            };
        }
        // Before failure links are merged in, an output here can only be an
        // earlier insertion of this exact string.
        if !self.nodes[current as usize].outputs.is_empty() {
            debug!("skipping duplicate pattern {:?}", pattern);
            return;
        }
        let id = self.patterns.len();
        self.patterns.push(pattern);
        self.nodes[current as usize].outputs.push(id);
    }

    /// Computes failure links breadth-first from depth 1 and merges each
    /// failure target's output set into its dependent node, so a node knows
    /// every pattern that is a suffix of its path.
    fn build_failure_links(&mut self) {
        let mut queue: VecDeque<u32> = VecDeque::new();
        let depth_one: Vec<u32> = self.nodes[ROOT as usize].children.values().copied().collect();
        for node in depth_one {
            self.nodes[node as usize].failure = ROOT;
            queue.push_back(node);
        }

        while let Some(current) = queue.pop_front() {
            let children: Vec<(char, u32)> = self.nodes[current as usize]
                .children
                .iter()
                .map(|(&c, &n)| (c, n))
                .collect();
            for (c, child) in children {
                queue.push_back(child);

                let mut state = self.nodes[current as usize].failure;
                while state != ROOT && !self.nodes[state as usize].children.contains_key(&c) {
                    state = self.nodes[state as usize].failure;
                }
                let target = match self.nodes[state as usize].children.get(&c) {
                    Some(&next) if next != child => next,
                    _ => ROOT,
                };
                self.nodes[child as usize].failure = target;

                let inherited = self.nodes[target as usize].outputs.clone();
                self.nodes[child as usize].outputs.extend(inherited);
            }
        }
    }

    /// Scans `text` in a single pass and returns every pattern occurrence,
    /// ordered by end position. Overlapping and nested occurrences are all
    /// reported; `text[start..end]` equals the matched pattern byte for byte.
    pub fn find_iter(&self, text: &str) -> Vec<Match> {
        let mut found = Vec::new();
        if self.patterns.is_empty() {
            return found;
        }

        let mut current = ROOT;
        for (offset, c) in text.char_indices() {
            let end = offset + c.len_utf8();
            while current != ROOT && !self.nodes[current as usize].children.contains_key(&c) {
                current = self.nodes[current as usize].failure;
            }
            if let Some(&next) = self.nodes[current as usize].children.get(&c) {
                current = next;
            }
            for &id in &self.nodes[current as usize].outputs {
                let pattern = &self.patterns[id];
                found.push(Match {
                    pattern: id,
                    start: end - pattern.len(),
                    end,
                });
            }
        }
        found
    }

    /// Returns the distinct pattern strings occurring in `text`, in pattern
    /// insertion order.
    pub fn search(&self, text: &str) -> Vec<&str> {
        let mut seen = vec![false; self.patterns.len()];
        for m in self.find_iter(text) {
            seen[m.pattern] = true;
        }
        seen.iter()
            .enumerate()
            .filter(|&(_, &hit)| hit)
            .map(|(id, _)| self.patterns[id].as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_overlapping_patterns() {
        let ac = AhoCorasick::new(["he", "she", "his", "hers"]);
        let found = ac.search("ushers");
        assert_eq!(found, vec!["he", "she", "hers"]);
    }

    #[test]
    fn reports_byte_accurate_spans() {
        let ac = AhoCorasick::new(["she", "he"]);
        let text = "ushers";
        let occurrences = ac.find_iter(text);
        for m in &occurrences {
            assert_eq!(&text[m.start..m.end], ac.pattern(m.pattern));
        }
        assert_eq!(occurrences.len(), 2);
    }

    #[test]
    fn suffix_patterns_inherit_through_failure_links() {
        // "a" terminates inside every longer run of a's.
        let ac = AhoCorasick::new(["aaa", "a"]);
        let occurrences = ac.find_iter("aaaa");
        let ones = occurrences.iter().filter(|m| ac.pattern(m.pattern) == "a").count();
        let threes = occurrences.iter().filter(|m| ac.pattern(m.pattern) == "aaa").count();
        assert_eq!(ones, 4);
        assert_eq!(threes, 2);
    }

    #[test]
    fn handles_multibyte_code_points() {
        let ac = AhoCorasick::new(["héllo", "llo"]);
        let text = "say héllo twice";
        let occurrences = ac.find_iter(text);
        assert_eq!(occurrences.len(), 2);
        for m in &occurrences {
            assert_eq!(&text[m.start..m.end], ac.pattern(m.pattern));
        }
    }

    #[test]
    fn shared_prefixes_share_trie_nodes() {
        let ac = AhoCorasick::new(["spam", "spa", "spin"]);
        assert_eq!(ac.patterns(), &["spam", "spa", "spin"]);
        // Root, s-p-a-m, and the i-n fork off the shared "sp".
        assert_eq!(ac.node_count(), 7);
    }

    #[test]
    fn duplicate_patterns_are_reported_once() {
        let ac = AhoCorasick::new(["spam", "spam"]);
        assert_eq!(ac.pattern_count(), 1);
        assert_eq!(ac.search("spam spam"), vec!["spam"]);
    }

    #[test]
    fn empty_patterns_are_skipped() {
        let ac = AhoCorasick::new(["", "ok"]);
        assert_eq!(ac.pattern_count(), 1);
        assert_eq!(ac.search("ok"), vec!["ok"]);
    }

    #[test]
    fn empty_automaton_matches_nothing() {
        let ac = AhoCorasick::new(Vec::<String>::new());
        assert!(ac.is_empty());
        assert!(ac.find_iter("anything at all").is_empty());
    }

    #[test]
    fn same_text_scans_identically_every_call() {
        let ac = AhoCorasick::new(["win", "winner", "inn"]);
        let first = ac.find_iter("winner inn");
        let second = ac.find_iter("winner inn");
        assert_eq!(first, second);
    }

    #[test]
    fn no_match_in_unrelated_text() {
        let ac = AhoCorasick::new(["viagra", "casino"]);
        assert!(ac.search("a perfectly ordinary message").is_empty());
    }
}
