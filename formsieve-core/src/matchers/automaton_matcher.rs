// formsieve-core/src/matchers/automaton_matcher.rs
//! Automaton-backed exact matching.
//!
//! A single linear pass over the text finds every terminated pattern,
//! independent of how many terms the blacklist holds. Occurrences of
//! single-word terms are filtered to word boundaries so results line up
//! with the `\b`-anchored regex forms of the same terms.
//!
//! License: MIT OR APACHE 2.0

use super::ExactMatcher;
use crate::match_record::{log_match_debug, MatchMethod, MatchRecord};
use crate::patterns::compiler::CompiledTermSet;

#[derive(Debug, Default)]
pub struct AutomatonMatcher;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Boundary check equivalent to the `\b` anchors on single-word patterns.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

impl ExactMatcher for AutomatonMatcher {
    fn find_matches(&self, normalized_text: &str, set: &CompiledTermSet) -> Vec<MatchRecord> {
        let mut matches = Vec::new();
        let mut reported = vec![false; set.patterns.len()];

        for occurrence in set.automaton.find_iter(normalized_text) {
            for &idx in &set.automaton_pattern_idx[occurrence.pattern] {
                if reported[idx] {
                    continue;
                }
                let pattern = &set.patterns[idx];
                if pattern.word_bounded
                    && !on_word_boundary(normalized_text, occurrence.start, occurrence.end)
                {
                    continue;
                }
                reported[idx] = true;
                let matched = &normalized_text[occurrence.start..occurrence.end];
                log_match_debug(module_path!(), &pattern.original, matched, MatchMethod::Automaton);
                matches.push(MatchRecord {
                    word: pattern.original.clone(),
                    matched: matched.to_string(),
                    method: MatchMethod::Automaton,
                    distance: None,
                });
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::compiler::compile_term_set;

    fn set_of(terms: &[&str]) -> CompiledTermSet {
        compile_term_set(&terms.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn single_words_respect_boundaries() {
        let set = set_of(&["cat"]);
        assert!(AutomatonMatcher.find_matches("concatenate", &set).is_empty());
        let matches = AutomatonMatcher.find_matches("the cat sat", &set);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, "cat");
    }

    #[test]
    fn phrases_match_with_and_without_internal_space() {
        let set = set_of(&["free money"]);
        assert_eq!(AutomatonMatcher.find_matches("free money now", &set).len(), 1);
        assert_eq!(AutomatonMatcher.find_matches("freemoney now", &set).len(), 1);
    }

    #[test]
    fn each_pattern_is_reported_once() {
        let set = set_of(&["spam"]);
        let matches = AutomatonMatcher.find_matches("spam spam spam", &set);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn reported_word_is_the_original_term() {
        let set = set_of(&["SP@M"]);
        let matches = AutomatonMatcher.find_matches("some spam here", &set);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].word, "SP@M");
        assert_eq!(matches[0].matched, "spam");
    }
}
