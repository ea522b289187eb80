// formsieve-core/src/matchers/regex_matcher.rs
//! Per-pattern regular-expression matching.
//!
//! Scans each compiled pattern's regex over the text independently, which
//! is linear in the pattern count. Used for the blacklist when the fast
//! matcher is disabled, and always for whitelist checks, where term lists
//! stay small.
//!
//! License: MIT OR APACHE 2.0

use super::ExactMatcher;
use crate::match_record::{log_match_debug, MatchMethod, MatchRecord};
use crate::patterns::compiler::CompiledTermSet;

#[derive(Debug, Default)]
pub struct RegexListMatcher;

impl ExactMatcher for RegexListMatcher {
    fn find_matches(&self, normalized_text: &str, set: &CompiledTermSet) -> Vec<MatchRecord> {
        let mut matches = Vec::new();
        for pattern in &set.patterns {
            // First match per pattern is sufficient for the report.
            if let Some(found) = pattern.regex.find(normalized_text) {
                log_match_debug(
                    module_path!(),
                    &pattern.original,
                    found.as_str(),
                    MatchMethod::Regex,
                );
                matches.push(MatchRecord {
                    word: pattern.original.clone(),
                    matched: found.as_str().to_string(),
                    method: MatchMethod::Regex,
                    distance: None,
                });
            }
        }
        matches
    }
}

/// True when any pattern in `set` matches `normalized_text`. The whitelist
/// short-circuit check.
pub fn is_listed(normalized_text: &str, set: &CompiledTermSet) -> bool {
    set.patterns
        .iter()
        .any(|pattern| pattern.regex.is_match(normalized_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::compiler::compile_term_set;

    fn set_of(terms: &[&str]) -> CompiledTermSet {
        compile_term_set(&terms.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn reports_one_record_per_matching_pattern() {
        let set = set_of(&["spam", "casino", "cruise"]);
        let matches = RegexListMatcher.find_matches("spam and casino spam", &set);
        let words: Vec<&str> = matches.iter().map(|m| m.word.as_str()).collect();
        assert_eq!(words, vec!["spam", "casino"]);
    }

    #[test]
    fn captures_the_exact_matched_span() {
        let set = set_of(&["free money"]);
        let matches = RegexListMatcher.find_matches("get freemoney here", &set);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, "freemoney");
    }

    #[test]
    fn is_listed_reflects_any_pattern_hit() {
        let set = set_of(&["legitimate inquiry"]);
        assert!(is_listed("a legitimate inquiry follows", &set));
        assert!(!is_listed("unrelated text", &set));
    }
}
