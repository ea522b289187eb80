// formsieve-core/src/matchers/fuzzy_matcher.rs
//! Edit-distance fallback matching.
//!
//! Catches near-miss obfuscations that survive normalization, comparing
//! each token of the text against every blacklist term under a bounded
//! Levenshtein distance. The detector only invokes this after exact
//! matching found nothing.
//!
//! License: MIT OR APACHE 2.0

use crate::match_record::{log_match_debug, MatchMethod, MatchRecord};
use crate::normalizer;
use crate::patterns::compiler::CompiledTermSet;

/// Tokens shorter than this are never fuzzy-matched.
const MIN_TOKEN_LEN: usize = 3;

/// Tokens longer than this get one extra point of distance budget.
const LONG_TOKEN_LEN: usize = 8;

#[derive(Debug, Default)]
pub struct FuzzyMatcher {
    threshold: u32,
}

impl FuzzyMatcher {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Compares every token of `normalized_text` against every term's
    /// normalized form. The length-difference prefilter uses the raw
    /// threshold; the acceptance bound is widened by one for long tokens.
    pub fn find_matches(&self, normalized_text: &str, set: &CompiledTermSet) -> Vec<MatchRecord> {
        let mut matches = Vec::new();
        let threshold = self.threshold as usize;

        for token in normalizer::extract_words(normalized_text) {
            let token_len = normalizer::char_count(token);
            if token_len < MIN_TOKEN_LEN {
                continue;
            }
            let max_distance = if token_len > LONG_TOKEN_LEN {
                threshold + 1
            } else {
                threshold
            };

            for pattern in &set.patterns {
                let term_len = normalizer::char_count(&pattern.normalized);
                if token_len.abs_diff(term_len) > threshold {
                    continue;
                }

                let distance = levenshtein(token, &pattern.normalized);
                if distance <= max_distance {
                    log_match_debug(module_path!(), &pattern.original, token, MatchMethod::Fuzzy);
                    matches.push(MatchRecord {
                        word: pattern.original.clone(),
                        matched: token.to_string(),
                        method: MatchMethod::Fuzzy,
                        distance: Some(distance as u32),
                    });
                }
            }
        }
        matches
    }
}

/// Levenshtein distance over code points; insertions, deletions, and
/// substitutions each cost 1. Two-row formulation.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
