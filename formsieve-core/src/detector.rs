// formsieve-core/src/detector.rs
//! Detection orchestration: whitelist short-circuiting, matcher selection,
//! and the fuzzy fallback.
//!
//! A `Detector` is built from one `Settings` value and is read-only
//! afterwards; every `detect` call normalizes its input, consults the
//! whitelist, and runs the configured blacklist strategy. Whitelist
//! membership always wins: a text matching any whitelist pattern reports
//! no matches even when blacklist terms are present.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::debug;

use crate::config::Settings;
use crate::match_record::{DetectionResult, MatchRecord, PositionedMatch};
use crate::matchers::automaton_matcher::AutomatonMatcher;
use crate::matchers::fuzzy_matcher::FuzzyMatcher;
use crate::matchers::regex_matcher::{self, RegexListMatcher};
use crate::matchers::ExactMatcher;
use crate::normalizer::{self, NormalizeOptions};
use crate::patterns::compiler::{self, CompiledTermSet};

#[derive(Debug)]
pub struct Detector {
    settings: Settings,
    blacklist: Arc<CompiledTermSet>,
    whitelist: Arc<CompiledTermSet>,
}

impl Detector {
    /// Builds a detector, reusing cached compilations when the term lists
    /// are unchanged.
    pub fn new(settings: &Settings) -> Self {
        let blacklist = compiler::get_or_compile_term_set(&settings.blacklist);
        let whitelist = compiler::get_or_compile_term_set(&settings.whitelist);
        Self {
            settings: settings.clone(),
            blacklist,
            whitelist,
        }
    }

    /// Builds a detector that recompiles both term lists unconditionally,
    /// replacing any cached compilation. For callers reacting to a
    /// configuration change.
    pub fn with_fresh_patterns(settings: &Settings) -> Self {
        let blacklist = compiler::compile_fresh_term_set(&settings.blacklist);
        let whitelist = compiler::compile_fresh_term_set(&settings.whitelist);
        Self {
            settings: settings.clone(),
            blacklist,
            whitelist,
        }
    }

    /// Runs the full detection pipeline over `text`.
    pub fn detect(&self, text: &str) -> DetectionResult {
        let normalized = normalizer::normalize(text, &NormalizeOptions::default());

        if regex_matcher::is_listed(&normalized, &self.whitelist) {
            debug!("Text matches the whitelist; skipping blacklist detection.");
            return DetectionResult::default();
        }

        let mut matches = self.exact_matches(&normalized);

        // Fuzzy matching is strictly a fallback, never layered on top of
        // exact hits.
        if matches.is_empty() && self.settings.fuzzy_matching {
            matches = FuzzyMatcher::new(self.settings.fuzzy_threshold)
                .find_matches(&normalized, &self.blacklist);
        }

        DetectionResult {
            found: !matches.is_empty(),
            matches,
        }
    }

    fn exact_matches(&self, normalized: &str) -> Vec<MatchRecord> {
        if self.blacklist.is_empty() {
            return Vec::new();
        }
        let matcher: &dyn ExactMatcher = if self.settings.use_fast_matcher {
            &AutomatonMatcher
        } else {
            &RegexListMatcher
        };
        matcher.find_matches(normalized, &self.blacklist)
    }

    /// Locates every occurrence of every blacklist pattern in the normalized
    /// form of `text`, with byte offsets into that normalized form. Unlike
    /// `detect`, all occurrences are reported and the whitelist is not
    /// consulted.
    pub fn matches_with_positions(&self, text: &str) -> Vec<PositionedMatch> {
        let normalized = normalizer::normalize(text, &NormalizeOptions::default());
        let mut matches = Vec::new();
        for pattern in &self.blacklist.patterns {
            for found in pattern.regex.find_iter(&normalized) {
                matches.push(PositionedMatch {
                    word: pattern.original.clone(),
                    matched: found.as_str().to_string(),
                    position: found.start(),
                });
            }
        }
        matches
    }

    /// True when `word` on its own is suppressed by the whitelist.
    pub fn is_word_whitelisted(&self, word: &str) -> bool {
        let normalized = normalizer::normalize(word, &NormalizeOptions::default());
        self.whitelist
            .patterns
            .iter()
            .any(|pattern| pattern.normalized == normalized)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
