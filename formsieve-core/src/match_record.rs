// formsieve-core/src/match_record.rs
//! Core data structures and utility functions for reporting detection and
//! sanitization events within the `formsieve-core` library.

use serde::{Deserialize, Serialize};
use log::debug;
use std::collections::HashSet;

use crate::config::SanitizeAction;

use lazy_static::lazy_static;

lazy_static! {
    /// A static boolean that is initialized once to determine if submitted
    /// content may appear verbatim in debug logs.
    static ref CONTENT_DEBUG_ALLOWED: bool = {
        std::env::var("FORMSIEVE_ALLOW_DEBUG_CONTENT")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Which matching strategy produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Regex,
    Automaton,
    Fuzzy,
}

/// A single detection event: one blacklist term found in one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// The blacklist term as the administrator entered it.
    pub word: String,
    /// The span of normalized text that matched.
    pub matched: String,
    /// The strategy that found the match.
    pub method: MatchMethod,
    /// Edit distance, present on fuzzy matches only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
}

/// One blacklist occurrence located in a text's normalized form, with its
/// byte offset into that form. Produced by
/// `Detector::matches_with_positions` for callers that highlight spans
/// rather than decide an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedMatch {
    /// The blacklist term as the administrator entered it.
    pub word: String,
    /// The span of normalized text that matched.
    pub matched: String,
    /// Byte offset of the span within the normalized text.
    pub position: usize,
}

/// The outcome of one detection call over one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DetectionResult {
    pub found: bool,
    pub matches: Vec<MatchRecord>,
}

impl DetectionResult {
    /// Drops records duplicating an earlier `(word, matched)` pair. The
    /// automaton path never produces such duplicates; the regex and fuzzy
    /// paths can when several configured terms cover the same span.
    pub fn dedupe(&mut self) {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        self.matches
            .retain(|m| seen.insert((m.word.clone(), m.matched.clone())));
    }
}

/// The outcome of sanitizing one text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeResult {
    /// The text after the configured action was applied.
    pub text: String,
    /// True when `text` differs from the input.
    pub modified: bool,
    /// Every detection event behind the action, for audit logging.
    pub matches: Vec<MatchRecord>,
    /// The action that was applied.
    pub action: SanitizeAction,
}

/// Summarizes user-submitted content for log output without echoing it.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.chars().count() <= MAX_LEN {
        "[CONTENT]".to_string()
    } else {
        format!("[CONTENT: {} chars]", s.chars().count())
    }
}

fn get_loggable_content(submitted_content: &str) -> String {
    if *CONTENT_DEBUG_ALLOWED {
        submitted_content.to_string()
    } else {
        redact_sensitive(submitted_content)
    }
}

pub fn log_match_debug(module_path: &str, word: &str, matched_span: &str, method: MatchMethod) {
    debug!(
        "{} Found match: word='{}', span='{}', method={:?}",
        module_path,
        word,
        get_loggable_content(matched_span),
        method
    );
}
