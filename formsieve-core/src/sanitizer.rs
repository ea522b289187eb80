// formsieve-core/src/sanitizer.rs
//! Sanitization coordination: applies the configured action to detected
//! content and batches the work across named submission fields.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, HashSet};

use log::debug;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::config::{SanitizeAction, Settings};
use crate::detector::Detector;
use crate::match_record::{DetectionResult, MatchRecord, SanitizeResult};
use crate::normalizer;

/// A submitted field value. Only single text values are sanitized;
/// multi-value fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Values(Vec<String>),
}

/// Per-field outcome of `sanitize_fields`: the (possibly cleaned) value
/// plus the match report for audit logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    pub value: FieldValue,
    pub modified: bool,
    pub matches: Vec<MatchRecord>,
    pub action: SanitizeAction,
}

/// Applies the configured `SanitizeAction` to texts with detected content.
pub struct Sanitizer {
    detector: Detector,
    settings: Settings,
}

impl Sanitizer {
    pub fn new(settings: Settings) -> Self {
        let detector = Detector::new(&settings);
        Self { detector, settings }
    }

    /// Like `new`, but recompiles the term lists unconditionally. The
    /// rebuild hook for callers whose configuration just changed.
    pub fn with_fresh_patterns(settings: Settings) -> Self {
        let detector = Detector::with_fresh_patterns(&settings);
        Self { detector, settings }
    }

    /// Detects banned content in `text` and applies the configured action.
    ///
    /// Erasure and replacement re-match the detected words literally
    /// against the original text, so submitters see their own casing and
    /// punctuation removed rather than a normalized echo. The flip side is
    /// that an obfuscated spelling detected only through normalization is
    /// reported in `matches` but can remain in the text.
    pub fn sanitize(&self, text: &str) -> SanitizeResult {
        let detection = self.detector.detect(text);
        if !detection.found {
            return SanitizeResult {
                text: text.to_string(),
                modified: false,
                matches: Vec::new(),
                action: self.settings.action,
            };
        }

        match self.settings.action {
            SanitizeAction::Erase => {
                let cleaned = self.remove_words(text, &detection.matches, None);
                SanitizeResult {
                    modified: cleaned != text,
                    text: cleaned,
                    matches: detection.matches,
                    action: SanitizeAction::Erase,
                }
            }
            SanitizeAction::Replace => {
                let cleaned =
                    self.remove_words(text, &detection.matches, Some(&self.settings.replace_mask));
                SanitizeResult {
                    modified: cleaned != text,
                    text: cleaned,
                    matches: detection.matches,
                    action: SanitizeAction::Replace,
                }
            }
            // Blocking and flagging never mutate; the caller acts on the
            // report.
            SanitizeAction::Block | SanitizeAction::FlagOnly => SanitizeResult {
                text: text.to_string(),
                modified: false,
                matches: detection.matches,
                action: self.settings.action,
            },
        }
    }

    /// Removes (or masks, when `mask` is set) every boundary-anchored,
    /// case-insensitive occurrence of each matched word in the original
    /// text. Erasure then collapses the whitespace gaps it leaves behind.
    fn remove_words(&self, text: &str, matches: &[MatchRecord], mask: Option<&str>) -> String {
        let mut cleaned = text.to_string();
        let mut done: HashSet<&str> = HashSet::new();

        for record in matches {
            if !done.insert(record.word.as_str()) {
                continue;
            }
            let source = format!(r"\b{}\b", regex::escape(&record.word));
            let regex = match RegexBuilder::new(&source).case_insensitive(true).build() {
                Ok(regex) => regex,
                Err(e) => {
                    debug!("Occurrence pattern for {:?} did not build: {}", record.word, e);
                    continue;
                }
            };
            // NoExpand keeps a mask like "$$$" literal.
            cleaned = regex
                .replace_all(&cleaned, regex::NoExpand(mask.unwrap_or("")))
                .into_owned();
        }

        match mask {
            Some(_) => cleaned,
            None => normalizer::collapse_whitespace(&cleaned).trim().to_string(),
        }
    }

    /// Pure validation signal for callers that reject submissions instead
    /// of mutating them: true iff the configured action is `Block` and the
    /// detector finds banned content. Never alters text, so it can run
    /// ahead of mutation in a validation pass.
    pub fn should_block(&self, text: &str) -> bool {
        self.settings.action == SanitizeAction::Block && self.detector.detect(text).found
    }

    /// Detection without any mutation, under any configured action.
    pub fn detect_only(&self, text: &str) -> DetectionResult {
        self.detector.detect(text)
    }

    /// Applies `sanitize` to every named field. Fields named in `excluded`
    /// and non-text values pass through unmodified.
    pub fn sanitize_fields(
        &self,
        fields: &BTreeMap<String, FieldValue>,
        excluded: &HashSet<String>,
    ) -> BTreeMap<String, FieldResult> {
        let mut results = BTreeMap::new();
        for (name, value) in fields {
            let result = match value {
                FieldValue::Text(text) if !excluded.contains(name) => {
                    let cleaned = self.sanitize(text);
                    FieldResult {
                        value: FieldValue::Text(cleaned.text),
                        modified: cleaned.modified,
                        matches: cleaned.matches,
                        action: cleaned.action,
                    }
                }
                other => {
                    debug!("Field {:?} passed through unmodified.", name);
                    FieldResult {
                        value: other.clone(),
                        modified: false,
                        matches: Vec::new(),
                        action: self.settings.action,
                    }
                }
            };
            results.insert(name.clone(), result);
        }
        results
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
