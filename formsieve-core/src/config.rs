//! Configuration management for `formsieve-core`.
//!
//! This module defines the `Settings` value every detector and sanitizer is
//! instantiated with, the sanitization action enum, and the parsing of the
//! external newline-separated term-list encoding. Settings are plain values
//! passed into each call; the core keeps no process-wide configuration
//! state.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::FormsieveError;

/// Maximum allowed length for a configured term, in bytes. Longer terms are
/// dropped during compilation with a warning.
pub const MAX_TERM_LENGTH: usize = 500;

/// What the sanitizer does with a field once banned content is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SanitizeAction {
    /// Remove each matched word from the text.
    #[default]
    Erase,
    /// Substitute each matched word with the configured mask.
    Replace,
    /// Leave the text alone and signal that the submission should be
    /// rejected.
    Block,
    /// Leave the text alone and only surface the match report.
    FlagOnly,
}

/// A complete, self-contained matching configuration.
///
/// Owned by the caller and passed into each detector/sanitizer
/// instantiation. Two `Settings` values with the same term lists share the
/// compiled pattern cache (see `patterns::compiler`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Terms that trigger detection.
    pub blacklist: Vec<String>,
    /// Terms that suppress detection for a whole text, overriding the
    /// blacklist.
    pub whitelist: Vec<String>,
    /// Fall back to edit-distance matching when exact matching finds
    /// nothing.
    pub fuzzy_matching: bool,
    /// Maximum accepted edit distance for a fuzzy match.
    pub fuzzy_threshold: u32,
    /// Scan with the Aho-Corasick automaton instead of per-pattern regexes.
    pub use_fast_matcher: bool,
    /// Action applied to fields with detected content.
    pub action: SanitizeAction,
    /// Mask substituted for matched words under `SanitizeAction::Replace`.
    pub replace_mask: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            fuzzy_matching: false,
            fuzzy_threshold: 2,
            use_fast_matcher: false,
            action: SanitizeAction::Erase,
            replace_mask: "*****".to_string(),
        }
    }
}

impl Settings {
    /// Builds settings from the external newline-separated term-list
    /// encoding, with defaults for everything else.
    pub fn with_term_lists(blacklist: &str, whitelist: &str) -> Self {
        Self {
            blacklist: parse_term_list(blacklist),
            whitelist: parse_term_list(whitelist),
            ..Self::default()
        }
    }

    /// Loads settings from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to load settings file {}", path.display()))?;
        info!(
            "Loaded settings: {} blacklist terms, {} whitelist terms.",
            settings.blacklist.len(),
            settings.whitelist.len()
        );
        Ok(settings)
    }

    /// Parses settings from a YAML document and validates them.
    pub fn from_yaml_str(text: &str) -> Result<Self, FormsieveError> {
        let settings: Settings =
            serde_yml::from_str(text).map_err(|e| FormsieveError::ConfigParse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks for degenerate values. Term content itself is never an error;
    /// empty and malformed terms are tolerated and handled during
    /// compilation.
    pub fn validate(&self) -> Result<(), FormsieveError> {
        if self.action == SanitizeAction::Replace && self.replace_mask.is_empty() {
            return Err(FormsieveError::InvalidSetting(
                "replace_mask must not be empty when action is 'replace'".to_string(),
            ));
        }

        if self.blacklist.iter().all(|t| t.trim().is_empty()) && !self.blacklist.is_empty() {
            warn!("Blacklist contains only empty terms; nothing will be detected.");
        }

        if self.fuzzy_matching && self.fuzzy_threshold > 10 {
            warn!(
                "fuzzy_threshold {} is very permissive and will match most words.",
                self.fuzzy_threshold
            );
        }

        Ok(())
    }
}

/// Reads a newline-separated term-list file.
pub fn load_term_list_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, FormsieveError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(parse_term_list(&raw))
}

/// Parses the external term-list encoding: one term per line, surrounding
/// whitespace trimmed, empty and whitespace-only lines discarded.
pub fn parse_term_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_settings() {
        let settings = Settings::default();
        assert_eq!(settings.action, SanitizeAction::Erase);
        assert_eq!(settings.replace_mask, "*****");
        assert_eq!(settings.fuzzy_threshold, 2);
        assert!(!settings.fuzzy_matching);
        assert!(!settings.use_fast_matcher);
    }

    #[test]
    fn term_lists_drop_blank_lines() {
        let parsed = parse_term_list("spam\n\n  \n  casino  \nfree money\n");
        assert_eq!(parsed, vec!["spam", "casino", "free money"]);
    }

    #[test]
    fn with_term_lists_parses_both_sides() {
        let settings = Settings::with_term_lists("spam\nscam", "class discussion");
        assert_eq!(settings.blacklist, vec!["spam", "scam"]);
        assert_eq!(settings.whitelist, vec!["class discussion"]);
    }

    #[test]
    fn empty_mask_under_replace_is_rejected() {
        let settings = Settings {
            action: SanitizeAction::Replace,
            replace_mask: String::new(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn yaml_round_trip_preserves_action_names() {
        let yaml = "action: flag_only\nblacklist:\n  - spam\n";
        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.action, SanitizeAction::FlagOnly);
        assert_eq!(settings.blacklist, vec!["spam"]);
    }
}
