// formsieve-core/src/matchers/mod.rs
//! This module contains the matching strategy implementations.
//!
//! The two exact strategies implement the `ExactMatcher` trait and are
//! interchangeable from the detector's point of view; which one runs is a
//! per-call decision driven by `Settings::use_fast_matcher`. The fuzzy
//! matcher sits outside the trait: it is a fallback that consumes tokens
//! and a distance budget rather than compiled pattern forms.

pub mod automaton_matcher;
pub mod fuzzy_matcher;
pub mod regex_matcher;

use crate::match_record::MatchRecord;
use crate::patterns::compiler::CompiledTermSet;

/// An exact multi-term matching strategy over normalized text.
///
/// Implementations scan the full text and report at most one record per
/// compiled pattern, with the matched span taken from the text itself.
pub trait ExactMatcher: Send + Sync {
    fn find_matches(&self, normalized_text: &str, set: &CompiledTermSet) -> Vec<MatchRecord>;
}
