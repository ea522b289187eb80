//! compiler.rs - Manages the compilation and caching of term sets.
//!
//! This module provides a thread-safe, cached mechanism to convert raw
//! term lists into `CompiledTermSet`s, which are optimized for efficient
//! matching. It uses a global, shared cache keyed by a content hash of the
//! term list, with caller-controlled invalidation.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use formsieve_automaton::AhoCorasick;

use crate::config::MAX_TERM_LENGTH;
use crate::normalizer::{self, NormalizeOptions};

/// A single configured term, compiled into its matchable representations.
#[derive(Debug)]
pub struct CompiledPattern {
    /// The term as the administrator entered it.
    pub original: String,
    /// Its normalized form; the representation the automaton indexes.
    pub normalized: String,
    /// Escaped literal regex: parts joined by `\s*`, single words anchored
    /// with `\b` on both sides.
    pub regex: Regex,
    /// True when the normalized form is a single word and occurrences must
    /// sit on word boundaries.
    pub word_bounded: bool,
}

/// Every compiled representation for one term list, ready for matching.
///
/// Immutable after construction and safe to share read-only across
/// concurrent detection calls against the same configuration.
#[derive(Debug)]
pub struct CompiledTermSet {
    pub patterns: Vec<CompiledPattern>,
    /// Automaton over the normalized forms of all patterns. Multi-word
    /// phrases contribute a second, whitespace-stripped entry so the fast
    /// path agrees with the `\s*` regex forms on concatenated phrases.
    pub automaton: AhoCorasick,
    /// For each automaton pattern id, the indices of the `patterns` it
    /// stands for. Several terms can share one normalized form.
    pub automaton_pattern_idx: Vec<Vec<usize>>,
}

impl CompiledTermSet {
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

lazy_static! {
    /// A thread-safe, global cache of compiled term sets.
    /// The key is a content hash of the canonicalized term list.
    static ref TERM_SET_CACHE: RwLock<HashMap<String, Arc<CompiledTermSet>>> =
        RwLock::new(HashMap::new());
}

/// Content-addressed cache key for a term list.
///
/// Terms are trimmed, lowercased, sorted, and deduplicated before hashing,
/// so equal sets produce equal keys regardless of entry order, casing, or
/// blank lines in the external encoding.
pub fn term_set_key(terms: &[String]) -> String {
    let mut canonical: Vec<String> = terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    canonical.sort();
    canonical.dedup();

    let serialized =
        serde_json::to_vec(&canonical).expect("a list of strings always serializes");
    let mut hasher = Sha256::new();
    hasher.update(&serialized);
    hex::encode(hasher.finalize())
}

/// Compiles a term list into a `CompiledTermSet`. This is the low-level
/// function that performs the actual work; it is total over any term
/// content. Empty terms are skipped, metacharacters are escaped so every
/// term matches as literal text, and over-long terms are dropped with a
/// warning.
pub fn compile_term_set(terms: &[String]) -> CompiledTermSet {
    debug!("Starting compilation of {} terms.", terms.len());
    let options = NormalizeOptions::default();

    let mut patterns: Vec<CompiledPattern> = Vec::new();
    for term in terms {
        if term.len() > MAX_TERM_LENGTH {
            warn!(
                "Skipping term of {} bytes; maximum is {}.",
                term.len(),
                MAX_TERM_LENGTH
            );
            continue;
        }

        let normalized = normalizer::normalize(term, &options);
        if normalized.is_empty() {
            debug!("Skipping term that normalizes to nothing.");
            continue;
        }

        let parts: Vec<String> = normalized.split_whitespace().map(regex::escape).collect();
        let word_bounded = parts.len() == 1;
        let mut source = parts.join(r"\s*");
        if word_bounded {
            source = format!(r"\b{}\b", source);
        }

        let regex = match RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(10 * (1 << 20))
            .build()
        {
            Ok(regex) => regex,
            // Escaped literals only fail on resource limits; tolerate and
            // move on rather than failing the whole set.
            Err(e) => {
                warn!("Skipping term that did not compile: {}", e);
                continue;
            }
        };

        patterns.push(CompiledPattern {
            original: term.clone(),
            normalized,
            regex,
            word_bounded,
        });
    }

    let (automaton, automaton_pattern_idx) = build_automaton(&patterns);

    debug!(
        "Finished compiling term set: {} patterns, {} automaton entries.",
        patterns.len(),
        automaton.pattern_count()
    );
    CompiledTermSet {
        patterns,
        automaton,
        automaton_pattern_idx,
    }
}

/// Indexes every normalized form in the automaton, plus the
/// whitespace-stripped variant of each phrase, and records which patterns
/// each automaton entry stands for.
fn build_automaton(patterns: &[CompiledPattern]) -> (AhoCorasick, Vec<Vec<usize>>) {
    let mut entries: Vec<String> = Vec::new();
    let mut entry_patterns: Vec<Vec<usize>> = Vec::new();
    let mut entry_ids: HashMap<String, usize> = HashMap::new();

    let mut add_entry = |entry: String, pattern_idx: usize| match entry_ids.get(&entry) {
        Some(&id) => entry_patterns[id].push(pattern_idx),
        None => {
            entry_ids.insert(entry.clone(), entries.len());
            entries.push(entry);
            entry_patterns.push(vec![pattern_idx]);
        }
    };

    for (idx, pattern) in patterns.iter().enumerate() {
        add_entry(pattern.normalized.clone(), idx);
        if !pattern.word_bounded {
            let stripped: String = pattern
                .normalized
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if stripped != pattern.normalized {
                add_entry(stripped, idx);
            }
        }
    }

    (AhoCorasick::new(entries), entry_patterns)
}

/// Gets a `CompiledTermSet` from the cache, compiling it first if this term
/// list has not been seen. Returns an `Arc` for cheap sharing.
pub fn get_or_compile_term_set(terms: &[String]) -> Arc<CompiledTermSet> {
    let cache_key = term_set_key(terms);

    {
        let cache = TERM_SET_CACHE.read().unwrap();
        if let Some(set) = cache.get(&cache_key) {
            debug!("Serving compiled term set from cache for key: {}", &cache_key);
            return Arc::clone(set);
        }
    } // Read lock is released here.

    debug!("Term set not found in cache. Compiling now.");
    let compiled = Arc::new(compile_term_set(terms));

    TERM_SET_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled));
    compiled
}

/// Recompiles a term list unconditionally and replaces any cached entry.
/// The force-rebuild hook for callers reacting to a configuration change.
pub fn compile_fresh_term_set(terms: &[String]) -> Arc<CompiledTermSet> {
    let cache_key = term_set_key(terms);
    debug!("Forced recompilation for key: {}", &cache_key);
    let compiled = Arc::new(compile_term_set(terms));
    TERM_SET_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled));
    compiled
}

/// Drops the cached compilation for one term list, if present.
pub fn invalidate_term_set(terms: &[String]) {
    TERM_SET_CACHE.write().unwrap().remove(&term_set_key(terms));
}

/// Empties the entire compiled term set cache.
pub fn clear_term_set_cache() {
    TERM_SET_CACHE.write().unwrap().clear();
}
