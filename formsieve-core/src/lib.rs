// formsieve-core/src/lib.rs
//! # Formsieve Core Library
//!
//! `formsieve-core` provides the fundamental, host-independent logic for
//! filtering free-text form submissions: a deterministic text normalizer, a
//! multi-strategy matching engine (Aho-Corasick automaton, per-pattern
//! regular expressions, and edit-distance fuzzy fallback), and a sanitizer
//! that erases, masks, block-signals, or flags detected content.
//!
//! The library is designed to be pure and stateless, focusing solely on the
//! transformation of input text based on a caller-supplied `Settings` value,
//! without concerns for persistence, scheduling, or the hosting
//! application's request lifecycle.
//!
//! ## Modules
//!
//! * `config`: Defines `Settings` and the term-list encoding used by callers.
//! * `normalizer`: Deterministic canonicalization applied before matching.
//! * `patterns`: Compiles term lists into matchable forms, with a
//!   content-addressed cache.
//! * `matchers`: The exact (regex, automaton) and fuzzy matching strategies.
//! * `detector`: Whitelist short-circuiting, matcher selection, and the
//!   fuzzy fallback.
//! * `sanitizer`: Applies the configured action and batches across fields.
//! * `match_record`: Data structures for detailed match reporting.
//!
//! ## Usage Example
//!
//! ```rust
//! use formsieve_core::{SanitizeAction, Sanitizer, Settings};
//!
//! fn main() {
//!     // 1. Assemble a matching configuration.
//!     let settings = Settings {
//!         blacklist: vec!["spam".to_string()],
//!         action: SanitizeAction::Erase,
//!         ..Settings::default()
//!     };
//!
//!     // 2. Sanitize a submitted value.
//!     let sanitizer = Sanitizer::new(settings);
//!     let result = sanitizer.sanitize("Buy this spam now");
//!
//!     assert_eq!(result.text, "Buy this now");
//!     assert!(result.modified);
//!     assert_eq!(result.matches[0].word, "spam");
//! }
//! ```
//!
//! ## Error Handling
//!
//! Detection and sanitization are total over any Unicode input and any
//! well-formed `Settings`; they return plain values. Settings loading is
//! the only fallible surface and uses `anyhow::Error` at the file boundary
//! with `FormsieveError` underneath.
//!
//! ## Design Principles
//!
//! * **Stateless:** No process-wide mutable configuration; every call takes
//!   an explicit `Settings` value. The only shared state is the read-only
//!   compiled pattern cache.
//! * **Deterministic:** Normalization is a pure function and a compiled
//!   term set classifies identical texts identically on every call.
//! * **Tolerant:** Term content never fails compilation; metacharacters are
//!   escaped and degenerate terms are dropped.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod detector;
pub mod errors;
pub mod match_record;
pub mod matchers;
pub mod normalizer;
pub mod patterns;
pub mod sanitizer;

/// Re-exports the public configuration types and the term-list parser.
pub use config::{
    load_term_list_file, parse_term_list, SanitizeAction, Settings, MAX_TERM_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::FormsieveError;

/// Re-exports the detection entry point.
pub use detector::Detector;

/// Re-exports the sanitization coordinator and its field types.
pub use sanitizer::{FieldResult, FieldValue, Sanitizer};

/// Re-exports types for detailed match reporting.
pub use match_record::{
    redact_sensitive, DetectionResult, MatchMethod, MatchRecord, PositionedMatch, SanitizeResult,
};

// Re-export key types from the patterns::compiler module for advanced
// usage, such as warming or invalidating the cache around configuration
// changes.
pub use patterns::compiler::{
    clear_term_set_cache, compile_fresh_term_set, compile_term_set, get_or_compile_term_set,
    invalidate_term_set, term_set_key, CompiledPattern, CompiledTermSet,
};
