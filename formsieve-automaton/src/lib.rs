// formsieve-automaton/src/lib.rs
//! Multi-pattern exact search for the formsieve content filter.
//!
//! A single automaton is built from an entire term list and scans a text in
//! one linear pass, independent of how many terms the list holds. The core
//! crate feeds it normalized blacklist terms and interprets the occurrences
//! it reports.

pub mod automaton;

pub use automaton::{AhoCorasick, Match};
