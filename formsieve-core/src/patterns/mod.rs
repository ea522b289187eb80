//! Term compilation for the matching engines.
//!
//! This module turns raw blacklist/whitelist term lists into the compiled
//! representations the matchers consume: an escaped, boundary-anchored
//! regex per term plus a shared Aho-Corasick automaton over the normalized
//! forms. Compiled sets are cached process-wide, keyed by a content hash of
//! the term list, so repeated requests against an unchanged configuration
//! skip the build.

pub mod compiler;
