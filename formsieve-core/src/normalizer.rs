// formsieve-core/src/normalizer.rs
//! Deterministic text canonicalization applied before any matching.
//!
//! Every matcher in this crate operates on the output of [`normalize`], and
//! configured terms are normalized with the same options before compilation,
//! so obfuscations that survive canonicalization are the only ones the
//! matchers ever need to handle. Normalization is a pure function of its
//! input: no locale or process state influences the result, and applying it
//! twice yields the same string as applying it once.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;

/// Leetspeak sequences and the letters they stand in for. Ordered by
/// descending key length so multi-character sequences are rewritten before
/// the shorter keys they contain.
const LEETSPEAK_MAP: &[(&str, char)] = &[
    ("\\/\\/", 'w'),
    ("|_|", 'u'),
    ("\\/", 'v'),
    ("@", 'a'),
    ("4", 'a'),
    ("3", 'e'),
    ("1", 'i'),
    ("!", 'i'),
    ("0", 'o'),
    ("5", 's'),
    ("$", 's'),
    ("7", 't'),
    ("+", 't'),
];

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(https?://|www\.)\S+").expect("URL pattern is valid"));

/// Toggles for the individual normalization stages. All stages are on by
/// default; matchers in this crate always use the defaults so that term
/// compilation and text scanning agree on the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub lowercase: bool,
    pub leetspeak: bool,
    pub strip_punctuation: bool,
    pub collapse_repeated: bool,
    pub collapse_whitespace: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            leetspeak: true,
            strip_punctuation: true,
            collapse_repeated: true,
            collapse_whitespace: true,
        }
    }
}

/// Canonicalizes `text` for matching: Unicode-aware lowercasing, leetspeak
/// un-substitution, punctuation stripping, repeated-letter collapse, and
/// whitespace collapse, in that order, each gated by `options`. The result
/// is always trimmed.
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    let mut text = if options.lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    if options.leetspeak {
        text = convert_leetspeak(&text);
    }

    if options.strip_punctuation {
        text = strip_punctuation(&text);
    }

    if options.collapse_repeated {
        text = collapse_repeated_chars(&text);
    }

    if options.collapse_whitespace {
        text = collapse_whitespace(&text);
    }

    text.trim().to_string()
}

fn convert_leetspeak(text: &str) -> String {
    let mut converted = text.to_string();
    for &(sequence, letter) in LEETSPEAK_MAP {
        if converted.contains(sequence) {
            converted = converted.replace(sequence, &letter.to_string());
        }
    }
    converted
}

/// Replaces every code point that is not a letter, a digit, or whitespace
/// with a single space. Substituting rather than deleting keeps tokens that
/// were separated only by punctuation from merging into one.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Collapses any letter repeated three or more times in a row to exactly two
/// occurrences. Works on any script with a letter class; digits and other
/// code points are left alone. A manual pass, as the `regex` crate has no
/// backreferences.
fn collapse_repeated_chars(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    let mut run = 0usize;
    for c in text.chars() {
        if previous == Some(c) && c.is_alphabetic() {
            run += 1;
            if run >= 3 {
                continue;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Replaces every run of whitespace with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                collapsed.push(' ');
                last_was_space = true;
            }
        } else {
            collapsed.push(c);
            last_was_space = false;
        }
    }
    collapsed
}

/// Normalizes every entry of a word list, preserving order and length.
/// Entries that normalize to nothing stay in place as empty strings; it is
/// the caller's job to drop them.
pub fn normalize_list(words: &[String], options: &NormalizeOptions) -> Vec<String> {
    words.iter().map(|word| normalize(word, options)).collect()
}

/// Splits `text` on whitespace into its word tokens.
pub fn extract_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Code-point count of `text`, not its byte length.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// True when `text` contains at least one URL.
pub fn contains_urls(text: &str) -> bool {
    URL_REGEX.is_match(text)
}

/// Number of URLs in `text`.
pub fn count_urls(text: &str) -> usize {
    URL_REGEX.find_iter(text).count()
}

/// Removes every URL from `text`.
pub fn strip_urls(text: &str) -> String {
    URL_REGEX.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_normalize(text: &str) -> String {
        normalize(text, &NormalizeOptions::default())
    }

    #[test]
    fn leetspeak_variants_normalize_to_plain_words() {
        assert_eq!(default_normalize("sp@m"), default_normalize("spam"));
        assert_eq!(default_normalize("v14gr4"), "viagra");
        assert_eq!(default_normalize("|_|ber"), "uber");
        assert_eq!(default_normalize("\\/\\/in"), "win");
    }

    #[test]
    fn repeated_letters_collapse_to_two() {
        assert_eq!(default_normalize("baaaaad"), "baad");
        assert_eq!(default_normalize("heeello"), "heello");
        assert_eq!(default_normalize("good"), "good");
    }

    #[test]
    fn punctuation_becomes_a_separator_not_a_join() {
        assert_eq!(default_normalize("rock&roll"), "rock roll");
        assert_eq!(default_normalize("a.b,c"), "a b c");
    }

    #[test]
    fn whitespace_runs_collapse_and_edges_trim() {
        assert_eq!(default_normalize("  hello \t\n world  "), "hello world");
    }

    #[test]
    fn normalization_is_idempotent() {
        for text in [
            "Buy CHEAP v14gr4 NOW!!!",
            "  sp@@@m   and eggs ",
            "Ünïcode Grüße straße",
            "plain text",
            "",
        ] {
            let once = default_normalize(text);
            assert_eq!(default_normalize(&once), once, "not idempotent for {:?}", text);
        }
    }

    #[test]
    fn stages_can_be_toggled_off() {
        let options = NormalizeOptions {
            leetspeak: false,
            ..NormalizeOptions::default()
        };
        assert_eq!(normalize("sp4m", &options), "sp4m");

        let options = NormalizeOptions {
            lowercase: false,
            ..NormalizeOptions::default()
        };
        assert_eq!(normalize("HELLO", &options), "HELLO");
    }

    #[test]
    fn list_normalization_maps_every_entry() {
        let words = vec!["SP@M".to_string(), " ok ".to_string(), "...".to_string()];
        let normalized = normalize_list(&words, &NormalizeOptions::default());
        assert_eq!(normalized, vec!["spam", "ok", ""]);
    }

    #[test]
    fn word_extraction_and_char_count_are_unicode_aware() {
        assert_eq!(extract_words("ein zwei  drei"), vec!["ein", "zwei", "drei"]);
        assert_eq!(char_count("grüße"), 5);
        assert_eq!(char_count(""), 0);
    }

    #[test]
    fn url_helpers_detect_count_and_strip() {
        let text = "see https://example.com and www.example.org today";
        assert!(contains_urls(text));
        assert_eq!(count_urls(text), 2);
        assert!(!contains_urls("no links here"));
        assert_eq!(strip_urls("go to https://example.com now"), "go to  now");
    }

    #[test]
    fn collapse_whitespace_is_exposed_for_cleanup_passes() {
        assert_eq!(collapse_whitespace("a  b\t c"), "a b c");
    }
}
