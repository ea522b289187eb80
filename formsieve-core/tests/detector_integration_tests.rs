// formsieve-core/tests/detector_integration_tests.rs
use test_log::test;

use formsieve_core::{Detector, MatchMethod, Settings};

fn settings(blacklist: &[&str], whitelist: &[&str]) -> Settings {
    Settings {
        blacklist: blacklist.iter().map(|s| s.to_string()).collect(),
        whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
        ..Settings::default()
    }
}

#[test]
fn whitelist_precedence_over_every_blacklist_hit() {
    // Without the whitelist the text is flagged solely because of "spam";
    // whitelisting that same term flips the verdict for the same text.
    let text = "discussing spam filters";
    assert!(Detector::new(&settings(&["spam"], &[])).detect(text).found);

    let result = Detector::new(&settings(&["spam"], &["spam"])).detect(text);
    assert!(!result.found);
    assert!(result.matches.is_empty());
}

#[test]
fn whitelist_phrases_suppress_unrelated_blacklist_terms() {
    let detector = Detector::new(&settings(&["spam"], &["research survey"]));
    let result = detector.detect("this research survey mentions spam");
    assert!(!result.found);
}

#[test]
fn automaton_path_scales_over_many_terms() {
    let mut blacklist: Vec<String> = (0..400).map(|i| format!("banned{i:03}")).collect();
    blacklist.push("needle".to_string());
    let settings = Settings {
        blacklist,
        use_fast_matcher: true,
        ..Settings::default()
    };
    let detector = Detector::new(&settings);

    let result = detector.detect("hay hay needle hay banned123");
    assert!(result.found);
    let mut words: Vec<&str> = result.matches.iter().map(|m| m.word.as_str()).collect();
    words.sort();
    assert_eq!(words, vec!["banned123", "needle"]);
    assert!(result
        .matches
        .iter()
        .all(|m| m.method == MatchMethod::Automaton));
}

#[test]
fn repeated_character_padding_is_still_caught() {
    let detector = Detector::new(&settings(&["bad"], &[]));
    // "baaaad" collapses to "baad", which is still one edit away, so the
    // exact matchers miss it; with fuzzy matching enabled it is caught.
    assert!(!detector.detect("a baaaad word").found);

    let fuzzy = Settings {
        fuzzy_matching: true,
        ..settings(&["bad"], &[])
    };
    let result = Detector::new(&fuzzy).detect("a baaaad word");
    assert!(result.found);
    assert_eq!(result.matches[0].method, MatchMethod::Fuzzy);
    assert_eq!(result.matches[0].matched, "baad");
}

#[test]
fn detection_is_deterministic_across_calls() {
    let detector = Detector::new(&settings(&["spam", "scam"], &[]));
    let first = detector.detect("spam or scam, who can say");
    let second = detector.detect("spam or scam, who can say");
    assert_eq!(first, second);
}

#[test]
fn duplicate_terms_do_not_break_detection() {
    let detector = Detector::new(&settings(&["spam", "spam", "SPAM"], &[]));
    let result = detector.detect("some spam");
    assert!(result.found);
    // Duplicates may each report; deduplication is the caller's call.
    let mut deduped = result.clone();
    deduped.dedupe();
    assert!(deduped.matches.len() <= result.matches.len());
    assert!(deduped.found);
}

#[test]
fn empty_blacklist_never_finds_anything() {
    let detector = Detector::new(&settings(&[], &[]));
    assert!(!detector.detect("anything whatsoever").found);
    assert!(!detector.detect("").found);
}
