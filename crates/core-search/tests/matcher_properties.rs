//! Property-based tests for directional nearest-match search.

use core_search::{Direction, MatchRange, Pattern, find_nearest};
use proptest::prelude::*;
use regex::RegexBuilder;
use std::time::{Duration, Instant};

fn occurrences(text: &str, needle: &str) -> Vec<usize> {
    let hay = text.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    (0..=hay.len().saturating_sub(needle.len()))
        .filter(|&i| hay.len() >= needle.len() && hay[i..].starts_with(&needle))
        .collect()
}

/// Greatest end, then earliest start, over every substring the pattern matches in full.
fn nearest_by_brute_force(window: &str, source: &str) -> Option<MatchRange> {
    let whole = RegexBuilder::new(&format!("^(?:{source})$"))
        .case_insensitive(true)
        .build()
        .unwrap();
    (1..=window.len()).rev().find_map(|end| {
        (0..end)
            .find(|&start| whole.is_match(&window[start..end]))
            .map(|start| MatchRange { start, end })
    })
}

#[test]
fn backward_scan_over_long_run_is_linear() {
    let n = 50_000;
    let text = format!("x{}yy", "a".repeat(n));
    let pattern = Pattern::compile("a+", true).unwrap();
    let started = Instant::now();
    let m = find_nearest(&text, text.len(), &pattern, Direction::Backward);
    let elapsed = started.elapsed();
    assert_eq!(m, Some(MatchRange { start: 1, end: n + 1 }));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

proptest! {
    // Forward never matches the character at the caret and lands on the first occurrence after it.
    #[test]
    fn forward_matches_first_occurrence_after_caret(
        text in "[abAB_]{0,40}",
        needle in "[ab_]{1,2}",
        caret_seed in 0usize..64,
    ) {
        let caret = caret_seed % (text.len() + 1);
        let pattern = Pattern::compile(&needle, false).unwrap();
        let expected = occurrences(&text, &needle)
            .into_iter()
            .find(|&s| s > caret)
            .map(|s| MatchRange { start: s, end: s + needle.len() });
        let got = find_nearest(&text, caret, &pattern, Direction::Forward);
        prop_assert_eq!(got, expected);
        if let Some(m) = got {
            prop_assert!(m.start >= caret + 1);
            prop_assert!(m.start < m.end);
        }
    }

    // Backward never matches the character just before the caret and lands on the occurrence
    // ending closest to it.
    #[test]
    fn backward_matches_nearest_occurrence_before_caret(
        text in "[abAB_]{0,40}",
        needle in "[ab_]{1,2}",
        caret_seed in 0usize..64,
    ) {
        let caret = caret_seed % (text.len() + 1);
        let pattern = Pattern::compile(&needle, false).unwrap();
        let expected = occurrences(&text, &needle)
            .into_iter()
            .filter(|&s| caret >= 1 && s + needle.len() <= caret - 1)
            .last()
            .map(|s| MatchRange { start: s, end: s + needle.len() });
        let got = find_nearest(&text, caret, &pattern, Direction::Backward);
        prop_assert_eq!(got, expected);
        if let Some(m) = got {
            prop_assert!(m.end < caret);
            prop_assert!(m.start < m.end);
        }
    }

    // Regex backward search agrees with an exhaustive scan of the window.
    #[test]
    fn backward_regex_matches_exhaustive_scan(
        text in "[abAB_]{0,24}",
        source in prop::sample::select(vec!["a+", "[ab]+", "a+b?", "b*a", "_?a", "(a|ab)", "a+?"]),
        caret_seed in 0usize..32,
    ) {
        let caret = caret_seed % (text.len() + 1);
        let pattern = Pattern::compile(source, true).unwrap();
        let expected = if caret < 2 {
            None
        } else {
            nearest_by_brute_force(&text[..caret - 1], source)
        };
        prop_assert_eq!(find_nearest(&text, caret, &pattern, Direction::Backward), expected);
    }

    // Literal compilation of metacharacter-free text matches exactly that text.
    #[test]
    fn plain_literal_source_is_raw(raw in "[a-z0-9_ ]{1,12}") {
        let pattern = Pattern::compile(&raw, false).unwrap();
        prop_assert_eq!(pattern.source(), raw.as_str());
    }
}
