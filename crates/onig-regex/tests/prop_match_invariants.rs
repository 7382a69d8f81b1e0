//! Property tests for the quantified matching invariants.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use onig_regex::Regex;
use proptest::prelude::*;

proptest! {
    /// Every reported match slices back to its own text.
    #[test]
    fn match_text_equals_its_slice(haystack in "[a-z0-9 .,]{0,60}") {
        let re = Regex::new(r"\w+").unwrap();
        for m in re.all_matches(&haystack) {
            prop_assert!(m.start() <= m.end());
            prop_assert_eq!(m.text(), &haystack[m.start()..m.end()]);
        }
    }

    /// Captures sit inside the whole match and slice back to their text.
    #[test]
    fn captures_are_contained_in_the_match(haystack in "[a-z0-9@. ]{0,60}") {
        let re = Regex::new(r"(\w+)@(\w+)").unwrap();
        for m in re.all_matches(&haystack) {
            for index in 1..=m.group_count() {
                if let Some((start, end)) = m.group_span(index) {
                    prop_assert!(m.start() <= start && start <= end && end <= m.end());
                    prop_assert_eq!(m.group_at(index).unwrap(), &haystack[start..end]);
                }
            }
        }
    }

    /// Matches come back in strictly increasing, non-overlapping order, and
    /// a zero-width match is always followed by a strictly later start.
    #[test]
    fn matches_are_ordered_and_disjoint(haystack in "[ab ]{0,60}") {
        let re = Regex::new("a*").unwrap();
        let mut previous: Option<(usize, usize)> = None;
        for m in re.all_matches(&haystack) {
            if let Some((prev_start, prev_end)) = previous {
                prop_assert!(m.start() >= prev_end);
                prop_assert!(m.start() > prev_start);
                if prev_start == prev_end {
                    prop_assert!(m.start() > prev_end);
                }
            }
            previous = Some((m.start(), m.end()));
        }
    }

    /// Splitting on a literal separator and joining with it reconstructs
    /// the input.
    #[test]
    fn split_round_trips_with_literal_separator(haystack in "[a-c,]{0,60}") {
        let re = Regex::new(",").unwrap();
        let fields: Vec<&str> = re.split(&haystack).collect();
        prop_assert_eq!(fields.join(","), haystack);
    }

    /// Replacing every match leaves nothing for a second pass when the
    /// template cannot itself match.
    #[test]
    fn replace_all_is_idempotent_for_nonmatching_templates(haystack in "[a-z0-9]{0,60}") {
        let re = Regex::new(r"\d+").unwrap();
        let once = re.replace_all(&haystack, "#");
        prop_assert_eq!(re.replace_all(&once, "#"), once.clone());
    }

    /// Compilation of arbitrary short inputs either succeeds or reports a
    /// structured error with the original pattern attached; it never panics.
    #[test]
    fn compile_is_total(pattern in ".{0,20}") {
        match Regex::new(&pattern) {
            Ok(re) => { let _ = re.has_match("sample input"); }
            Err(err) => prop_assert_eq!(err.pattern, pattern),
        }
    }
}
