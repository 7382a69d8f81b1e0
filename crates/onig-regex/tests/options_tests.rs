//! Option flags: bit encoding and matching behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use onig_regex::{Regex, RegexOptions};
use pretty_assertions::assert_eq;

fn with(options: RegexOptions, pattern: &str) -> Regex {
    Regex::with_options(pattern, options).unwrap()
}

#[test]
fn option_bits_round_trip() {
    let options = RegexOptions {
        ignore_case: true,
        multiline: false,
        single_line: true,
        extended: false,
        find_longest: true,
        find_not_empty: false,
    };
    assert_eq!(options.bits(), 1 | 4 | 16);
    assert_eq!(RegexOptions::from_bits(options.bits()), options);
}

#[test]
fn multiline_anchors() {
    let re = with(RegexOptions { multiline: true, ..Default::default() }, "^\\w+$");
    let lines: Vec<&str> = re.all_string_matches("one\ntwo\nthree").collect();
    assert_eq!(lines, vec!["one", "two", "three"]);

    // Without the flag the anchors bind to the whole input.
    let re = Regex::new("^\\w+$").unwrap();
    assert!(!re.has_match("one\ntwo"));
    assert!(re.has_match("one"));
}

#[test]
fn single_line_lets_dot_cross_lines() {
    let re = with(RegexOptions { single_line: true, ..Default::default() }, "a.+b");
    assert!(re.has_match("a\n\nb"));
    assert!(!Regex::new("a.+b").unwrap().has_match("a\n\nb"));
}

#[test]
fn find_longest_prefers_the_longest_candidate() {
    let re = with(RegexOptions { find_longest: true, ..Default::default() }, "go|gopher");
    assert_eq!(re.string_match("gopher"), Some("gopher"));
    // Earliest scan position still wins over a longer match further right.
    let re = with(RegexOptions { find_longest: true, ..Default::default() }, "a+");
    let m = re.first_match("aa aaaa").unwrap();
    assert_eq!((m.start(), m.end()), (0, 2));
}

#[test]
fn find_not_empty_skips_zero_width_matches() {
    let re = with(RegexOptions { find_not_empty: true, ..Default::default() }, "a*");
    let m = re.first_match("bba").unwrap();
    assert_eq!((m.start(), m.end()), (2, 3));
    assert!(!re.has_match("bbb"));
}

#[test]
fn extended_flag_is_recognized_but_inert() {
    let re = with(RegexOptions { extended: true, ..Default::default() }, "a b");
    assert!(re.has_match("a b"));
    assert!(!re.has_match("ab"));
    assert!(re.options().extended);
}

#[test]
fn ignore_case_does_not_fold_classes() {
    let re = with(RegexOptions { ignore_case: true, ..Default::default() }, "[a-z]+");
    assert_eq!(re.string_match("ABC def"), Some("def"));
}

#[test]
fn options_survive_compilation() {
    let options = RegexOptions::from_bits(1 | 2);
    let re = Regex::with_options("x", options).unwrap();
    assert_eq!(re.options(), options);
    assert_eq!(re.options().bits(), 3);
}

#[test]
fn delegation_bit_is_exposed() {
    assert!(Regex::new("^ab(c|d)$").unwrap().may_delegate());
    assert!(!Regex::new("ab(?=c)").unwrap().may_delegate());
    assert!(!Regex::new("a*+").unwrap().may_delegate());
}
