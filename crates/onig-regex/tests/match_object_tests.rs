//! The match-object surface: group lookups, offsets, names.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use onig_regex::Regex;
use pretty_assertions::assert_eq;

#[test]
fn group_zero_is_the_whole_match() {
    let re = Regex::new(r"(\d)(\d)").unwrap();
    let m = re.first_match("x42").unwrap();
    assert_eq!(m.group_at(0), Some("42"));
    assert_eq!(m.group_span(0), Some((1, 3)));
    assert_eq!(m.group_count(), 2);
}

#[test]
fn out_of_range_lookups_are_none() {
    let re = Regex::new(r"(\d)").unwrap();
    let m = re.first_match("7").unwrap();
    assert_eq!(m.group_at(2), None);
    assert_eq!(m.group_at(99), None);
    assert_eq!(m.group_start(99), None);
    assert_eq!(m.named_group("nope"), None);
    assert_eq!(m.named_group_start("nope"), None);
}

#[test]
fn non_participating_group_is_none_with_no_offsets() {
    let re = Regex::new("(a)|(b)").unwrap();
    let m = re.first_match("b").unwrap();
    assert_eq!(m.group_at(1), None);
    assert_eq!(m.group_start(1), None);
    assert_eq!(m.group_end(1), None);
    assert_eq!(m.group_at(2), Some("b"));
}

#[test]
fn group_offsets_match_their_text() {
    let re = Regex::new(r"(?<a>\w+) (?<b>\w+)").unwrap();
    let haystack = "alpha beta";
    let m = re.first_match(haystack).unwrap();
    assert_eq!(m.group_start(1), Some(0));
    assert_eq!(m.group_end(1), Some(5));
    assert_eq!(m.named_group_start("b"), Some(6));
    assert_eq!(m.named_group_end("b"), Some(10));
    assert_eq!(&haystack[m.group_start(2).unwrap()..m.group_end(2).unwrap()], "beta");
}

#[test]
fn named_and_numbered_lookups_agree() {
    let re = Regex::new(r"(?<year>\d{4})-(?<month>\d{2})").unwrap();
    let m = re.first_match("2023-12").unwrap();
    for name in ["year", "month"] {
        let number = re.group_index(name).unwrap() as usize;
        assert_eq!(m.named_group(name), m.group_at(number));
    }
}

#[test]
fn group_names_iterate_in_declaration_order() {
    let re = Regex::new(r"(?<first>a)(b)(?<second>c)").unwrap();
    let names: Vec<&str> = re.group_names().collect();
    assert_eq!(names, vec!["first", "second"]);
    let m = re.first_match("abc").unwrap();
    let names: Vec<&str> = m.group_names().collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn last_captured_group_is_the_rightmost() {
    let re = Regex::new("(a)(b)?").unwrap();
    let m = re.first_match("ab").unwrap();
    assert_eq!(m.last_captured_group(), Some(2));
    let m = re.first_match("a").unwrap();
    assert_eq!(m.last_captured_group(), Some(1));

    let re = Regex::new("x").unwrap();
    let m = re.first_match("x").unwrap();
    assert_eq!(m.last_captured_group(), None);
}

#[test]
fn empty_match_surface() {
    let re = Regex::new("a*").unwrap();
    let m = re.first_match("bbb").unwrap();
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
    assert_eq!(m.text(), "");
}
