//! Replacement-template expansion.
//!
//! Templates support `$&` and `$0` (whole match), `$N` (numbered group),
//! `${name}` (named group), and `$$` (a literal dollar). Groups that did not
//! participate expand to the empty string; expansion never fails.

use onig_engine::Match;

/// Expand `template` against one completed match.
pub(crate) fn expand(template: &str, m: &Match<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        rest = &rest[dollar + 1..];
        match rest.chars().next() {
            Some('$') => {
                out.push('$');
                rest = &rest[1..];
            }
            Some('&') => {
                out.push_str(m.text());
                rest = &rest[1..];
            }
            Some(c) if c.is_ascii_digit() => {
                let digits = rest.chars().take_while(char::is_ascii_digit).count();
                let (number, tail) = rest.split_at(digits);
                // Digit runs fit comfortably in usize before any plausible
                // group count; out-of-range numbers expand empty anyway.
                let index = number.parse::<usize>().unwrap_or(usize::MAX);
                if index == 0 {
                    out.push_str(m.text());
                } else if let Some(text) = m.group_at(index) {
                    out.push_str(text);
                }
                rest = tail;
            }
            Some('{') => match rest[1..].find('}') {
                Some(close) => {
                    let name = &rest[1..1 + close];
                    if let Some(text) = m.named_group(name) {
                        out.push_str(text);
                    }
                    rest = &rest[close + 2..];
                }
                None => {
                    // Unterminated `${`: keep the text as written.
                    out.push('$');
                }
            },
            _ => out.push('$'),
        }
    }
    out.push_str(rest);
    out
}
