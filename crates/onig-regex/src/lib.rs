//! An Oniguruma-flavoured backtracking regular expression engine.
//!
//! [`Regex`] compiles a pattern once and then matches it against any number
//! of haystacks. Beyond the common subset (anchors, classes, greedy
//! quantifiers, plain groups), the engine implements possessive quantifiers,
//! atomic groups, lookahead and variable-length lookbehind, numbered and
//! named backreferences, subroutine calls by number or name, and
//! whole-pattern recursion.
//!
//! # Usage
//!
//! ## Searching and captures
//!
//! ```
//! use onig_regex::Regex;
//!
//! let re = Regex::new(r"(?<username>\w+)@(?<domain>\w+\.\w+)")?;
//! let m = re.first_match("mail john@example.com today").unwrap();
//! assert_eq!(m.text(), "john@example.com");
//! assert_eq!(m.named_group("username"), Some("john"));
//! assert_eq!(m.named_group("domain"), Some("example.com"));
//! # Ok::<(), onig_regex::RegexError>(())
//! ```
//!
//! ## Iteration, splitting, replacement
//!
//! ```
//! use onig_regex::Regex;
//!
//! let word = Regex::new(r"\w+")?;
//! let words: Vec<&str> = word.all_string_matches("Hello world 123").collect();
//! assert_eq!(words, vec!["Hello", "world", "123"]);
//!
//! let comma = Regex::new(",")?;
//! let fields: Vec<&str> = comma.split("a,,b").collect();
//! assert_eq!(fields, vec!["a", "", "b"]);
//!
//! let date = Regex::new(r"(\d+)-(\d+)-(\d+)")?;
//! assert_eq!(date.replace_all("2023-12-25", "$3/$2/$1"), "25/12/2023");
//! # Ok::<(), onig_regex::RegexError>(())
//! ```
//!
//! ## Advanced constructs
//!
//! ```
//! use onig_regex::Regex;
//!
//! // Possessive quantifiers never give characters back.
//! let possessive = Regex::new(r"\d++[a-z]")?;
//! assert!(possessive.has_match("123a"));
//!
//! // Whole-pattern recursion matches balanced parentheses.
//! let balanced = Regex::new(r"\((?:[^()]|(?R))*\)")?;
//! assert_eq!(balanced.string_match("(a(b(c)d)e)"), Some("(a(b(c)d)e)"));
//! # Ok::<(), onig_regex::RegexError>(())
//! ```
//!
//! # Sharing
//!
//! The compiled pattern is immutable; [`Regex`] is cheap to clone and safe
//! to share across threads. Every match call builds its own capture context,
//! so concurrent matches never interfere.

use std::sync::Arc;

use tracing::debug;

use onig_ast::CompiledPattern;

mod template;

pub use onig_ast::RegexOptions;
pub use onig_engine::{Match, Matches};
pub use onig_error::{ErrorKind, RegexError, Result};

/// A compiled regular expression.
#[derive(Debug, Clone)]
pub struct Regex {
    compiled: Arc<CompiledPattern>,
}

impl Regex {
    /// Compile `pattern` with default options.
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_options(pattern, RegexOptions::default())
    }

    /// Compile `pattern` with explicit options.
    pub fn with_options(pattern: &str, options: RegexOptions) -> Result<Self> {
        let compiled = Arc::new(onig_parser::parse(pattern, options)?);
        Ok(Regex { compiled })
    }

    /// The original pattern text.
    pub fn pattern(&self) -> &str {
        self.compiled.pattern()
    }

    /// The options the pattern was compiled with.
    pub fn options(&self) -> RegexOptions {
        self.compiled.options()
    }

    /// Whether the pattern stays within the subset a host-native regex
    /// facility could evaluate. Advisory; this engine always matches itself.
    pub fn may_delegate(&self) -> bool {
        self.compiled.may_delegate()
    }

    /// Number of capturing groups, excluding group 0.
    pub fn group_count(&self) -> usize {
        self.compiled.group_count()
    }

    /// Resolve a group name to its number.
    pub fn group_index(&self, name: &str) -> Option<u32> {
        self.compiled.group_index(name)
    }

    /// Group names declared in the pattern, in group-number order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.compiled.group_names()
    }

    /// Whether `haystack` contains a match.
    pub fn has_match(&self, haystack: &str) -> bool {
        self.first_match(haystack).is_some()
    }

    /// First match in `haystack`.
    pub fn first_match<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        self.first_match_from(haystack, 0)
    }

    /// First match whose start is at or after `start` (a byte offset).
    pub fn first_match_from<'h>(&self, haystack: &'h str, start: usize) -> Option<Match<'h>> {
        onig_engine::find(&self.compiled, haystack, start)
    }

    /// Lazy iterator over all non-overlapping matches. Each call starts a
    /// fresh iteration.
    pub fn all_matches<'r, 'h>(&'r self, haystack: &'h str) -> Matches<'r, 'h> {
        self.all_matches_from(haystack, 0)
    }

    /// Lazy iterator over all non-overlapping matches from `start`.
    pub fn all_matches_from<'r, 'h>(&'r self, haystack: &'h str, start: usize) -> Matches<'r, 'h> {
        onig_engine::find_iter(&self.compiled, haystack, start)
    }

    /// Text of the first match.
    pub fn string_match<'h>(&self, haystack: &'h str) -> Option<&'h str> {
        self.first_match(haystack).map(|m| m.text())
    }

    /// Texts of all non-overlapping matches.
    pub fn all_string_matches<'r, 'h>(&'r self, haystack: &'h str) -> StringMatches<'r, 'h> {
        StringMatches { matches: self.all_matches(haystack) }
    }

    /// Texts of all non-overlapping matches from `start`.
    pub fn all_string_matches_from<'r, 'h>(
        &'r self,
        haystack: &'h str,
        start: usize,
    ) -> StringMatches<'r, 'h> {
        StringMatches { matches: self.all_matches_from(haystack, start) }
    }

    /// Substrings of `haystack` separated by matches. With no match the
    /// whole input is the single segment; adjacent matches yield empty
    /// segments.
    pub fn split<'r, 'h>(&'r self, haystack: &'h str) -> Split<'r, 'h> {
        Split { matches: self.all_matches(haystack), haystack, next_start: 0, done: false }
    }

    /// Replace every match with the expansion of `template`.
    ///
    /// Templates support `$&`/`$0` (whole match), `$N`, `${name}`, and `$$`.
    /// Replacements are applied right to left so earlier offsets stay valid.
    pub fn replace_all(&self, haystack: &str, template: &str) -> String {
        let matches: Vec<Match<'_>> = self.all_matches(haystack).collect();
        debug!(pattern = self.pattern(), count = matches.len(), "replacing matches");
        let mut result = haystack.to_string();
        for m in matches.iter().rev() {
            result.replace_range(m.start()..m.end(), &template::expand(template, m));
        }
        result
    }

    /// Replace the first match with the expansion of `template`.
    pub fn replace_first(&self, haystack: &str, template: &str) -> String {
        let mut result = haystack.to_string();
        if let Some(m) = self.first_match(haystack) {
            result.replace_range(m.start()..m.end(), &template::expand(template, &m));
        }
        result
    }
}

impl std::str::FromStr for Regex {
    type Err = RegexError;

    fn from_str(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
    }
}

/// Iterator over the text of each match, see [`Regex::all_string_matches`].
pub struct StringMatches<'r, 'h> {
    matches: Matches<'r, 'h>,
}

impl<'h> Iterator for StringMatches<'_, 'h> {
    type Item = &'h str;

    fn next(&mut self) -> Option<Self::Item> {
        self.matches.next().map(|m| m.text())
    }
}

/// Iterator over the segments between matches, see [`Regex::split`].
pub struct Split<'r, 'h> {
    matches: Matches<'r, 'h>,
    haystack: &'h str,
    next_start: usize,
    done: bool,
}

impl<'h> Iterator for Split<'_, 'h> {
    type Item = &'h str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.matches.next() {
            Some(m) => {
                let segment = &self.haystack[self.next_start..m.start()];
                self.next_start = m.end();
                Some(segment)
            }
            None => {
                self.done = true;
                Some(&self.haystack[self.next_start..])
            }
        }
    }
}
