//! Backtracking match executor for the onig regex engine.
//!
//! Drives a [`CompiledPattern`] against a haystack and produces [`Match`]
//! values. The crate is organized around three pieces:
//!
//! - [`MatchContext`]: mutable per-match state — capture slots with a
//!   journaled undo mechanism, the append-only capture history, and the
//!   subroutine-call depth counter.
//! - The executor: a continuation-passing evaluator producing candidate
//!   results one at a time, so possessive quantifiers and atomic groups can
//!   cut off alternatives without ever materializing them.
//! - The searcher: the top-level scan loop behind [`find`] and
//!   [`find_iter`], including the `memchr` jump on a mandatory literal
//!   prefix and the `find_longest` / `find_not_empty` search modes.
//!
//! A compiled pattern is immutable and can be shared across threads; every
//! match invocation builds its own [`MatchContext`], so concurrent matches
//! of one pattern never interfere.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use onig_ast::RegexOptions;
//! use onig_parser::parse;
//!
//! let compiled = Arc::new(parse(r"(?<word>\w+)", RegexOptions::default())?);
//! let m = onig_engine::find(&compiled, "hello world", 0).unwrap();
//! assert_eq!(m.text(), "hello");
//! assert_eq!(m.named_group("word"), Some("hello"));
//! # Ok::<(), onig_error::RegexError>(())
//! ```

#![deny(unsafe_code)]

use std::sync::Arc;

use onig_ast::CompiledPattern;

mod context;
mod exec;
mod matches;
mod search;

pub use context::{CaptureSpan, MatchContext};
pub use matches::{Match, Matches};
use search::Searcher;

/// First match at or after `start`, if any.
pub fn find<'h>(
    compiled: &Arc<CompiledPattern>,
    haystack: &'h str,
    start: usize,
) -> Option<Match<'h>> {
    let searcher = Searcher::new(compiled, haystack);
    let raw = searcher.find_from(start)?;
    Some(Match::new(Arc::clone(compiled), haystack, raw))
}

/// Lazy iterator over all non-overlapping matches from `start`.
pub fn find_iter<'p, 'h>(
    compiled: &'p Arc<CompiledPattern>,
    haystack: &'h str,
    start: usize,
) -> Matches<'p, 'h> {
    Matches::new(compiled, haystack, start)
}
