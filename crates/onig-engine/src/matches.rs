//! The `Match` object and the lazy match iterator.

use std::sync::Arc;

use onig_ast::CompiledPattern;

use crate::context::CaptureSpan;
use crate::search::{RawMatch, Searcher};

/// One successful match against a haystack.
///
/// Borrows the haystack and shares the compiled pattern, so group text is
/// returned as slices of the original input. Group 0 is the whole match;
/// [`group_count`](Match::group_count) excludes it. Lookups outside the group
/// range or into groups that never participated return `None` rather than
/// erroring.
#[derive(Debug, Clone)]
pub struct Match<'h> {
    compiled: Arc<CompiledPattern>,
    haystack: &'h str,
    start: usize,
    end: usize,
    slots: Vec<Option<CaptureSpan>>,
}

impl<'h> Match<'h> {
    pub(crate) fn new(compiled: Arc<CompiledPattern>, haystack: &'h str, raw: RawMatch) -> Self {
        Match { compiled, haystack, start: raw.start, end: raw.end, slots: raw.slots }
    }

    /// Start offset of the whole match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End offset of the whole match.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the whole match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the match is zero-width.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The matched text.
    pub fn text(&self) -> &'h str {
        &self.haystack[self.start..self.end]
    }

    /// Number of capturing groups in the pattern, excluding group 0.
    pub fn group_count(&self) -> usize {
        self.compiled.group_count()
    }

    /// Offsets of group `index`; group 0 is the whole match.
    pub fn group_span(&self, index: usize) -> Option<(usize, usize)> {
        self.slots.get(index).copied().flatten().map(|span| (span.start, span.end))
    }

    /// Text of group `index`, `None` when it did not participate or the
    /// index is out of range.
    pub fn group_at(&self, index: usize) -> Option<&'h str> {
        let (start, end) = self.group_span(index)?;
        Some(&self.haystack[start..end])
    }

    /// Start offset of group `index`.
    pub fn group_start(&self, index: usize) -> Option<usize> {
        self.group_span(index).map(|(start, _)| start)
    }

    /// End offset of group `index`.
    pub fn group_end(&self, index: usize) -> Option<usize> {
        self.group_span(index).map(|(_, end)| end)
    }

    /// Text of the named group, `None` for unknown or non-participating
    /// names.
    pub fn named_group(&self, name: &str) -> Option<&'h str> {
        self.group_at(self.compiled.group_index(name)? as usize)
    }

    /// Start offset of the named group.
    pub fn named_group_start(&self, name: &str) -> Option<usize> {
        self.group_start(self.compiled.group_index(name)? as usize)
    }

    /// End offset of the named group.
    pub fn named_group_end(&self, name: &str) -> Option<usize> {
        self.group_end(self.compiled.group_index(name)? as usize)
    }

    /// All group names declared in the pattern, in group-number order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.compiled.group_names()
    }

    /// Number of the rightmost group that captured, `None` when no numbered
    /// group participated.
    pub fn last_captured_group(&self) -> Option<u32> {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, slot)| slot.is_some())
            .map(|(index, _)| index as u32)
    }
}

/// Lazy iterator over non-overlapping matches, earliest first.
///
/// A zero-width match advances the scan by one character so the iteration
/// always terminates.
pub struct Matches<'p, 'h> {
    compiled: &'p Arc<CompiledPattern>,
    searcher: Searcher<'p, 'h>,
    haystack: &'h str,
    at: usize,
}

impl<'p, 'h> Matches<'p, 'h> {
    pub(crate) fn new(compiled: &'p Arc<CompiledPattern>, haystack: &'h str, start: usize) -> Self {
        Matches { compiled, searcher: Searcher::new(compiled, haystack), haystack, at: start }
    }
}

impl<'h> Iterator for Matches<'_, 'h> {
    type Item = Match<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.searcher.find_from(self.at)?;
        self.at = if raw.end == raw.start {
            let mut next = raw.end + 1;
            while next < self.haystack.len() && !self.haystack.is_char_boundary(next) {
                next += 1;
            }
            next
        } else {
            raw.end
        };
        Some(Match::new(Arc::clone(self.compiled), self.haystack, raw))
    }
}
