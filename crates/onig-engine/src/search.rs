//! Top-level scan loop driving the executor across the haystack.

use memchr::memchr;
use tracing::trace;

use onig_ast::{AstKind, CompiledPattern, NodeId};

use crate::context::{CaptureSpan, MatchContext};
use crate::exec::Executor;

/// Offsets and capture snapshot of one successful match.
#[derive(Debug, Clone)]
pub(crate) struct RawMatch {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) slots: Vec<Option<CaptureSpan>>,
}

/// Scans a haystack for matches of one compiled pattern.
pub(crate) struct Searcher<'p, 'h> {
    compiled: &'p CompiledPattern,
    haystack: &'h str,
    exec: Executor<'p, 'h>,
    /// First byte of a mandatory leading literal, when the pattern has one.
    prefix: Option<u8>,
}

/// The first byte every match must start with, if the pattern opens with a
/// case-sensitive literal. Lets the scan loop jump with `memchr` instead of
/// attempting the root at every position.
fn literal_prefix_byte(compiled: &CompiledPattern) -> Option<u8> {
    let mut id = compiled.root();
    loop {
        match compiled.ast().node(id) {
            AstKind::Literal { text, ignore_case: false } => return text.bytes().next(),
            AstKind::Sequence { children } => id = *children.first()?,
            AstKind::Capture { child, .. } | AstKind::Group { child } | AstKind::Atomic { child } => {
                id = *child;
            }
            AstKind::Repeat { child, min, .. } if *min >= 1 => id = *child,
            _ => return None,
        }
    }
}

fn next_boundary(haystack: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < haystack.len() && !haystack.is_char_boundary(next) {
        next += 1;
    }
    next
}

impl<'p, 'h> Searcher<'p, 'h> {
    pub(crate) fn new(compiled: &'p CompiledPattern, haystack: &'h str) -> Self {
        Searcher {
            compiled,
            haystack,
            exec: Executor::new(compiled, haystack),
            prefix: literal_prefix_byte(compiled),
        }
    }

    /// First match whose start is at or after `start`.
    pub(crate) fn find_from(&self, start: usize) -> Option<RawMatch> {
        let len = self.haystack.len();
        if start > len {
            return None;
        }
        trace!(start, pattern = self.compiled.pattern(), "searching");
        let mut at = start;
        while at < len && !self.haystack.is_char_boundary(at) {
            at += 1;
        }
        loop {
            if let Some(byte) = self.prefix {
                match memchr(byte, &self.haystack.as_bytes()[at..]) {
                    Some(offset) => at += offset,
                    None => {
                        trace!("no match");
                        return None;
                    }
                }
            }
            if let Some(found) = self.try_at(at) {
                trace!(found.start, found.end, "match found");
                return Some(found);
            }
            if at >= len {
                trace!("no match");
                return None;
            }
            at = next_boundary(self.haystack, at);
        }
    }

    /// Run the root at exactly `start`, honoring the `find_longest` and
    /// `find_not_empty` options.
    fn try_at(&self, start: usize) -> Option<RawMatch> {
        let options = self.compiled.options();
        let root = self.compiled.root();
        let mut ctx = MatchContext::new(self.compiled.group_count());
        if options.find_longest {
            // Enumerate every candidate at this position, keep the longest.
            let mut best: Option<RawMatch> = None;
            self.exec.eval(root, start, &mut ctx, &mut |ctx: &mut MatchContext, end: usize| {
                let skip = options.find_not_empty && end == start;
                if !skip && best.as_ref().is_none_or(|b| end > b.end) {
                    best = Some(RawMatch {
                        start,
                        end,
                        slots: ctx.snapshot(CaptureSpan { start, end }),
                    });
                }
                false
            });
            best
        } else {
            let mut found: Option<RawMatch> = None;
            self.exec.eval(root, start, &mut ctx, &mut |ctx: &mut MatchContext, end: usize| {
                if options.find_not_empty && end == start {
                    return false;
                }
                found = Some(RawMatch {
                    start,
                    end,
                    slots: ctx.snapshot(CaptureSpan { start, end }),
                });
                true
            });
            found
        }
    }
}
