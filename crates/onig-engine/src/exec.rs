//! Continuation-passing evaluation of the pattern AST.
//!
//! `eval` hands each candidate end position to a continuation and stops as
//! soon as one is accepted, so candidates materialize one at a time instead
//! of being collected eagerly. A continuation returning `false` asks the node
//! to produce its next candidate; possessive quantifiers and atomic groups
//! simply never produce a second one, which is what makes their cut-off
//! actually prune work. Candidate order follows the mode of each construct:
//! greedy repeats count down, lazy repeats count up, alternations go left to
//! right.

use onig_ast::limits::LOOKBEHIND_LIMIT;
use onig_ast::{AstKind, BackrefTarget, CallTarget, CompiledPattern, NodeId, RegexOptions, RepeatMode};

use crate::context::{CaptureSpan, MatchContext};

/// Receives a candidate end position; returns `true` to accept it and stop.
pub(crate) type Cont<'c> = dyn FnMut(&mut MatchContext, usize) -> bool + 'c;

pub(crate) struct Executor<'p, 'h> {
    compiled: &'p CompiledPattern,
    haystack: &'h str,
    options: RegexOptions,
}

impl<'p, 'h> Executor<'p, 'h> {
    pub(crate) fn new(compiled: &'p CompiledPattern, haystack: &'h str) -> Self {
        Executor { compiled, haystack, options: compiled.options() }
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.haystack.get(pos..)?.chars().next()
    }

    /// Evaluate `id` at `pos`, feeding candidate results to `k` in order.
    /// Returns `true` once `k` accepts; the context then holds the accepted
    /// capture state. Returns `false` with the context rolled back when no
    /// candidate is accepted.
    pub(crate) fn eval(&self, id: NodeId, pos: usize, ctx: &mut MatchContext, k: &mut Cont<'_>) -> bool {
        match self.compiled.ast().node(id) {
            AstKind::Literal { text, ignore_case } => {
                let bytes = self.haystack.as_bytes();
                let end = pos + text.len();
                if end > bytes.len() {
                    return false;
                }
                let window = &bytes[pos..end];
                let equal = if *ignore_case {
                    window.eq_ignore_ascii_case(text.as_bytes())
                } else {
                    window == text.as_bytes()
                };
                if equal { k(ctx, end) } else { false }
            }

            AstKind::Class { set, negated } => {
                let Some(c) = self.char_at(pos) else {
                    return false;
                };
                if set.contains(c) != *negated {
                    k(ctx, pos + c.len_utf8())
                } else {
                    false
                }
            }

            AstKind::AnyChar => {
                let Some(c) = self.char_at(pos) else {
                    return false;
                };
                if c == '\n' && !self.options.single_line {
                    return false;
                }
                k(ctx, pos + c.len_utf8())
            }

            AstKind::LineStart => {
                let at_start = pos == 0
                    || (self.options.multiline && self.haystack.as_bytes()[pos - 1] == b'\n');
                if at_start { k(ctx, pos) } else { false }
            }

            AstKind::LineEnd => {
                let at_end = pos == self.haystack.len()
                    || (self.options.multiline && self.haystack.as_bytes()[pos] == b'\n');
                if at_end { k(ctx, pos) } else { false }
            }

            AstKind::Sequence { children } => self.eval_seq(children, pos, ctx, k),

            AstKind::Alternation { branches } => {
                for &branch in branches {
                    if self.eval(branch, pos, ctx, k) {
                        return true;
                    }
                }
                false
            }

            AstKind::Repeat { child, min, max, mode } => match mode {
                RepeatMode::Greedy => self.repeat_greedy(*child, *min, *max, 0, pos, ctx, k),
                RepeatMode::Lazy => self.repeat_lazy(*child, *min, *max, 0, pos, ctx, k),
                RepeatMode::Possessive => self.repeat_possessive(*child, *min, *max, pos, ctx, k),
            },

            AstKind::Capture { child, index, name: _ } => {
                let index = *index;
                self.eval(*child, pos, ctx, &mut |ctx: &mut MatchContext, end: usize| {
                    let mark = ctx.mark();
                    ctx.set_group(index, CaptureSpan { start: pos, end });
                    if k(ctx, end) {
                        true
                    } else {
                        ctx.undo_to(mark);
                        false
                    }
                })
            }

            AstKind::Group { child } => self.eval(*child, pos, ctx, k),

            AstKind::Atomic { child } => {
                let mark = ctx.mark();
                let mut committed: Option<usize> = None;
                self.eval(*child, pos, ctx, &mut |_ctx: &mut MatchContext, end: usize| {
                    committed = Some(end);
                    true
                });
                match committed {
                    Some(end) => {
                        if k(ctx, end) {
                            true
                        } else {
                            ctx.undo_to(mark);
                            false
                        }
                    }
                    None => false,
                }
            }

            AstKind::Lookahead { child, negated } => {
                let mark = ctx.mark();
                let mut matched = false;
                self.eval(*child, pos, ctx, &mut |_ctx: &mut MatchContext, _end: usize| {
                    matched = true;
                    true
                });
                // Captures inside a lookaround are not observable outside.
                ctx.undo_to(mark);
                if matched != *negated { k(ctx, pos) } else { false }
            }

            AstKind::Lookbehind { child, negated, bounds } => {
                let child = *child;
                let negated = *negated;
                let reach = bounds.max.unwrap_or(LOOKBEHIND_LIMIT).min(LOOKBEHIND_LIMIT);
                let mark = ctx.mark();
                let mut matched = false;
                if let Some(hi) = pos.checked_sub(bounds.min) {
                    let mut start = pos.saturating_sub(reach);
                    while start <= hi {
                        if self.haystack.is_char_boundary(start) {
                            let mut hit = false;
                            self.eval(child, start, ctx, &mut |_ctx: &mut MatchContext, end: usize| {
                                if end == pos {
                                    hit = true;
                                    true
                                } else {
                                    false
                                }
                            });
                            if hit {
                                matched = true;
                                break;
                            }
                        }
                        start += 1;
                    }
                }
                ctx.undo_to(mark);
                if matched != negated { k(ctx, pos) } else { false }
            }

            AstKind::Backref { target, ignore_case } => {
                let number = match target {
                    BackrefTarget::Index(n) => *n,
                    BackrefTarget::Name(name) => match self.compiled.group_index(name) {
                        Some(n) => n,
                        None => return false,
                    },
                };
                // An unset group fails the branch rather than matching empty.
                let Some(span) = ctx.group(number) else {
                    return false;
                };
                let bytes = self.haystack.as_bytes();
                let captured = &bytes[span.start..span.end];
                let end = pos + captured.len();
                if end > bytes.len() {
                    return false;
                }
                let window = &bytes[pos..end];
                let equal = if *ignore_case {
                    window.eq_ignore_ascii_case(captured)
                } else {
                    window == captured
                };
                if equal { k(ctx, end) } else { false }
            }

            AstKind::Call { target } => {
                let body = match target {
                    CallTarget::Recursion => Some(self.compiled.root()),
                    CallTarget::Index(n) => self.compiled.group_body(*n),
                    CallTarget::Name(name) => {
                        self.compiled.group_index(name).and_then(|n| self.compiled.group_body(n))
                    }
                };
                let Some(body) = body else {
                    return false;
                };
                if !ctx.enter_call() {
                    return false;
                }
                let mark = ctx.mark();
                let accepted = self.eval(body, pos, ctx, &mut |ctx: &mut MatchContext, end: usize| {
                    // Captures made inside the call are scoped to it: hide
                    // them while the outer pattern continues, reveal them
                    // again so the interior can keep backtracking.
                    ctx.suspend(mark);
                    let stop = k(ctx, end);
                    ctx.resume(mark);
                    stop
                });
                ctx.leave_call();
                accepted
            }
        }
    }

    fn eval_seq(&self, children: &[NodeId], pos: usize, ctx: &mut MatchContext, k: &mut Cont<'_>) -> bool {
        match children.split_first() {
            None => k(ctx, pos),
            Some((&first, rest)) => self.eval(first, pos, ctx, &mut |ctx: &mut MatchContext, p: usize| {
                self.eval_seq(rest, p, ctx, k)
            }),
        }
    }

    fn repeat_greedy(
        &self,
        child: NodeId,
        min: u32,
        max: Option<u32>,
        count: u32,
        pos: usize,
        ctx: &mut MatchContext,
        k: &mut Cont<'_>,
    ) -> bool {
        let mut saw_empty = false;
        if max.is_none_or(|m| count < m) {
            let accepted = self.eval(child, pos, ctx, &mut |ctx: &mut MatchContext, p: usize| {
                if p == pos {
                    // A zero-width iteration is not retaken at this position.
                    saw_empty = true;
                    false
                } else {
                    self.repeat_greedy(child, min, max, count + 1, p, ctx, k)
                }
            });
            if accepted {
                return true;
            }
        }
        // A child that matches empty here could pad the count up to any
        // minimum, so the minimum counts as satisfied.
        if count >= min || saw_empty { k(ctx, pos) } else { false }
    }

    fn repeat_lazy(
        &self,
        child: NodeId,
        min: u32,
        max: Option<u32>,
        count: u32,
        pos: usize,
        ctx: &mut MatchContext,
        k: &mut Cont<'_>,
    ) -> bool {
        if count >= min && k(ctx, pos) {
            return true;
        }
        let mut saw_empty = false;
        if max.is_none_or(|m| count < m) {
            let accepted = self.eval(child, pos, ctx, &mut |ctx: &mut MatchContext, p: usize| {
                if p == pos {
                    saw_empty = true;
                    false
                } else {
                    self.repeat_lazy(child, min, max, count + 1, p, ctx, k)
                }
            });
            if accepted {
                return true;
            }
        }
        if count < min && saw_empty { k(ctx, pos) } else { false }
    }

    fn repeat_possessive(
        &self,
        child: NodeId,
        min: u32,
        max: Option<u32>,
        pos: usize,
        ctx: &mut MatchContext,
        k: &mut Cont<'_>,
    ) -> bool {
        let mark = ctx.mark();
        let mut count: u32 = 0;
        let mut cur = pos;
        let mut saw_empty = false;
        loop {
            if max.is_some_and(|m| count >= m) {
                break;
            }
            // Commit to the first candidate of each iteration.
            let mut next: Option<usize> = None;
            self.eval(child, cur, ctx, &mut |_ctx: &mut MatchContext, p: usize| {
                next = Some(p);
                true
            });
            match next {
                Some(p) if p == cur => {
                    saw_empty = true;
                    count += 1;
                    break;
                }
                Some(p) => {
                    cur = p;
                    count += 1;
                }
                None => break,
            }
        }
        if (count >= min || saw_empty) && k(ctx, cur) {
            true
        } else {
            ctx.undo_to(mark);
            false
        }
    }
}
