//! Mutable per-match state: capture slots, the undo journal, and the
//! subroutine-call depth counter.

use onig_ast::limits::MAX_CALL_DEPTH;

/// Byte offsets of one captured span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSpan {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

struct JournalEntry {
    slot: usize,
    previous: Option<CaptureSpan>,
}

/// Capture state for a single match invocation.
///
/// Backtracking restores captures through a journal of undo entries instead
/// of copying the whole slot table at every branch: a caller takes a
/// [`mark`](MatchContext::mark) before trying a branch and
/// [`undo_to`](MatchContext::undo_to) it when the branch is rejected.
///
/// Subroutine calls additionally need their interior captures hidden from
/// the outer pattern while it keeps matching. [`suspend`](MatchContext::suspend)
/// swaps every journal entry past a mark out of the slot table (leaving the
/// outer values visible) and [`resume`](MatchContext::resume) swaps them back
/// in, both in O(journal delta).
pub struct MatchContext {
    /// Current capture per group; slot 0 is reserved for the whole match.
    slots: Vec<Option<CaptureSpan>>,
    journal: Vec<JournalEntry>,
    /// Append-only log of every capture observed, in assignment order.
    history: Vec<(u32, CaptureSpan)>,
    call_depth: usize,
}

impl MatchContext {
    /// A fresh context for a pattern with `group_count` capturing groups.
    pub fn new(group_count: usize) -> Self {
        MatchContext {
            slots: vec![None; group_count + 1],
            journal: Vec::new(),
            history: Vec::new(),
            call_depth: 0,
        }
    }

    /// Current capture of 1-based group `number`.
    pub fn group(&self, number: u32) -> Option<CaptureSpan> {
        self.slots.get(number as usize).copied().flatten()
    }

    /// Record a capture for 1-based group `number`, journaling the previous
    /// value for undo.
    pub fn set_group(&mut self, number: u32, span: CaptureSpan) {
        let slot = number as usize;
        self.journal.push(JournalEntry { slot, previous: self.slots[slot] });
        self.slots[slot] = Some(span);
        self.history.push((number, span));
    }

    /// Snapshot of the current capture table, slot 0 filled with the
    /// overall span. Taken when a candidate match is accepted.
    pub fn snapshot(&self, overall: CaptureSpan) -> Vec<Option<CaptureSpan>> {
        let mut slots = self.slots.clone();
        slots[0] = Some(overall);
        slots
    }

    /// Append-only log of all captures observed so far.
    pub fn history(&self) -> &[(u32, CaptureSpan)] {
        &self.history
    }

    /// Position in the journal, for a later [`undo_to`](Self::undo_to).
    pub fn mark(&self) -> usize {
        self.journal.len()
    }

    /// Roll the capture table back to `mark`, popping journal entries.
    pub fn undo_to(&mut self, mark: usize) {
        while self.journal.len() > mark {
            if let Some(entry) = self.journal.pop() {
                self.slots[entry.slot] = entry.previous;
            }
        }
    }

    /// Temporarily hide every capture recorded since `mark`. The journal
    /// keeps its length; each entry now holds the hidden value.
    pub fn suspend(&mut self, mark: usize) {
        let slots = &mut self.slots;
        for entry in self.journal[mark..].iter_mut().rev() {
            std::mem::swap(&mut slots[entry.slot], &mut entry.previous);
        }
    }

    /// Re-apply captures hidden by [`suspend`](Self::suspend) with the same
    /// `mark`. Entries pushed after the suspend must already be undone.
    pub fn resume(&mut self, mark: usize) {
        let slots = &mut self.slots;
        for entry in self.journal[mark..].iter_mut() {
            std::mem::swap(&mut slots[entry.slot], &mut entry.previous);
        }
    }

    /// Enter a subroutine call. Returns `false` when the depth cap is
    /// reached, which fails the calling branch.
    pub fn enter_call(&mut self) -> bool {
        if self.call_depth >= MAX_CALL_DEPTH {
            return false;
        }
        self.call_depth += 1;
        true
    }

    /// Leave a subroutine call entered with [`enter_call`](Self::enter_call).
    pub fn leave_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span(start: usize, end: usize) -> CaptureSpan {
        CaptureSpan { start, end }
    }

    #[test]
    fn set_and_undo() {
        let mut ctx = MatchContext::new(2);
        let mark = ctx.mark();
        ctx.set_group(1, span(0, 3));
        ctx.set_group(2, span(3, 5));
        assert_eq!(ctx.group(1), Some(span(0, 3)));
        ctx.undo_to(mark);
        assert_eq!(ctx.group(1), None);
        assert_eq!(ctx.group(2), None);
    }

    #[test]
    fn undo_restores_overwritten_value() {
        let mut ctx = MatchContext::new(1);
        ctx.set_group(1, span(0, 1));
        let mark = ctx.mark();
        ctx.set_group(1, span(2, 4));
        assert_eq!(ctx.group(1), Some(span(2, 4)));
        ctx.undo_to(mark);
        assert_eq!(ctx.group(1), Some(span(0, 1)));
    }

    #[test]
    fn history_is_append_only() {
        let mut ctx = MatchContext::new(1);
        let mark = ctx.mark();
        ctx.set_group(1, span(0, 1));
        ctx.undo_to(mark);
        assert_eq!(ctx.group(1), None);
        assert_eq!(ctx.history(), &[(1, span(0, 1))]);
    }

    #[test]
    fn suspend_hides_and_resume_reveals() {
        let mut ctx = MatchContext::new(2);
        ctx.set_group(1, span(0, 1));
        let mark = ctx.mark();
        ctx.set_group(1, span(2, 3));
        ctx.set_group(2, span(4, 5));

        ctx.suspend(mark);
        assert_eq!(ctx.group(1), Some(span(0, 1)));
        assert_eq!(ctx.group(2), None);

        ctx.resume(mark);
        assert_eq!(ctx.group(1), Some(span(2, 3)));
        assert_eq!(ctx.group(2), Some(span(4, 5)));
    }

    #[test]
    fn suspend_handles_repeated_slots() {
        let mut ctx = MatchContext::new(1);
        let mark = ctx.mark();
        ctx.set_group(1, span(0, 1));
        ctx.set_group(1, span(1, 2));
        ctx.set_group(1, span(2, 3));
        ctx.suspend(mark);
        assert_eq!(ctx.group(1), None);
        ctx.resume(mark);
        assert_eq!(ctx.group(1), Some(span(2, 3)));
    }

    #[test]
    fn call_depth_caps() {
        let mut ctx = MatchContext::new(0);
        for _ in 0..onig_ast::limits::MAX_CALL_DEPTH {
            assert!(ctx.enter_call());
        }
        assert!(!ctx.enter_call());
        ctx.leave_call();
        assert!(ctx.enter_call());
    }

    #[test]
    fn snapshot_fills_group_zero() {
        let mut ctx = MatchContext::new(1);
        ctx.set_group(1, span(1, 2));
        let slots = ctx.snapshot(span(0, 4));
        assert_eq!(slots[0], Some(span(0, 4)));
        assert_eq!(slots[1], Some(span(1, 2)));
    }
}
