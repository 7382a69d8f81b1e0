//! Length-bound analysis for AST subtrees.
//!
//! Lookbehind needs to know how many input bytes its body can span so the
//! executor can walk a bounded window of candidate start positions. Bounds
//! are computed once after parsing and cached on each `Lookbehind` node,
//! saturated at [`crate::limits::LOOKBEHIND_LIMIT`].

use crate::ast::{Ast, AstKind, NodeId};

/// Inclusive byte-length bounds of the text an AST subtree can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    /// Fewest bytes the subtree can consume.
    pub min: usize,
    /// Most bytes the subtree can consume; `None` is unbounded.
    pub max: Option<usize>,
}

impl Default for LengthBounds {
    fn default() -> Self {
        LengthBounds { min: 0, max: None }
    }
}

impl LengthBounds {
    /// Exact bounds for a construct of fixed size.
    pub fn exact(len: usize) -> Self {
        LengthBounds { min: len, max: Some(len) }
    }

    /// Saturate the upper bound at `cap`. The lower bound is left alone; a
    /// minimum beyond the cap simply yields an empty candidate window.
    pub fn clamp_max(self, cap: usize) -> Self {
        let max = match self.max {
            Some(m) => Some(m.min(cap)),
            None => Some(cap),
        };
        LengthBounds { min: self.min, max }
    }
}

// A single code point occupies 1 to 4 bytes in UTF-8.
const CHAR_BOUNDS: LengthBounds = LengthBounds { min: 1, max: Some(4) };

fn add(a: LengthBounds, b: LengthBounds) -> LengthBounds {
    LengthBounds {
        min: a.min.saturating_add(b.min),
        max: match (a.max, b.max) {
            (Some(x), Some(y)) => Some(x.saturating_add(y)),
            _ => None,
        },
    }
}

fn scale(bounds: LengthBounds, min_count: u32, max_count: Option<u32>) -> LengthBounds {
    let min = bounds.min.saturating_mul(min_count as usize);
    let max = match (bounds.max, max_count) {
        // A child that consumes nothing keeps the repeat zero-width no
        // matter how often it runs.
        (Some(0), _) => Some(0),
        (Some(m), Some(n)) => Some(m.saturating_mul(n as usize)),
        _ => None,
    };
    LengthBounds { min, max }
}

/// Compute the byte-length bounds of the subtree rooted at `id`.
pub fn length_bounds(ast: &Ast, id: NodeId) -> LengthBounds {
    match ast.node(id) {
        AstKind::Literal { text, .. } => LengthBounds::exact(text.len()),
        AstKind::Class { .. } | AstKind::AnyChar => CHAR_BOUNDS,
        AstKind::Sequence { children } => children
            .iter()
            .fold(LengthBounds::exact(0), |acc, &child| add(acc, length_bounds(ast, child))),
        AstKind::Alternation { branches } => {
            let mut iter = branches.iter();
            let first = match iter.next() {
                Some(&b) => length_bounds(ast, b),
                None => LengthBounds::exact(0),
            };
            iter.fold(first, |acc, &b| {
                let other = length_bounds(ast, b);
                LengthBounds {
                    min: acc.min.min(other.min),
                    max: match (acc.max, other.max) {
                        (Some(x), Some(y)) => Some(x.max(y)),
                        _ => None,
                    },
                }
            })
        }
        AstKind::Repeat { child, min, max, mode: _ } => {
            scale(length_bounds(ast, *child), *min, *max)
        }
        AstKind::Capture { child, .. } | AstKind::Group { child } | AstKind::Atomic { child } => {
            length_bounds(ast, *child)
        }
        // Zero-width assertions.
        AstKind::Lookahead { .. }
        | AstKind::Lookbehind { .. }
        | AstKind::LineStart
        | AstKind::LineEnd => LengthBounds::exact(0),
        // The captured text's length is unknowable statically, and a call
        // target may recurse; both report unbounded.
        AstKind::Backref { .. } | AstKind::Call { .. } => LengthBounds::default(),
    }
}
