//! Data definitions for the onig regex engine.
//!
//! This crate holds everything the parser produces and the executor consumes:
//!
//! - [`RegexOptions`]: the option flags accepted at compile time
//! - [`ClassSet`]: character-class membership (points, ranges, shorthands)
//! - [`Ast`] / [`AstKind`] / [`NodeId`]: the arena-allocated pattern AST
//! - [`CompiledPattern`]: the immutable compile result with its numbered and
//!   named group tables
//! - [`length_bounds`]: the per-node length analysis used by variable-length
//!   lookbehind
//!
//! Nodes are stored contiguously in a `Vec` and reference their children by
//! [`NodeId`], so subroutine calls and whole-pattern recursion can point back
//! into the tree without shared ownership.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod bounds;
pub mod class;
pub mod compiled;
pub mod options;

pub use ast::{Ast, AstKind, BackrefTarget, CallTarget, NodeId, RepeatMode};
pub use bounds::{LengthBounds, length_bounds};
pub use class::ClassSet;
pub use compiled::CompiledPattern;
pub use options::RegexOptions;

/// Resource budgets shared by the parser and the executor.
pub mod limits {
    /// Maximum subroutine/recursion call depth during matching.
    pub const MAX_CALL_DEPTH: usize = 100;
    /// Maximum distance, in input bytes, a lookbehind may reach back.
    pub const LOOKBEHIND_LIMIT: usize = 100;
    /// Maximum group nesting depth accepted by the parser.
    pub const MAX_GROUP_NESTING: usize = 64;
}
