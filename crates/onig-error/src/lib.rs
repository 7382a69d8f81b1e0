//! Error types for the onig regex engine.
//!
//! Compilation and matching report failures through a single structured
//! [`RegexError`] value. Parse-stage errors always carry the original pattern
//! text and a 0-based byte offset into it, so callers can point diagnostics
//! at the offending construct. Unsupported-feature errors additionally carry
//! the feature name and a suggested rewrite in [`RegexError::context`].
//!
//! # Examples
//!
//! ```
//! use onig_error::{ErrorKind, RegexError};
//!
//! let err = RegexError::unclosed_class("[abc", 0);
//! assert_eq!(err.kind, ErrorKind::InvalidPattern);
//! assert_eq!(err.position, Some(0));
//! assert!(err.to_string().contains("character class"));
//! ```

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Numeric error codes attached to [`RegexError`] values.
///
/// Codes are stable identifiers for programmatic handling; the human-readable
/// message may change between releases.
pub mod codes {
    /// A `(` was never closed.
    pub const UNCLOSED_GROUP: u32 = 101;
    /// A `[` character class was never closed.
    pub const UNCLOSED_CLASS: u32 = 102;
    /// A `(?<name>` group name was never terminated by `>`.
    pub const UNCLOSED_GROUP_NAME: u32 = 103;
    /// A `\k<name>` backreference name was never terminated by `>`.
    pub const UNCLOSED_BACKREF_NAME: u32 = 104;
    /// A group or backreference name was empty.
    pub const EMPTY_GROUP_NAME: u32 = 105;
    /// An unrecognized `(?...)` group form.
    pub const UNKNOWN_GROUP_SYNTAX: u32 = 106;
    /// The pattern ended in the middle of an escape sequence.
    pub const TRUNCATED_ESCAPE: u32 = 107;
    /// A `{n,m}` repeat was malformed (`m < n`, missing digits, no `}`).
    pub const MALFORMED_REPEAT: u32 = 108;
    /// A `)` with no matching `(`.
    pub const STRAY_CLOSE_PAREN: u32 = 109;
    /// A quantifier with nothing to repeat.
    pub const REPEAT_WITHOUT_TARGET: u32 = 110;
    /// A subroutine call named a group that does not exist.
    pub const UNKNOWN_CALL_TARGET: u32 = 201;
    /// Group nesting exceeded the parser budget.
    pub const NESTING_TOO_DEEP: u32 = 202;
    /// The construct is recognized but not supported by this engine.
    pub const UNSUPPORTED_FEATURE: u32 = 301;
}

/// Convenient result alias used across the engine crates.
pub type Result<T> = std::result::Result<T, RegexError>;

/// Broad classification of a [`RegexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The pattern was syntactically valid but could not be compiled
    /// (unknown subroutine target, nesting budget exceeded).
    Compilation,
    /// The pattern text itself is malformed.
    InvalidPattern,
    /// The construct is recognized but deliberately unsupported.
    UnsupportedFeature,
    /// A failure during matching or replacement.
    Runtime,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Compilation => "compilation error",
            ErrorKind::InvalidPattern => "invalid pattern",
            ErrorKind::UnsupportedFeature => "unsupported feature",
            ErrorKind::Runtime => "runtime error",
        };
        f.write_str(name)
    }
}

/// Structured error produced by pattern compilation or matching.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}{}", origin_suffix(.pattern, .position))]
pub struct RegexError {
    /// Broad classification of the failure.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// The original pattern text, when the failure concerns one.
    pub pattern: String,
    /// 0-based byte offset into `pattern`.
    pub position: Option<usize>,
    /// Stable numeric code, see [`codes`].
    pub code: Option<u32>,
    /// Auxiliary key/value context (`feature`, `suggestion`, ...).
    pub context: FxHashMap<String, String>,
}

fn origin_suffix(pattern: &str, position: &Option<usize>) -> String {
    match (pattern.is_empty(), position) {
        (false, Some(pos)) => format!(" (pattern: {pattern}, position: {pos})"),
        (false, None) => format!(" (pattern: {pattern})"),
        (true, Some(pos)) => format!(" (position: {pos})"),
        (true, None) => String::new(),
    }
}

impl RegexError {
    /// Generic constructor for malformed-pattern errors.
    pub fn invalid_pattern(
        message: impl Into<String>,
        pattern: impl Into<String>,
        position: usize,
    ) -> Self {
        RegexError {
            kind: ErrorKind::InvalidPattern,
            message: message.into(),
            pattern: pattern.into(),
            position: Some(position),
            code: None,
            context: FxHashMap::default(),
        }
    }

    /// Generic constructor for compile-stage (semantic) errors.
    pub fn compilation(
        message: impl Into<String>,
        pattern: impl Into<String>,
        position: usize,
    ) -> Self {
        RegexError {
            kind: ErrorKind::Compilation,
            message: message.into(),
            pattern: pattern.into(),
            position: Some(position),
            code: None,
            context: FxHashMap::default(),
        }
    }

    /// Generic constructor for match-time errors.
    pub fn runtime(message: impl Into<String>) -> Self {
        RegexError {
            kind: ErrorKind::Runtime,
            message: message.into(),
            pattern: String::new(),
            position: None,
            code: None,
            context: FxHashMap::default(),
        }
    }

    fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a key/value pair to the error context.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// A `(` group was never closed.
    pub fn unclosed_group(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("unclosed group", pattern, position)
            .with_code(codes::UNCLOSED_GROUP)
    }

    /// A `[` character class was never closed.
    pub fn unclosed_class(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("unclosed character class", pattern, position)
            .with_code(codes::UNCLOSED_CLASS)
    }

    /// A `(?<name>` group name was never terminated.
    pub fn unclosed_group_name(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("unterminated group name", pattern, position)
            .with_code(codes::UNCLOSED_GROUP_NAME)
    }

    /// A `\k<name>` backreference name was never terminated.
    pub fn unclosed_backref_name(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("unterminated backreference name", pattern, position)
            .with_code(codes::UNCLOSED_BACKREF_NAME)
    }

    /// A group or backreference name was empty or not a valid identifier.
    pub fn empty_group_name(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("empty or invalid group name", pattern, position)
            .with_code(codes::EMPTY_GROUP_NAME)
    }

    /// An unrecognized `(?...)` form.
    pub fn unknown_group_syntax(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("unknown group syntax", pattern, position)
            .with_code(codes::UNKNOWN_GROUP_SYNTAX)
    }

    /// The pattern ended in the middle of an escape.
    pub fn truncated_escape(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("pattern ends with a dangling escape", pattern, position)
            .with_code(codes::TRUNCATED_ESCAPE)
    }

    /// A `{n,m}` repeat did not parse or had `m < n`.
    pub fn malformed_repeat(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("malformed repeat interval", pattern, position)
            .with_code(codes::MALFORMED_REPEAT)
    }

    /// A `)` with no matching `(`.
    pub fn stray_close_paren(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("unmatched close parenthesis", pattern, position)
            .with_code(codes::STRAY_CLOSE_PAREN)
    }

    /// A quantifier with nothing to repeat.
    pub fn repeat_without_target(pattern: impl Into<String>, position: usize) -> Self {
        Self::invalid_pattern("target of repeat operator is not specified", pattern, position)
            .with_code(codes::REPEAT_WITHOUT_TARGET)
    }

    /// A subroutine call referenced a group number that does not exist.
    pub fn unknown_call_number(pattern: impl Into<String>, position: usize, number: u32) -> Self {
        Self::compilation(
            format!("subroutine call references undefined group {number}"),
            pattern,
            position,
        )
        .with_code(codes::UNKNOWN_CALL_TARGET)
    }

    /// A subroutine call referenced a group name that does not exist.
    pub fn unknown_call_name(pattern: impl Into<String>, position: usize, name: &str) -> Self {
        Self::compilation(
            format!("subroutine call references undefined group <{name}>"),
            pattern,
            position,
        )
        .with_code(codes::UNKNOWN_CALL_TARGET)
    }

    /// Group nesting exceeded the parser budget.
    pub fn nesting_too_deep(pattern: impl Into<String>, position: usize, max: usize) -> Self {
        Self::compilation(format!("group nesting exceeds limit of {max}"), pattern, position)
            .with_code(codes::NESTING_TOO_DEEP)
    }

    /// A recognized construct this engine deliberately does not implement.
    pub fn unsupported_feature(
        feature: impl Into<String>,
        suggestion: impl Into<String>,
        pattern: impl Into<String>,
        position: usize,
    ) -> Self {
        let feature = feature.into();
        RegexError {
            kind: ErrorKind::UnsupportedFeature,
            message: format!("{feature} are not supported"),
            pattern: pattern.into(),
            position: Some(position),
            code: Some(codes::UNSUPPORTED_FEATURE),
            context: FxHashMap::default(),
        }
        .with_context("feature", feature)
        .with_context("suggestion", suggestion)
    }

    /// The feature name attached to an unsupported-feature error.
    pub fn feature(&self) -> Option<&str> {
        self.context.get("feature").map(String::as_str)
    }

    /// The suggested rewrite attached to an unsupported-feature error.
    pub fn suggestion(&self) -> Option<&str> {
        self.context.get("suggestion").map(String::as_str)
    }
}
