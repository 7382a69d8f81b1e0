//! Pattern parser for the onig regex engine.
//!
//! Turns Oniguruma-flavoured pattern text into the arena AST and group
//! tables of [`onig_ast`]. The grammar, lowest precedence first:
//!
//! 1. **Alternation** `a|b|c`
//! 2. **Sequence** of quantified atoms
//! 3. **Quantified atom**: atom + `*` `+` `?` `{n}` `{n,}` `{n,m}`, each with
//!    an optional `?` (lazy) or `+` (possessive) mode suffix
//! 4. **Atom**: group, character class, `.`, `^`, `$`, escape, or literal
//!
//! Group parsing dispatches on the characters after `(?`: non-capturing,
//! named capture, lookahead, lookbehind, atomic, subroutine call, whole
//! pattern recursion. Conditional groups `(?(...)...)` are recognized and
//! rejected with a suggestion to use an alternation instead.
//!
//! Two post-parse passes run before the pattern is frozen: subroutine-call
//! targets are checked against the group tables (forward references are
//! legal), and every lookbehind caches the length bounds of its body.
//!
//! # Examples
//!
//! ```
//! use onig_ast::RegexOptions;
//! use onig_parser::parse;
//!
//! let compiled = parse("(?<user>\\w+)@(?<host>\\w+)", RegexOptions::default())?;
//! assert_eq!(compiled.group_count(), 2);
//! assert_eq!(compiled.group_index("host"), Some(2));
//! # Ok::<(), onig_error::RegexError>(())
//! ```

#![deny(unsafe_code)]

mod parser;

pub use parser::parse;
