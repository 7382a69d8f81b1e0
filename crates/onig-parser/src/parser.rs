//! Recursive-descent parser over the pattern text.

use rustc_hash::FxHashMap;
use tracing::debug;

use onig_ast::limits::{LOOKBEHIND_LIMIT, MAX_GROUP_NESTING};
use onig_ast::{
    Ast, AstKind, BackrefTarget, CallTarget, ClassSet, CompiledPattern, NodeId, RegexOptions,
    RepeatMode, length_bounds,
};
use onig_error::{RegexError, Result};

/// Compile `pattern` under `options` into a [`CompiledPattern`].
pub fn parse(pattern: &str, options: RegexOptions) -> Result<CompiledPattern> {
    let mut parser = Parser::new(pattern, options);
    let root = parser.parse_alternation()?;
    if parser.pos < parser.pattern.len() {
        // parse_alternation only stops early on an unmatched `)`.
        return Err(RegexError::stray_close_paren(pattern, parser.pos));
    }
    parser.resolve_calls()?;
    parser.cache_lookbehind_bounds();
    let compiled = parser.finish(root)?;
    debug!(
        pattern = compiled.pattern(),
        groups = compiled.group_count(),
        may_delegate = compiled.may_delegate(),
        "compiled pattern"
    );
    Ok(compiled)
}

/// A subroutine-call reference awaiting post-parse validation.
enum PendingCall {
    Index { at: usize, number: u32 },
    Name { at: usize, name: String },
}

struct Parser<'a> {
    pattern: &'a str,
    pos: usize,
    ast: Ast,
    options: RegexOptions,
    /// Capture nodes by group number; slots reserved at `(`, filled at `)`.
    groups: Vec<Option<NodeId>>,
    names: FxHashMap<String, u32>,
    pending_calls: Vec<PendingCall>,
    lookbehinds: Vec<NodeId>,
    depth: usize,
    may_delegate: bool,
}

/// Result of scanning for a `{n[,[m]]}` interval.
enum IntervalScan {
    /// Not an interval; `{` is a literal character.
    None,
    /// A well-formed interval occupying `len` bytes.
    Valid { min: u32, max: Option<u32>, len: usize },
    /// Digits were present but the interval is invalid (`m < n`, overflow).
    Malformed,
}

/// Scan `rest` (starting at `{`) for an interval quantifier without
/// consuming input. `{,m}` is not accepted; `{n,}` means unbounded.
fn scan_interval(rest: &str) -> IntervalScan {
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, '{')) => {}
        _ => return IntervalScan::None,
    }
    let mut min_digits = String::new();
    let mut max_digits = String::new();
    let mut saw_comma = false;
    for (idx, c) in chars {
        match c {
            '0'..='9' if !saw_comma => min_digits.push(c),
            '0'..='9' => max_digits.push(c),
            ',' if !saw_comma && !min_digits.is_empty() => saw_comma = true,
            '}' => {
                if min_digits.is_empty() {
                    return IntervalScan::None;
                }
                let Ok(min) = min_digits.parse::<u32>() else {
                    return IntervalScan::Malformed;
                };
                let max = if !saw_comma {
                    Some(min)
                } else if max_digits.is_empty() {
                    None
                } else {
                    match max_digits.parse::<u32>() {
                        Ok(max) if max >= min => Some(max),
                        _ => return IntervalScan::Malformed,
                    }
                };
                return IntervalScan::Valid { min, max, len: idx + 1 };
            }
            _ => return IntervalScan::None,
        }
    }
    IntervalScan::None
}

/// What an escape sequence denotes in atom position.
enum Escaped {
    /// A literal character; merges into the surrounding literal run.
    Char(char),
    /// A standalone node (shorthand class or backreference).
    Node(NodeId),
}

fn is_name_start(c: char) -> bool {
    unicode_ident::is_xid_start(c) || c == '_'
}

fn is_name_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str, options: RegexOptions) -> Self {
        Parser {
            pattern,
            pos: 0,
            ast: Ast::new(),
            options,
            groups: Vec::new(),
            names: FxHashMap::default(),
            pending_calls: Vec::new(),
            lookbehinds: Vec::new(),
            depth: 0,
            may_delegate: true,
        }
    }

    fn rest(&self) -> &'a str {
        &self.pattern[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    // ---- grammar ----------------------------------------------------------

    fn parse_alternation(&mut self) -> Result<NodeId> {
        let first = self.parse_sequence()?;
        if self.peek() != Some('|') {
            return Ok(first);
        }
        let mut branches = vec![first];
        while self.eat('|') {
            branches.push(self.parse_sequence()?);
        }
        Ok(self.ast.push(AstKind::Alternation { branches }))
    }

    fn parse_sequence(&mut self) -> Result<NodeId> {
        let mut children: Vec<NodeId> = Vec::new();
        // Run of adjacent literal characters, merged into one node.
        let mut run = String::new();
        loop {
            match self.peek() {
                None | Some('|') | Some(')') => break,
                Some('*' | '+' | '?') => {
                    return Err(RegexError::repeat_without_target(self.pattern, self.pos));
                }
                Some('{') => match scan_interval(self.rest()) {
                    IntervalScan::Valid { .. } => {
                        return Err(RegexError::repeat_without_target(self.pattern, self.pos));
                    }
                    IntervalScan::Malformed => {
                        return Err(RegexError::malformed_repeat(self.pattern, self.pos));
                    }
                    IntervalScan::None => {
                        self.bump();
                        self.push_literal_char(&mut children, &mut run, '{')?;
                    }
                },
                Some('(') => {
                    self.flush_run(&mut children, &mut run);
                    let group = self.parse_group()?;
                    let group = self.apply_quantifiers(group, true)?;
                    children.push(group);
                }
                Some('[') => {
                    self.flush_run(&mut children, &mut run);
                    let class = self.parse_class()?;
                    let class = self.apply_quantifiers(class, true)?;
                    children.push(class);
                }
                Some('.') => {
                    self.bump();
                    self.flush_run(&mut children, &mut run);
                    let dot = self.ast.push(AstKind::AnyChar);
                    let dot = self.apply_quantifiers(dot, true)?;
                    children.push(dot);
                }
                Some('^') => {
                    self.bump();
                    self.flush_run(&mut children, &mut run);
                    let anchor = self.ast.push(AstKind::LineStart);
                    let anchor = self.apply_quantifiers(anchor, false)?;
                    children.push(anchor);
                }
                Some('$') => {
                    self.bump();
                    self.flush_run(&mut children, &mut run);
                    let anchor = self.ast.push(AstKind::LineEnd);
                    let anchor = self.apply_quantifiers(anchor, false)?;
                    children.push(anchor);
                }
                Some('\\') => match self.parse_escape()? {
                    Escaped::Char(c) => self.push_literal_char(&mut children, &mut run, c)?,
                    Escaped::Node(node) => {
                        self.flush_run(&mut children, &mut run);
                        let node = self.apply_quantifiers(node, true)?;
                        children.push(node);
                    }
                },
                Some(c) => {
                    self.bump();
                    self.push_literal_char(&mut children, &mut run, c)?;
                }
            }
        }
        self.flush_run(&mut children, &mut run);
        match children.len() {
            1 => Ok(children[0]),
            _ => Ok(self.ast.push(AstKind::Sequence { children })),
        }
    }

    /// Append a literal character to the current run, unless a quantifier
    /// follows: a quantifier binds to the last character only, so that
    /// character becomes its own single-character literal atom.
    fn push_literal_char(
        &mut self,
        children: &mut Vec<NodeId>,
        run: &mut String,
        c: char,
    ) -> Result<()> {
        let quantified = matches!(self.peek(), Some('*' | '+' | '?'))
            || matches!(scan_interval(self.rest()), IntervalScan::Valid { .. } | IntervalScan::Malformed);
        if quantified {
            self.flush_run(children, run);
            let atom = self.ast.push(AstKind::Literal {
                text: c.to_string(),
                ignore_case: self.options.ignore_case,
            });
            let atom = self.apply_quantifiers(atom, true)?;
            children.push(atom);
        } else {
            run.push(c);
        }
        Ok(())
    }

    fn flush_run(&mut self, children: &mut Vec<NodeId>, run: &mut String) {
        if !run.is_empty() {
            let text = std::mem::take(run);
            children.push(self.ast.push(AstKind::Literal {
                text,
                ignore_case: self.options.ignore_case,
            }));
        }
    }

    /// Wrap `node` in repeat nodes for as many quantifiers as follow it.
    fn apply_quantifiers(&mut self, mut node: NodeId, can_repeat: bool) -> Result<NodeId> {
        loop {
            let q_pos = self.pos;
            let (min, max) = match self.peek() {
                Some('*') => {
                    self.bump();
                    (0, None)
                }
                Some('+') => {
                    self.bump();
                    (1, None)
                }
                Some('?') => {
                    self.bump();
                    (0, Some(1))
                }
                Some('{') => match scan_interval(self.rest()) {
                    IntervalScan::Valid { min, max, len } => {
                        self.pos += len;
                        (min, max)
                    }
                    IntervalScan::Malformed => {
                        return Err(RegexError::malformed_repeat(self.pattern, q_pos));
                    }
                    IntervalScan::None => break,
                },
                _ => break,
            };
            if !can_repeat {
                return Err(RegexError::repeat_without_target(self.pattern, q_pos));
            }
            let mode = match self.peek() {
                Some('?') => {
                    self.bump();
                    RepeatMode::Lazy
                }
                Some('+') => {
                    self.bump();
                    RepeatMode::Possessive
                }
                _ => RepeatMode::Greedy,
            };
            if mode != RepeatMode::Greedy {
                self.may_delegate = false;
            }
            node = self.ast.push(AstKind::Repeat { child: node, min, max, mode });
        }
        Ok(node)
    }

    // ---- escapes ----------------------------------------------------------

    fn parse_escape(&mut self) -> Result<Escaped> {
        let esc_pos = self.pos;
        self.bump(); // '\'
        let Some(c) = self.bump() else {
            return Err(RegexError::truncated_escape(self.pattern, esc_pos));
        };
        let escaped = match c {
            'd' => Escaped::Node(self.ast.push(AstKind::Class {
                set: ClassSet::digit(),
                negated: false,
            })),
            'D' => Escaped::Node(self.ast.push(AstKind::Class {
                set: ClassSet::digit(),
                negated: true,
            })),
            's' => Escaped::Node(self.ast.push(AstKind::Class {
                set: ClassSet::space(),
                negated: false,
            })),
            'S' => Escaped::Node(self.ast.push(AstKind::Class {
                set: ClassSet::space(),
                negated: true,
            })),
            'w' => Escaped::Node(self.ast.push(AstKind::Class {
                set: ClassSet::word(),
                negated: false,
            })),
            'W' => Escaped::Node(self.ast.push(AstKind::Class {
                set: ClassSet::word(),
                negated: true,
            })),
            'n' => Escaped::Char('\n'),
            't' => Escaped::Char('\t'),
            'r' => Escaped::Char('\r'),
            digit @ '1'..='9' => {
                self.may_delegate = false;
                let number = digit as u32 - '0' as u32;
                Escaped::Node(self.ast.push(AstKind::Backref {
                    target: BackrefTarget::Index(number),
                    ignore_case: self.options.ignore_case,
                }))
            }
            'k' if self.peek() == Some('<') => {
                self.bump(); // '<'
                let name = self.parse_name('>', esc_pos, NameContext::Backref)?;
                self.may_delegate = false;
                Escaped::Node(self.ast.push(AstKind::Backref {
                    target: BackrefTarget::Name(name),
                    ignore_case: self.options.ignore_case,
                }))
            }
            other => Escaped::Char(other),
        };
        Ok(escaped)
    }

    // ---- character classes ------------------------------------------------

    fn parse_class(&mut self) -> Result<NodeId> {
        let start = self.pos;
        self.bump(); // '['
        let negated = self.eat('^');
        let mut set = ClassSet::new();
        loop {
            match self.peek() {
                None => return Err(RegexError::unclosed_class(self.pattern, start)),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    let esc_pos = self.pos;
                    self.bump();
                    let Some(c) = self.bump() else {
                        return Err(RegexError::truncated_escape(self.pattern, esc_pos));
                    };
                    match c {
                        'd' => set.push_digit(),
                        'D' => set.push_not_digit(),
                        's' => set.push_space(),
                        'S' => set.push_not_space(),
                        'w' => set.push_word(),
                        'W' => set.push_not_word(),
                        other => {
                            let lo = match other {
                                'n' => '\n',
                                't' => '\t',
                                'r' => '\r',
                                c => c,
                            };
                            self.push_class_item(&mut set, lo)?;
                        }
                    }
                }
                Some(c) => {
                    self.bump();
                    self.push_class_item(&mut set, c)?;
                }
            }
        }
        Ok(self.ast.push(AstKind::Class { set, negated }))
    }

    /// Add `lo` to the set, consuming a trailing `x-y` range when the `-` is
    /// not the last character before `]`.
    fn push_class_item(&mut self, set: &mut ClassSet, lo: char) -> Result<()> {
        let ranged = self.peek() == Some('-')
            && !matches!(self.peek_second(), Some(']') | None);
        if !ranged {
            set.push_char(lo);
            return Ok(());
        }
        self.bump(); // '-'
        match self.peek() {
            Some('\\') => {
                let esc_pos = self.pos;
                self.bump();
                let Some(c) = self.bump() else {
                    return Err(RegexError::truncated_escape(self.pattern, esc_pos));
                };
                match c {
                    // A shorthand cannot end a range; the `-` is literal.
                    'd' => {
                        set.push_char(lo);
                        set.push_char('-');
                        set.push_digit();
                    }
                    'D' => {
                        set.push_char(lo);
                        set.push_char('-');
                        set.push_not_digit();
                    }
                    's' => {
                        set.push_char(lo);
                        set.push_char('-');
                        set.push_space();
                    }
                    'S' => {
                        set.push_char(lo);
                        set.push_char('-');
                        set.push_not_space();
                    }
                    'w' => {
                        set.push_char(lo);
                        set.push_char('-');
                        set.push_word();
                    }
                    'W' => {
                        set.push_char(lo);
                        set.push_char('-');
                        set.push_not_word();
                    }
                    other => {
                        let hi = match other {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            c => c,
                        };
                        set.push_range(lo, hi);
                    }
                }
            }
            Some(hi) => {
                self.bump();
                set.push_range(lo, hi);
            }
            // Checked above: the next character exists and is not `]`.
            None => set.push_char(lo),
        }
        Ok(())
    }

    // ---- groups -----------------------------------------------------------

    fn parse_group(&mut self) -> Result<NodeId> {
        let open_pos = self.pos;
        self.bump(); // '('
        self.depth += 1;
        if self.depth > MAX_GROUP_NESTING {
            return Err(RegexError::nesting_too_deep(self.pattern, open_pos, MAX_GROUP_NESTING));
        }
        let node = if self.eat('?') {
            self.parse_special_group(open_pos)?
        } else {
            self.parse_capture_group(open_pos, None)?
        };
        self.depth -= 1;
        Ok(node)
    }

    fn parse_special_group(&mut self, open_pos: usize) -> Result<NodeId> {
        match self.peek() {
            Some(':') => {
                self.bump();
                let child = self.parse_group_body(open_pos)?;
                Ok(self.ast.push(AstKind::Group { child }))
            }
            Some('=') => {
                self.bump();
                self.may_delegate = false;
                let child = self.parse_group_body(open_pos)?;
                Ok(self.ast.push(AstKind::Lookahead { child, negated: false }))
            }
            Some('!') => {
                self.bump();
                self.may_delegate = false;
                let child = self.parse_group_body(open_pos)?;
                Ok(self.ast.push(AstKind::Lookahead { child, negated: true }))
            }
            Some('>') => {
                self.bump();
                self.may_delegate = false;
                let child = self.parse_group_body(open_pos)?;
                Ok(self.ast.push(AstKind::Atomic { child }))
            }
            Some('<') => {
                self.bump();
                self.parse_angle_group(open_pos)
            }
            Some('&') => {
                self.bump();
                let name = self.parse_name(')', open_pos, NameContext::Group)?;
                self.may_delegate = false;
                self.pending_calls.push(PendingCall::Name { at: open_pos, name: name.clone() });
                Ok(self.ast.push(AstKind::Call { target: CallTarget::Name(name) }))
            }
            Some('R') => {
                self.bump();
                if !self.eat(')') {
                    return Err(RegexError::unknown_group_syntax(self.pattern, open_pos));
                }
                self.may_delegate = false;
                Ok(self.ast.push(AstKind::Call { target: CallTarget::Recursion }))
            }
            Some('(') => Err(RegexError::unsupported_feature(
                "conditional groups",
                "rewrite the conditional alternatives as an ordinary alternation",
                self.pattern,
                open_pos,
            )),
            Some(c) if c.is_ascii_digit() => {
                let number = self.parse_call_number(open_pos, ')')?;
                self.may_delegate = false;
                if number == 0 {
                    Ok(self.ast.push(AstKind::Call { target: CallTarget::Recursion }))
                } else {
                    self.pending_calls.push(PendingCall::Index { at: open_pos, number });
                    Ok(self.ast.push(AstKind::Call { target: CallTarget::Index(number) }))
                }
            }
            Some(_) => Err(RegexError::unknown_group_syntax(self.pattern, open_pos)),
            None => Err(RegexError::unclosed_group(self.pattern, open_pos)),
        }
    }

    /// Dispatch for `(?<`: lookbehind on `=`/`!`, numbered subroutine call
    /// when the name begins with a digit, otherwise a named capture.
    fn parse_angle_group(&mut self, open_pos: usize) -> Result<NodeId> {
        match self.peek() {
            Some('=') => {
                self.bump();
                self.may_delegate = false;
                let child = self.parse_group_body(open_pos)?;
                let node = self.ast.push(AstKind::Lookbehind {
                    child,
                    negated: false,
                    bounds: Default::default(),
                });
                self.lookbehinds.push(node);
                Ok(node)
            }
            Some('!') => {
                self.bump();
                self.may_delegate = false;
                let child = self.parse_group_body(open_pos)?;
                let node = self.ast.push(AstKind::Lookbehind {
                    child,
                    negated: true,
                    bounds: Default::default(),
                });
                self.lookbehinds.push(node);
                Ok(node)
            }
            Some(c) if c.is_ascii_digit() => {
                // `(?<2>)` is the angle form of the numbered call `(?2)`.
                let number = self.parse_call_number(open_pos, '>')?;
                if !self.eat(')') {
                    return Err(RegexError::unknown_group_syntax(self.pattern, open_pos));
                }
                self.may_delegate = false;
                if number == 0 {
                    Ok(self.ast.push(AstKind::Call { target: CallTarget::Recursion }))
                } else {
                    self.pending_calls.push(PendingCall::Index { at: open_pos, number });
                    Ok(self.ast.push(AstKind::Call { target: CallTarget::Index(number) }))
                }
            }
            Some(_) => {
                let name = self.parse_name('>', open_pos, NameContext::Group)?;
                self.parse_capture_group(open_pos, Some(name))
            }
            None => Err(RegexError::unclosed_group_name(self.pattern, open_pos)),
        }
    }

    fn parse_capture_group(&mut self, open_pos: usize, name: Option<String>) -> Result<NodeId> {
        let number = self.groups.len() as u32 + 1;
        self.groups.push(None);
        if let Some(name) = &name {
            self.names.insert(name.clone(), number);
        }
        let child = self.parse_group_body(open_pos)?;
        let node = self.ast.push(AstKind::Capture { child, index: number, name });
        self.groups[number as usize - 1] = Some(node);
        Ok(node)
    }

    fn parse_group_body(&mut self, open_pos: usize) -> Result<NodeId> {
        let child = self.parse_alternation()?;
        if !self.eat(')') {
            return Err(RegexError::unclosed_group(self.pattern, open_pos));
        }
        Ok(child)
    }

    fn parse_call_number(&mut self, open_pos: usize, terminator: char) -> Result<u32> {
        let mut digits = String::new();
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    self.bump();
                    digits.push(c);
                }
                Some(c) if c == terminator => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    return Err(RegexError::empty_group_name(self.pattern, self.pos));
                }
                None => return Err(RegexError::unclosed_group(self.pattern, open_pos)),
            }
        }
        digits
            .parse::<u32>()
            .map_err(|_| RegexError::compilation("subroutine call number too large", self.pattern, open_pos))
    }

    fn parse_name(
        &mut self,
        terminator: char,
        open_pos: usize,
        context: NameContext,
    ) -> Result<String> {
        let name_pos = self.pos;
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if c == terminator => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    self.bump();
                    name.push(c);
                }
                None => {
                    return Err(match context {
                        NameContext::Group => {
                            RegexError::unclosed_group_name(self.pattern, open_pos)
                        }
                        NameContext::Backref => {
                            RegexError::unclosed_backref_name(self.pattern, open_pos)
                        }
                    });
                }
            }
        }
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => is_name_start(first) && chars.all(is_name_continue),
            None => false,
        };
        if !valid {
            return Err(RegexError::empty_group_name(self.pattern, name_pos));
        }
        Ok(name)
    }

    // ---- post-parse passes ------------------------------------------------

    fn resolve_calls(&self) -> Result<()> {
        for call in &self.pending_calls {
            match call {
                PendingCall::Index { at, number } => {
                    if *number == 0 || *number as usize > self.groups.len() {
                        return Err(RegexError::unknown_call_number(self.pattern, *at, *number));
                    }
                }
                PendingCall::Name { at, name } => {
                    if !self.names.contains_key(name) {
                        return Err(RegexError::unknown_call_name(self.pattern, *at, name));
                    }
                }
            }
        }
        Ok(())
    }

    fn cache_lookbehind_bounds(&mut self) {
        for &node in &self.lookbehinds {
            let child = match self.ast.node(node) {
                AstKind::Lookbehind { child, .. } => *child,
                _ => continue,
            };
            let bounds = length_bounds(&self.ast, child).clamp_max(LOOKBEHIND_LIMIT);
            if let AstKind::Lookbehind { bounds: slot, .. } = self.ast.node_mut(node) {
                *slot = bounds;
            }
        }
    }

    fn finish(self, root: NodeId) -> Result<CompiledPattern> {
        let mut groups = Vec::with_capacity(self.groups.len());
        for (i, slot) in self.groups.into_iter().enumerate() {
            match slot {
                Some(node) => groups.push(node),
                None => {
                    return Err(RegexError::compilation(
                        format!("internal: group {} never closed", i + 1),
                        self.pattern,
                        0,
                    ));
                }
            }
        }
        Ok(CompiledPattern::new(
            self.pattern.to_string(),
            self.ast,
            root,
            groups,
            self.names,
            self.options,
            self.may_delegate,
        ))
    }
}

#[derive(Clone, Copy)]
enum NameContext {
    Group,
    Backref,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use onig_error::{ErrorKind, codes};
    use pretty_assertions::assert_eq;

    fn compile(pattern: &str) -> CompiledPattern {
        match parse(pattern, RegexOptions::default()) {
            Ok(compiled) => compiled,
            Err(err) => panic!("{pattern}: {err}"),
        }
    }

    fn compile_err(pattern: &str) -> RegexError {
        match parse(pattern, RegexOptions::default()) {
            Ok(_) => panic!("{pattern}: expected a compile error"),
            Err(err) => err,
        }
    }

    #[test]
    fn literal_runs_merge() {
        let compiled = compile("abc");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Literal { text, .. } if text == "abc"
        ));
    }

    #[test]
    fn quantifier_binds_to_last_character() {
        // `abc+` repeats only the `c`.
        let compiled = compile("abc+");
        let AstKind::Sequence { children } = compiled.ast().node(compiled.root()) else {
            panic!("expected sequence");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(
            compiled.ast().node(children[0]),
            AstKind::Literal { text, .. } if text == "ab"
        ));
        let AstKind::Repeat { child, min: 1, max: None, mode: RepeatMode::Greedy } =
            compiled.ast().node(children[1])
        else {
            panic!("expected greedy plus");
        };
        assert!(matches!(
            compiled.ast().node(*child),
            AstKind::Literal { text, .. } if text == "c"
        ));
    }

    #[test]
    fn interval_quantifiers() {
        let compiled = compile("a{2,5}");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Repeat { min: 2, max: Some(5), mode: RepeatMode::Greedy, .. }
        ));
        let compiled = compile("a{3,}?");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Repeat { min: 3, max: None, mode: RepeatMode::Lazy, .. }
        ));
        let compiled = compile("a{4}+");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Repeat { min: 4, max: Some(4), mode: RepeatMode::Possessive, .. }
        ));
    }

    #[test]
    fn non_interval_brace_is_literal() {
        let compiled = compile("a{,2}");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Literal { text, .. } if text == "a{,2}"
        ));
        let compiled = compile("{x}");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Literal { text, .. } if text == "{x}"
        ));
    }

    #[test]
    fn reversed_interval_is_malformed() {
        let err = compile_err("a{3,1}");
        assert_eq!(err.code, Some(codes::MALFORMED_REPEAT));
        assert_eq!(err.position, Some(1));
    }

    #[test]
    fn leading_quantifier_has_no_target() {
        let err = compile_err("*a");
        assert_eq!(err.code, Some(codes::REPEAT_WITHOUT_TARGET));
        let err = compile_err("a|{2}b");
        assert_eq!(err.code, Some(codes::REPEAT_WITHOUT_TARGET));
    }

    #[test]
    fn quantified_anchor_is_rejected() {
        let err = compile_err("^*a");
        assert_eq!(err.code, Some(codes::REPEAT_WITHOUT_TARGET));
        assert_eq!(err.position, Some(1));
    }

    #[test]
    fn group_numbering_follows_open_parens() {
        let compiled = compile("((a)(b))(?<x>c)");
        assert_eq!(compiled.group_count(), 4);
        assert_eq!(compiled.group_index("x"), Some(4));
        assert_eq!(compiled.group_name(4), Some("x"));
        assert_eq!(compiled.group_name(1), None);
    }

    #[test]
    fn named_group_and_backref() {
        let compiled = compile("(?<word>\\w+)\\s+\\k<word>");
        assert_eq!(compiled.group_count(), 1);
        assert_eq!(compiled.group_index("word"), Some(1));
        assert!(!compiled.may_delegate());
    }

    #[test]
    fn lookbehind_disambiguates_from_named_group() {
        let compiled = compile("(?<=ab)c");
        let AstKind::Sequence { children } = compiled.ast().node(compiled.root()) else {
            panic!("expected sequence");
        };
        assert!(matches!(
            compiled.ast().node(children[0]),
            AstKind::Lookbehind { negated: false, .. }
        ));
        assert_eq!(compiled.group_count(), 0);
    }

    #[test]
    fn lookbehind_bounds_are_cached() {
        let compiled = compile("(?<=abc)x");
        for id in compiled.ast().ids() {
            if let AstKind::Lookbehind { bounds, .. } = compiled.ast().node(id) {
                assert_eq!(bounds.min, 3);
                assert_eq!(bounds.max, Some(3));
                return;
            }
        }
        panic!("no lookbehind node");
    }

    #[test]
    fn unbounded_lookbehind_saturates_at_limit() {
        let compiled = compile("(?<=a+)x");
        for id in compiled.ast().ids() {
            if let AstKind::Lookbehind { bounds, .. } = compiled.ast().node(id) {
                assert_eq!(bounds.min, 1);
                assert_eq!(bounds.max, Some(LOOKBEHIND_LIMIT));
                return;
            }
        }
        panic!("no lookbehind node");
    }

    #[test]
    fn subroutine_calls_and_recursion() {
        let compiled = compile("(a)(?1)");
        assert!(!compiled.may_delegate());
        let compiled = compile("\\((?:[^()]|(?R))*\\)");
        assert!(!compiled.may_delegate());
        // Forward references are legal.
        compile("(?2)(a)(b)");
        // The angle form is the same call.
        compile("(a)(?<1>)");
    }

    #[test]
    fn unknown_subroutine_number_is_rejected() {
        let err = compile_err("(a)(?5)");
        assert_eq!(err.kind, ErrorKind::Compilation);
        assert_eq!(err.code, Some(codes::UNKNOWN_CALL_TARGET));
        let err = compile_err("(?&missing)(a)");
        assert_eq!(err.code, Some(codes::UNKNOWN_CALL_TARGET));
    }

    #[test]
    fn conditionals_are_unsupported_with_suggestion() {
        let err = compile_err("(?(1)a|b)");
        assert_eq!(err.kind, ErrorKind::UnsupportedFeature);
        assert_eq!(err.feature(), Some("conditional groups"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn compile_error_positions() {
        assert_eq!(compile_err("[unclosed").position, Some(0));
        assert_eq!(compile_err("(ab").position, Some(0));
        assert_eq!(compile_err("ab)").position, Some(2));
        assert_eq!(compile_err("ab\\").position, Some(2));
        assert_eq!(compile_err("(?<name").position, Some(0));
        assert_eq!(compile_err("a(?'x')").code, Some(codes::UNKNOWN_GROUP_SYNTAX));
    }

    #[test]
    fn empty_and_invalid_names_are_rejected() {
        assert_eq!(compile_err("(?<>a)").code, Some(codes::EMPTY_GROUP_NAME));
        assert_eq!(compile_err("\\k<>").code, Some(codes::EMPTY_GROUP_NAME));
        assert_eq!(compile_err("(?<a b>x)").code, Some(codes::EMPTY_GROUP_NAME));
    }

    #[test]
    fn delegation_bit_survives_simple_patterns() {
        assert!(compile("^a(b|c)[d-f]{2,3}$").may_delegate());
        assert!(compile("(?:ab)+(?<name>c)").may_delegate());
        assert!(!compile("a+?").may_delegate());
        assert!(!compile("a++").may_delegate());
        assert!(!compile("(?=a)").may_delegate());
        assert!(!compile("(?<!a)b").may_delegate());
        assert!(!compile("(?>ab)").may_delegate());
        assert!(!compile("(a)\\1").may_delegate());
    }

    #[test]
    fn class_ranges_and_literal_dash() {
        let compiled = compile("[a-z-]");
        let AstKind::Class { set, negated: false } = compiled.ast().node(compiled.root()) else {
            panic!("expected class");
        };
        assert!(set.contains('m'));
        assert!(set.contains('-'));
        assert!(!set.contains('A'));
    }

    #[test]
    fn negated_class() {
        let compiled = compile("[^abc]");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Class { negated: true, .. }
        ));
    }

    #[test]
    fn empty_alternation_branch() {
        let compiled = compile("a|");
        let AstKind::Alternation { branches } = compiled.ast().node(compiled.root()) else {
            panic!("expected alternation");
        };
        assert_eq!(branches.len(), 2);
        assert!(matches!(
            compiled.ast().node(branches[1]),
            AstKind::Sequence { children } if children.is_empty()
        ));
    }

    #[test]
    fn escaped_metacharacters_are_literals() {
        let compiled = compile("\\(\\)\\.");
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Literal { text, .. } if text == "()."
        ));
    }

    #[test]
    fn ignore_case_is_recorded_on_literals() {
        let options = RegexOptions { ignore_case: true, ..Default::default() };
        let compiled = match parse("HELLO", options) {
            Ok(c) => c,
            Err(err) => panic!("{err}"),
        };
        assert!(matches!(
            compiled.ast().node(compiled.root()),
            AstKind::Literal { ignore_case: true, .. }
        ));
    }

    #[test]
    fn nesting_budget_is_enforced() {
        let deep = "(".repeat(MAX_GROUP_NESTING + 1) + "a" + &")".repeat(MAX_GROUP_NESTING + 1);
        let err = compile_err(&deep);
        assert_eq!(err.code, Some(codes::NESTING_TOO_DEEP));
    }
}
