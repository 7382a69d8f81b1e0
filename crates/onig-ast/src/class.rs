//! Character-class membership sets.

/// One entry of a [`ClassSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassItem {
    /// A single code point.
    Char(char),
    /// An inclusive code-point range.
    Range(char, char),
    /// `\d` — ASCII digits.
    Digit,
    /// `\D` — anything but an ASCII digit.
    NotDigit,
    /// `\s` — ASCII whitespace (space, `\t`, `\n`, `\v`, `\f`, `\r`).
    Space,
    /// `\S` — anything but ASCII whitespace.
    NotSpace,
    /// `\w` — `[A-Za-z0-9_]`.
    Word,
    /// `\W` — anything but `[A-Za-z0-9_]`.
    NotWord,
}

/// A set of code points built from single characters, inclusive ranges, and
/// the shorthand escape classes.
///
/// Negation of a whole class (`[^...]`) is a property of the AST node, not of
/// the set; the shorthand items keep their own polarity so `[\D]` works.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassSet {
    items: Vec<ClassItem>,
}

fn is_ascii_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_ascii_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{b}' | '\u{c}' | '\r')
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl ClassSet {
    /// An empty set.
    pub fn new() -> Self {
        ClassSet::default()
    }

    /// Add a single code point.
    pub fn push_char(&mut self, c: char) {
        self.items.push(ClassItem::Char(c));
    }

    /// Add an inclusive range. Reversed bounds are stored as given and simply
    /// never match.
    pub fn push_range(&mut self, lo: char, hi: char) {
        self.items.push(ClassItem::Range(lo, hi));
    }

    /// Add the members of `\d`.
    pub fn push_digit(&mut self) {
        self.items.push(ClassItem::Digit);
    }

    /// Add the members of `\D`.
    pub fn push_not_digit(&mut self) {
        self.items.push(ClassItem::NotDigit);
    }

    /// Add the members of `\s`.
    pub fn push_space(&mut self) {
        self.items.push(ClassItem::Space);
    }

    /// Add the members of `\S`.
    pub fn push_not_space(&mut self) {
        self.items.push(ClassItem::NotSpace);
    }

    /// Add the members of `\w`.
    pub fn push_word(&mut self) {
        self.items.push(ClassItem::Word);
    }

    /// Add the members of `\W`.
    pub fn push_not_word(&mut self) {
        self.items.push(ClassItem::NotWord);
    }

    /// The set matched by a bare `\d` atom.
    pub fn digit() -> Self {
        ClassSet { items: vec![ClassItem::Digit] }
    }

    /// The set matched by a bare `\s` atom.
    pub fn space() -> Self {
        ClassSet { items: vec![ClassItem::Space] }
    }

    /// The set matched by a bare `\w` atom.
    pub fn word() -> Self {
        ClassSet { items: vec![ClassItem::Word] }
    }

    /// Whether the set has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Membership test.
    pub fn contains(&self, c: char) -> bool {
        self.items.iter().any(|item| match *item {
            ClassItem::Char(m) => c == m,
            ClassItem::Range(lo, hi) => lo <= c && c <= hi,
            ClassItem::Digit => is_ascii_digit(c),
            ClassItem::NotDigit => !is_ascii_digit(c),
            ClassItem::Space => is_ascii_space(c),
            ClassItem::NotSpace => !is_ascii_space(c),
            ClassItem::Word => is_word(c),
            ClassItem::NotWord => !is_word(c),
        })
    }
}
