use compact_str::CompactString;

/// Position in source string (byte offset).
pub type Pos = usize;

/// All token kinds produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    LineComment,
    BlockComment,
    ReservedTopLevel,
    ReservedTopLevelNoIndent,
    ReservedNewline,
    Reserved,
    OpenParen,
    CloseParen,
    String,
    IndexedPlaceholder,
    NamedPlaceholder,
    Number,
    Operator,
    Word,
}

impl TokenKind {
    pub fn is_whitespace(self) -> bool {
        matches!(self, Self::Whitespace)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Keyword kinds, the ones affected by the keyword-case transform.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Self::ReservedTopLevel
                | Self::ReservedTopLevelNoIndent
                | Self::ReservedNewline
                | Self::Reserved
        )
    }

    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::IndexedPlaceholder | Self::NamedPlaceholder)
    }

    /// Tokens that may not appear inside a paren group collapsed onto one line.
    pub fn breaks_inline_block(self) -> bool {
        matches!(
            self,
            Self::ReservedTopLevel
                | Self::ReservedTopLevelNoIndent
                | Self::ReservedNewline
                | Self::LineComment
                | Self::BlockComment
        )
    }
}

/// Lookup key recorded on placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderKey {
    /// Zero-based index, already adjusted for the dialect's numbering base.
    /// `None` when the written number falls below the base.
    Index(Option<usize>),
    Name(CompactString),
}

/// An immutable token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
    pub pos: Pos,
    pub key: Option<PlaceholderKey>,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, pos: Pos) -> Self {
        Self {
            kind,
            text: CompactString::from(text),
            pos,
            key: None,
        }
    }

    pub fn placeholder(kind: TokenKind, text: &str, pos: Pos, key: PlaceholderKey) -> Self {
        Self {
            kind,
            text: CompactString::from(text),
            pos,
            key: Some(key),
        }
    }

    /// True for an `Operator` token with exactly this text.
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Open/close parens that are punctuation rather than keywords.
    pub fn is_bracket(&self) -> bool {
        matches!(self.kind, TokenKind::OpenParen | TokenKind::CloseParen)
            && matches!(self.text.as_str(), "(" | ")" | "[" | "]")
    }

    /// Lowercased text with internal whitespace runs collapsed to one space.
    /// Used as the lookup key for keyword tokens.
    pub fn key_text(&self) -> CompactString {
        normalize_phrase(&self.text).to_ascii_lowercase().into()
    }
}

/// Collapse every whitespace run inside a multi-word phrase to a single space.
pub fn normalize_phrase(text: &str) -> CompactString {
    if !text.bytes().any(|b| b.is_ascii_whitespace()) {
        return CompactString::from(text);
    }
    let mut out = CompactString::with_capacity(text.len());
    for (i, word) in text.split_ascii_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
