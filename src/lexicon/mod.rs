//! Static per-dialect lexical tables.
//!
//! A [`Lexicon`] is plain immutable data: keyword phrase sets (keyed by the
//! lowercased, single-spaced phrase), block opener/closer pairs, string and
//! comment delimiters, and placeholder syntax. Everything lives in `static`s so
//! a lexicon can be shared by any number of concurrent format calls.

pub mod common;
pub mod dialects;

use crate::token::TokenKind;

/// A keyword set, keyed by lowercase phrase with single spaces between words.
pub type Words = phf::Set<&'static str>;

/// Longest keyword phrase, in words, that any lexicon declares.
pub const MAX_PHRASE_WORDS: usize = 4;

/// The kind of structural context an opener pushes during layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContext {
    Paren,
    Case,
    ProceduralBlock,
}

/// How an opening token behaves once pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opener {
    pub context: BlockContext,
    /// Keyword that ends the block header (`IF ... THEN`, `WHILE ... DO`).
    /// `None` means the body starts right after the opener.
    pub header_end: Option<&'static str>,
}

/// A fixed-delimiter string style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringStyle {
    pub open: u8,
    pub close: u8,
    /// Backslash escapes the next byte. A doubled closing delimiter is always an escape.
    pub backslash: bool,
}

impl StringStyle {
    pub const fn quoted(quote: u8) -> Self {
        Self {
            open: quote,
            close: quote,
            backslash: false,
        }
    }

    pub const fn escaped(quote: u8) -> Self {
        Self {
            open: quote,
            close: quote,
            backslash: true,
        }
    }
}

/// Placeholder prefixes and numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSyntax {
    /// Prefixes of indexed placeholders: a bare `?`, or a prefix followed by digits.
    pub indexed: &'static [u8],
    /// Prefixes of named placeholders: prefix followed by a name or quoted name.
    pub named: &'static [u8],
    /// Number written for the first parameter (`$1` is index 0 when the base is 1).
    pub base: usize,
}

/// Per-dialect lexical configuration.
#[derive(Debug)]
pub struct Lexicon {
    pub name: &'static str,
    pub top_level: &'static [&'static Words],
    pub top_level_no_indent: &'static [&'static Words],
    pub newline: &'static [&'static Words],
    pub reserved: &'static [&'static Words],
    /// Word openers (`case`, `begin`, ...). `(` and `[` are handled by the tokenizer.
    pub openers: &'static phf::Map<&'static str, Opener>,
    /// Closer phrase to the opener keys it may close.
    pub closers: &'static phf::Map<&'static str, &'static [&'static str]>,
    /// Keywords that split a procedural block into sections (`ELSE`, `EXCEPTION`).
    pub block_sections: &'static Words,
    pub strings: &'static [StringStyle],
    /// Single-letter prefixes that introduce a `'...'` literal, with their escape rule.
    pub prefixed_strings: &'static [(u8, bool)],
    pub dollar_quotes: bool,
    /// `[` is an array/subscript bracket rather than a quoted identifier.
    pub bracket_parens: bool,
    pub line_comments: &'static [&'static str],
    pub placeholders: PlaceholderSyntax,
    /// Prefixes of session/user variables that lex as a single word (`@var`, `@@global`).
    pub variable_prefixes: &'static [u8],
}

fn in_any(sets: &[&Words], key: &str) -> bool {
    sets.iter().any(|set| set.contains(key))
}

impl Lexicon {
    /// Classify a lowercased, single-spaced phrase. Closers are checked before
    /// everything else so that `end if` never degrades to a bare `end`.
    pub fn classify(&self, key: &str) -> Option<TokenKind> {
        if self.closers.contains_key(key) {
            Some(TokenKind::CloseParen)
        } else if in_any(self.top_level, key) {
            Some(TokenKind::ReservedTopLevel)
        } else if in_any(self.top_level_no_indent, key) {
            Some(TokenKind::ReservedTopLevelNoIndent)
        } else if in_any(self.newline, key) {
            Some(TokenKind::ReservedNewline)
        } else if self.openers.contains_key(key) {
            Some(TokenKind::OpenParen)
        } else if in_any(self.reserved, key) {
            Some(TokenKind::Reserved)
        } else {
            None
        }
    }

    /// Opener behaviour for a lowercased opener text, including `(` and `[`.
    pub fn opener(&self, key: &str) -> Option<Opener> {
        match key {
            "(" | "[" => Some(Opener {
                context: BlockContext::Paren,
                header_end: None,
            }),
            _ => self.openers.get(key).copied(),
        }
    }

    /// Whether the closer `closer_key` closes a context opened by `opener_key`.
    pub fn closes(&self, closer_key: &str, opener_key: &str) -> bool {
        match closer_key {
            ")" => opener_key == "(",
            "]" => opener_key == "[",
            _ => self
                .closers
                .get(closer_key)
                .is_some_and(|openers| openers.contains(&opener_key)),
        }
    }

    pub fn is_block_section(&self, key: &str) -> bool {
        self.block_sections.contains(key)
    }

    pub fn is_line_comment_start(&self, bytes: &[u8]) -> bool {
        self.line_comments
            .iter()
            .any(|marker| bytes.starts_with(marker.as_bytes()))
    }

    pub fn string_style(&self, b: u8) -> Option<StringStyle> {
        self.strings.iter().copied().find(|s| s.open == b)
    }
}
