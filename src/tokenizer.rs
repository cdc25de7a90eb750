use compact_str::CompactString;
use memchr::{memchr, memchr2, memmem};
use smallvec::SmallVec;

use crate::lexicon::{Lexicon, StringStyle, MAX_PHRASE_WORDS};
use crate::token::{PlaceholderKey, Token, TokenKind};

/// Split `text` into a lossless sequence of tokens.
///
/// Never fails: every byte of the input ends up in exactly one token, and
/// concatenating the token texts reproduces `text`. Bytes that match nothing
/// become single-character `Operator` tokens.
pub fn tokenize(text: &str, lexicon: &Lexicon) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(text, lexicon);
    tokenizer.run();
    tokenizer.tokens
}

/// Whether writing `next` directly after `prev` would lex as different
/// tokens, e.g. `1` and `.` becoming the number `1.`, or `-` and `-`
/// opening a line comment.
pub fn would_merge(prev: &Token, next: &Token, lexicon: &Lexicon) -> bool {
    let len = prev.text.len();
    let mut joined: SmallVec<[u8; 16]> = SmallVec::new();
    joined.extend_from_slice(prev.text.as_bytes());
    joined.extend_from_slice(next.text.as_bytes());
    match prev.kind {
        TokenKind::Number => scan_number(&joined) != len,
        TokenKind::Operator => {
            let compound = scan_compound_operator(&joined);
            lexicon.is_line_comment_start(&joined)
                || joined.starts_with(b"/*")
                || (compound != 0 && compound != len)
                // `.5` may re-lex as a fraction depending on what precedes it.
                || (prev.text == "." && next.text.starts_with(|c: char| c.is_ascii_digit()))
        }
        _ => false,
    }
}

struct Tokenizer<'a> {
    src: &'a str,
    lexicon: &'a Lexicon,
    tokens: Vec<Token>,
    /// Index of the last token that is neither whitespace nor a comment.
    last_significant: Option<usize>,
    /// Next index handed out to a bare `?`.
    next_positional: usize,
}

/// One lexing step: kind, byte length, optional placeholder key.
type Step = (TokenKind, usize, Option<PlaceholderKey>);

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str, lexicon: &'a Lexicon) -> Self {
        Self {
            src,
            lexicon,
            tokens: Vec::with_capacity(src.len() / 4 + 1),
            last_significant: None,
            next_positional: 0,
        }
    }

    fn run(&mut self) {
        let mut pos = 0;
        while pos < self.src.len() {
            let (kind, len, key) = self.lex_one(pos);
            debug_assert!(len > 0 && self.src.is_char_boundary(pos + len));
            let text = &self.src[pos..pos + len];
            let token = match key {
                Some(key) => Token::placeholder(kind, text, pos, key),
                None => Token::new(kind, text, pos),
            };
            if !kind.is_whitespace() && !kind.is_comment() {
                self.last_significant = Some(self.tokens.len());
            }
            self.tokens.push(token);
            pos += len;
        }
    }

    fn last(&self) -> Option<&Token> {
        self.last_significant.map(|i| &self.tokens[i])
    }

    fn lex_one(&mut self, pos: usize) -> Step {
        let rest = &self.src.as_bytes()[pos..];
        let b0 = rest[0];

        // 1. Whitespace
        if b0.is_ascii_whitespace() {
            let len = rest
                .iter()
                .position(|b| !b.is_ascii_whitespace())
                .unwrap_or(rest.len());
            return (TokenKind::Whitespace, len, None);
        }

        // 2. Comments
        if self.lexicon.is_line_comment_start(rest) {
            return (TokenKind::LineComment, scan_line_comment(rest), None);
        }
        if rest.starts_with(b"/*") {
            let len = scan_block_comment(rest);
            if !rest[..len].ends_with(b"*/") || len < 4 {
                tracing::debug!(pos, "unterminated block comment runs to end of input");
            }
            return (TokenKind::BlockComment, len, None);
        }

        // 3. Dollar-quoted strings
        if b0 == b'$' && self.lexicon.dollar_quotes {
            let len = scan_dollar_string(rest);
            if len > 0 {
                return (TokenKind::String, len, None);
            }
        }

        // 4. Fixed-delimiter strings, with or without a letter prefix
        if let Some(style) = self.lexicon.string_style(b0) {
            return (TokenKind::String, scan_string(rest, style), None);
        }
        if rest.len() > 1 && rest[1] == b'\'' {
            if let Some(&(_, backslash)) = self
                .lexicon
                .prefixed_strings
                .iter()
                .find(|(prefix, _)| *prefix == b0)
            {
                let style = StringStyle {
                    open: b'\'',
                    close: b'\'',
                    backslash,
                };
                return (TokenKind::String, 1 + scan_string(&rest[1..], style), None);
            }
        }

        // 5-6. Keywords, multi-word phrases and compound closers
        if is_word_start(b0) {
            return self.lex_word(rest);
        }

        // 7. Placeholders and session variables
        if let Some(step) = self.lex_placeholder(rest) {
            return step;
        }
        if self.lexicon.variable_prefixes.contains(&b0) {
            let sigils = if rest.get(1) == Some(&b0) { 2 } else { 1 };
            let word = scan_word(&rest[sigils..]);
            if word > 0 {
                return (TokenKind::Word, sigils + word, None);
            }
        }

        // 8. Numbers, brackets, operators
        if b0.is_ascii_digit() || (b0 == b'.' && self.starts_fraction(rest)) {
            return (TokenKind::Number, scan_number(rest), None);
        }
        match b0 {
            b'(' => return (TokenKind::OpenParen, 1, None),
            b')' => return (TokenKind::CloseParen, 1, None),
            b'[' if self.lexicon.bracket_parens => return (TokenKind::OpenParen, 1, None),
            b']' if self.lexicon.bracket_parens => return (TokenKind::CloseParen, 1, None),
            _ => {}
        }
        let len = scan_compound_operator(rest);
        if len > 0 {
            return (TokenKind::Operator, len, None);
        }
        let len = self.src[pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        (TokenKind::Operator, len, None)
    }

    fn starts_fraction(&self, rest: &[u8]) -> bool {
        rest.get(1).is_some_and(u8::is_ascii_digit)
            && !self.last().is_some_and(|t| {
                matches!(
                    t.kind,
                    TokenKind::Word | TokenKind::CloseParen | TokenKind::String
                )
            })
    }

    fn lex_word(&mut self, rest: &[u8]) -> Step {
        let first = scan_word(rest);
        let after_dot = self.last().is_some_and(|t| t.is_operator("."));
        if after_dot || !rest[0].is_ascii_alphabetic() {
            return (TokenKind::Word, first, None);
        }

        // Collect up to MAX_PHRASE_WORDS whitespace-separated words, then try
        // the longest candidate phrase first.
        let mut spans: SmallVec<[(usize, usize); MAX_PHRASE_WORDS]> = SmallVec::new();
        spans.push((0, first));
        let mut end = first;
        while spans.len() < MAX_PHRASE_WORDS {
            let gap = rest[end..]
                .iter()
                .position(|b| !b.is_ascii_whitespace())
                .unwrap_or(rest.len() - end);
            let start = end + gap;
            if gap == 0 || start >= rest.len() || !rest[start].is_ascii_alphabetic() {
                break;
            }
            let len = scan_word(&rest[start..]);
            spans.push((start, start + len));
            end = start + len;
        }

        let mut key = CompactString::default();
        for count in (1..=spans.len()).rev() {
            key.clear();
            for (i, &(s, e)) in spans[..count].iter().enumerate() {
                if i > 0 {
                    key.push(' ');
                }
                for &b in &rest[s..e] {
                    key.push(b.to_ascii_lowercase() as char);
                }
            }
            if let Some(kind) = self.lexicon.classify(&key) {
                let len = spans[count - 1].1;
                return (self.refine_keyword(kind, &key, &rest[len..]), len, None);
            }
        }
        (TokenKind::Word, first, None)
    }

    /// Context checks that demote a block opener to a plain keyword.
    fn refine_keyword(&self, kind: TokenKind, key: &str, after: &[u8]) -> TokenKind {
        if kind != TokenKind::OpenParen {
            return kind;
        }
        let next = next_word_lower(after);
        let demote = match key {
            "begin" => {
                let next_byte = after.iter().find(|b| !b.is_ascii_whitespace());
                next_byte.is_none()
                    || next_byte == Some(&b';')
                    || matches!(
                        next.as_deref(),
                        Some(
                            "transaction"
                                | "work"
                                | "deferred"
                                | "immediate"
                                | "exclusive"
                                | "isolation"
                        )
                    )
            }
            "if" => {
                let exists_follows = match next.as_deref() {
                    Some("exists") => true,
                    Some("not") => {
                        let start = after
                            .iter()
                            .position(|b| !b.is_ascii_whitespace())
                            .unwrap_or(0);
                        next_word_lower(&after[start + 3..]).as_deref() == Some("exists")
                    }
                    _ => false,
                };
                exists_follows || !self.at_statement_start()
            }
            "while" | "repeat" => !self.at_statement_start(),
            _ => false,
        };
        if demote {
            TokenKind::Reserved
        } else {
            kind
        }
    }

    /// True when the previous significant token ends a statement or a block header.
    fn at_statement_start(&self) -> bool {
        let Some(tok) = self.last() else {
            return true;
        };
        if tok.is_operator(";") {
            return true;
        }
        if tok.kind == TokenKind::OpenParen && !tok.is_bracket() {
            return tok.key_text() != "case";
        }
        matches!(
            tok.key_text().as_str(),
            "then" | "else" | "do" | "loop" | "repeat" | "exception"
        )
    }

    fn lex_placeholder(&mut self, rest: &[u8]) -> Option<Step> {
        let syntax = self.lexicon.placeholders;
        let b0 = rest[0];
        if syntax.indexed.contains(&b0) {
            let digits = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 0 {
                let written: Option<usize> = std::str::from_utf8(&rest[1..=digits])
                    .ok()
                    .and_then(|s| s.parse().ok());
                let index = written.and_then(|n| n.checked_sub(syntax.base));
                return Some((
                    TokenKind::IndexedPlaceholder,
                    1 + digits,
                    Some(PlaceholderKey::Index(index)),
                ));
            }
            if b0 == b'?' {
                let index = self.next_positional;
                self.next_positional += 1;
                return Some((
                    TokenKind::IndexedPlaceholder,
                    1,
                    Some(PlaceholderKey::Index(Some(index))),
                ));
            }
        }
        if syntax.named.contains(&b0) && rest.len() > 1 {
            let body = &rest[1..];
            let (len, name) = match body[0] {
                b'"' | b'`' | b'\'' => {
                    let len = scan_string(body, StringStyle::quoted(body[0]));
                    (len, trim_quotes(&body[..len]))
                }
                b'[' => {
                    let len = memchr(b']', body).map_or(body.len(), |i| i + 1);
                    (len, trim_quotes(&body[..len]))
                }
                b if is_word_start(b) || b.is_ascii_digit() => {
                    let len = scan_word(body);
                    (len, body[..len].to_vec())
                }
                _ => return None,
            };
            let name = String::from_utf8_lossy(&name);
            return Some((
                TokenKind::NamedPlaceholder,
                1 + len,
                Some(PlaceholderKey::Name(CompactString::from(name.as_ref()))),
            ));
        }
        None
    }
}

fn trim_quotes(quoted: &[u8]) -> Vec<u8> {
    let inner = match quoted {
        [open, inner @ .., close] if closes_quote(*open, *close) => inner,
        [_, inner @ ..] => inner,
        [] => quoted,
    };
    inner.to_vec()
}

fn closes_quote(open: u8, close: u8) -> bool {
    match open {
        b'[' => close == b']',
        _ => open == close,
    }
}

#[inline]
fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn next_word_lower(bytes: &[u8]) -> Option<String> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    let len = scan_word(&bytes[start..]);
    if len == 0 {
        return None;
    }
    Some(String::from_utf8_lossy(&bytes[start..start + len]).to_ascii_lowercase())
}

/// Scan an identifier (word characters: alphanumeric + underscore + `$`
/// after the first byte). Returns byte length of the identifier.
#[inline]
fn scan_word(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphanumeric() || b == b'_' || (b == b'$' && i > 0) {
            i += 1;
        } else if b >= 0x80 {
            // Non-ASCII: could be unicode identifier. Accept it.
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// Scan a number starting at bytes[0]. Handles:
/// - Hex (0x...), binary (0b...), octal (0o...)
/// - Decimal with optional fractional part and scientific notation
///
/// A `..` range operator after the integer part is left alone.
/// Returns byte length.
fn scan_number(bytes: &[u8]) -> usize {
    let len = bytes.len();
    if len == 0 {
        return 0;
    }

    let mut i = 0;

    // Check for 0x, 0b, 0o prefixed literals
    if bytes[0] == b'0' && len > 2 {
        let radix = match bytes[1] {
            b'x' | b'X' => 16,
            b'b' | b'B' => 2,
            b'o' | b'O' => 8,
            _ => 0,
        };
        let is_digit = |b: u8| radix > 0 && (b as char).is_digit(radix);
        if is_digit(bytes[2]) {
            i = 2;
            while i < len && (is_digit(bytes[i]) || bytes[i] == b'_') {
                i += 1;
            }
            return i;
        }
    }

    // Integer part: digits and underscores
    while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        i += 1;
    }

    // Decimal part
    if i < len && bytes[i] == b'.' && bytes.get(i + 1) != Some(&b'.') {
        i += 1;
        while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
            i += 1;
        }
    }

    // Scientific notation
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < len && bytes[j].is_ascii_digit() {
            i = j;
            while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
                i += 1;
            }
        }
    }

    i
}

/// Scan a string literal starting at its opening delimiter. A doubled closing
/// delimiter is an escaped delimiter; backslash escapes apply only when the
/// style allows them. Unterminated strings run to end of input.
/// Returns the byte length including delimiters.
fn scan_string(bytes: &[u8], style: StringStyle) -> usize {
    let mut i = 1;
    while i < bytes.len() {
        let hit = if style.backslash {
            memchr2(style.close, b'\\', &bytes[i..])
        } else {
            memchr(style.close, &bytes[i..])
        };
        let Some(offset) = hit else {
            break;
        };
        let pos = i + offset;
        if bytes[pos] == b'\\' && style.backslash {
            i = pos + 2;
            continue;
        }
        if bytes.get(pos + 1) == Some(&style.close) {
            i = pos + 2;
            continue;
        }
        return pos + 1;
    }
    tracing::debug!("unterminated string literal runs to end of input");
    bytes.len()
}

/// Scan a line comment (`--` or `#`). Returns byte length up to, not including, the newline.
fn scan_line_comment(bytes: &[u8]) -> usize {
    memchr(b'\n', bytes).unwrap_or(bytes.len())
}

/// Scan a block comment. `bytes` starts at `/*`. Returns byte length including delimiters.
fn scan_block_comment(bytes: &[u8]) -> usize {
    match memmem::find(&bytes[2..], b"*/") {
        Some(offset) => offset + 4,
        None => bytes.len(),
    }
}

/// Scan a dollar-quoted string (`$tag$...$tag$`). `bytes` starts at `$`.
/// Returns 0 when the bytes do not open a dollar-quoted string.
fn scan_dollar_string(bytes: &[u8]) -> usize {
    // Find the end of the opening tag
    let mut tag_end = 1;
    while tag_end < bytes.len()
        && (bytes[tag_end].is_ascii_alphanumeric() || bytes[tag_end] == b'_')
    {
        tag_end += 1;
    }
    if tag_end >= bytes.len() || bytes[tag_end] != b'$' {
        return 0;
    }
    if tag_end > 1 && bytes[1].is_ascii_digit() {
        // `$1$` is a placeholder followed by `$`, never a tag
        return 0;
    }
    let tag = &bytes[..=tag_end]; // e.g. $$ or $tag$

    match memmem::find(&bytes[tag.len()..], tag) {
        Some(offset) => tag.len() + offset + tag.len(),
        None => {
            tracing::debug!(
                tag = %String::from_utf8_lossy(tag),
                "unterminated dollar-quoted string runs to end of input"
            );
            bytes.len()
        }
    }
}

/// Scan a compound operator starting at bytes[0].
/// Returns byte length of the operator, or 0 if no compound operator.
fn scan_compound_operator(bytes: &[u8]) -> usize {
    let len = bytes.len();
    if len < 2 {
        return 0;
    }
    let b1 = bytes[1];
    let b2 = bytes.get(2).copied().unwrap_or(0);
    match bytes[0] {
        b'>' => match b1 {
            b'=' | b'>' => 2, // >= >>
            _ => 0,
        },
        b'<' => match (b1, b2) {
            (b'=', b'>') | (b'-', b'>') | (b'#', b'>') => 3, // <=> <-> <#>
            (b'<', b'=') => 3,                              // <<=
            (b'>' | b'=' | b'<' | b'@', _) => 2,            // <> <= << <@
            _ => 0,
        },
        b'=' => match b1 {
            b'>' | b'=' => 2, // => ==
            _ => 0,
        },
        b'!' => match (b1, b2) {
            (b'~', b'*') => 3,     // !~*
            (b'=' | b'~', _) => 2, // != !~
            _ => 0,
        },
        b'-' => match (b1, b2) {
            (b'>', b'>') => 3, // ->>
            (b'|', b'-') => 3, // -|-
            (b'>', _) => 2,    // ->
            _ => 0,
        },
        b'|' => match (b1, b2) {
            (b'|', b'/') => 3,     // ||/
            (b'|' | b'/', _) => 2, // || |/
            _ => 0,
        },
        b'&' => match b1 {
            b'&' | b'<' | b'>' => 2, // && &< &>
            _ => 0,
        },
        b'*' if b1 == b'*' => 2, // **
        b'~' => match b1 {
            b'*' | b'~' | b'=' => 2, // ~* ~~ ~=
            _ => 0,
        },
        b'@' => match (b1, b2) {
            (b'-', b'@') => 3,     // @-@
            (b'>' | b'@', _) => 2, // @> @@
            _ => 0,
        },
        b'?' => match b1 {
            b'|' | b'&' => 2, // ?| ?&
            _ => 0,
        },
        b'#' => match (b1, b2) {
            (b'>', b'>') => 3,     // #>>
            (b'>' | b'-', _) => 2, // #> #-
            _ => 0,
        },
        b':' => match b1 {
            b':' | b'=' => 2, // :: :=
            _ => 0,
        },
        b'.' if b1 == b'.' => 2, // ..
        b'%' if b1 == b'%' => 2, // %%
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::dialects::{MYSQL, N1QL, PLSQL, POSTGRESQL, SQLITE, STANDARD};

    fn kinds(text: &str, lexicon: &Lexicon) -> Vec<(TokenKind, String)> {
        tokenize(text, lexicon)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    fn concat(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_scan_word() {
        assert_eq!(scan_word(b"hello world"), 5);
        assert_eq!(scan_word(b"my_var123"), 9);
        assert_eq!(scan_word(b"a$b"), 3);
        assert_eq!(scan_word(b"123abc"), 6);
    }

    #[test]
    fn test_scan_number() {
        assert_eq!(scan_number(b"42"), 2);
        assert_eq!(scan_number(b"3.14"), 4);
        assert_eq!(scan_number(b"1e10"), 4);
        assert_eq!(scan_number(b"0xFF"), 4);
        assert_eq!(scan_number(b"0b1010"), 6);
        assert_eq!(scan_number(b"0o777"), 5);
        assert_eq!(scan_number(b"1_000"), 5);
        assert_eq!(scan_number(b"1..10"), 1);
        assert_eq!(scan_number(b".5"), 2);
    }

    #[test]
    fn test_scan_string() {
        let plain = StringStyle::quoted(b'\'');
        let escaped = StringStyle::escaped(b'\'');
        assert_eq!(scan_string(b"'hello'", plain), 7);
        assert_eq!(scan_string(b"'it''s' x", plain), 7);
        assert_eq!(scan_string(b"'it\\'s'", escaped), 7);
        assert_eq!(scan_string(b"'a\\' b", plain), 4);
        assert_eq!(scan_string(b"'never closed", plain), 13);
    }

    #[test]
    fn test_scan_dollar_string() {
        assert_eq!(scan_dollar_string(b"$$a; b$$;"), 8);
        assert_eq!(scan_dollar_string(b"$fn$ x $$ y $fn$"), 16);
        assert_eq!(scan_dollar_string(b"$1, $2"), 0);
        assert_eq!(scan_dollar_string(b"$$ open"), 7);
    }

    #[test]
    fn test_scan_compound_operator() {
        assert_eq!(scan_compound_operator(b"->>'a'"), 3);
        assert_eq!(scan_compound_operator(b"#>'{a}'"), 2);
        assert_eq!(scan_compound_operator(b"::int"), 2);
        assert_eq!(scan_compound_operator(b"@>"), 2);
        assert_eq!(scan_compound_operator(b"<=>"), 3);
        assert_eq!(scan_compound_operator(b":= 1"), 2);
        assert_eq!(scan_compound_operator(b"+1"), 0);
    }

    #[test]
    fn test_lossless_reconstruction() {
        let inputs = [
            "SELECT a, b FROM t WHERE x = 'y''z' -- trailing\n/* block */ ;",
            "select $tag$ body ; $$ $tag$, e'\\n', [1]",
            "  \t\n",
            "café = 'naïve' AND ünïcode",
            "'unterminated",
            "/* unterminated",
        ];
        for input in inputs {
            for lexicon in [&STANDARD, &POSTGRESQL, &MYSQL, &SQLITE, &PLSQL, &N1QL] {
                assert_eq!(concat(&tokenize(input, lexicon)), input);
            }
        }
    }

    #[test]
    fn test_keywords_and_phrases() {
        let toks = kinds("select a from t left  outer\njoin u on a = b", &STANDARD);
        assert_eq!(toks[0], (TokenKind::ReservedTopLevel, "select".into()));
        assert_eq!(toks[2], (TokenKind::ReservedTopLevel, "from".into()));
        assert_eq!(
            toks[4],
            (TokenKind::ReservedNewline, "left  outer\njoin".into())
        );
        assert_eq!(toks[6], (TokenKind::Reserved, "on".into()));
    }

    #[test]
    fn test_keyword_after_dot_is_word() {
        let toks = kinds("t.select", &STANDARD);
        assert_eq!(toks[2], (TokenKind::Word, "select".into()));
    }

    #[test]
    fn test_compound_closers() {
        let toks = kinds("IF x THEN y; END IF; END LOOP", &POSTGRESQL);
        assert_eq!(toks[0], (TokenKind::OpenParen, "IF".into()));
        assert!(toks.contains(&(TokenKind::CloseParen, "END IF".into())));
        assert!(toks.contains(&(TokenKind::CloseParen, "END LOOP".into())));
    }

    #[test]
    fn test_block_opener_demotion() {
        let toks = kinds("DROP TABLE IF EXISTS t", &POSTGRESQL);
        assert!(toks.contains(&(TokenKind::Reserved, "IF".into())));
        let toks = kinds("SELECT IF(a, b, c)", &MYSQL);
        assert!(toks.contains(&(TokenKind::Reserved, "IF".into())));
        let toks = kinds("BEGIN; COMMIT;", &STANDARD);
        assert_eq!(toks[0], (TokenKind::Reserved, "BEGIN".into()));
        let toks = kinds("BEGIN TRANSACTION", &SQLITE);
        assert_eq!(toks[0], (TokenKind::Reserved, "BEGIN".into()));
        let toks = kinds("BEGIN SELECT 1; END", &STANDARD);
        assert_eq!(toks[0], (TokenKind::OpenParen, "BEGIN".into()));
    }

    #[test]
    fn test_if_not_condition_opens_block() {
        let toks = kinds("BEGIN IF NOT found THEN x := 1; END IF; END;", &POSTGRESQL);
        assert!(toks.contains(&(TokenKind::OpenParen, "IF".into())));
        let toks = kinds("CREATE TABLE IF NOT EXISTS t (a int)", &POSTGRESQL);
        assert!(toks.contains(&(TokenKind::Reserved, "IF".into())));
    }

    #[test]
    fn test_would_merge() {
        let tok = |kind: TokenKind, text: &str| Token::new(kind, text, 0);
        let number = tok(TokenKind::Number, "1");
        let dot = tok(TokenKind::Operator, ".");
        let minus = tok(TokenKind::Operator, "-");
        assert!(would_merge(&number, &dot, &STANDARD));
        assert!(!would_merge(&number, &tok(TokenKind::Operator, ".."), &PLSQL));
        assert!(would_merge(&dot, &dot, &STANDARD));
        assert!(!would_merge(&dot, &tok(TokenKind::Operator, "*"), &STANDARD));
        assert!(would_merge(&minus, &minus, &STANDARD));
        assert!(would_merge(&tok(TokenKind::Operator, "<"), &tok(TokenKind::Operator, "="), &STANDARD));
        assert!(!would_merge(&tok(TokenKind::Word, "t"), &dot, &STANDARD));
        assert!(would_merge(&dot, &tok(TokenKind::Number, "1"), &STANDARD));
        assert!(!would_merge(&tok(TokenKind::Operator, ".."), &tok(TokenKind::Number, "10"), &PLSQL));
    }

    #[test]
    fn test_dollar_quote_is_one_token() {
        let toks = kinds("SELECT $$a; b$$;", &POSTGRESQL);
        assert_eq!(toks[1], (TokenKind::String, "$$a; b$$".into()));
        assert_eq!(toks[2], (TokenKind::Operator, ";".into()));
    }

    #[test]
    fn test_operators() {
        let toks = kinds("a->>'k' || b::text @> c #> d", &POSTGRESQL);
        let ops: Vec<_> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Operator)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(ops, vec!["->>", "||", "::", "@>", "#>"]);
    }

    #[test]
    fn test_indexed_placeholders() {
        let toks = tokenize("SELECT ?, ?, $1", &STANDARD);
        let keys: Vec<_> = toks.iter().filter_map(|t| t.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                PlaceholderKey::Index(Some(0)),
                PlaceholderKey::Index(Some(1)),
                PlaceholderKey::Index(Some(1)),
            ]
        );

        let toks = tokenize("$1 $0", &POSTGRESQL);
        let keys: Vec<_> = toks.iter().filter_map(|t| t.key.clone()).collect();
        assert_eq!(
            keys,
            vec![PlaceholderKey::Index(Some(0)), PlaceholderKey::Index(None)]
        );
    }

    #[test]
    fn test_named_placeholders() {
        let toks = tokenize("a = :id AND b = @\"two words\" AND c = $n", &SQLITE);
        let names: Vec<_> = toks
            .iter()
            .filter(|t| t.kind == TokenKind::NamedPlaceholder)
            .map(|t| t.key.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                Some(PlaceholderKey::Name("id".into())),
                Some(PlaceholderKey::Name("two words".into())),
                Some(PlaceholderKey::Name("n".into())),
            ]
        );
    }

    #[test]
    fn test_cast_is_not_named_placeholder() {
        let toks = kinds("x::int", &POSTGRESQL);
        assert_eq!(toks[1], (TokenKind::Operator, "::".into()));
        assert_eq!(toks[2], (TokenKind::Word, "int".into()));
    }

    #[test]
    fn test_mysql_variables_and_comments() {
        let toks = kinds("SET @@session.x = @v # note", &MYSQL);
        assert_eq!(toks[1], (TokenKind::Word, "@@session".into()));
        assert!(toks.contains(&(TokenKind::Word, "@v".into())));
        assert_eq!(toks.last().unwrap().0, TokenKind::LineComment);
    }

    #[test]
    fn test_strings_per_dialect() {
        let toks = kinds("SELECT [col name] FROM t", &SQLITE);
        assert_eq!(toks[1], (TokenKind::String, "[col name]".into()));
        let toks = kinds("SELECT arr[1] FROM t", &POSTGRESQL);
        assert_eq!(toks[2], (TokenKind::OpenParen, "[".into()));
        let toks = kinds("SELECT E'a\\'b'", &POSTGRESQL);
        assert_eq!(toks[1], (TokenKind::String, "E'a\\'b'".into()));
    }

    #[test]
    fn test_plsql_range() {
        let toks = kinds("FOR i IN 1..10 LOOP", &PLSQL);
        assert!(toks.contains(&(TokenKind::Number, "1".into())));
        assert!(toks.contains(&(TokenKind::Operator, "..".into())));
        assert!(toks.contains(&(TokenKind::OpenParen, "LOOP".into())));
    }

    #[test]
    fn test_n1ql_use_keys() {
        let toks = kinds("SELECT * FROM b USE KEYS ['k1']", &N1QL);
        assert!(toks.contains(&(TokenKind::ReservedTopLevel, "USE KEYS".into())));
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", &STANDARD).is_empty());
    }
}
