//! The layout engine: one left-to-right pass over the token sequence that
//! decides line breaks, indentation and spacing.
//!
//! Indentation is driven by a stack of open block contexts. Each frame knows
//! the indent of the line that opened it (`outer`, where its closer goes) and
//! the base indent of its body (`base`, where top-level keywords inside it
//! go). Clause content sits one level below the base.

use compact_str::CompactString;

pub use crate::lexicon::BlockContext;

use crate::config::{Config, KeywordCase};
use crate::dialect::Dialect;
use crate::inline_block::InlineBlocks;
use crate::lexicon::Lexicon;
use crate::token::{normalize_phrase, Token, TokenKind};
use crate::tokenizer::would_merge;

/// Maximum number of open block contexts. Deeper openers are emitted as
/// plain content.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Wraps a token's emitted text, e.g. with ANSI colors.
pub type Decorator<'a> = &'a dyn Fn(TokenKind, &str) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Select,
    Set,
    Values,
    Limit,
    Other,
}

fn clause_for(key: &str) -> Clause {
    match key {
        "select" => Clause::Select,
        "set" | "do update set" | "on duplicate key update" => Clause::Set,
        "values" => Clause::Values,
        "limit" => Clause::Limit,
        _ => Clause::Other,
    }
}

#[derive(Debug)]
struct Frame {
    context: BlockContext,
    key: CompactString,
    outer: usize,
    base: usize,
    inline: bool,
    clause: Option<Clause>,
    /// Keyword that will end the block header, while still inside it.
    header_end: Option<&'static str>,
    /// Next column slot of a `VALUES` tuple being aligned.
    value_slot: Option<usize>,
}

/// Mutable state of one layout pass.
#[derive(Debug, Default)]
pub struct LayoutState {
    stack: Vec<Frame>,
    root_clause: Option<Clause>,
    procedural_depth: usize,
    /// Openers skipped because the stack was full.
    overflow: usize,
    warned: bool,
}

impl LayoutState {
    /// Number of open procedural blocks.
    pub fn procedural_depth(&self) -> usize {
        self.procedural_depth
    }

    /// Indent of clause content at the current position.
    pub fn depth(&self) -> usize {
        match self.stack.last() {
            Some(frame) => frame.base + usize::from(frame.clause.is_some()),
            None => usize::from(self.root_clause.is_some()),
        }
    }

    fn base(&self) -> usize {
        self.stack.last().map_or(0, |f| f.base)
    }

    fn clause(&self) -> Option<Clause> {
        match self.stack.last() {
            Some(frame) => frame.clause,
            None => self.root_clause,
        }
    }

    fn set_clause(&mut self, clause: Option<Clause>) {
        match self.stack.last_mut() {
            Some(frame) => frame.clause = clause,
            None => self.root_clause = clause,
        }
    }

    fn top(&self) -> Option<&Frame> {
        self.stack.last()
    }

    fn top_mut(&mut self) -> Option<&mut Frame> {
        self.stack.last_mut()
    }

    fn in_inline(&self) -> bool {
        self.top().is_some_and(|f| f.inline)
    }

    fn in_header(&self) -> bool {
        self.top().is_some_and(|f| f.header_end.is_some())
    }

    fn top_procedural(&self) -> Option<&Frame> {
        self.top()
            .filter(|f| f.context == BlockContext::ProceduralBlock)
    }

    fn push(&mut self, frame: Frame) {
        if frame.context == BlockContext::ProceduralBlock {
            self.procedural_depth += 1;
        }
        self.stack.push(frame);
        self.check_invariant();
    }

    /// Pop the frame at `index`, discarding everything above it.
    fn pop_at(&mut self, index: usize) -> Option<Frame> {
        if index >= self.stack.len() {
            return None;
        }
        self.truncate(index + 1);
        let frame = self.stack.pop()?;
        if frame.context == BlockContext::ProceduralBlock {
            self.procedural_depth -= 1;
        }
        self.check_invariant();
        Some(frame)
    }

    /// Discard unterminated contexts so that only `len` remain.
    fn truncate(&mut self, len: usize) {
        if self.stack.len() <= len {
            return;
        }
        let discarded = self.stack.split_off(len);
        tracing::debug!(count = discarded.len(), "discarding unterminated contexts");
        // Overflowed openers sat above every discarded frame.
        self.overflow = 0;
        self.procedural_depth -= discarded
            .iter()
            .filter(|f| f.context == BlockContext::ProceduralBlock)
            .count();
        self.check_invariant();
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.procedural_depth,
            self.stack
                .iter()
                .filter(|f| f.context == BlockContext::ProceduralBlock)
                .count()
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorKind {
    Alias,
    Assign,
    Value,
}

/// A column position recorded for the alignment post-pass.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    kind: AnchorKind,
    slot: usize,
    /// Byte offset into the line text.
    offset: usize,
    /// Visible column relative to the start of the line text.
    col: usize,
}

#[derive(Debug, Default)]
struct Line {
    indent: usize,
    text: String,
    width: usize,
    anchors: Vec<Anchor>,
}

impl Line {
    fn new(indent: usize) -> Self {
        Self {
            indent,
            ..Self::default()
        }
    }

    fn anchor(&self, kind: AnchorKind, slot: usize) -> Option<Anchor> {
        self.anchors
            .iter()
            .copied()
            .find(|a| a.kind == kind && a.slot == slot)
    }
}

/// Accumulates output lines. Line breaks are lazy: `newline` only records
/// the indent of the next line, which is opened when text is written.
struct Writer {
    done: Vec<Line>,
    line: Line,
    break_at: Option<usize>,
    blank_lines: usize,
    unit_width: usize,
}

impl Writer {
    fn new(unit_width: usize) -> Self {
        Self {
            done: Vec::new(),
            line: Line::default(),
            break_at: None,
            blank_lines: 0,
            unit_width,
        }
    }

    fn newline(&mut self, indent: usize) {
        self.break_at = Some(indent);
    }

    fn blank(&mut self, lines: usize) {
        self.blank_lines = self.blank_lines.max(lines);
    }

    fn break_pending(&self) -> bool {
        self.break_at.is_some()
    }

    fn at_line_start(&self) -> bool {
        self.break_at.is_some() || self.line.text.is_empty()
    }

    /// Indent of the line the next token lands on.
    fn indent(&self) -> usize {
        self.break_at.unwrap_or(self.line.indent)
    }

    fn column(&self) -> usize {
        match self.break_at {
            Some(indent) => indent * self.unit_width,
            None => self.line.indent * self.unit_width + self.line.width,
        }
    }

    /// Open the pending line, or write a separating space.
    fn start(&mut self, space: bool) {
        if let Some(indent) = self.break_at.take() {
            if self.line.text.is_empty() {
                self.line.indent = indent;
            } else {
                let finished = std::mem::replace(&mut self.line, Line::new(indent));
                self.done.push(finished);
                for _ in 0..self.blank_lines {
                    self.done.push(Line::default());
                }
            }
            self.blank_lines = 0;
        } else if space && !self.line.text.is_empty() {
            self.line.text.push(' ');
            self.line.width += 1;
        }
    }

    fn write(&mut self, text: &str, width: usize) {
        self.line.text.push_str(text);
        match text.rfind('\n') {
            Some(_) => self.line.width = width,
            None => self.line.width += width,
        }
    }

    fn anchor(&mut self, kind: AnchorKind, slot: usize) {
        let anchor = Anchor {
            kind,
            slot,
            offset: self.line.text.len(),
            col: self.line.width,
        };
        self.line.anchors.push(anchor);
    }

    fn line_has(&self, kind: AnchorKind) -> bool {
        !self.break_pending() && self.line.anchors.iter().any(|a| a.kind == kind)
    }

    /// Whether text can be appended to the last written line.
    fn can_attach(&self) -> bool {
        !self.line.text.is_empty()
    }

    fn current_indent(&self) -> usize {
        self.line.indent
    }

    fn finish(mut self) -> Vec<Line> {
        self.done.push(self.line);
        self.done
    }
}

struct Layout<'a> {
    tokens: &'a [Token],
    config: &'a Config,
    dialect: &'a dyn Dialect,
    lexicon: &'static Lexicon,
    decorate: Option<Decorator<'a>>,
    case: KeywordCase,
    blocks: InlineBlocks,
    state: LayoutState,
    out: Writer,
    /// Index of the last emitted significant token.
    prev: Option<usize>,
    /// The last emitted token was a unary sign.
    unary: bool,
    /// A `BETWEEN` is waiting for its `AND`.
    between: bool,
    pending_anchor: Option<(AnchorKind, usize)>,
}

/// Lay out a token sequence as formatted text.
///
/// Never fails. The result has no trailing newline and no trailing spaces
/// outside of literals.
pub fn layout(
    tokens: &[Token],
    config: &Config,
    dialect: &dyn Dialect,
    decorate: Option<Decorator<'_>>,
) -> String {
    let case = match config.keyword_case {
        KeywordCase::Dialect => dialect.default_keyword_case(),
        other => other,
    };
    let layout = Layout {
        tokens,
        config,
        dialect,
        lexicon: dialect.lexicon(),
        decorate,
        case,
        blocks: InlineBlocks::new(tokens),
        state: LayoutState::default(),
        out: Writer::new(config.indent.chars().count().max(1)),
        prev: None,
        unary: false,
        between: false,
        pending_anchor: None,
    };
    layout.run()
}

fn is_keyword(token: &Token) -> bool {
    token.kind.is_reserved()
        || (matches!(token.kind, TokenKind::OpenParen | TokenKind::CloseParen) && !token.is_bracket())
}

impl<'a> Layout<'a> {
    fn run(mut self) -> String {
        let tokens = self.tokens;
        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Whitespace => continue,
                TokenKind::LineComment | TokenKind::BlockComment => {
                    self.comment(i, token);
                    continue;
                }
                TokenKind::ReservedTopLevel => self.top_level(i, token),
                TokenKind::ReservedTopLevelNoIndent => self.top_level_no_indent(i, token),
                TokenKind::ReservedNewline => self.newline_keyword(i, token),
                TokenKind::OpenParen => self.open(i, token),
                TokenKind::CloseParen => self.close(i, token),
                TokenKind::Operator if token.text == ";" => self.semicolon(i, token),
                TokenKind::Operator if token.text == "," => self.comma(i, token),
                TokenKind::Reserved if self.ends_header(token) => self.header_end(i, token),
                _ => self.content(i, token),
            }
            self.prev = Some(i);
        }
        self.finish()
    }

    // ---- Emission ----

    fn display_text(&self, token: &Token) -> String {
        if is_keyword(token) {
            self.case.apply(&normalize_phrase(&token.text))
        } else {
            token.text.to_string()
        }
    }

    fn emit(&mut self, i: usize, token: &Token) {
        let space = self.space_before(i, token);
        self.out.start(space);
        if let Some((kind, slot)) = self.pending_anchor.take() {
            self.out.anchor(kind, slot);
        }
        let text = self.display_text(token);
        self.write(token.kind, &text);
        self.unary = self.is_unary_sign(token);
    }

    fn write(&mut self, kind: TokenKind, text: &str) {
        let width = text.rsplit('\n').next().unwrap_or(text).chars().count();
        match self.decorate {
            Some(decorate) => self.out.write(&decorate(kind, text), width),
            None => self.out.write(text, width),
        }
    }

    fn prev_token(&self) -> Option<&'a Token> {
        self.prev.map(|p| &self.tokens[p])
    }

    fn source_space_before(&self, i: usize) -> bool {
        i.checked_sub(1)
            .is_some_and(|p| self.tokens[p].kind.is_whitespace() || self.tokens[p].kind.is_comment())
    }

    fn space_before(&self, i: usize, token: &Token) -> bool {
        let Some(prev) = self.prev_token() else {
            return false;
        };
        self.spaced(i, prev, token) || would_merge(prev, token, self.lexicon)
    }

    fn spaced(&self, i: usize, prev: &Token, token: &Token) -> bool {
        if self.unary {
            return false;
        }
        if prev.is_bracket() && matches!(prev.text.as_str(), "(" | "[") {
            return false;
        }
        if token.is_bracket() && matches!(token.text.as_str(), ")" | "]") {
            return false;
        }
        if token.kind == TokenKind::Operator && !self.dialect.operator_spacing(&token.text).before {
            return false;
        }
        if prev.kind == TokenKind::Operator && !self.dialect.operator_spacing(&prev.text).after {
            return false;
        }
        if token.kind == TokenKind::OpenParen && token.is_bracket() {
            if token.text == "[" && self.dialect.array_bracket_space() && prev.key_text() == "array" {
                return true;
            }
            if prev.kind != TokenKind::Operator {
                return self.source_space_before(i);
            }
        }
        true
    }

    fn is_unary_sign(&self, token: &Token) -> bool {
        if !(token.is_operator("+") || token.is_operator("-")) {
            return false;
        }
        match self.prev_token() {
            None => true,
            Some(prev) => matches!(prev.kind, TokenKind::Operator | TokenKind::OpenParen)
                || prev.kind.is_reserved(),
        }
    }

    // ---- Token handlers ----

    fn content(&mut self, i: usize, token: &Token) {
        if token.kind == TokenKind::Reserved {
            let key = token.key_text();
            if matches!(key.as_str(), "between" | "not between") {
                self.between = true;
            }
            if key == "as"
                && self.config.align_columns
                && self.state.clause() == Some(Clause::Select)
                && !self.state.in_inline()
                && !self.out.line_has(AnchorKind::Alias)
            {
                self.pending_anchor = Some((AnchorKind::Alias, 0));
            }
        } else if self.config.align_assignments
            && !self.state.in_inline()
            && !self.out.line_has(AnchorKind::Assign)
        {
            let assign = (token.is_operator("=") && self.state.clause() == Some(Clause::Set))
                || (token.is_operator(":=") && self.state.top_procedural().is_some());
            if assign {
                self.pending_anchor = Some((AnchorKind::Assign, 0));
            }
        }
        self.emit(i, token);
    }

    fn top_level(&mut self, i: usize, token: &Token) {
        if self.state.in_inline() || self.state.in_header() {
            return self.content(i, token);
        }
        let base = self.state.base();
        self.between = false;
        self.out.newline(base);
        self.emit(i, token);
        self.state.set_clause(Some(clause_for(&token.key_text())));
        self.out.newline(base + 1);
    }

    fn top_level_no_indent(&mut self, i: usize, token: &Token) {
        if self.state.in_inline() || self.state.in_header() {
            return self.content(i, token);
        }
        let base = self.state.base();
        self.between = false;
        self.out.newline(base);
        self.emit(i, token);
        self.state.set_clause(None);
        self.out.newline(base);
    }

    fn newline_keyword(&mut self, i: usize, token: &Token) {
        let key = token.key_text();
        if key == "and" && self.between {
            self.between = false;
            return self.content(i, token);
        }
        if self.state.in_inline() || self.state.in_header() {
            return self.content(i, token);
        }
        if let Some(frame) = self.state.top_procedural() {
            let outer = frame.outer;
            if self.lexicon.is_block_section(&key) {
                return self.block_section(i, token, &key);
            }
            if key == "until" {
                self.out.newline(outer);
                return self.emit(i, token);
            }
        }
        self.out.newline(self.state.depth());
        self.emit(i, token);
    }

    /// `ELSE`, `ELSIF`, `EXCEPTION`: a new section of the innermost procedural block.
    fn block_section(&mut self, i: usize, token: &Token, key: &str) {
        let Some(frame) = self.state.top_procedural() else {
            return self.content(i, token);
        };
        let (outer, base) = (frame.outer, frame.base);
        self.out.newline(outer);
        self.emit(i, token);
        let reopens_header = matches!(key, "elsif" | "elseif");
        if let Some(frame) = self.state.top_mut() {
            frame.clause = None;
            if reopens_header {
                frame.header_end = Some("then");
            }
        }
        if !reopens_header {
            self.out.newline(base);
        }
    }

    fn ends_header(&self, token: &Token) -> bool {
        self.state
            .top()
            .and_then(|f| f.header_end)
            .is_some_and(|end| token.key_text() == end)
    }

    fn header_end(&mut self, i: usize, token: &Token) {
        self.emit(i, token);
        if let Some(frame) = self.state.top_mut() {
            frame.header_end = None;
            let base = frame.base;
            self.out.newline(base);
        }
    }

    fn comma(&mut self, i: usize, token: &Token) {
        self.emit(i, token);
        if let Some(frame) = self.state.top_mut() {
            if let Some(slot) = frame.value_slot.as_mut() {
                *slot += 1;
                self.pending_anchor = Some((AnchorKind::Value, *slot));
            }
        }
        if self.state.in_inline()
            || self.state.in_header()
            || self.state.clause() == Some(Clause::Limit)
        {
            return;
        }
        self.out.newline(self.state.depth());
    }

    fn semicolon(&mut self, i: usize, token: &Token) {
        self.between = false;
        if self.state.procedural_depth() > 0 {
            let block = self
                .state
                .stack
                .iter()
                .rposition(|f| f.context == BlockContext::ProceduralBlock);
            if let Some(index) = block {
                self.state.truncate(index + 1);
                self.emit(i, token);
                if let Some(frame) = self.state.top_mut() {
                    frame.clause = None;
                    frame.header_end = None;
                    let base = frame.base;
                    self.out.newline(base);
                }
                return;
            }
        }
        self.state.truncate(0);
        self.state.overflow = 0;
        self.state.root_clause = None;
        self.emit(i, token);
        self.out.newline(0);
        self.out.blank(self.config.lines_between_queries);
    }

    fn overflowed(&mut self) -> bool {
        if self.state.stack.len() < MAX_NESTING_DEPTH {
            return false;
        }
        if !self.state.warned {
            tracing::warn!(
                limit = MAX_NESTING_DEPTH,
                "nesting limit reached; deeper blocks are left flat"
            );
            self.state.warned = true;
        }
        self.state.overflow += 1;
        true
    }

    fn open(&mut self, i: usize, token: &Token) {
        if self.overflowed() {
            return self.content(i, token);
        }
        if token.is_bracket() {
            return self.open_bracket(i, token);
        }
        let key = token.key_text();
        let Some(opener) = self.lexicon.opener(&key) else {
            return self.content(i, token);
        };
        match opener.context {
            BlockContext::ProceduralBlock => self.open_procedural(i, token, key, opener.header_end),
            BlockContext::Case | BlockContext::Paren => {
                let inline = self.state.in_inline();
                self.emit(i, token);
                let outer = self.out.indent();
                self.state.push(Frame {
                    context: opener.context,
                    key,
                    outer,
                    base: outer + 1,
                    inline,
                    clause: None,
                    header_end: None,
                    value_slot: None,
                });
            }
        }
    }

    fn open_bracket(&mut self, i: usize, token: &Token) {
        let inline = self.state.in_inline() || {
            let column = self.out.column() + usize::from(!self.out.at_line_start());
            let available = match self.config.max_line_length {
                0 => None,
                max => Some(max.saturating_sub(column)),
            };
            self.blocks.fits(i, available)
        };
        let tuple = inline
            && self.config.align_values
            && !self.state.in_inline()
            && self.state.clause() == Some(Clause::Values);
        self.emit(i, token);
        let outer = self.out.indent();
        self.state.push(Frame {
            context: BlockContext::Paren,
            key: token.text.clone(),
            outer,
            base: outer + 1,
            inline,
            clause: None,
            header_end: None,
            value_slot: tuple.then_some(0),
        });
        if tuple {
            self.pending_anchor = Some((AnchorKind::Value, 0));
        }
        if !inline {
            self.out.newline(outer + 1);
        }
    }

    fn open_procedural(
        &mut self,
        i: usize,
        token: &Token,
        key: CompactString,
        header_end: Option<&'static str>,
    ) {
        let continues_declare = key == "begin"
            && self
                .state
                .top_procedural()
                .is_some_and(|f| f.key == "declare");
        if continues_declare {
            if let Some(frame) = self.state.top_mut() {
                frame.key = key;
                frame.clause = None;
                let (outer, base) = (frame.outer, frame.base);
                self.out.newline(outer);
                self.emit(i, token);
                self.out.newline(base);
            }
            return;
        }

        if matches!(key.as_str(), "begin" | "declare") {
            self.out.newline(self.state.base());
        }
        self.emit(i, token);
        let outer = self.out.indent();
        self.state.push(Frame {
            context: BlockContext::ProceduralBlock,
            key,
            outer,
            base: outer + 1,
            inline: false,
            clause: None,
            header_end,
            value_slot: None,
        });
        if header_end.is_none() {
            self.out.newline(outer + 1);
        }
    }

    fn close(&mut self, i: usize, token: &Token) {
        if self.state.overflow > 0 {
            self.state.overflow -= 1;
            return self.content(i, token);
        }
        let key = if token.is_bracket() {
            token.text.clone()
        } else {
            token.key_text()
        };
        let lexicon = self.lexicon;
        let found = self
            .state
            .stack
            .iter()
            .rposition(|f| lexicon.closes(&key, &f.key));
        let Some(frame) = found.and_then(|index| self.state.pop_at(index)) else {
            tracing::debug!(closer = %key, pos = token.pos, "unmatched closer");
            return self.content(i, token);
        };
        if !frame.inline {
            self.out.newline(frame.outer);
        }
        self.emit(i, token);
    }

    fn comment(&mut self, i: usize, token: &Token) {
        let starts_line = match i.checked_sub(1).map(|p| &self.tokens[p]) {
            None => true,
            Some(prev) => prev.kind.is_whitespace() && (i == 1 || prev.text.contains('\n')),
        };
        let ends_line = token.kind == TokenKind::LineComment
            || self
                .tokens
                .get(i + 1)
                .is_some_and(|next| next.kind.is_whitespace() && next.text.contains('\n'));

        let attach = !starts_line && self.out.at_line_start() && self.out.can_attach();
        if attach {
            self.out.line.text.push(' ');
            self.out.line.width += 1;
        } else {
            if starts_line && !self.out.at_line_start() {
                self.out.newline(self.state.depth());
            }
            self.out.start(true);
        }

        let text = match token.kind {
            TokenKind::LineComment => token.text.trim_end().to_string(),
            _ if self.config.preserve_comment_indent => token.text.to_string(),
            _ => self.reindent_block_comment(&token.text, self.out.current_indent()),
        };
        self.write(token.kind, &text);

        if ends_line && !self.out.break_pending() {
            self.out.newline(self.state.depth());
        }
    }

    fn reindent_block_comment(&self, text: &str, indent: usize) -> String {
        let mut lines = text.split('\n');
        let mut out = lines.next().unwrap_or_default().trim_end().to_string();
        let prefix = self.config.indent.repeat(indent);
        for line in lines {
            out.push('\n');
            let line = line.trim();
            if !line.is_empty() {
                out.push_str(&prefix);
                out.push(' ');
                out.push_str(line);
            }
        }
        out
    }

    // ---- Output ----

    fn finish(self) -> String {
        let mut lines = self.out.finish();
        if self.config.align_columns {
            align(&mut lines, AnchorKind::Alias);
        }
        if self.config.align_assignments {
            align(&mut lines, AnchorKind::Assign);
        }
        if self.config.align_values {
            align(&mut lines, AnchorKind::Value);
        }
        render(&lines, &self.config.indent)
    }
}

fn render(lines: &[Line], unit: &str) -> String {
    let mut out = String::new();
    for line in lines {
        if !line.text.is_empty() {
            for _ in 0..line.indent {
                out.push_str(unit);
            }
            out.push_str(line.text.trim_end());
        }
        out.push('\n');
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

/// Pad anchors so that each slot lines up across runs of consecutive lines
/// with the same indent.
fn align(lines: &mut [Line], kind: AnchorKind) {
    let mut start = 0;
    while start < lines.len() {
        let indent = lines[start].indent;
        let mut end = start + 1;
        while end < lines.len() && lines[end].indent == indent && !lines[end].text.is_empty() {
            end += 1;
        }
        align_group(&mut lines[start..end], kind);
        start = end;
    }
}

fn align_group(group: &mut [Line], kind: AnchorKind) {
    let Some(max_slot) = group
        .iter()
        .flat_map(|l| l.anchors.iter())
        .filter(|a| a.kind == kind)
        .map(|a| a.slot)
        .max()
    else {
        return;
    };
    // Bytes and columns inserted so far, per line.
    let mut shift = vec![(0usize, 0usize); group.len()];
    for slot in 0..=max_slot {
        let cols: Vec<Option<usize>> = group
            .iter()
            .zip(&shift)
            .map(|(line, &(_, cols))| line.anchor(kind, slot).map(|a| a.col + cols))
            .collect();
        if cols.iter().flatten().count() < 2 {
            continue;
        }
        let target = cols.iter().flatten().copied().max().unwrap_or(0);
        for ((line, shift), col) in group.iter_mut().zip(shift.iter_mut()).zip(cols) {
            let (Some(anchor), Some(col)) = (line.anchor(kind, slot), col) else {
                continue;
            };
            let pad = target - col;
            if pad > 0 {
                line.text.insert_str(anchor.offset + shift.0, &" ".repeat(pad));
                shift.0 += pad;
                shift.1 += pad;
            }
        }
    }
}
