use crate::token::{Token, TokenKind};

/// Precomputed answers to "does this bracket group fit on one line?".
///
/// Built once per format call in O(n). Each query is O(1): the matching close
/// index is stored per opener, and the width and breaking-token count of any
/// span come from prefix sums.
///
/// Widths ignore source whitespace (every significant token counts as its
/// text plus one separating space) so the answer is the same whether the
/// input is raw or already formatted.
pub struct InlineBlocks {
    close: Vec<Option<usize>>,
    /// `width[i]` is the estimated width of tokens `0..i`.
    width: Vec<usize>,
    /// `breaking[i]` is the number of breaking tokens in `0..i`.
    breaking: Vec<u32>,
}

fn token_width(token: &Token) -> usize {
    if token.kind.is_whitespace() {
        return 0;
    }
    let chars = if token.kind.is_reserved() {
        token.key_text().chars().count()
    } else {
        token.text.chars().count()
    };
    chars + 1
}

fn breaks_line(token: &Token) -> bool {
    token.kind.breaks_inline_block()
        || token.is_operator(";")
        || (token.kind == TokenKind::OpenParen && !token.is_bracket())
}

impl InlineBlocks {
    pub fn new(tokens: &[Token]) -> Self {
        let mut close = vec![None; tokens.len()];
        let mut width = Vec::with_capacity(tokens.len() + 1);
        let mut breaking = Vec::with_capacity(tokens.len() + 1);
        let mut open: Vec<usize> = Vec::new();
        width.push(0);
        breaking.push(0);

        for (i, token) in tokens.iter().enumerate() {
            width.push(width[i] + token_width(token));
            breaking.push(breaking[i] + u32::from(breaks_line(token)));

            if !token.is_bracket() {
                continue;
            }
            match token.text.as_str() {
                "(" | "[" => open.push(i),
                closer => {
                    let opener = if closer == ")" { "(" } else { "[" };
                    // Unbalanced brackets leave their opener unmatched.
                    if let Some(pos) = open.iter().rposition(|&o| tokens[o].text == opener) {
                        close[open[pos]] = Some(i);
                        open.truncate(pos);
                    }
                }
            }
        }

        Self {
            close,
            width,
            breaking,
        }
    }

    /// Index of the bracket closing the group opened at `open`.
    pub fn matching_close(&self, open: usize) -> Option<usize> {
        self.close.get(open).copied().flatten()
    }

    /// Estimated single-line width of the group opened at `open`, brackets included.
    pub fn width(&self, open: usize) -> Option<usize> {
        let close = self.matching_close(open)?;
        Some(self.width[close + 1] - self.width[open] - 1)
    }

    /// Whether the group opened at `open` can stay on one line when `available`
    /// columns remain. `None` means unlimited.
    pub fn fits(&self, open: usize, available: Option<usize>) -> bool {
        let Some(close) = self.matching_close(open) else {
            return false;
        };
        if self.breaking[close + 1] != self.breaking[open] {
            return false;
        }
        match (available, self.width(open)) {
            (None, _) => true,
            (Some(available), Some(width)) => width <= available,
            (Some(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::dialects::{POSTGRESQL, STANDARD};
    use crate::tokenizer::tokenize;

    fn open_index(tokens: &[Token], nth: usize) -> usize {
        tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.text == "(" || t.text == "[")
            .nth(nth)
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_matching_close() {
        let tokens = tokenize("f(a, (b), c) + (d", &STANDARD);
        let outer = open_index(&tokens, 0);
        let inner = open_index(&tokens, 1);
        let dangling = open_index(&tokens, 2);
        assert_eq!(tokens[blocks(&tokens).matching_close(outer).unwrap()].text, ")");
        assert_eq!(
            blocks(&tokens).matching_close(inner),
            Some(inner + 2),
        );
        assert_eq!(blocks(&tokens).matching_close(dangling), None);
    }

    fn blocks(tokens: &[Token]) -> InlineBlocks {
        InlineBlocks::new(tokens)
    }

    #[test]
    fn test_width_ignores_source_whitespace() {
        let tight = tokenize("(a,b)", &STANDARD);
        let loose = tokenize("(  a ,\n  b  )", &STANDARD);
        assert_eq!(blocks(&tight).width(0), blocks(&loose).width(0));
    }

    #[test]
    fn test_fits_with_limit() {
        let tokens = tokenize("(1, 2, 3)", &STANDARD);
        let table = blocks(&tokens);
        let width = table.width(0).unwrap();
        assert!(table.fits(0, None));
        assert!(table.fits(0, Some(width)));
        assert!(!table.fits(0, Some(width - 1)));
    }

    #[test]
    fn test_breaking_tokens_prevent_inline() {
        let tokens = tokenize("(SELECT 1)", &STANDARD);
        assert!(!blocks(&tokens).fits(0, None));

        let tokens = tokenize("(a -- note\n)", &STANDARD);
        assert!(!blocks(&tokens).fits(0, None));

        let tokens = tokenize("(CASE WHEN a THEN 1 END)", &STANDARD);
        assert!(!blocks(&tokens).fits(0, None));
    }

    #[test]
    fn test_breaking_tokens_outside_do_not_count() {
        let tokens = tokenize("SELECT count(*) FROM t", &STANDARD);
        let open = open_index(&tokens, 0);
        assert!(blocks(&tokens).fits(open, None));
    }

    #[test]
    fn test_square_brackets() {
        let tokens = tokenize("ARRAY[1, 2]", &POSTGRESQL);
        let open = open_index(&tokens, 0);
        assert!(blocks(&tokens).fits(open, Some(80)));
    }
}
