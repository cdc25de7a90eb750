use std::io::Write;

use termcolor::{Ansi, Color, ColorSpec, WriteColor};

use crate::token::TokenKind;

fn spec_for(kind: TokenKind) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    if kind.is_reserved() {
        spec.set_fg(Some(Color::Blue)).set_bold(true);
    } else if kind.is_comment() {
        spec.set_dimmed(true);
    } else if kind.is_placeholder() {
        spec.set_fg(Some(Color::Yellow));
    } else {
        match kind {
            TokenKind::String => spec.set_fg(Some(Color::Green)),
            TokenKind::Number => spec.set_fg(Some(Color::Magenta)),
            _ => return None,
        };
    }
    Some(spec)
}

fn paint(spec: &ColorSpec, text: &str) -> std::io::Result<String> {
    let mut out = Ansi::new(Vec::with_capacity(text.len() + 16));
    out.set_color(spec)?;
    out.write_all(text.as_bytes())?;
    out.reset()?;
    Ok(String::from_utf8_lossy(&out.into_inner()).into_owned())
}

/// Wrap `text` in the ANSI escapes for its token kind.
///
/// Kinds without a color pass through unchanged.
pub fn ansi_decorator(kind: TokenKind, text: &str) -> String {
    let Some(spec) = spec_for(kind) else {
        return text.to_string();
    };
    paint(&spec, text).unwrap_or_else(|_| text.to_string())
}

/// Remove ANSI escape sequences, leaving the visible text.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        }
    }
    out
}
