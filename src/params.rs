use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::Deserialize;

use crate::token::{PlaceholderKey, Token};

/// Values substituted for placeholders during formatting.
///
/// Deserializes from a TOML array (positional) or table (named).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParameterSet {
    Positional(Vec<String>),
    Named(BTreeMap<String, String>),
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::Positional(Vec::new())
    }
}

impl ParameterSet {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Positional(values) => values.is_empty(),
            Self::Named(values) => values.is_empty(),
        }
    }

    fn lookup(&self, key: &PlaceholderKey) -> Option<&str> {
        match (self, key) {
            (Self::Positional(values), PlaceholderKey::Index(Some(i))) => {
                values.get(*i).map(String::as_str)
            }
            (Self::Named(values), PlaceholderKey::Name(name)) => {
                values.get(name.as_str()).map(String::as_str)
            }
            _ => None,
        }
    }
}

/// Replace a placeholder token's text with its parameter value.
///
/// Only placeholder tokens are touched. A missing entry returns the token unchanged.
pub fn substitute(token: Token, params: &ParameterSet) -> Token {
    if !token.kind.is_placeholder() {
        return token;
    }
    let value = token.key.as_ref().and_then(|key| params.lookup(key));
    match value {
        Some(value) => Token {
            text: CompactString::from(value),
            ..token
        },
        None => token,
    }
}

/// Substitute every placeholder in a token sequence.
pub fn substitute_all(tokens: Vec<Token>, params: &ParameterSet) -> Vec<Token> {
    if params.is_empty() {
        return tokens;
    }
    tokens.into_iter().map(|t| substitute(t, params)).collect()
}
