use std::fmt;
use std::str::FromStr;

use crate::config::KeywordCase;
use crate::error::SqlprettyError;
use crate::lexicon::{dialects, Lexicon};

/// A named SQL variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Standard,
    PostgreSql,
    MySql,
    Sqlite,
    PlSql,
    N1ql,
    Db2,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::Standard,
        Language::PostgreSql,
        Language::MySql,
        Language::Sqlite,
        Language::PlSql,
        Language::N1ql,
        Language::Db2,
    ];

    /// Canonical lowercase name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::PlSql => "plsql",
            Self::N1ql => "n1ql",
            Self::Db2 => "db2",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = SqlprettyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "sql" | "ansi" => Ok(Self::Standard),
            "postgresql" | "postgres" | "pg" => Ok(Self::PostgreSql),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            "plsql" | "pl/sql" | "oracle" => Ok(Self::PlSql),
            "n1ql" | "couchbase" => Ok(Self::N1ql),
            "db2" => Ok(Self::Db2),
            _ => Err(SqlprettyError::UnknownDialect(name.to_string())),
        }
    }
}

/// Whitespace around an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub before: bool,
    pub after: bool,
}

impl Spacing {
    pub const BOTH: Spacing = Spacing {
        before: true,
        after: true,
    };
    pub const NONE: Spacing = Spacing {
        before: false,
        after: false,
    };
    pub const AFTER: Spacing = Spacing {
        before: false,
        after: true,
    };
}

/// Spacing shared by all dialects unless an adapter overrides it.
pub fn default_operator_spacing(op: &str) -> Spacing {
    match op {
        "." | "::" => Spacing::NONE,
        "," | ";" | ":" => Spacing::AFTER,
        _ => Spacing::BOTH,
    }
}

/// Per-dialect policy consumed by the tokenizer and the layout engine.
///
/// Adapters are stateless; swapping one never changes the layout state machine.
pub trait Dialect: Send + Sync {
    /// Keyword phrase sets (common plus dialect extras), string and comment
    /// syntax, placeholder syntax and numbering base.
    fn lexicon(&self) -> &'static Lexicon;

    fn operator_spacing(&self, op: &str) -> Spacing {
        default_operator_spacing(op)
    }

    /// Whether `ARRAY[` is written `ARRAY [`.
    fn array_bracket_space(&self) -> bool {
        false
    }

    /// Case used when the configuration asks for the dialect default.
    fn default_keyword_case(&self) -> KeywordCase {
        KeywordCase::Preserve
    }
}

pub struct StandardSql;

impl Dialect for StandardSql {
    fn lexicon(&self) -> &'static Lexicon {
        &dialects::STANDARD
    }
}

/// PostgreSQL: dollar quoting, `$n` placeholders, JSON/array operators.
pub struct PostgreSql;

impl Dialect for PostgreSql {
    fn lexicon(&self) -> &'static Lexicon {
        &dialects::POSTGRESQL
    }

    fn array_bracket_space(&self) -> bool {
        true
    }
}

pub struct MySql;

impl Dialect for MySql {
    fn lexicon(&self) -> &'static Lexicon {
        &dialects::MYSQL
    }
}

pub struct Sqlite;

impl Dialect for Sqlite {
    fn lexicon(&self) -> &'static Lexicon {
        &dialects::SQLITE
    }
}

/// Oracle PL/SQL. `%TYPE` attributes and `1..10` ranges bind tightly.
pub struct PlSql;

impl Dialect for PlSql {
    fn lexicon(&self) -> &'static Lexicon {
        &dialects::PLSQL
    }

    fn operator_spacing(&self, op: &str) -> Spacing {
        match op {
            "%" | ".." => Spacing::NONE,
            _ => default_operator_spacing(op),
        }
    }

    fn default_keyword_case(&self) -> KeywordCase {
        KeywordCase::Upper
    }
}

/// Couchbase N1QL.
pub struct N1ql;

impl Dialect for N1ql {
    fn lexicon(&self) -> &'static Lexicon {
        &dialects::N1QL
    }

    fn default_keyword_case(&self) -> KeywordCase {
        KeywordCase::Upper
    }
}

pub struct Db2;

impl Dialect for Db2 {
    fn lexicon(&self) -> &'static Lexicon {
        &dialects::DB2
    }

    fn default_keyword_case(&self) -> KeywordCase {
        KeywordCase::Upper
    }
}

/// The adapter for a language.
pub fn dialect_for(language: Language) -> &'static dyn Dialect {
    match language {
        Language::Standard => &StandardSql,
        Language::PostgreSql => &PostgreSql,
        Language::MySql => &MySql,
        Language::Sqlite => &Sqlite,
        Language::PlSql => &PlSql,
        Language::N1ql => &N1ql,
        Language::Db2 => &Db2,
    }
}

/// Create a dialect from a string name.
pub fn dialect_from_name(name: &str) -> Result<&'static dyn Dialect, SqlprettyError> {
    name.parse().map(dialect_for)
}
