use thiserror::Error;

/// User-facing errors. Only the configuration and file layers produce these;
/// formatting itself never fails.
#[derive(Error, Debug)]
pub enum SqlprettyError {
    #[error("sqlpretty config error: {0}")]
    Config(String),

    #[error("sqlpretty config error: unknown dialect {0:?}")]
    UnknownDialect(String),

    #[error("sqlpretty equivalence error: {0}")]
    Equivalence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SqlprettyError>;
