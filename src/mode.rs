use crate::config::{ColorPolicy, Config};
use crate::detect;
use crate::dialect::Language;
use crate::error::SqlprettyError;

/// Run-level settings for sqlpretty, wrapping the formatting [`Config`].
#[derive(Debug, Clone)]
pub struct Mode {
    pub config: Config,

    /// Dialect name, or `auto` to detect per input.
    pub dialect_name: String,

    pub check: bool,

    pub diff: bool,

    /// Skip safety equivalence check for faster operation.
    pub fast: bool,

    /// Glob patterns to exclude.
    pub exclude: Vec<String>,

    pub verbose: bool,

    pub quiet: bool,

    pub no_progressbar: bool,

    pub no_color: bool,

    pub force_color: bool,

    /// Number of threads for parallel processing (0 = all cores).
    pub threads: usize,

    pub single_process: bool,
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            config: Config::default(),
            dialect_name: "auto".to_string(),
            check: false,
            diff: false,
            fast: false,
            exclude: Vec::new(),
            verbose: false,
            quiet: false,
            no_progressbar: false,
            no_color: false,
            force_color: false,
            threads: 0,
            single_process: false,
        }
    }
}

impl Mode {
    /// The language to format `source` with: the configured dialect, or the
    /// detected one when the name is `auto`.
    pub fn language_for(&self, source: &str) -> Result<Language, SqlprettyError> {
        if self.dialect_name.eq_ignore_ascii_case("auto") {
            let (language, matched) = detect::detect_language(source);
            tracing::debug!(%language, matched, "auto-detected dialect");
            return Ok(language);
        }
        self.dialect_name.parse()
    }

    /// Color policy requested on the command line.
    pub fn color_policy(&self) -> ColorPolicy {
        if self.force_color {
            ColorPolicy::Always
        } else if self.no_color {
            ColorPolicy::Never
        } else {
            ColorPolicy::Auto
        }
    }

    /// Whether safety check should be performed.
    pub fn should_safety_check(&self) -> bool {
        !self.fast && self.config.params.is_empty()
    }

    /// SQL file extensions to process.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql", "ddl", "dml", "pgsql", "plsql"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;

    #[test]
    fn test_default_mode() {
        let mode = Mode::default();
        assert_eq!(mode.dialect_name, "auto");
        assert!(!mode.check);
        assert!(!mode.diff);
        assert!(!mode.fast);
    }

    #[test]
    fn test_language_for() {
        let mut mode = Mode::default();
        mode.dialect_name = "mysql".to_string();
        assert_eq!(mode.language_for("select 1").unwrap(), Language::MySql);

        mode.dialect_name = "AUTO".to_string();
        assert_eq!(
            mode.language_for("select $$x$$::text").unwrap(),
            Language::PostgreSql
        );

        mode.dialect_name = "cobol".to_string();
        assert!(mode.language_for("select 1").is_err());
    }

    #[test]
    fn test_color_policy() {
        let mut mode = Mode::default();
        assert_eq!(mode.color_policy(), ColorPolicy::Auto);

        mode.no_color = true;
        assert_eq!(mode.color_policy(), ColorPolicy::Never);

        mode.force_color = true;
        assert_eq!(mode.color_policy(), ColorPolicy::Always);
    }

    #[test]
    fn test_safety_check() {
        let mut mode = Mode::default();
        assert!(mode.should_safety_check());

        mode.config.params = ParameterSet::Positional(vec!["1".into()]);
        assert!(!mode.should_safety_check());

        mode.config.params = ParameterSet::default();
        mode.fast = true;
        assert!(!mode.should_safety_check());
    }
}
