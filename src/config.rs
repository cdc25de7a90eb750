use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::dialect::Language;
use crate::error::SqlprettyError;
use crate::mode::Mode;
use crate::params::ParameterSet;

/// Case transform applied to keywords at emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordCase {
    #[default]
    Preserve,
    Upper,
    Lower,
    /// Whatever the dialect adapter prefers.
    Dialect,
}

impl KeywordCase {
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Preserve | Self::Dialect => text.to_string(),
        }
    }
}

impl FromStr for KeywordCase {
    type Err = SqlprettyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "dialect" | "default" => Ok(Self::Dialect),
            _ => Err(SqlprettyError::Config(format!(
                "invalid keyword_case {s:?} (expected preserve, upper, lower or dialect)"
            ))),
        }
    }
}

impl fmt::Display for KeywordCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Preserve => "preserve",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Dialect => "dialect",
        })
    }
}

/// Whether formatted output is decorated with ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPolicy {
    #[default]
    Never,
    Always,
    /// Color only when writing to a terminal and `NO_COLOR` is unset.
    Auto,
}

impl ColorPolicy {
    /// Turn `Auto` into a concrete policy for the given output stream.
    pub fn resolve(self, is_terminal: bool) -> ColorPolicy {
        match self {
            Self::Auto if is_terminal && std::env::var_os("NO_COLOR").is_none() => Self::Always,
            Self::Auto => Self::Never,
            other => other,
        }
    }
}

/// Fully resolved formatting policy handed to the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub indent: String,
    pub keyword_case: KeywordCase,
    pub lines_between_queries: usize,
    pub align_columns: bool,
    pub align_assignments: bool,
    pub align_values: bool,
    /// 0 means unlimited.
    pub max_line_length: usize,
    pub preserve_comment_indent: bool,
    pub language: Language,
    pub params: ParameterSet,
    pub color: ColorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            keyword_case: KeywordCase::Preserve,
            lines_between_queries: 1,
            align_columns: false,
            align_assignments: false,
            align_values: false,
            max_line_length: 0,
            preserve_comment_indent: false,
            language: Language::Standard,
            params: ParameterSet::default(),
            color: ColorPolicy::Never,
        }
    }
}

impl Config {
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_indent_width(self, width: usize) -> Self {
        self.with_indent(" ".repeat(width))
    }

    pub fn with_tabs(self) -> Self {
        self.with_indent("\t")
    }

    pub fn with_keyword_case(mut self, case: KeywordCase) -> Self {
        self.keyword_case = case;
        self
    }

    pub fn with_lines_between_queries(mut self, lines: usize) -> Self {
        self.lines_between_queries = lines;
        self
    }

    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    pub fn with_align_columns(mut self, on: bool) -> Self {
        self.align_columns = on;
        self
    }

    pub fn with_align_assignments(mut self, on: bool) -> Self {
        self.align_assignments = on;
        self
    }

    pub fn with_align_values(mut self, on: bool) -> Self {
        self.align_values = on;
        self
    }

    pub fn with_preserve_comment_indent(mut self, on: bool) -> Self {
        self.preserve_comment_indent = on;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_params(mut self, params: ParameterSet) -> Self {
        self.params = params;
        self
    }

    pub fn with_color(mut self, color: ColorPolicy) -> Self {
        self.color = color;
        self
    }
}

const KNOWN_KEYS: &[&str] = &[
    "dialect",
    "indent",
    "indent_width",
    "use_tabs",
    "keyword_case",
    "lines_between_queries",
    "max_line_length",
    "align_columns",
    "align_assignments",
    "align_values",
    "preserve_comment_indent",
    "exclude",
    "params",
];

const PROJECT_FILES: &[&str] = &["sqlpretty.toml", ".sqlpretty.toml", "pyproject.toml"];

/// Load sqlpretty configuration.
///
/// Layers, lowest precedence first: built-in defaults, the user config file,
/// the nearest project file above `files`, an explicit `config_path`, then
/// `SQLPRETTY_*` environment variables. Command-line flags are applied by the caller.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, SqlprettyError> {
    let mut mode = Mode::default();

    if let Some(path) = user_config_file().filter(|p| p.is_file()) {
        tracing::debug!(path = %path.display(), "loading user config");
        apply_config(&mut mode, &load_config_from_path(&path)?)?;
    }

    if let Some(path) = find_config_file(files) {
        tracing::debug!(path = %path.display(), "loading project config");
        apply_config(&mut mode, &load_config_from_path(&path)?)?;
    }

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(SqlprettyError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        apply_config(&mut mode, &load_config_from_path(path)?)?;
    }

    apply_env(&mut mode, |key| std::env::var(key).ok())?;

    Ok(mode)
}

fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sqlpretty").join("config.toml"))
}

/// Search for a project config file in the common parent directories of the given files.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    get_common_parents(files).into_iter().find_map(|parent| {
        PROJECT_FILES
            .iter()
            .map(|name| parent.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Get the common parent directories of the given file paths, ordered
/// from most specific to least specific.
fn get_common_parents(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut parents = Vec::new();

    for file in files {
        let parent = if file.is_dir() {
            file.clone()
        } else {
            file.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        let mut current = Some(parent.as_path());
        while let Some(dir) = current {
            let dir_buf = dir.to_path_buf();
            if !parents.contains(&dir_buf) {
                parents.push(dir_buf);
            }
            current = dir.parent();
        }
    }

    parents
}

/// Load and parse a TOML config file. `pyproject.toml` contributes its
/// `[tool.sqlpretty]` table; any other file is read whole.
fn load_config_from_path(path: &Path) -> Result<toml::Table, SqlprettyError> {
    let content = std::fs::read_to_string(path)?;
    let mut parsed: toml::Table = content
        .parse()
        .map_err(|e| SqlprettyError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    let is_pyproject = path.file_name().is_some_and(|n| n == "pyproject.toml");
    if !is_pyproject {
        return Ok(lowercase_keys(parsed));
    }
    match parsed.remove("tool") {
        Some(toml::Value::Table(mut tool)) => match tool.remove("sqlpretty") {
            Some(toml::Value::Table(section)) => Ok(lowercase_keys(section)),
            _ => Ok(toml::Table::new()),
        },
        _ => Ok(toml::Table::new()),
    }
}

fn lowercase_keys(table: toml::Table) -> toml::Table {
    table
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect()
}

fn expect_bool(key: &str, value: &toml::Value) -> Result<bool, SqlprettyError> {
    value
        .as_bool()
        .ok_or_else(|| SqlprettyError::Config(format!("{key} must be a boolean")))
}

fn expect_str<'v>(key: &str, value: &'v toml::Value) -> Result<&'v str, SqlprettyError> {
    value
        .as_str()
        .ok_or_else(|| SqlprettyError::Config(format!("{key} must be a string")))
}

fn expect_usize(key: &str, value: &toml::Value) -> Result<usize, SqlprettyError> {
    value
        .as_integer()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| SqlprettyError::Config(format!("{key} must be a non-negative integer")))
}

fn check_dialect_name(name: &str) -> Result<(), SqlprettyError> {
    if name != "auto" {
        name.parse::<Language>()?;
    }
    Ok(())
}

/// Apply configuration values to a Mode.
fn apply_config(mode: &mut Mode, config: &toml::Table) -> Result<(), SqlprettyError> {
    if let Some(key) = config.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        return Err(SqlprettyError::Config(format!("Unknown config option: {key}")));
    }

    if let Some(d) = config.get("dialect") {
        let d = expect_str("dialect", d)?;
        check_dialect_name(d)?;
        mode.dialect_name = d.to_string();
    }

    if let Some(v) = config.get("indent") {
        mode.config.indent = expect_str("indent", v)?.to_string();
    }

    if let Some(v) = config.get("indent_width") {
        mode.config.indent = " ".repeat(expect_usize("indent_width", v)?);
    }

    if let Some(v) = config.get("use_tabs") {
        if expect_bool("use_tabs", v)? {
            mode.config.indent = "\t".to_string();
        }
    }

    if let Some(v) = config.get("keyword_case") {
        mode.config.keyword_case = expect_str("keyword_case", v)?.parse()?;
    }

    if let Some(v) = config.get("lines_between_queries") {
        mode.config.lines_between_queries = expect_usize("lines_between_queries", v)?;
    }

    if let Some(v) = config.get("max_line_length") {
        mode.config.max_line_length = expect_usize("max_line_length", v)?;
    }

    if let Some(v) = config.get("align_columns") {
        mode.config.align_columns = expect_bool("align_columns", v)?;
    }

    if let Some(v) = config.get("align_assignments") {
        mode.config.align_assignments = expect_bool("align_assignments", v)?;
    }

    if let Some(v) = config.get("align_values") {
        mode.config.align_values = expect_bool("align_values", v)?;
    }

    if let Some(v) = config.get("preserve_comment_indent") {
        mode.config.preserve_comment_indent = expect_bool("preserve_comment_indent", v)?;
    }

    if let Some(v) = config.get("exclude") {
        let arr = v
            .as_array()
            .ok_or_else(|| SqlprettyError::Config("exclude must be an array".to_string()))?;
        mode.exclude = arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();
    }

    if let Some(v) = config.get("params") {
        mode.config.params = v.clone().try_into()?;
    }

    Ok(())
}

/// Apply `SQLPRETTY_DIALECT`, `SQLPRETTY_KEYWORD_CASE` and `SQLPRETTY_INDENT`.
fn apply_env(
    mode: &mut Mode,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), SqlprettyError> {
    if let Some(d) = var("SQLPRETTY_DIALECT") {
        check_dialect_name(&d)?;
        mode.dialect_name = d;
    }
    if let Some(case) = var("SQLPRETTY_KEYWORD_CASE") {
        mode.config.keyword_case = case.parse()?;
    }
    if let Some(indent) = var("SQLPRETTY_INDENT") {
        mode.config.indent = match indent.parse::<usize>() {
            Ok(width) => " ".repeat(width),
            Err(_) if indent == "tab" || indent == "tabs" => "\t".to_string(),
            Err(_) => indent,
        };
    }
    Ok(())
}
