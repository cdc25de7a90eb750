use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::color::ansi_decorator;
use crate::config::{ColorPolicy, Config};
use crate::dialect::{dialect_for, Language};
use crate::error::SqlprettyError;
use crate::layout::{layout, Decorator};
use crate::lexicon::Lexicon;
use crate::mode::Mode;
use crate::params::substitute_all;
use crate::report::{FileResult, FileStatus, Report};
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// Format SQL text in the given dialect.
///
/// Never fails: malformed input degrades to best-effort layout. The result
/// carries no trailing newline.
pub fn format(text: &str, language: Language, config: &Config) -> String {
    let dialect = dialect_for(language);
    let tokens = tokenize(text, dialect.lexicon());
    let tokens = substitute_all(tokens, &config.params);
    let decorate: Option<Decorator<'_>> = match config.color {
        ColorPolicy::Always => Some(&ansi_decorator),
        ColorPolicy::Never | ColorPolicy::Auto => None,
    };
    layout(&tokens, config, dialect, decorate)
}

/// Format raw bytes, replacing invalid UTF-8 with U+FFFD first.
pub fn format_bytes(bytes: &[u8], language: Language, config: &Config) -> String {
    format(&String::from_utf8_lossy(bytes), language, config)
}

/// Format a SQL string according to the given mode.
///
/// Resolves the dialect (detecting it for `auto`), formats, and verifies the
/// result against the source unless the mode disables the safety check.
pub fn format_string(source: &str, mode: &Mode) -> Result<String, SqlprettyError> {
    let language = mode.language_for(source)?;
    let config = Config {
        language,
        color: ColorPolicy::Never,
        ..mode.config.clone()
    };

    let mut result = format(source, language, &config);
    if !result.is_empty() {
        result.push('\n');
    }

    if mode.should_safety_check() {
        safety_check(source, &result, dialect_for(language).lexicon())?;
    }

    if mode.config.color == ColorPolicy::Always {
        let colored = Config {
            color: ColorPolicy::Always,
            ..config
        };
        let mut painted = format(source, language, &colored);
        if !painted.is_empty() {
            painted.push('\n');
        }
        return Ok(painted);
    }

    Ok(result)
}

/// Run the formatter on a collection of files.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let matching_paths = get_matching_paths(files, mode);
    let mut report = Report::new();
    let progress = progress_bar(matching_paths.len() as u64, mode);

    if mode.single_process || matching_paths.len() <= 1 {
        for path in &matching_paths {
            report.add(format_file(path, mode));
            progress.inc(1);
        }
    } else {
        use rayon::prelude::*;

        // rayon treats 0 threads as "all available cores".
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(mode.threads)
            .build();

        let work = || -> Vec<FileResult> {
            matching_paths
                .par_iter()
                .map(|path| {
                    let result = format_file(path, mode);
                    progress.inc(1);
                    result
                })
                .collect()
        };
        let results = match pool {
            Ok(pool) => pool.install(work),
            Err(e) => {
                tracing::warn!("falling back to the global thread pool: {e}");
                work()
            }
        };
        for result in results {
            report.add(result);
        }
    }

    progress.finish_and_clear();
    report
}

fn progress_bar(len: u64, mode: &Mode) -> ProgressBar {
    if mode.quiet || mode.no_progressbar || len <= 1 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}") {
        bar.set_style(style);
    }
    bar
}

/// Format a single file. Files are always written without color.
pub fn format_file(path: &Path, mode: &Mode) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(path = %path.display(), "read failed: {e}");
            return FileResult::error(path, format!("Read error: {}", e));
        }
    };

    let plain = Mode {
        config: mode.config.clone().with_color(ColorPolicy::Never),
        ..mode.clone()
    };
    let formatted = match format_string(&source, &plain) {
        Ok(f) => f,
        Err(e) => return FileResult::error(path, e.to_string()),
    };

    if source == formatted {
        tracing::debug!(path = %path.display(), "unchanged");
        return FileResult::new(path, FileStatus::Unchanged);
    }

    if mode.check || mode.diff {
        if mode.diff {
            print_diff(path, &source, &formatted, mode.config.color);
        }
        tracing::info!(path = %path.display(), "would reformat");
        return FileResult::new(path, FileStatus::Changed);
    }

    match std::fs::write(path, &formatted) {
        Ok(_) => {
            tracing::info!(path = %path.display(), "reformatted");
            FileResult::new(path, FileStatus::Changed)
        }
        Err(e) => FileResult::error(path, format!("Write error: {}", e)),
    }
}

/// Get all SQL file paths that match the given inputs.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let exclude: Vec<glob::Pattern> = mode
        .exclude
        .iter()
        .filter_map(|pattern| match glob::Pattern::new(pattern) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!("ignoring exclude pattern {pattern:?}: {e}");
                None
            }
        })
        .collect();
    let mut result = HashSet::new();

    for path in paths {
        if path.is_file() {
            if is_sql_file(path, extensions) {
                result.insert(path.clone());
            }
        } else if path.is_dir() {
            collect_sql_files(path, extensions, &exclude, &mut result);
        }
    }

    let mut sorted: Vec<PathBuf> = result.into_iter().collect();
    sorted.sort();
    sorted
}

fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Recursively collect SQL files from a directory.
fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &[glob::Pattern],
    result: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "skipping unreadable directory: {e}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if name.starts_with('.') {
            continue;
        }
        if exclude
            .iter()
            .any(|p| p.matches(&name) || p.matches_path(&path))
        {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, result);
        } else if is_sql_file(&path, extensions) {
            result.insert(path);
        }
    }
}

/// Comparison key for one significant token.
fn equivalence_key(token: &Token) -> (TokenKind, String) {
    let text = token.text.to_lowercase();
    let text = if token.kind == TokenKind::BlockComment {
        text.split_whitespace().collect()
    } else {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    };
    (token.kind, text)
}

/// Re-tokenize the formatted output and verify it carries the same
/// significant tokens as the original.
pub(crate) fn safety_check(
    original: &str,
    formatted: &str,
    lexicon: &Lexicon,
) -> Result<(), SqlprettyError> {
    let significant = |text: &str| -> Vec<Token> {
        tokenize(text, lexicon)
            .into_iter()
            .filter(|t| !t.kind.is_whitespace())
            .collect()
    };
    let before = significant(original);
    let after = significant(formatted);

    if before.len() != after.len() {
        return Err(SqlprettyError::Equivalence(format!(
            "Token count mismatch: original has {} tokens, formatted has {}",
            before.len(),
            after.len()
        )));
    }

    for (i, (a, b)) in before.iter().zip(after.iter()).enumerate() {
        let (kind_a, text_a) = equivalence_key(a);
        let (kind_b, text_b) = equivalence_key(b);
        if kind_a != kind_b {
            return Err(SqlprettyError::Equivalence(format!(
                "Token kind mismatch at position {}: original {:?} '{}', formatted {:?} '{}'",
                i, a.kind, a.text, b.kind, b.text
            )));
        }
        if text_a != text_b {
            return Err(SqlprettyError::Equivalence(format!(
                "Token text mismatch at position {}: original '{}', formatted '{}'",
                i, a.text, b.text
            )));
        }
    }

    Ok(())
}

/// Print a diff between original and formatted content to stderr.
fn print_diff(path: &Path, original: &str, formatted: &str, color: ColorPolicy) {
    let choice = match color {
        ColorPolicy::Always => ColorChoice::Always,
        ColorPolicy::Never => ColorChoice::Never,
        ColorPolicy::Auto => ColorChoice::Auto,
    };
    let mut stderr = StandardStream::stderr(choice);
    if let Err(e) = write_diff(&mut stderr, path, original, formatted) {
        tracing::debug!("failed to print diff: {e}");
    }
}

fn write_diff(
    out: &mut impl WriteColor,
    path: &Path,
    original: &str,
    formatted: &str,
) -> std::io::Result<()> {
    use similar::{ChangeTag, TextDiff};

    writeln!(out, "--- {}", path.display())?;
    writeln!(out, "+++ {}", path.display())?;

    let diff = TextDiff::from_lines(original, formatted);
    for change in diff.iter_all_changes() {
        let (sign, color) = match change.tag() {
            ChangeTag::Delete => ("-", Some(Color::Red)),
            ChangeTag::Insert => ("+", Some(Color::Green)),
            ChangeTag::Equal => (" ", None),
        };
        out.set_color(ColorSpec::new().set_fg(color))?;
        write!(out, "{}{}", sign, change)?;
        if change.missing_newline() {
            writeln!(out)?;
        }
        out.reset()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::dialects::STANDARD;
    use crate::params::ParameterSet;
    use termcolor::NoColor;

    #[test]
    fn test_format_simple_select() {
        let mode = Mode::default();
        let result = format_string("select a, b from t\n", &mode).unwrap();
        assert_eq!(result, "select\n  a,\n  b\nfrom\n  t\n");
    }

    #[test]
    fn test_format_empty_string() {
        let mode = Mode::default();
        assert_eq!(format_string("\n", &mode).unwrap(), "");
        assert_eq!(format_string("", &mode).unwrap(), "");
    }

    #[test]
    fn test_format_with_unknown_dialect() {
        let mut mode = Mode::default();
        mode.dialect_name = "duckdb".to_string();
        assert!(matches!(
            format_string("SELECT 1\n", &mode),
            Err(SqlprettyError::UnknownDialect(_))
        ));
    }

    #[test]
    fn test_format_string_applies_params() {
        let mut mode = Mode::default();
        mode.dialect_name = "standard".to_string();
        mode.config.params = ParameterSet::Positional(vec!["42".into()]);
        assert_eq!(
            format_string("SELECT ?", &mode).unwrap(),
            "SELECT\n  42\n"
        );
    }

    #[test]
    fn test_format_string_colors_only_when_forced() {
        let mut mode = Mode::default();
        mode.config.color = ColorPolicy::Always;
        let painted = format_string("SELECT 1", &mode).unwrap();
        assert!(painted.contains('\x1b'));
        assert_eq!(crate::color::strip_ansi(&painted), "SELECT\n  1\n");
    }

    #[test]
    fn test_format_bytes_is_lossy() {
        let out = format_bytes(b"SELECT '\xff'", Language::Standard, &Config::default());
        assert_eq!(out, "SELECT\n  '\u{fffd}'");
    }

    #[test]
    fn test_is_sql_file() {
        let extensions = &["sql", "ddl", "plsql"];
        assert!(is_sql_file(Path::new("test.sql"), extensions));
        assert!(is_sql_file(Path::new("TEST.SQL"), extensions));
        assert!(is_sql_file(Path::new("pkg.plsql"), extensions));
        assert!(!is_sql_file(Path::new("test.py"), extensions));
        assert!(!is_sql_file(Path::new("nosql"), extensions));
    }

    #[test]
    fn test_safety_check_accepts_case_and_whitespace() {
        let original = "select   a from t /* a\n   b */";
        let formatted = "SELECT\n  a\nFROM\n  t /* a\n b */\n";
        assert!(safety_check(original, formatted, &STANDARD).is_ok());
    }

    #[test]
    fn test_safety_check_rejects_changes() {
        let err = safety_check("SELECT a", "SELECT b", &STANDARD).unwrap_err();
        assert!(matches!(err, SqlprettyError::Equivalence(_)));
        let err = safety_check("SELECT a", "SELECT a, b", &STANDARD).unwrap_err();
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn test_write_diff() {
        let mut out = NoColor::new(Vec::new());
        write_diff(&mut out, Path::new("q.sql"), "select 1\n", "SELECT\n  1\n").unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with("--- q.sql\n+++ q.sql\n"));
        assert!(text.contains("-select 1\n"));
        assert!(text.contains("+SELECT\n"));
        assert!(text.contains("+  1\n"));
    }

    #[test]
    fn test_get_matching_paths_skips_hidden_and_excluded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.sql"), "select 1").unwrap();
        std::fs::write(dir.path().join("b.txt"), "select 1").unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join(".hidden/c.sql"), "select 1").unwrap();
        std::fs::create_dir(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor/d.sql"), "select 1").unwrap();

        let mut mode = Mode::default();
        mode.exclude = vec!["vendor".to_string()];
        let paths = get_matching_paths(&[dir.path().to_path_buf()], &mode);
        assert_eq!(paths, vec![dir.path().join("a.sql")]);
    }

    #[test]
    fn test_run_check_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("q.sql");
        std::fs::write(&file, "select a from t").unwrap();

        let mut mode = Mode::default();
        mode.check = true;
        let report = run(&[file.clone()], &mode);
        assert_eq!(report.changed(), 1);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "select a from t");

        mode.check = false;
        let report = run(&[file.clone()], &mode);
        assert_eq!(report.changed(), 1);
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "select\n  a\nfrom\n  t\n"
        );

        let report = run(&[file], &mode);
        assert_eq!(report.unchanged(), 1);
    }
}
