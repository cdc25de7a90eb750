use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sqlpretty::report::{FileStatus, Report};
use sqlpretty::{KeywordCase, Mode, ParameterSet, SqlprettyError};

/// sqlpretty - a multi-dialect SQL pretty-printer.
#[derive(Parser, Debug)]
#[command(name = "sqlpretty", version, about)]
struct Cli {
    /// Files or directories to format. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// SQL dialect: auto, standard, postgresql, mysql, sqlite, plsql, n1ql, db2.
    #[arg(short = 'd', long)]
    dialect: Option<String>,

    /// Spaces per indentation level.
    #[arg(short = 'i', long)]
    indent_width: Option<usize>,

    /// Indent with tabs.
    #[arg(long)]
    tabs: bool,

    /// Keyword case: preserve, upper, lower, dialect.
    #[arg(short = 'k', long)]
    keyword_case: Option<KeywordCase>,

    /// Blank lines between top-level statements.
    #[arg(long)]
    lines_between_queries: Option<usize>,

    /// Collapse parenthesized groups only when they fit (0 = unlimited).
    #[arg(short = 'l', long)]
    max_line_length: Option<usize>,

    /// Align AS aliases in SELECT lists.
    #[arg(long)]
    align_columns: bool,

    /// Align `=` in SET lists and `:=` in procedural blocks.
    #[arg(long)]
    align_assignments: bool,

    /// Align VALUES tuples column by column.
    #[arg(long)]
    align_values: bool,

    /// Keep the source indentation inside block comments.
    #[arg(long)]
    preserve_comment_indent: bool,

    /// Placeholder value, `name=value` or positional. Repeatable.
    #[arg(short = 'p', long = "param")]
    params: Vec<String>,

    /// Check formatting without writing changes.
    #[arg(long)]
    check: bool,

    /// Show formatting diff.
    #[arg(long)]
    diff: bool,

    /// Skip safety equivalence check (faster).
    #[arg(long)]
    fast: bool,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progressbar: bool,

    /// Force color output.
    #[arg(long, overrides_with = "no_color")]
    color: bool,

    /// Disable color output.
    #[arg(long, overrides_with = "color")]
    no_color: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Disable multi-threaded processing.
    #[arg(long)]
    single_process: bool,

    /// Path to config file (sqlpretty.toml or pyproject.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build a parameter set from `--param` values.
///
/// `name=value` entries make a named set, bare values a positional one.
/// Mixing both is rejected.
fn parse_params(raw: &[String]) -> Result<ParameterSet, SqlprettyError> {
    fn named_entry(s: &str) -> Option<(&str, &str)> {
        s.split_once('=').filter(|(name, _)| {
            !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
    }

    if raw.iter().all(|s| named_entry(s).is_none()) {
        return Ok(ParameterSet::Positional(raw.to_vec()));
    }

    let mut named = BTreeMap::new();
    for entry in raw {
        let (name, value) = named_entry(entry).ok_or_else(|| {
            SqlprettyError::Config(format!(
                "cannot mix positional and named parameters: {entry:?}"
            ))
        })?;
        named.insert(name.to_string(), value.to_string());
    }
    Ok(ParameterSet::Named(named))
}

/// Overlay command-line flags on the loaded configuration.
fn apply_cli(mut mode: Mode, cli: Cli) -> Result<Mode, SqlprettyError> {
    if let Some(dialect) = cli.dialect {
        if !dialect.eq_ignore_ascii_case("auto") {
            dialect.parse::<sqlpretty::Language>()?;
        }
        mode.dialect_name = dialect;
    }

    let mut config = mode.config;
    if let Some(width) = cli.indent_width {
        config = config.with_indent_width(width);
    }
    if cli.tabs {
        config = config.with_tabs();
    }
    if let Some(case) = cli.keyword_case {
        config = config.with_keyword_case(case);
    }
    if let Some(lines) = cli.lines_between_queries {
        config = config.with_lines_between_queries(lines);
    }
    if let Some(max) = cli.max_line_length {
        config = config.with_max_line_length(max);
    }
    config.align_columns |= cli.align_columns;
    config.align_assignments |= cli.align_assignments;
    config.align_values |= cli.align_values;
    config.preserve_comment_indent |= cli.preserve_comment_indent;
    if !cli.params.is_empty() {
        config = config.with_params(parse_params(&cli.params)?);
    }
    mode.config = config;

    if !cli.exclude.is_empty() {
        mode.exclude = cli.exclude;
    }
    mode.check = cli.check;
    mode.diff = cli.diff;
    mode.fast = cli.fast;
    mode.verbose = cli.verbose;
    mode.quiet = cli.quiet;
    mode.no_progressbar = cli.no_progressbar;
    mode.no_color = cli.no_color;
    mode.force_color = cli.color;
    mode.threads = cli.threads;
    mode.single_process = cli.single_process;
    Ok(mode)
}

fn format_stdin(mode: &Mode) -> anyhow::Result<()> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("Error reading stdin")?;

    let color = mode.color_policy().resolve(io::stdout().is_terminal());
    let mode = Mode {
        config: mode.config.clone().with_color(color),
        ..mode.clone()
    };
    let formatted = sqlpretty::format_string(&source, &mode)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(formatted.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Error writing stdout")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";
    let files = cli.files.clone();
    let config_path = cli.config.clone();

    let mode = match sqlpretty::load_config(&files, config_path.as_deref())
        .and_then(|base| apply_cli(base, cli))
    {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if is_stdin {
        if let Err(e) = format_stdin(&mode) {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
        return;
    }

    // Diffs go to stderr, so color follows that stream.
    let diff_color = mode.color_policy().resolve(io::stderr().is_terminal());
    let mode = Mode {
        config: mode.config.clone().with_color(diff_color),
        ..mode
    };

    let report = sqlpretty::run(&files, &mode);

    if !mode.quiet {
        print_verbose_results(&report, &mode);
        eprintln!("{}", report.summary(mode.check || mode.diff));
    }
    report.print_errors();

    std::process::exit(report.exit_code(mode.check));
}

fn print_verbose_results(report: &Report, mode: &Mode) {
    if !mode.verbose {
        return;
    }
    for result in &report.results {
        if result.status == FileStatus::Changed {
            let verb = if mode.check || mode.diff {
                "would reformat"
            } else {
                "reformatted"
            };
            eprintln!("{} {}", verb, result.path.display());
        }
    }
}
