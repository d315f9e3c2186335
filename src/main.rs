use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use trawl::config::Config;
use trawl::error::TrawlError;
use trawl::matcher::SearchPattern;
use trawl::search::SearchOptions;
use trawl::types::SearchResult;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TRAWL_BUILD_COMMIT"),
    ")"
);

/// trawl: search a directory tree for a pattern inside text, CSV,
/// spreadsheet, PDF and Word files.
#[derive(Parser)]
#[command(name = "trawl", version, long_version = LONG_VERSION, about)]
struct Cli {
    /// Pattern to search for. A regular expression unless --fixed-strings.
    pattern: Option<String>,

    /// Directory to search.
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Match case exactly. Without it, matching ignores case.
    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// Treat the pattern as a literal string.
    #[arg(short = 'F', long)]
    fixed_strings: bool,

    /// Directory name to prune (repeatable, comma-separated accepted).
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    skip_dir: Vec<String>,

    /// File extension to skip (repeatable, comma-separated accepted).
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    skip_ext: Vec<String>,

    /// Config file. Defaults to ./trawl.toml when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore built-in and configured skip lists; only --skip-* apply.
    #[arg(long)]
    no_default_skips: bool,

    /// Worker threads for extraction (1 = sequential).
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// One JSON object per match instead of text lines.
    #[arg(long)]
    json: bool,

    /// Print matches only: no header or summary.
    #[arg(short, long)]
    quiet: bool,

    /// Log skipped files and dispatch decisions to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "trawl", &mut io::stdout());
        return;
    }

    init_logging(cli.verbose);

    let Some(raw) = cli.pattern.as_deref() else {
        eprintln!("usage: trawl <PATTERN> [--dir DIR] [--case-sensitive] [--skip-ext EXT]");
        process::exit(3);
    };

    if let Err(e) = run(&cli, raw) {
        eprintln!("{e}");
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli, raw: &str) -> Result<(), TrawlError> {
    let mut config = Config::discover(cli.config.as_deref())?;
    if cli.no_default_skips {
        config = config.without_skips();
    }
    let config = config.with_extra_skips(&cli.skip_ext, &cli.skip_dir);

    let case_sensitive = cli.case_sensitive || config.case_sensitive;
    let pattern = if cli.fixed_strings {
        SearchPattern::literal(raw, case_sensitive)?
    } else {
        SearchPattern::new(raw, case_sensitive)?
    };

    let root = cli.dir.canonicalize().unwrap_or_else(|_| cli.dir.clone());
    let options = SearchOptions {
        root,
        skip_dirs: config.skip_dirs,
        skip_extensions: config.skip_extensions,
        jobs: cli.jobs,
    };

    let result = trawl::run(&pattern, &options)?;

    match emit(&result, &pattern, cli) {
        // Downstream closed the pipe (`| head`): stop quietly.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(TrawlError::io(std::path::Path::new("<stdout>"), e)),
        Ok(()) => Ok(()),
    }
}

/// Write records in walk order, bracketed by header and summary unless
/// quiet or JSON.
fn emit(result: &SearchResult, pattern: &SearchPattern, cli: &Cli) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    let decorate = !cli.quiet && !cli.json;

    if decorate {
        writeln!(out, "{}", trawl::format::search_header(pattern, &result.scope))?;
    }
    for record in result.records() {
        if cli.json {
            writeln!(out, "{}", trawl::format::record_json(record))?;
        } else {
            writeln!(out, "{}", trawl::format::record_line(record, pattern.as_str()))?;
        }
    }
    if decorate {
        writeln!(out, "\n{}", trawl::format::summary(result))?;
    }
    out.flush()
}

/// stderr logging. `RUST_LOG` wins; `--verbose` adds debug for this crate;
/// otherwise warnings only.
fn init_logging(verbose: bool) {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        if let Ok(directive) = "trawl=debug".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
