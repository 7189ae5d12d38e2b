//! dirdigest - Turn a directory tree into a filtered digest.
//!
//! Usage:
//!   dirdigest [DIRECTORY]                    Digest as Markdown on stdout
//!   dirdigest . -i '*.rs' -x 'target/'       Include and exclude patterns
//!   dirdigest . -f json -o digest.json       JSON to a file
//!   dirdigest --help                         Show help

mod content;
mod render;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::{debug, info};

use dirdigest_scan::{
    Digest, DigestConfig, DigestScanner, PatternDecl, PatternKind, PatternSource, SortKey,
};

#[derive(Parser)]
#[command(
    name = "dirdigest",
    version,
    about = "Turn a directory tree into a filtered digest",
    long_about = "dirdigest walks a directory, decides for every entry whether it belongs \
                  in the digest and writes the included files as Markdown or JSON.\n\n\
                  Include and exclude patterns use gitignore-like globs. When both \
                  match, the more specific pattern wins; on a tie the later one does."
)]
struct Cli {
    /// Directory to digest (defaults to current directory)
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Write the digest to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Include pattern (repeatable, comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    include: Vec<String>,

    /// Exclude pattern (repeatable, comma-separated)
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Maximum file size in KB
    #[arg(short = 's', long, default_value_t = 300)]
    max_size: u64,

    /// Maximum directory depth to descend (0 = root only)
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Do not apply the built-in ignore patterns
    #[arg(long)]
    no_default_ignore: bool,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// Record unreadable entries as excluded instead of failing
    #[arg(long)]
    ignore_errors: bool,

    /// Processing log order: status, size, path (comma-separated)
    #[arg(long, value_delimiter = ',')]
    sort_output_log_by: Vec<SortKey>,

    /// Do not print the processing log
    #[arg(long)]
    no_log: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the processing log, summary and diagnostics
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    #[default]
    Markdown,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli, &matches)?;
    let sort_keys = config.effective_sort_keys();

    let mut digest = DigestScanner::new().scan(&config).context("Scan failed")?;
    let unreadable = content::populate(&digest.root_path, &mut digest.root);
    if unreadable > 0 {
        info!(count = unreadable, "Files without readable content");
    }

    let metadata = render::Metadata::from_digest(&digest, &sort_keys);
    let rendered = match cli.format {
        Format::Markdown => render::markdown(&metadata, &digest.root),
        Format::Json => render::json(&metadata, &digest.root).context("Failed to serialize digest")?,
    };

    match &cli.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }

    if !cli.quiet {
        if !cli.no_log {
            eprint!("{}", render::processing_log(&digest.log.sorted(&sort_keys)));
        }
        print_summary(&digest, cli.output.as_deref());
    }

    Ok(())
}

/// Build the run configuration from parsed arguments.
fn build_config(cli: &Cli, matches: &ArgMatches) -> Result<DigestConfig> {
    let mut patterns = Vec::new();
    let root = cli
        .directory
        .canonicalize()
        .with_context(|| format!("Invalid directory {}", cli.directory.display()))?;

    if let Some(pattern) = cli.output.as_deref().and_then(|o| output_exclusion(&root, o)) {
        debug!(pattern = %pattern, "Excluding output file");
        patterns.push(PatternDecl::new(
            pattern,
            PatternKind::Exclude,
            PatternSource::Config,
            0,
        ));
    }

    let offset = patterns.len();
    patterns.extend(
        ordered_patterns(cli, matches)
            .into_iter()
            .enumerate()
            .map(|(i, (kind, pattern))| {
                PatternDecl::new(pattern, kind, PatternSource::Cli, offset + i)
            }),
    );

    let config = DigestConfig::builder()
        .root(root)
        .patterns(patterns)
        .default_ignore(!cli.no_default_ignore)
        .max_size(cli.max_size.saturating_mul(1024))
        .max_depth(cli.max_depth)
        .follow_symlinks(cli.follow_symlinks)
        .ignore_errors(cli.ignore_errors)
        .sort_keys(cli.sort_output_log_by.clone())
        .build()
        .context("Invalid configuration")?;
    Ok(config)
}

/// Include and exclude patterns in the order they appeared on the command line.
fn ordered_patterns(cli: &Cli, matches: &ArgMatches) -> Vec<(PatternKind, String)> {
    let mut indexed: Vec<(usize, PatternKind, String)> = Vec::new();
    for (id, kind, values) in [
        ("include", PatternKind::Include, &cli.include),
        ("exclude", PatternKind::Exclude, &cli.exclude),
    ] {
        let indices = matches.indices_of(id).into_iter().flatten();
        for (index, value) in indices.zip(values) {
            indexed.push((index, kind, value.clone()));
        }
    }
    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, kind, value)| (kind, value))
        .collect()
}

/// Anchored pattern for the output file when it lies inside `root`.
fn output_exclusion(root: &Path, output: &Path) -> Option<String> {
    let name = output.file_name()?;
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.canonicalize().ok()?,
        _ => std::env::current_dir().ok()?.canonicalize().ok()?,
    };
    let rel = parent.join(name).strip_prefix(root).ok()?.to_path_buf();
    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if rel.is_empty() {
        return None;
    }
    Some(format!("/{}", escape_glob(&rel)))
}

fn escape_glob(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '{' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn print_summary(digest: &Digest, output: Option<&Path>) {
    eprintln!();
    eprintln!("{}", "─".repeat(60));
    eprintln!(" {} ({} mode)", digest.root_path.display(), digest.mode);
    eprintln!(
        " {} files included, {} items excluded, {}",
        digest.stats.included_files,
        digest.stats.excluded_items,
        format_size(digest.stats.total_content_size)
    );
    eprintln!(" Scanned in {:.2}s", digest.scan_duration.as_secs_f64());
    if let Some(path) = output {
        eprintln!(" Digest written to {}", path.display());
    }
    eprintln!("{}", "─".repeat(60));

    if digest.has_warnings() {
        eprintln!("{} warning(s) during scan", digest.warnings.len());
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            _ if quiet => tracing_subscriber::EnvFilter::new("error"),
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
