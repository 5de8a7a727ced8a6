//! gfcombine CLI

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gfcombine_core::collection::FontCollection;
use gfcombine_core::config::{CombineOptions, MarkupType};
use gfcombine_core::markup::rewrite;
use gfcombine_core::output::{
    render_original_links, render_script, write_json_pretty, write_ndjson, CollectionSummary,
};
use gfcombine_core::urls::is_font_request_url;

pub mod config;
pub mod discovery;
pub mod server;

use crate::discovery::HtmlDiscovery;

/// CLI entrypoint for gfcombine.
#[derive(Debug, Parser)]
#[command(
    name = "gfcombine",
    about = "Fold many Google Fonts stylesheet requests into one"
)]
pub struct Cli {
    /// JSON file with combine options (markup_type, min_candidates, handle_prefix)
    #[arg(long = "config", global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge font request URLs and print the combined request
    Combine(CombineArgs),
    /// Rewrite HTML documents so they load a single font request
    Rewrite(RewriteArgs),
    /// Serve the combiner over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
struct CombineArgs {
    /// Font request URLs ("-" reads newline-delimited URLs from STDIN)
    #[arg(required_unless_present = "stdin_urls", value_hint = ValueHint::Url)]
    urls: Vec<String>,

    /// Read newline-delimited URLs from STDIN
    #[arg(long = "stdin-urls", action = ArgAction::SetTrue)]
    stdin_urls: bool,

    /// Print a WebFont loader script block instead of URLs
    #[arg(long = "script", action = ArgAction::SetTrue, conflicts_with_all = ["json", "ndjson"])]
    script: bool,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Fewest font requests worth combining; below it URLs are echoed as given
    /// (JSON summaries are always reported)
    #[arg(long = "min-candidates")]
    min_candidates: Option<usize>,
}

#[derive(Debug, Args)]
struct RewriteArgs {
    /// HTML files or directories ("-" rewrites STDIN to STDOUT)
    #[arg(required = true, value_hint = ValueHint::AnyPath)]
    paths: Vec<PathBuf>,

    /// Write rewritten documents back to their files
    #[arg(long = "in-place", action = ArgAction::SetTrue)]
    in_place: bool,

    /// How the combined request is injected
    #[arg(long = "markup", value_enum)]
    markup: Option<MarkupChoice>,

    /// Fewest font requests a document needs before it is rewritten
    #[arg(long = "min-candidates")]
    min_candidates: Option<usize>,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short = 'J', long = "jobs", value_hint = ValueHint::Other)]
    jobs: Option<usize>,

    /// Follow symlinks while walking directories
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Report one JSON object per file instead of printing markup
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long = "bind", default_value = "127.0.0.1:8765")]
    bind: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum MarkupChoice {
    Link,
    Script,
}

impl From<MarkupChoice> for MarkupType {
    fn from(choice: MarkupChoice) -> Self {
        match choice {
            MarkupChoice::Link => MarkupType::Link,
            MarkupChoice::Script => MarkupType::Script,
        }
    }
}

/// Per-file outcome of `rewrite`.
#[derive(Debug, Clone, Serialize)]
struct FileReport {
    path: PathBuf,
    changed: bool,
    summary: Option<CollectionSummary>,
    #[serde(skip)]
    markup: String,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let options = config::resolve_options(cli.config.as_deref())?;

    match cli.command {
        Command::Combine(args) => run_combine(args, &options),
        Command::Rewrite(args) => run_rewrite(args, options),
        Command::Serve(args) => run_serve(args, options),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_combine(args: CombineArgs, options: &CombineOptions) -> Result<()> {
    let stdin = io::stdin();
    let urls = gather_urls(&args.urls, args.stdin_urls, stdin.lock())?;
    let collection = FontCollection::from_urls(&urls).context("combining font requests")?;
    let min_candidates = args.min_candidates.unwrap_or(options.min_candidates);
    let worth_combining = options
        .clone()
        .with_min_candidates(min_candidates)
        .has_enough_candidates(count_candidates(&urls));

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.ndjson {
        write_ndjson(&[CollectionSummary::from(&collection)], &mut handle)?;
    } else if args.json {
        write_json_pretty(&[CollectionSummary::from(&collection)], &mut handle)?;
        writeln!(handle)?;
    } else if !worth_combining {
        debug!(urls = urls.len(), "not enough font requests to combine");
        if args.script || options.markup_type == MarkupType::Script {
            writeln!(handle, "{}", render_original_links(&urls))?;
        } else {
            for url in &urls {
                writeln!(handle, "{url}")?;
            }
        }
    } else if args.script || options.markup_type == MarkupType::Script {
        writeln!(handle, "{}", render_script(&collection))?;
    } else {
        write_plain_urls(&collection, &mut handle)?;
    }

    Ok(())
}

/// Number of `urls` that are font requests.
fn count_candidates<S: AsRef<str>>(urls: &[S]) -> usize {
    urls.iter()
        .filter(|url| is_font_request_url(url.as_ref()))
        .count()
}

fn write_plain_urls(collection: &FontCollection, mut w: impl Write) -> Result<()> {
    if let Some(url) = collection.combined_url() {
        writeln!(w, "{url}")?;
    }
    for url in collection.text_urls() {
        writeln!(w, "{url}")?;
    }
    Ok(())
}

fn gather_urls(raw_urls: &[String], read_stdin: bool, mut stdin: impl BufRead) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    if read_stdin {
        urls.extend(read_lines_from(&mut stdin)?);
    }

    for url in raw_urls {
        if url == "-" {
            urls.extend(read_lines_from(&mut stdin)?);
        } else {
            urls.push(url.clone());
        }
    }

    if urls.is_empty() {
        return Err(anyhow!("no font request urls provided"));
    }

    Ok(urls)
}

fn read_lines_from(reader: &mut impl BufRead) -> Result<Vec<String>> {
    let mut buf = String::new();
    let mut lines = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }

        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    Ok(lines)
}

fn rewrite_options(args: &RewriteArgs, mut options: CombineOptions) -> CombineOptions {
    if let Some(markup) = args.markup {
        options = options.with_markup_type(markup.into());
    }
    if let Some(min) = args.min_candidates {
        options = options.with_min_candidates(min);
    }
    options
}

fn run_rewrite(args: RewriteArgs, options: CombineOptions) -> Result<()> {
    let options = rewrite_options(&args, options);

    if matches!(args.jobs, Some(0)) {
        bail!("--jobs must be at least 1 when provided");
    }

    if args.paths.iter().any(|p| p == Path::new("-")) {
        if args.paths.len() > 1 || args.in_place {
            bail!("\"-\" cannot be combined with other paths or --in-place");
        }
        let mut markup = String::new();
        io::stdin()
            .read_to_string(&mut markup)
            .context("reading markup from STDIN")?;
        let result = rewrite(&markup, &options)?;
        io::stdout().write_all(result.markup.as_bytes())?;
        return Ok(());
    }

    let files = HtmlDiscovery::new(&args.paths)
        .follow_symlinks(args.follow_symlinks)
        .discover()?;

    if files.is_empty() {
        bail!("no html files found");
    }
    if files.len() > 1 && !args.in_place && !args.ndjson {
        bail!("found {} html files; use --in-place or --ndjson", files.len());
    }

    let run_all = || -> Result<Vec<FileReport>> {
        files
            .par_iter()
            .map(|path| rewrite_file(path, &options, args.in_place))
            .collect()
    };

    let reports = if let Some(jobs) = args.jobs {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(run_all)?
    } else {
        run_all()?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.ndjson {
        for report in &reports {
            writeln!(handle, "{}", serde_json::to_string(report)?)?;
        }
    } else if !args.in_place {
        if let Some(report) = reports.first() {
            handle.write_all(report.markup.as_bytes())?;
        }
    }

    let changed = reports.iter().filter(|r| r.changed).count();
    info!(files = reports.len(), changed, "rewrite finished");
    Ok(())
}

fn rewrite_file(path: &Path, options: &CombineOptions, in_place: bool) -> Result<FileReport> {
    let markup =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let result = rewrite(&markup, options).with_context(|| format!("rewriting {}", path.display()))?;

    if result.changed && in_place {
        fs::write(path, &result.markup).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "combined font requests");
    } else if !result.changed {
        debug!(path = %path.display(), "left unchanged");
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        changed: result.changed,
        summary: result.summary,
        markup: result.markup,
    })
}

fn run_serve(args: ServeArgs, options: CombineOptions) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(server::serve(&args.bind, options))
}
