use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use url::Url;

use issue_clip::clipboard::ClipboardWriter;
use issue_clip::config::Config;
use issue_clip::error::ExtractError;
use issue_clip::extractors::{Extractor, Page, PageKind};
use issue_clip::fetch;
use issue_clip::report::{copy_page, extract_report, CopyReport};

/// Copy tracker issues and knowledge-base articles as short text reports.
#[derive(Debug, Parser)]
#[command(name = "issue-clip", version)]
struct Cli {
    /// Extra TOML config file, layered above the discovered ones.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract a report from a page and copy it to the clipboard.
    Copy(CopyArgs),
    /// Convert an HTML fragment to indented text.
    Convert(ConvertArgs),
    /// Print the page kind detected for a URL.
    Classify(ClassifyArgs),
}

#[derive(Debug, Args)]
struct CopyArgs {
    /// Location of the page.
    #[arg(long)]
    url: String,

    /// Saved HTML of the rendered page, `-` for stdin. `--url` is fetched when omitted.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Use this page kind instead of classifying the URL.
    #[arg(long)]
    kind: Option<PageKind>,

    /// Print the report without touching the clipboard.
    #[arg(long)]
    no_clipboard: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    json: bool,

    /// Fetch timeout in seconds.
    #[arg(long, default_value_t = fetch::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// HTML file, `-` or nothing for stdin.
    input: Option<PathBuf>,

    #[arg(long)]
    max_length: Option<usize>,

    #[arg(long)]
    indent: Option<String>,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    #[arg(long)]
    url: String,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("issue-clip error: {error:#}");
            std::process::exit(1);
        }
    }
}

/// `Ok(false)` is a reported failure that has already been printed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    init_tracing(cli.quiet, cli.verbose)?;

    let config = Config::load_with(cli.config.as_deref()).context("failed to load configuration")?;

    match &cli.command {
        Commands::Copy(args) => handle_copy(args, &config),
        Commands::Convert(args) => handle_convert(args, config),
        Commands::Classify(args) => handle_classify(args),
    }
}

fn handle_copy(args: &CopyArgs, config: &Config) -> anyhow::Result<bool> {
    let html = match &args.html {
        Some(path) => read_input(path),
        None => fetch::fetch_page(&args.url, args.timeout),
    };

    let extractor = Extractor::from_config(config);
    let report = match html.and_then(|html| Page::parse(&html, &args.url)) {
        Ok(page) if args.no_clipboard => extract_report(&extractor, &page, args.kind),
        Ok(page) => {
            let writer = ClipboardWriter::from_config(&config.clipboard);
            copy_page(&extractor, &page, args.kind, &writer)
        }
        Err(err) => CopyReport::failure(&err),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if let Some(markdown) = &report.markdown {
            println!("{}", markdown);
        }
        match (&report.error, args.no_clipboard) {
            (Some(error), _) => eprintln!("Copy failed: {}", error),
            (None, false) => eprintln!("Copied to clipboard."),
            (None, true) => {}
        }
    }

    Ok(report.success)
}

fn handle_convert(args: &ConvertArgs, mut config: Config) -> anyhow::Result<bool> {
    let html = match &args.input {
        Some(path) => read_input(path)?,
        None => read_input(Path::new("-"))?,
    };

    if let Some(max_length) = args.max_length {
        config.normalize.max_length = max_length;
    }
    if let Some(indent) = &args.indent {
        config.normalize.indent = indent.clone();
    }
    config.validate()?;

    println!("{}", Extractor::from_config(&config).convert_fragment(&html));
    Ok(true)
}

fn handle_classify(args: &ClassifyArgs) -> anyhow::Result<bool> {
    let url = Url::parse(&args.url).with_context(|| format!("invalid URL '{}'", args.url))?;
    let kind = PageKind::classify(&url).ok_or_else(|| ExtractError::UnsupportedPage {
        location: args.url.clone(),
    })?;
    println!("{}", kind);
    Ok(true)
}

fn read_input(path: &Path) -> issue_clip::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ISSUE_CLIP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
