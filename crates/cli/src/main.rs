mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use readable_core::{
    FetchConfig, OutputFormat, Readability, ReadabilityConfig, TextConfig, fetch_file, fetch_stdin, fetch_url,
};
use tracing_subscriber::EnvFilter;
use url::Url;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the extracted article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Html,
    Text,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, text, json", s)),
        }
    }
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => OutputFormat::Html,
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Extract the main article and title from web pages
#[derive(Parser, Debug)]
#[command(name = "readable")]
#[command(version)]
#[command(about = "Extract the main article from web pages", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: Format,

    /// Put the title above the text (text only)
    #[arg(long)]
    title: bool,

    /// Wrap text at this many characters (text only, 0 = no wrapping)
    #[arg(long, default_value = "0", value_name = "COLS")]
    width: usize,

    /// Base URL for resolving links when reading a file or stdin
    #[arg(long, value_name = "URL", value_parser = Url::parse)]
    base_url: Option<Url>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Keep elements whose class/id look like page chrome
    #[arg(long)]
    keep_unlikely: bool,

    /// Remove headings that look like page chrome
    #[arg(long)]
    clean_headers: bool,

    /// Collapse runs of line breaks
    #[arg(long)]
    collapse_breaks: bool,

    /// Keep links and image sources as they appear in the page
    #[arg(long)]
    no_resolve_links: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn is_url(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }

    fn readability_config(&self) -> ReadabilityConfig {
        ReadabilityConfig::builder()
            .remove_unlikely(!self.keep_unlikely)
            .clean_headers(self.clean_headers)
            .collapse_breaks(self.collapse_breaks)
            .resolve_links(!self.no_resolve_links)
            .build()
    }

    fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig { timeout: self.timeout, ..Default::default() };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("readable_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Read the page and return it with the URL links should resolve against
async fn read_input(args: &Args) -> anyhow::Result<(String, Option<String>)> {
    if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 3, "Reading from stdin");
        }
        let html = fetch_stdin().context("Failed to read from stdin")?;
        Ok((html, args.base_url.as_ref().map(Url::to_string)))
    } else if args.is_url() {
        if args.verbose {
            echo::print_step(
                1,
                3,
                &format!("Fetching from {}", args.input.bright_white().underline()),
            );
        }
        let html = fetch_url(&args.input, &args.fetch_config())
            .await
            .context("Failed to fetch URL")?;
        Ok((html, Some(args.input.clone())))
    } else {
        if args.verbose {
            echo::print_step(1, 3, &format!("Reading from file {}", args.input.bright_white()));
        }
        let html = fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        Ok((html, args.base_url.as_ref().map(Url::to_string)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let started = Instant::now();
    let mut timings: Vec<(&str, Duration)> = Vec::new();

    if args.verbose {
        echo::print_banner();
        init_tracing();
        echo::status(echo::Status::Info, "debug logging enabled");
        eprintln!();
    }

    let step = Instant::now();
    let (html, source_url) = read_input(&args).await?;
    timings.push(("Read", step.elapsed()));

    if args.verbose {
        echo::print_field("Size", &echo::format_size(html.len()));
        eprintln!();
        echo::print_step(2, 3, "Extracting article");
    }

    let step = Instant::now();
    let reader = Readability::with_config(args.readability_config());
    let result = reader
        .extract_from_html(&html, source_url.as_deref())
        .context("Failed to extract article")?;
    timings.push(("Extract", step.elapsed()));

    if args.verbose {
        echo::print_extraction_details(&result);
        echo::print_step(3, 3, "Writing output");
        echo::print_field("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let output = if args.format == Format::Text && (args.title || args.width > 0) {
        result.to_text_with_config(&TextConfig { line_width: args.width, include_title: args.title })
    } else {
        result.to_format(args.format.into()).context("Failed to format output")?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::status(echo::Status::Done, &format!("output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output),
    }

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}
