//! # pb
//!
//! Command-line interface for the progressbar library.
//! Copies files (or standard input) to standard output with a progress bar on stderr.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{error, LevelFilter};
use progressbar::core::options::DEFAULT_BUFFER_SIZE;
use progressbar::{buffer_size_from_str, Error, FeedMode, Options, RenderOptions, Result};

mod cli;

use cli::logging::{self, LEVEL_NAMES};
use cli::{ConfigFile, LogStyle};

/// Environment variable overriding the configured log level
const LEVEL_ENV: &str = "PB_LOGGING_LEVEL";

/// Environment variable overriding the configured log style
const STYLE_ENV: &str = "PB_LOGGING_STYLE";

/// Command-line interface for pb
#[derive(Parser, Debug)]
#[command(name = "pb")]
#[command(about = "Display progress bar for streaming data.")]
#[command(long_about = "Display progress bar for streaming data.

Copies each FILE (or standard input) to standard output, drawing progress on stderr:
  pb data.csv | gzip > data.csv.gz       # Bytes, with ETA from the file size
  pb -l -t 10m events.log | ./ingest     # Lines, against an expected 10 million
  cat dump.sql | pb | psql               # Unknown total, rate only

The bar is hidden when stderr is not a terminal or when --verbose/--debug is set.")]
#[command(version = env!("PB_VERSION"))]
struct Cli {
    /// Paths to files (default: <stdin>)
    #[arg(value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Count lines instead of bytes
    #[arg(short, long)]
    lines: bool,

    /// Total expected, e.g. 500k, 2m, 1b (decimal units)
    #[arg(short, long, value_name = "COUNT")]
    total: Option<String>,

    /// Buffer size, e.g. 64k, 10M (default: 10M)
    #[arg(short, long, value_name = "SIZE", env = "PB_STREAM_BUFFSIZE")]
    buffer: Option<String>,

    /// Width of the progress line in columns (default: terminal width)
    #[arg(short, long, value_name = "COLUMNS", env = "PB_PROGRESS_WIDTH")]
    width: Option<u16>,

    /// Use ASCII characters only
    #[arg(short, long)]
    ascii: bool,

    /// Bar color (name or 0-255)
    #[arg(short, long, value_name = "COLOR", env = "PB_PROGRESS_COLOR")]
    color: Option<String>,

    /// Clear the progress bar when finished
    #[arg(short = 'C', long)]
    clear: bool,

    /// Seconds to wait before showing the progress bar
    #[arg(long, value_name = "SECONDS", env = "PB_PROGRESS_DELAY")]
    delay: Option<f64>,

    /// Logging level (disables progress bar above warning)
    #[arg(long, value_name = "LEVEL", value_parser = LEVEL_NAMES, conflicts_with_all = ["verbose", "debug"])]
    logging: Option<String>,

    /// Enable logging (disable progress bar)
    #[arg(short, long, conflicts_with = "debug")]
    verbose: bool,

    /// Enable debug logging (conflicts with --verbose)
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    /// Level name from flags, then environment, then configuration
    fn level_name(&self, config: &ConfigFile) -> String {
        if self.debug {
            "debug".to_string()
        } else if self.verbose {
            "info".to_string()
        } else if let Some(level) = &self.logging {
            level.clone()
        } else if let Ok(level) = std::env::var(LEVEL_ENV) {
            level
        } else {
            config
                .logging
                .level
                .clone()
                .unwrap_or_else(|| logging::DEFAULT_LEVEL.to_string())
        }
    }

    /// Merge flags with configuration into the options record
    fn into_options(self, config: &ConfigFile, log_level: LevelFilter) -> Result<Options> {
        let buffer = self
            .buffer
            .or_else(|| config.stream.buffsize.clone())
            .unwrap_or_else(|| DEFAULT_BUFFER_SIZE.to_string());

        let delay_secs = self.delay.or(config.progress.delay).unwrap_or(0.0);
        let delay = Duration::try_from_secs_f64(delay_secs)
            .map_err(|_| Error::InvalidInput(format!("Invalid delay: {delay_secs}")))?;

        let render = RenderOptions {
            width: self.width.or(config.progress.width),
            ascii: self.ascii || config.progress.ascii.unwrap_or(false),
            color: self.color.or_else(|| config.progress.color.clone()),
            clear: self.clear || config.progress.clear.unwrap_or(false),
            delay,
        };
        render.validate()?;

        Ok(Options {
            feed_mode: if self.lines { FeedMode::Lines } else { FeedMode::Bytes },
            buffer_size: buffer_size_from_str(&buffer)?,
            total: self.total,
            paths: self.paths,
            render,
            log_level,
        })
    }
}

fn main() {
    let cli = Cli::parse();
    let config = ConfigFile::load();

    // Logging comes up first so configuration errors can be reported through it
    let defaults = ConfigFile::default();
    let active = config.as_ref().unwrap_or(&defaults);
    let level_name = cli.level_name(active);
    let level = logging::level_from_name(&level_name).unwrap_or(LevelFilter::Warn);
    let style = std::env::var(STYLE_ENV)
        .ok()
        .or_else(|| active.logging.style.clone())
        .map(|s| LogStyle::from_name(&s))
        .unwrap_or_default();
    logging::init(level, style);

    if logging::level_from_name(&level_name).is_none() {
        error!("Unknown logging level: {level_name}");
        std::process::exit(progressbar::core::error::EXIT_BAD_CONFIG);
    }

    if let Err(e) = run(cli, config, level) {
        error!("{e}");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli, config: anyhow::Result<ConfigFile>, level: LevelFilter) -> Result<()> {
    let config = config.map_err(|e| Error::Config(format!("{e:#}")))?;
    let options = cli.into_options(&config, level)?;

    let stdout = std::io::stdout();
    progressbar::stream(options, stdout.lock())?;
    Ok(())
}
