//! Options for a single pb run
//!
//! Built once at startup by the command-line layer and handed to the
//! pipeline by value.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;

use crate::core::error::{Error, Result};
use crate::core::units;

/// Default chunk size when nothing is configured
pub const DEFAULT_BUFFER_SIZE: &str = "10M";

/// Named colors understood by the renderer
const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// What the progress bar counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedMode {
    /// Advance by bytes read
    #[default]
    Bytes,
    /// Advance by newlines read
    Lines,
}

impl FeedMode {
    /// Unit label shown next to counts
    pub fn unit_label(self) -> &'static str {
        match self {
            FeedMode::Bytes => "B",
            FeedMode::Lines => "Lines",
        }
    }
}

/// Appearance and behavior of the progress bar
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderOptions {
    /// Line width in columns, auto-detected when unset
    pub width: Option<u16>,
    /// Restrict glyphs to ASCII
    pub ascii: bool,
    /// Bar color: a name or a 0-255 palette index
    pub color: Option<String>,
    /// Erase the bar when finished instead of leaving it on screen
    pub clear: bool,
    /// Time to wait before the bar is first drawn
    pub delay: Duration,
}

impl RenderOptions {
    /// Validate values that cannot be checked by the type system
    pub fn validate(&self) -> Result<()> {
        if let Some(color) = &self.color {
            let lower = color.to_ascii_lowercase();
            if !COLOR_NAMES.contains(&lower.as_str()) && lower.parse::<u8>().is_err() {
                return Err(Error::InvalidInput(format!("Unknown color: {color}")));
            }
        }
        Ok(())
    }
}

/// Immutable options record consumed by the streaming pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Count bytes or lines
    pub feed_mode: FeedMode,

    /// Chunk size for each read
    pub buffer_size: NonZeroUsize,

    /// Raw `--total` value, parsed when the pipeline computes its total
    pub total: Option<String>,

    /// Input paths; empty (or a single "-") means standard input
    pub paths: Vec<PathBuf>,

    /// Progress bar appearance
    pub render: RenderOptions,

    /// Logging verbosity
    pub log_level: LevelFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            feed_mode: FeedMode::Bytes,
            buffer_size: NonZeroUsize::new(10 * 1024 * 1024).unwrap_or(NonZeroUsize::MIN),
            total: None,
            paths: Vec::new(),
            render: RenderOptions::default(),
            log_level: LevelFilter::Warn,
        }
    }
}

impl Options {
    /// True when informational or debug logging is enabled
    pub fn verbose_logging(&self) -> bool {
        self.log_level > LevelFilter::Warn
    }
}

/// Parse a buffer size string, rejecting zero and sizes beyond the address space
pub fn buffer_size_from_str(text: &str) -> Result<NonZeroUsize> {
    let bytes = units::parse_buffer_size(text)?;
    let bytes = usize::try_from(bytes).map_err(|_| Error::Parse {
        input: text.to_string(),
        kind: crate::core::error::ParseErrorKind::TooLarge,
    })?;
    NonZeroUsize::new(bytes)
        .ok_or_else(|| Error::InvalidInput(format!("Buffer size cannot be zero: {text}")))
}
