//! # progressbar
//!
//! Library behind the `pb` command: stream files (or standard input) to an
//! output sink while drawing a progress bar on standard error.
//!
//! ```no_run
//! use progressbar::{FeedMode, Options};
//!
//! let options = Options {
//!     feed_mode: FeedMode::Lines,
//!     paths: vec!["access.log".into()],
//!     ..Default::default()
//! };
//! let stats = progressbar::stream(options, std::io::stdout().lock())?;
//! eprintln!("{} lines", stats.lines);
//! # Ok::<(), progressbar::Error>(())
//! ```

pub mod core;

pub use crate::core::error::{Error, ParseErrorKind, Result};
pub use crate::core::options::{buffer_size_from_str, FeedMode, Options, RenderOptions};
pub use crate::core::progress::{ProgressRenderer, RenderState, Visibility};
pub use crate::core::units::{format_count, format_size, parse, UnitTable};
pub use crate::core::{StreamPipeline, StreamStats};

/// Stream every source named in `options` to `out`
pub fn stream<W: std::io::Write>(options: Options, out: W) -> Result<StreamStats> {
    StreamPipeline::new(options).run(out)
}
