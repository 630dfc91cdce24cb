//! Terminal progress bar for pb
//!
//! Wraps an `indicatif` bar with the states a run goes through:
//! pending (waiting out the startup delay), active, suppressed and finished.
//! The bar always starts on a hidden draw target and is only moved to stderr
//! (or the target given to [`ProgressRenderer::with_draw_target`]) once it is
//! allowed to appear.

use std::fmt::Write as _;
use std::io::IsTerminal;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};

use crate::core::error::{Error, Result};
use crate::core::options::{FeedMode, RenderOptions};
use crate::core::units::format_count;

/// Maximum redraws per second while the bar is visible
const REFRESH_HZ: u8 = 10;

/// Columns used by everything on the line except the bar and description
const RESERVED_COLUMNS: usize = 56;

/// Narrowest bar drawn when a width override is set
const MIN_BAR_WIDTH: usize = 10;

/// Whether progress may be drawn at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// Hidden when stderr is not a terminal or log lines would share it
    pub fn detect(verbose_logging: bool) -> Self {
        if verbose_logging || !std::io::stderr().is_terminal() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}

/// Lifecycle of a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Visible but still inside the startup delay
    Pending,
    /// Drawing to stderr
    Active,
    /// Accepting updates without ever drawing
    Suppressed,
    /// Closed; further updates are ignored
    Finished,
}

/// Progress bar advanced by the streaming pipeline
pub struct ProgressRenderer {
    bar: ProgressBar,
    mode: FeedMode,
    options: RenderOptions,
    state: RenderState,
    started: Instant,
    description: String,
    /// Where the bar draws once active; taken on activation
    target: Option<ProgressDrawTarget>,
}

impl ProgressRenderer {
    /// Create a renderer for `total` units (`None` for an indeterminate spinner)
    pub fn new(
        mode: FeedMode,
        total: Option<u64>,
        options: &RenderOptions,
        visibility: Visibility,
    ) -> Result<Self> {
        let stderr = ProgressDrawTarget::stderr_with_hz(REFRESH_HZ);
        Self::with_draw_target(mode, total, options, visibility, stderr)
    }

    /// Same as [`ProgressRenderer::new`] but drawing to `target` instead of stderr
    pub fn with_draw_target(
        mode: FeedMode,
        total: Option<u64>,
        options: &RenderOptions,
        visibility: Visibility,
        target: ProgressDrawTarget,
    ) -> Result<Self> {
        options.validate()?;

        let state = match visibility {
            Visibility::Hidden => RenderState::Suppressed,
            Visibility::Visible => RenderState::Pending,
        };

        let mut renderer = Self {
            bar: ProgressBar::with_draw_target(total, ProgressDrawTarget::hidden()),
            mode,
            options: options.clone(),
            state,
            started: Instant::now(),
            description: String::new(),
            target: Some(target),
        };
        renderer.apply_style()?;
        renderer.try_activate();
        Ok(renderer)
    }

    /// Add `amount` to the running count
    pub fn advance(&mut self, amount: u64) {
        if self.state == RenderState::Finished {
            return;
        }
        self.bar.inc(amount);
        self.try_activate();
    }

    /// Replace the label shown before the bar
    pub fn set_description(&mut self, name: impl Into<String>) {
        if self.state == RenderState::Finished {
            return;
        }
        self.description = name.into();
        self.bar.set_message(self.description.clone());

        // the bar width depends on the label length
        if self.options.width.is_some() {
            if let Err(e) = self.apply_style() {
                log::debug!("Keeping previous progress style: {e}");
            }
        }
    }

    /// Close the bar, leaving or clearing the final state as configured.
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn finish(&mut self) {
        match self.state {
            RenderState::Finished => return,
            RenderState::Active if self.options.clear => self.bar.finish_and_clear(),
            RenderState::Active => self.bar.abandon(),
            RenderState::Pending | RenderState::Suppressed => self.bar.finish_and_clear(),
        }
        self.state = RenderState::Finished;
    }

    /// Cumulative count advanced so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Total the bar counts towards, if known
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Move from pending to active once the startup delay has passed
    fn try_activate(&mut self) {
        if self.state == RenderState::Pending && self.started.elapsed() >= self.options.delay {
            if let Some(target) = self.target.take() {
                self.bar.set_draw_target(target);
            }
            self.state = RenderState::Active;
            self.bar.tick();
        }
    }

    fn apply_style(&mut self) -> Result<()> {
        let style = ProgressStyle::with_template(&self.template())
            .map_err(|e| Error::InvalidInput(format!("Invalid progress style: {e}")))?;

        let style = if self.options.ascii {
            style.progress_chars("#>-").tick_chars("|/-\\|")
        } else {
            style.progress_chars("█▉▊▋▌▍▎▏ ")
        };

        let style = style
            .with_key("lines", write_lines)
            .with_key("total_lines", write_total_lines)
            .with_key("lines_per_sec", write_lines_per_sec);

        self.bar.set_style(style);
        Ok(())
    }

    fn template(&self) -> String {
        let (count, rate) = match self.mode {
            FeedMode::Bytes => ("{binary_bytes}", "{binary_bytes_per_sec}"),
            FeedMode::Lines => ("{lines}", "{lines_per_sec}"),
        };

        if self.bar.length().is_none() {
            return format!("{{spinner}} {{msg}}: {count} [{{elapsed_precise}}, {rate}]");
        }

        let total = match self.mode {
            FeedMode::Bytes => "{binary_total_bytes}",
            FeedMode::Lines => "{total_lines}",
        };
        format!(
            "{{msg}}: {{percent:>3}}%|{bar}| {count}/{total} [{{elapsed_precise}}<{{eta_precise}}, {rate}]",
            bar = self.bar_key(),
        )
    }

    fn bar_key(&self) -> String {
        let color = self
            .options
            .color
            .as_deref()
            .map(|c| format!(".{}", c.to_ascii_lowercase()))
            .unwrap_or_default();

        match self.options.width {
            Some(width) => {
                let used = RESERVED_COLUMNS + self.description.chars().count();
                let bar = usize::from(width).saturating_sub(used).max(MIN_BAR_WIDTH);
                format!("{{bar:{bar}{color}}}")
            }
            None if color.is_empty() => "{wide_bar}".to_string(),
            None => format!("{{wide_bar:{color}}}"),
        }
    }
}

impl Drop for ProgressRenderer {
    fn drop(&mut self) {
        self.finish();
    }
}

fn write_lines(state: &ProgressState, w: &mut dyn std::fmt::Write) {
    let _ = write!(w, "{}", format_count(state.pos() as f64));
}

fn write_total_lines(state: &ProgressState, w: &mut dyn std::fmt::Write) {
    match state.len() {
        Some(len) => {
            let _ = write!(w, "{}", format_count(len as f64));
        }
        None => {
            let _ = w.write_str("?");
        }
    }
}

fn write_lines_per_sec(state: &ProgressState, w: &mut dyn std::fmt::Write) {
    let _ = write!(w, "{} Lines/s", format_count(state.per_sec()));
}
