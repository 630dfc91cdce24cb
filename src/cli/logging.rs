//! Logger setup for the pb command
//!
//! Log lines go to stderr through `env_logger`. Any level more verbose than
//! `warning` also suppresses the progress bar.

use std::io::Write;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

/// Default level name when nothing is configured
pub const DEFAULT_LEVEL: &str = "warning";

/// Level names accepted by `--logging`
pub const LEVEL_NAMES: [&str; 6] = ["critical", "error", "warning", "info", "debug", "trace"];

/// Line format for log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogStyle {
    /// `LEVEL [pb] message`
    #[default]
    Default,
    /// Timestamp, level, target and message
    Detailed,
    /// Timestamp, level and message without color
    System,
}

impl LogStyle {
    /// Unknown names fall back to the default style
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "detailed" => LogStyle::Detailed,
            "system" => LogStyle::System,
            _ => LogStyle::Default,
        }
    }
}

/// Map a level name to a filter; `critical` has no own level and maps to errors
pub fn level_from_name(name: &str) -> Option<LevelFilter> {
    match name.to_ascii_lowercase().as_str() {
        "critical" | "error" => Some(LevelFilter::Error),
        "warning" | "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

/// Install the global logger
pub fn init(level: LevelFilter, style: LogStyle) {
    let mut builder = Builder::new();
    builder.filter_level(level).target(Target::Stderr);

    match style {
        LogStyle::Default => {
            builder.format(|buf, record| {
                let level = buf.default_styled_level(record.level());
                writeln!(buf, "{} [pb] {}", level, record.args())
            });
        }
        LogStyle::Detailed => {
            builder.format(|buf, record| {
                let level = buf.default_styled_level(record.level());
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    buf.timestamp_millis(),
                    level,
                    record.target(),
                    record.args()
                )
            });
        }
        LogStyle::System => {
            builder
                .format(|buf, record| {
                    writeln!(buf, "{} {} {}", buf.timestamp(), record.level(), record.args())
                })
                .write_style(WriteStyle::Never);
        }
    }

    builder.init();
}
