//! Core library modules for pb
//!
//! This module contains the streaming core: unit parsing, source resolution,
//! total estimation, chunked reads, progress rendering and the pipeline
//! that ties them together.

pub mod error;
pub mod options;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod source;
pub mod total;
pub mod units;

// Re-export main types for internal use
pub use pipeline::{StreamPipeline, StreamStats};
pub use source::{Source, SizeCache};
