//! Streaming pipeline for pb
//!
//! Copies every source to the output sink in order while advancing a single
//! progress bar. Sources are opened lazily and closed as soon as they are
//! exhausted; the progress bar is closed on every exit path.

use std::io::{Read, Write};

use indicatif::ProgressDrawTarget;
use log::{debug, info};
use once_cell::unsync::OnceCell;

use crate::core::error::Result;
use crate::core::options::Options;
use crate::core::progress::{ProgressRenderer, Visibility};
use crate::core::reader::ChunkedReader;
use crate::core::source::{resolve_sources, SizeCache, Source};
use crate::core::total::estimate_total;
use crate::core::units::format_size;

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Bytes written to the sink
    pub bytes: u64,
    /// Newlines written to the sink
    pub lines: u64,
    /// Sources fully consumed
    pub sources: usize,
}

/// Streams sources to a sink with progress
pub struct StreamPipeline {
    options: Options,
    sizes: SizeCache,
    total: OnceCell<Option<u64>>,
    draw_target: Option<ProgressDrawTarget>,
}

impl StreamPipeline {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            sizes: SizeCache::new(),
            total: OnceCell::new(),
            draw_target: None,
        }
    }

    /// Draw the progress bar to `target` instead of stderr when it is visible
    pub fn draw_to(mut self, target: ProgressDrawTarget) -> Self {
        self.draw_target = Some(target);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Progress total for `sources`, computed once per pipeline
    pub fn total(&self, sources: &[Source]) -> Result<Option<u64>> {
        self.total
            .get_or_try_init(|| {
                estimate_total(self.options.total.as_deref(), self.options.feed_mode, sources)
            })
            .copied()
    }

    /// Stream to `out`, reading standard input when no paths were given
    pub fn run<W: Write>(&mut self, out: W) -> Result<StreamStats> {
        let visibility = Visibility::detect(self.options.verbose_logging());
        let stdin = std::io::stdin();
        self.run_with(stdin.lock(), out, visibility)
    }

    /// Stream to `out` using `stdin` as the standard-input source
    pub fn run_with<R: Read, W: Write>(
        &mut self,
        stdin: R,
        mut out: W,
        visibility: Visibility,
    ) -> Result<StreamStats> {
        let sources = resolve_sources(&self.options.paths, &mut self.sizes)?;
        let total = self.total(&sources)?;

        let (mode, render) = (self.options.feed_mode, &self.options.render);
        let mut progress = match self.draw_target.take() {
            Some(target) => ProgressRenderer::with_draw_target(mode, total, render, visibility, target)?,
            None => ProgressRenderer::new(mode, total, render, visibility)?,
        };

        let result = self.stream_all(&sources, stdin, &mut out, &mut progress);
        progress.finish();

        let stats = result?;
        info!(
            "Finished {} source(s): {} written",
            stats.sources,
            format_size(stats.bytes)
        );
        Ok(stats)
    }

    fn stream_all<R: Read, W: Write>(
        &self,
        sources: &[Source],
        mut stdin: R,
        out: &mut W,
        progress: &mut ProgressRenderer,
    ) -> Result<StreamStats> {
        let mut stats = StreamStats::default();

        for source in sources {
            let name = source.name();
            progress.set_description(name.as_str());
            match source.open_file()? {
                Some(file) => self.stream_source(&name, file, out, progress, &mut stats)?,
                None => self.stream_source(&name, &mut stdin, out, progress, &mut stats)?,
            }
            stats.sources += 1;
        }

        out.flush()?;
        Ok(stats)
    }

    fn stream_source<R: Read, W: Write>(
        &self,
        name: &str,
        reader: R,
        out: &mut W,
        progress: &mut ProgressRenderer,
        stats: &mut StreamStats,
    ) -> Result<()> {
        let mode = self.options.feed_mode;
        let mut reader = ChunkedReader::new(reader, self.options.buffer_size);

        while let Some(chunk) = reader.next_chunk()? {
            debug!("Writing {} bytes ({})", chunk.len(), name);
            progress.advance(mode.advance_for(&chunk));
            out.write_all(chunk.bytes)?;

            stats.bytes += chunk.len() as u64;
            stats.lines += chunk.newlines() as u64;
        }
        Ok(())
    }
}
