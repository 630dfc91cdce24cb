//! Library-level tests for the streaming pipeline
//!
//! Sources are real files in a temporary directory. Progress is hidden unless a
//! test draws it into an in-memory terminal.

use std::fs;
use std::io::{self, Cursor, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use indicatif::{InMemoryTerm, ProgressDrawTarget};
use progressbar::{Error, FeedMode, Options, RenderOptions, StreamPipeline, Visibility};

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

fn options(paths: Vec<PathBuf>, buffer: usize) -> Options {
    Options {
        buffer_size: NonZeroUsize::new(buffer).unwrap(),
        paths,
        ..Default::default()
    }
}

fn run(options: Options) -> (Result<progressbar::StreamStats, Error>, Vec<u8>) {
    let mut out = Vec::new();
    let result = StreamPipeline::new(options).run_with(Cursor::new(Vec::new()), &mut out, Visibility::Hidden);
    (result, out)
}

#[test]
fn test_output_is_concatenation_in_argument_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"alpha\n");
    let b = write_file(dir.path(), "b.bin", &[0u8, 159, 146, 150, 255]);
    let c = write_file(dir.path(), "c.txt", b"gamma without newline");

    for buffer in [1, 3, 4096] {
        let (result, out) = run(options(vec![c.clone(), a.clone(), b.clone()], buffer));
        let stats = result.unwrap();

        let mut expected = b"gamma without newline".to_vec();
        expected.extend_from_slice(b"alpha\n");
        expected.extend_from_slice(&[0u8, 159, 146, 150, 255]);
        assert_eq!(out, expected, "buffer size {buffer}");
        assert_eq!(stats.bytes, expected.len() as u64);
        assert_eq!(stats.sources, 3);
    }
}

#[test]
fn test_same_file_twice_is_streamed_twice() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"ab");

    let (result, out) = run(options(vec![a.clone(), a], 1));
    assert_eq!(result.unwrap().sources, 2);
    assert_eq!(out, b"abab");
}

#[test]
fn test_missing_file_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"should not appear");
    let missing = dir.path().join("missing.txt");
    let c = write_file(dir.path(), "c.txt", b"nor this");

    let (result, out) = run(options(vec![a, missing.clone(), c], 1024));
    let err = result.unwrap_err();

    assert!(out.is_empty());
    assert!(err.to_string().contains(&missing.display().to_string()), "{err}");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_totals_by_mode() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_file(dir.path(), "one", &[b'x'; 100]),
        write_file(dir.path(), "two", &[b'y'; 200]),
        write_file(dir.path(), "three", &[b'z'; 300]),
    ];
    let mut cache = progressbar::core::SizeCache::new();
    let sources = progressbar::core::source::resolve_sources(&paths, &mut cache).unwrap();

    let bytes = StreamPipeline::new(options(paths.clone(), 64));
    assert_eq!(bytes.total(&sources).unwrap(), Some(600));

    let lines = StreamPipeline::new(Options {
        feed_mode: FeedMode::Lines,
        ..options(paths, 64)
    });
    assert_eq!(lines.total(&sources).unwrap(), None);
}

#[test]
fn test_line_counts_across_files_and_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.log", b"1\n2\n3");
    let b = write_file(dir.path(), "b.log", b"\n4\n");

    let (result, out) = run(Options {
        feed_mode: FeedMode::Lines,
        ..options(vec![a, b], 2)
    });
    let stats = result.unwrap();

    assert_eq!(out, b"1\n2\n3\n4\n");
    // "3" only becomes a line once b.log supplies its newline
    assert_eq!(stats.lines, 4);
}

#[test]
fn test_stdin_with_explicit_total() {
    let mut out = Vec::new();
    let stats = StreamPipeline::new(Options {
        total: Some("1k".into()),
        ..options(vec!["-".into()], 8)
    })
    .run_with(Cursor::new(b"from standard input".to_vec()), &mut out, Visibility::Hidden)
    .unwrap();

    assert_eq!(out, b"from standard input");
    assert_eq!(stats.sources, 1);
}

#[test]
fn test_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let empty = write_file(dir.path(), "empty", b"");

    let (result, out) = run(options(vec![empty], 16));
    assert_eq!(result.unwrap().bytes, 0);
    assert!(out.is_empty());
}

/// Serves one chunk, then fails every later read
struct DiesAfterFirstRead {
    served: bool,
}

impl Read for DiesAfterFirstRead {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::new(io::ErrorKind::Other, "device went away"));
        }
        self.served = true;
        let n = buf.len().min(5);
        buf[..n].copy_from_slice(&b"first"[..n]);
        Ok(n)
    }
}

fn run_failing_read(render: RenderOptions) -> (Error, Vec<u8>, InMemoryTerm) {
    let term = InMemoryTerm::new(4, 100);
    let mut out = Vec::new();
    let err = StreamPipeline::new(Options { render, ..options(vec![], 8) })
        .draw_to(ProgressDrawTarget::term_like(Box::new(term.clone())))
        .run_with(DiesAfterFirstRead { served: false }, &mut out, Visibility::Visible)
        .unwrap_err();
    (err, out, term)
}

#[test]
fn test_read_failure_mid_stream() {
    let (err, out, term) = run_failing_read(RenderOptions::default());

    assert!(matches!(&err, Error::IoError(e) if e.kind() == io::ErrorKind::Other), "{err:?}");
    assert_eq!(err.exit_code(), 5);
    assert_eq!(out, b"first");

    // the bar was closed on its last count before the error came back
    let frame = term.contents();
    assert!(frame.contains("<stdin>: 5 B"), "{frame}");
}

#[test]
fn test_read_failure_still_clears_bar() {
    let (err, out, term) = run_failing_read(RenderOptions { clear: true, ..Default::default() });

    assert_eq!(err.exit_code(), 5);
    assert_eq!(out, b"first");
    assert_eq!(term.contents(), "");
}

#[test]
fn test_visible_run_leaves_final_frame() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", &[b'a'; 6]);
    let b = write_file(dir.path(), "b.bin", &[b'b'; 4]);
    let term = InMemoryTerm::new(4, 120);

    let mut out = Vec::new();
    let stats = StreamPipeline::new(options(vec![a, b.clone()], 3))
        .draw_to(ProgressDrawTarget::term_like(Box::new(term.clone())))
        .run_with(Cursor::new(Vec::new()), &mut out, Visibility::Visible)
        .unwrap();

    assert_eq!(stats.bytes, 10);
    let frame = term.contents();
    assert!(frame.contains(&format!("{}: 100%", b.display())), "{frame}");
    assert!(frame.contains("10 B/10 B"), "{frame}");
}

#[test]
fn test_hidden_run_ignores_draw_target() {
    let term = InMemoryTerm::new(4, 100);
    let mut out = Vec::new();
    StreamPipeline::new(options(vec![], 8))
        .draw_to(ProgressDrawTarget::term_like(Box::new(term.clone())))
        .run_with(Cursor::new(b"quiet".to_vec()), &mut out, Visibility::Hidden)
        .unwrap();

    assert_eq!(out, b"quiet");
    assert_eq!(term.contents(), "");
}
