//! Error types for the pb streaming core
//!
//! Every failure is fatal: errors are reported once at `critical` level by the
//! binary and mapped to a process exit status with [`Error::exit_code`].

use std::fmt;
use std::path::{Path, PathBuf};

use strsim::normalized_levenshtein;

/// Exit status for argument and option errors
pub const EXIT_BAD_ARGUMENT: i32 = 2;

/// Exit status for unreadable or malformed configuration files
pub const EXIT_BAD_CONFIG: i32 = 3;

/// Exit status for I/O failures while streaming
pub const EXIT_RUNTIME_ERROR: i32 = 5;

/// Why a size or count string was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No digits, trailing garbage, or an unknown unit letter
    Unrecognized,
    /// A known but unsupported unit, or a value that overflows
    TooLarge,
}

/// Main error type for pb operations
#[derive(Debug)]
pub enum Error {
    /// Malformed buffer size string
    Parse {
        input: String,
        kind: ParseErrorKind,
    },

    /// Malformed `--total` value
    InvalidTotal(String),

    /// Input path missing or not a regular file
    NotFound {
        path: PathBuf,
        suggestion: Option<PathBuf>,
    },

    /// Invalid option value (zero buffer, unknown color, ...)
    InvalidInput(String),

    /// Configuration file could not be read or parsed
    Config(String),

    /// Read or write failure mid-stream
    IoError(std::io::Error),
}

impl Error {
    /// Build a `NotFound` error, looking for a likely typo in the same directory
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Error::NotFound {
            path: path.to_path_buf(),
            suggestion: suggest_sibling(path),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Parse { .. }
            | Error::InvalidTotal(_)
            | Error::NotFound { .. }
            | Error::InvalidInput(_) => EXIT_BAD_ARGUMENT,
            Error::Config(_) => EXIT_BAD_CONFIG,
            Error::IoError(_) => EXIT_RUNTIME_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { input, kind: ParseErrorKind::Unrecognized } => {
                write!(f, "Unrecognized buffer size: {}", input)
            }
            Error::Parse { input, kind: ParseErrorKind::TooLarge } => {
                write!(f, "Buffer size too large: {}", input)
            }
            Error::InvalidTotal(input) => {
                write!(f, "Unrecognized total: {}", input)
            }
            Error::NotFound { path, suggestion: Some(hint) } => {
                write!(f, "Not a file: {} (did you mean {}?)", path.display(), hint.display())
            }
            Error::NotFound { path, suggestion: None } => {
                write!(f, "Not a file: {}", path.display())
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

/// Convenience result type for pb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimum similarity for a sibling file name to be offered as a correction
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Suggest an existing regular file next to `path` whose name is a close match
fn suggest_sibling(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?.to_lowercase();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut best: Option<(f64, PathBuf)> = None;
    for entry in std::fs::read_dir(parent).ok()?.flatten() {
        let candidate = entry.path();
        if !candidate.is_file() {
            continue;
        }
        let Some(candidate_name) = candidate.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let score = normalized_levenshtein(&name, &candidate_name.to_lowercase());
        if score >= SUGGESTION_THRESHOLD && best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, path.with_file_name(candidate_name)));
        }
    }

    best.map(|(_, p)| p)
}
