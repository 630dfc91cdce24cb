//! Input source resolution for pb
//!
//! Turns the positional path arguments into an ordered list of sources,
//! failing on the first path that is not a regular file.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;

use crate::core::error::{Error, Result};
use crate::core::units::format_size;

/// Display name used for standard input
pub const STDIN_NAME: &str = "<stdin>";

/// One input to be streamed
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Standard input, size unknown
    Stdin,
    /// A regular file with its size at resolution time
    File { path: PathBuf, size: u64 },
}

impl Source {
    /// Name shown in the progress bar description
    pub fn name(&self) -> String {
        match self {
            Source::Stdin => STDIN_NAME.to_string(),
            Source::File { path, .. } => path.display().to_string(),
        }
    }

    /// Static size in bytes, if known
    pub fn size(&self) -> Option<u64> {
        match self {
            Source::Stdin => None,
            Source::File { size, .. } => Some(*size),
        }
    }

    /// Log the source and open a file handle for it.
    ///
    /// Standard input is handled by the caller, which owns that reader.
    pub fn open_file(&self) -> Result<Option<File>> {
        match self {
            Source::Stdin => {
                info!("Reading {} (unknown size)", STDIN_NAME);
                Ok(None)
            }
            Source::File { path, size } => {
                info!("Reading file ({}: {})", path.display(), format_size(*size));
                Ok(Some(File::open(path)?))
            }
        }
    }
}

/// Memoized file-size lookup, one `stat` per distinct path
#[derive(Debug, Default)]
pub struct SizeCache {
    sizes: HashMap<PathBuf, u64>,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the regular file at `path`, or `NotFound` if it is not one
    pub fn size_of(&mut self, path: &Path) -> Result<u64> {
        if let Some(size) = self.sizes.get(path) {
            return Ok(*size);
        }
        let size = match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => return Err(Error::not_found(path)),
        };
        self.sizes.insert(path.to_path_buf(), size);
        Ok(size)
    }

    /// Number of distinct paths looked up so far
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// True when the arguments ask for standard input
pub fn is_stdin(paths: &[PathBuf]) -> bool {
    match paths {
        [] => true,
        [only] => only.as_os_str() == OsStr::new("-"),
        _ => false,
    }
}

/// Resolve path arguments into sources, validating every file up front
pub fn resolve_sources(paths: &[PathBuf], cache: &mut SizeCache) -> Result<Vec<Source>> {
    if is_stdin(paths) {
        return Ok(vec![Source::Stdin]);
    }

    paths
        .iter()
        .map(|path| {
            let size = cache.size_of(path)?;
            Ok(Source::File { path: path.clone(), size })
        })
        .collect()
}
