//! Configuration files for the pb command
//!
//! Files are TOML and layered in order, later files overriding earlier ones:
//! `/etc/pb.toml`, `~/.pb.toml`, then the file named by `PB_CONFIG`.
//! Command-line flags and environment variables are applied on top by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an extra configuration file
pub const CONFIG_ENV: &str = "PB_CONFIG";

/// One configuration file, or the merge of several
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub logging: LoggingSection,
    pub stream: StreamSection,
    pub progress: ProgressSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamSection {
    pub buffsize: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressSection {
    pub width: Option<u16>,
    pub ascii: Option<bool>,
    pub color: Option<String>,
    pub clear: Option<bool>,
    pub delay: Option<f64>,
}

impl ConfigFile {
    /// Standard search path, lowest precedence first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/pb.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".pb.toml"));
        }
        if let Some(extra) = std::env::var_os(CONFIG_ENV) {
            paths.push(PathBuf::from(extra));
        }
        paths
    }

    /// Load and merge every file on the standard search path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::search_paths())
    }

    /// Load and merge `paths` in order; missing files are skipped
    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        let mut config = ConfigFile::default();
        for path in paths {
            if let Some(layer) = Self::from_path(path)? {
                config = config.merge(layer);
            }
        }
        Ok(config)
    }

    /// Parse a single file, `None` if it does not exist
    pub fn from_path(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(config))
    }

    /// Overlay `other` on top of `self`
    pub fn merge(self, other: ConfigFile) -> ConfigFile {
        ConfigFile {
            logging: LoggingSection {
                level: other.logging.level.or(self.logging.level),
                style: other.logging.style.or(self.logging.style),
            },
            stream: StreamSection {
                buffsize: other.stream.buffsize.or(self.stream.buffsize),
            },
            progress: ProgressSection {
                width: other.progress.width.or(self.progress.width),
                ascii: other.progress.ascii.or(self.progress.ascii),
                color: other.progress.color.or(self.progress.color),
                clear: other.progress.clear.or(self.progress.clear),
                delay: other.progress.delay.or(self.progress.delay),
            },
        }
    }
}
