//! Where a configuration document comes from

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// A readable configuration document
pub trait ConfigSource {
    /// Human-readable description used in logs and errors
    fn describe(&self) -> String;

    /// Read the full document
    fn read(&self) -> Result<String, ConfigError>;
}

/// A JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<String, ConfigError> {
        fs::read_to_string(&self.path).map_err(|source| ConfigError::SourceUnavailable {
            source_name: self.describe(),
            source,
        })
    }
}

/// An in-memory document, e.g. one received from a provisioning tool
#[derive(Debug, Clone)]
pub struct InlineSource {
    name: String,
    contents: String,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

impl ConfigSource for InlineSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn read(&self) -> Result<String, ConfigError> {
        Ok(self.contents.clone())
    }
}

/// `<config dir>/cabinet-config/config.json`, relative to the working
/// directory when the platform has no config dir
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(crate::constants::config::APP_DIR);
    path.push(crate::constants::config::FILENAME);
    path
}
