use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures inside the scan pipeline.
///
/// None of these ever reach a `scan` caller; they are handed to the internal
/// reporter and swallowed.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Could not create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File could not be created or opened | filePath: {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write entry to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid date pattern '{pattern}'")]
    DatePattern { pattern: String },

    #[error("Invalid entry path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to spawn entry worker: {0}")]
    Spawn(#[source] std::io::Error),
}

impl ScanError {
    #[cold]
    pub fn create_directory<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::CreateDirectory {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    #[cold]
    pub fn open_file<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::OpenFile {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    #[cold]
    pub fn write<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    #[cold]
    pub fn date_pattern<S: Into<String>>(pattern: S) -> Self {
        Self::DatePattern {
            pattern: pattern.into(),
        }
    }

    #[cold]
    pub fn invalid_path<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
