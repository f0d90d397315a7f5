use std::fmt::Display;
use std::path::{Path, PathBuf};

/// File-scoped tag failures. None of these abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The file or its tag container could not be parsed.
    #[error("failed to read tags from {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
    /// Saving the modified tag failed.
    #[error("failed to write tags to {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
    /// The container has no tag type we can write into.
    #[error("{} has no writable tag: {reason}", .path.display())]
    Unsupported { path: PathBuf, reason: String },
    /// File-system metadata was unavailable.
    #[error("failed to stat {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TagError {
    pub fn read(path: &Path, reason: impl Display) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: &Path, reason: impl Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Unsupported { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}
