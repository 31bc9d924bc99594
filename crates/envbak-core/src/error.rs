//! Error types for mirror and archive operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `BackupError`.
pub type Result<T> = std::result::Result<T, BackupError>;

/// Errors that can occur while mirroring or archiving a tree.
#[derive(Error, Debug)]
pub enum BackupError {
    /// The source root or a directory inside it could not be read.
    #[error("cannot read source {path}: {source}")]
    SourceUnreadable {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file matched during traversal was gone by the time it was copied.
    #[error("matched file disappeared before it could be copied: {path}")]
    MatchedFileVanished {
        /// Path of the vanished file.
        path: PathBuf,
    },

    /// A directory or file under the destination could not be written.
    #[error("cannot write destination {path}: {source}")]
    DestinationWriteFailure {
        /// Destination path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive could not be created, filled or finalized.
    #[error("cannot create archive {path}: {source}")]
    ArchiveCreationFailure {
        /// Archive file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration was rejected before any filesystem work started.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackupError {
    pub(crate) fn source_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn destination(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DestinationWriteFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArchiveCreationFailure {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for conditions that should be reported but do not
    /// invalidate the rest of the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use envbak_core::BackupError;
    /// use std::path::PathBuf;
    ///
    /// let err = BackupError::MatchedFileVanished {
    ///     path: PathBuf::from("proj/.env"),
    /// };
    /// assert!(err.is_warning());
    ///
    /// let err = BackupError::InvalidConfig {
    ///     reason: "empty target".to_string(),
    /// };
    /// assert!(!err.is_warning());
    /// ```
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::MatchedFileVanished { .. })
    }

    /// Returns `true` if the error must abort the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_warning()
    }

    /// Returns the filesystem path the error refers to, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use envbak_core::BackupError;
    /// use std::path::Path;
    /// use std::path::PathBuf;
    ///
    /// let err = BackupError::MatchedFileVanished {
    ///     path: PathBuf::from("a/.env"),
    /// };
    /// assert_eq!(err.path(), Some(Path::new("a/.env")));
    /// ```
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceUnreadable { path, .. }
            | Self::MatchedFileVanished { path }
            | Self::DestinationWriteFailure { path, .. }
            | Self::ArchiveCreationFailure { path, .. } => Some(path),
            Self::InvalidConfig { .. } | Self::Io(_) => None,
        }
    }
}
