//! Error conversion utilities for CLI.
//!
//! Converts envbak-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use envbak_core::BackupError;

/// Converts `BackupError` to a user-friendly anyhow error with a hint.
pub fn convert_backup_error(err: BackupError) -> anyhow::Error {
    match err {
        BackupError::SourceUnreadable { path, source } => {
            anyhow!(
                "Cannot read source '{}': {}\n\
                 HINT: Check that the directory exists and that you can list it.",
                path.display(),
                source
            )
        }
        BackupError::MatchedFileVanished { path } => {
            anyhow!(
                "File '{}' disappeared during the backup\n\
                 HINT: Another process is changing the tree; re-run the backup.",
                path.display()
            )
        }
        BackupError::DestinationWriteFailure { path, source } => {
            anyhow!(
                "Cannot write '{}': {}\n\
                 HINT: Check free space and permissions, or choose another location with --out.",
                path.display(),
                source
            )
        }
        BackupError::ArchiveCreationFailure { path, source } => {
            anyhow!(
                "Cannot create archive '{}': {}\n\
                 HINT: Check that the output directory exists and is writable.",
                path.display(),
                source
            )
        }
        BackupError::InvalidConfig { reason } => {
            anyhow!(
                "Invalid configuration: {reason}\n\
                 HINT: Run with --help to see accepted values."
            )
        }
        BackupError::Io(_) => anyhow::Error::from(err).context("I/O error during backup"),
    }
}

/// Converts a core result into an anyhow result with hints.
pub fn add_backup_context<T>(result: Result<T, BackupError>) -> anyhow::Result<T> {
    result.map_err(convert_backup_error)
}
