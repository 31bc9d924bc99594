//! Output formatter trait for CLI results.

use anyhow::Result;
use envbak_core::ArchiveReport;
use envbak_core::BackupReport;
use envbak_core::MirrorReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a full backup run
    fn format_backup_result(&self, report: &BackupReport) -> Result<()>;

    /// Format the result of a mirror pass into `dest`
    fn format_mirror_result(&self, dest: &Path, report: &MirrorReport) -> Result<()>;

    /// Format the result of archiving into `output_path`
    fn format_archive_result(&self, output_path: &Path, report: &ArchiveReport) -> Result<()>;

    /// Format a failed operation
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
