//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use envbak_core::ArchiveReport;
use envbak_core::BackupReport;
use envbak_core::MirrorReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Serialize)]
struct MirrorOutput {
    destination: String,
    files_copied: usize,
    bytes_copied: u64,
    directories_created: usize,
    copied: Vec<String>,
    excluded: Vec<String>,
    vanished: Vec<String>,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl MirrorOutput {
    fn new(dest: &Path, report: &MirrorReport) -> Self {
        Self {
            destination: dest.display().to_string(),
            files_copied: report.files_copied,
            bytes_copied: report.bytes_copied,
            directories_created: report.directories_created,
            copied: display_all(&report.copied),
            excluded: display_all(&report.excluded),
            vanished: display_all(&report.vanished),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

#[derive(Serialize)]
struct ArchiveOutput {
    output_path: String,
    files_added: usize,
    directories_added: usize,
    bytes_written: u64,
    archive_size: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    files_skipped: usize,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl ArchiveOutput {
    fn new(output_path: &Path, report: &ArchiveReport) -> Self {
        Self {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            directories_added: report.directories_added,
            bytes_written: report.bytes_written,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            files_skipped: report.files_skipped,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

fn display_all(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_backup_result(&self, report: &BackupReport) -> Result<()> {
        #[derive(Serialize)]
        struct BackupOutput {
            source: String,
            archive_path: String,
            mirror_removed: bool,
            duration_ms: u128,
            mirror: MirrorOutput,
            archive: ArchiveOutput,
        }

        let data = BackupOutput {
            source: report.source.display().to_string(),
            archive_path: report.archive_path.display().to_string(),
            mirror_removed: report.mirror_removed,
            duration_ms: report.duration.as_millis(),
            mirror: MirrorOutput::new(&report.mirror_dir, &report.mirror),
            archive: ArchiveOutput::new(&report.archive_path, &report.archive),
        };

        Self::output(&JsonOutput::success("backup", data))
    }

    fn format_mirror_result(&self, dest: &Path, report: &MirrorReport) -> Result<()> {
        Self::output(&JsonOutput::success("mirror", MirrorOutput::new(dest, report)))
    }

    fn format_archive_result(&self, output_path: &Path, report: &ArchiveReport) -> Result<()> {
        Self::output(&JsonOutput::success(
            "archive",
            ArchiveOutput::new(output_path, report),
        ))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
