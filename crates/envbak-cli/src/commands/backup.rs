//! Backup command implementation.

use crate::cli::BackupArgs;
use crate::error::add_backup_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use envbak_core::ArchiveConfig;
use envbak_core::BackupOptions;
use envbak_core::NoopProgress;
use envbak_core::run_backup_with_progress;
use std::env;

pub fn execute(
    args: &BackupArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let output_root = match &args.out {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let mut archive = ArchiveConfig::default();
    if let Some(level) = args.compression_level {
        archive = archive.with_compression_level(level);
    }

    let options = BackupOptions::new(&args.source)
        .with_output_root(output_root)
        .with_mirror(args.filter.to_config())
        .with_archive(archive)
        .with_keep_mirror(args.keep_mirror);

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let report = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new(&["Mirroring", "Archiving"]);
        add_backup_context(run_backup_with_progress(&options, &mut progress))?
    } else {
        add_backup_context(run_backup_with_progress(&options, &mut NoopProgress))?
    };

    formatter.format_backup_result(&report)
}
