//! Archive command implementation.

use crate::cli::ArchiveArgs;
use crate::error::add_backup_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use chrono::Local;
use envbak_core::ArchiveConfig;
use envbak_core::NoopProgress;
use envbak_core::archive::archive_tree_with_progress;
use envbak_core::paths::archive_file_name;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(
    args: &ArchiveArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let output = match &args.output {
        Some(path) => path.clone(),
        None => default_output(&args.tree)?,
    };

    let mut config = ArchiveConfig::default();
    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    let report = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new(&["Archiving"]);
        add_backup_context(archive_tree_with_progress(
            &args.tree,
            &output,
            &config,
            &mut progress,
        ))?
    } else {
        add_backup_context(archive_tree_with_progress(
            &args.tree,
            &output,
            &config,
            &mut NoopProgress,
        ))?
    };

    formatter.format_archive_result(&output, &report)
}

/// `<tree>.<YYYYMMDD>.zip` next to the tree, dated today.
fn default_output(tree: &Path) -> Result<PathBuf> {
    // Resolve `.` and trailing `..` so the tree has a usable name.
    let tree = match fs::canonicalize(tree) {
        Ok(path) => path,
        Err(_) => std::path::absolute(tree)
            .with_context(|| format!("failed to resolve {}", tree.display()))?,
    };
    Ok(archive_file_name(&tree, Local::now().date_naive()))
}
