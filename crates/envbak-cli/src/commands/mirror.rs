//! Mirror command implementation.

use crate::cli::MirrorArgs;
use crate::error::add_backup_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use envbak_core::NoopProgress;
use envbak_core::mirror::mirror_with_progress;

pub fn execute(
    args: &MirrorArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let config = args.filter.to_config();

    let report = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new(&["Mirroring"]);
        add_backup_context(mirror_with_progress(
            &args.source,
            &args.dest,
            &config,
            &mut progress,
        ))?
    } else {
        add_backup_context(mirror_with_progress(
            &args.source,
            &args.dest,
            &config,
            &mut NoopProgress,
        ))?
    };

    formatter.format_mirror_result(&args.dest, &report)
}
