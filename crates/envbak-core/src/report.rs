//! Backup run reporting and progress callbacks.

use crate::archive::ArchiveReport;
use crate::mirror::MirrorReport;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of a full backup run (mirror, archive, cleanup).
#[derive(Debug, Clone, Default)]
pub struct BackupReport {
    /// Source directory that was scanned.
    pub source: PathBuf,

    /// Directory the matches were mirrored into.
    pub mirror_dir: PathBuf,

    /// Archive file that was written.
    pub archive_path: PathBuf,

    /// Statistics of the mirror pass.
    pub mirror: MirrorReport,

    /// Statistics of the archive pass.
    pub archive: ArchiveReport,

    /// Whether the mirror directory was removed after archiving.
    pub mirror_removed: bool,

    /// Wall-clock duration of the whole run.
    pub duration: Duration,
}

impl BackupReport {
    /// Returns every warning raised by either pass, mirror first.
    ///
    /// # Examples
    ///
    /// ```
    /// use envbak_core::BackupReport;
    ///
    /// let mut report = BackupReport::default();
    /// report.mirror.add_warning("vanished: a/.env");
    /// report.archive.add_warning("skipped socket");
    /// assert_eq!(report.warnings().count(), 2);
    /// ```
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.mirror
            .warnings
            .iter()
            .chain(&self.archive.warnings)
            .map(String::as_str)
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.mirror.has_warnings() || self.archive.has_warnings()
    }
}

/// Callback trait for progress reporting during mirror and archive passes.
///
/// # Examples
///
/// ```
/// use envbak_core::ProgressCallback;
/// use std::path::Path;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called when starting to process an entry.
    ///
    /// * `path` - Path of the entry being processed
    /// * `total` - Total number of entries in the pass
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called when bytes have been copied.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely processed.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once when the pass is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
