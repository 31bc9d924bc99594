//! High-level backup pipeline: mirror, archive, clean up.

use crate::BackupError;
use crate::BackupReport;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::ArchiveConfig;
use crate::archive::archive_tree_with_progress;
use crate::mirror::MirrorConfig;
use crate::mirror::mirror_with_progress;
use crate::paths::archive_file_name;
use crate::paths::destination_dir;
use crate::report::NoopProgress;
use chrono::Local;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

/// Options for a full backup run.
///
/// # Examples
///
/// ```
/// use envbak_core::BackupOptions;
/// use envbak_core::mirror::WriteMode;
///
/// let options = BackupOptions::new("/work/proj")
///     .with_output_root("/backups")
///     .with_mirror(envbak_core::MirrorConfig::default().with_write_mode(WriteMode::Overwrite))
///     .with_keep_mirror(true);
///
/// assert!(options.keep_mirror);
/// ```
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Directory to scan.
    pub source: PathBuf,

    /// Directory that receives `<name>_bak` and its archive.
    ///
    /// Default: `.`.
    pub output_root: PathBuf,

    /// Mirror pass configuration.
    pub mirror: MirrorConfig,

    /// Archive pass configuration.
    pub archive: ArchiveConfig,

    /// Keep the mirror directory after archiving.
    ///
    /// Default: `false`.
    pub keep_mirror: bool,

    /// Date embedded in the archive name.
    ///
    /// Default: today in local time.
    pub date: NaiveDate,
}

impl BackupOptions {
    /// Creates options for backing up `source` with default settings.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_root: PathBuf::from("."),
            mirror: MirrorConfig::default(),
            archive: ArchiveConfig::default(),
            keep_mirror: false,
            date: Local::now().date_naive(),
        }
    }

    /// Sets the output root.
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Sets the mirror configuration.
    #[must_use]
    pub fn with_mirror(mut self, config: MirrorConfig) -> Self {
        self.mirror = config;
        self
    }

    /// Sets the archive configuration.
    #[must_use]
    pub fn with_archive(mut self, config: ArchiveConfig) -> Self {
        self.archive = config;
        self
    }

    /// Sets whether the mirror directory survives the run.
    #[must_use]
    pub fn with_keep_mirror(mut self, keep: bool) -> Self {
        self.keep_mirror = keep;
        self
    }

    /// Sets the archive date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Validates both pass configurations.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::InvalidConfig`] from either pass.
    pub fn validate(&self) -> Result<()> {
        self.mirror.validate()?;
        self.archive.validate()
    }
}

/// Runs a full backup: mirror matches into `<output_root>/<name>_bak`, write
/// `<output_root>/<name>_bak.<YYYYMMDD>.zip`, then remove the mirror
/// directory.
///
/// # Examples
///
/// ```no_run
/// use envbak_core::BackupOptions;
/// use envbak_core::run_backup;
///
/// let report = run_backup(&BackupOptions::new("./proj"))?;
/// println!("{}", report.archive_path.display());
/// # Ok::<(), envbak_core::BackupError>(())
/// ```
///
/// # Errors
///
/// Any mirror or archive error aborts the run. Failing to remove the mirror
/// directory afterwards is only a warning, since the archive is complete.
pub fn run_backup(options: &BackupOptions) -> Result<BackupReport> {
    run_backup_with_progress(options, &mut NoopProgress)
}

/// Runs a full backup, reporting both passes to `progress`.
///
/// `progress` sees the mirror pass and then the archive pass, each starting
/// its own entry numbering and ending with `on_complete`.
///
/// # Errors
///
/// Same as [`run_backup`].
pub fn run_backup_with_progress(
    options: &BackupOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<BackupReport> {
    options.validate()?;
    let start = Instant::now();

    let source = fs::canonicalize(&options.source)
        .map_err(|e| BackupError::source_unreadable(&options.source, e))?;
    let mirror_dir = destination_dir(&source, &options.output_root)?;
    let archive_path = archive_file_name(&mirror_dir, options.date);

    let mirror = mirror_with_progress(&source, &mirror_dir, &options.mirror, progress)?;
    let mut archive =
        archive_tree_with_progress(&mirror_dir, &archive_path, &options.archive, progress)?;

    let mirror_removed = if options.keep_mirror {
        false
    } else {
        match fs::remove_dir_all(&mirror_dir) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                archive.add_warning(format!(
                    "could not remove mirror directory {}: {e}",
                    mirror_dir.display()
                ));
                false
            }
        }
    };

    Ok(BackupReport {
        source,
        mirror_dir,
        archive_path,
        mirror,
        archive,
        mirror_removed,
        duration: start.elapsed(),
    })
}
