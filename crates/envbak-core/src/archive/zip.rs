//! ZIP serialization of a directory tree.

use crate::BackupError;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::config::ArchiveConfig;
use crate::archive::report::ArchiveReport;
use crate::archive::walker::EntryKind;
use crate::archive::walker::TreeEntry;
use crate::archive::walker::collect_tree_entries;
use crate::copy::CopyBuffer;
use crate::copy::CopyFailure;
use crate::copy::copy_with_buffer;
use crate::progress::ProgressTracker;
use crate::report::NoopProgress;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes the tree rooted at `tree_root` into a new ZIP file at
/// `archive_path`.
///
/// Every entry is named `<base name of tree_root>/<relative path>` with `/`
/// separators; the root itself is stored as `<base name>/`. Directories are
/// written before their contents and carry no data; files are deflated.
///
/// A missing `tree_root` produces a valid archive with no entries.
///
/// # Examples
///
/// ```no_run
/// use envbak_core::archive::ArchiveConfig;
/// use envbak_core::archive::archive_tree;
/// use std::path::Path;
///
/// let report = archive_tree(
///     Path::new("proj_bak"),
///     Path::new("proj_bak.20240131.zip"),
///     &ArchiveConfig::default(),
/// )?;
/// println!("Stored {} files", report.files_added);
/// # Ok::<(), envbak_core::BackupError>(())
/// ```
///
/// # Errors
///
/// - [`BackupError::InvalidConfig`] if the configuration is rejected
/// - [`BackupError::SourceUnreadable`] if the tree cannot be walked
/// - [`BackupError::ArchiveCreationFailure`] if the archive cannot be
///   created, a file cannot be read into it, or it cannot be finalized
///
/// On error the partially written archive file is removed.
pub fn archive_tree(
    tree_root: &Path,
    archive_path: &Path,
    config: &ArchiveConfig,
) -> Result<ArchiveReport> {
    archive_tree_with_progress(tree_root, archive_path, config, &mut NoopProgress)
}

/// Archives a tree with progress reporting.
///
/// # Errors
///
/// Same as [`archive_tree`].
pub fn archive_tree_with_progress(
    tree_root: &Path,
    archive_path: &Path,
    config: &ArchiveConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ArchiveReport> {
    config.validate()?;
    let start = Instant::now();

    // Single traversal up front; the tree is treated as a frozen snapshot.
    let entries = collect_tree_entries(tree_root, archive_path)?;

    let file = File::create(archive_path).map_err(|e| BackupError::archive(archive_path, e))?;

    match write_entries(file, &entries, config, archive_path, progress) {
        Ok(mut report) => {
            report.archive_size = fs::metadata(archive_path).map_or(0, |m| m.len());
            report.duration = start.elapsed();
            Ok(report)
        }
        Err(e) => Err(discard_partial(archive_path, e)),
    }
}

/// Deletes an incomplete archive after `err`. A failed removal is folded
/// into the returned error so the leftover file is not silent.
fn discard_partial(archive_path: &Path, err: BackupError) -> BackupError {
    match fs::remove_file(archive_path) {
        Ok(()) => err,
        Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => err,
        Err(cleanup) => BackupError::archive(
            archive_path,
            io::Error::other(format!(
                "{err}; partial archive could not be removed: {cleanup}"
            )),
        ),
    }
}

fn write_entries<W: Write + Seek>(
    writer: W,
    entries: &[TreeEntry],
    config: &ArchiveConfig,
    archive_path: &Path,
    progress: &mut dyn ProgressCallback,
) -> Result<ArchiveReport> {
    let mut zip = ZipWriter::new(writer);
    let mut report = ArchiveReport::default();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(config.compression_level)));

    let mut tracker = ProgressTracker::new(progress, entries.len());
    let mut buffer = CopyBuffer::new();

    for entry in entries {
        let display = Path::new(&entry.archive_name);
        tracker.on_entry_start(display);

        match entry.kind {
            EntryKind::Directory => {
                zip.add_directory(entry.archive_name.as_str(), options)
                    .map_err(|e| zip_failure(archive_path, "failed to add directory", &e))?;
                report.directories_added += 1;
                report.entries.push(entry.archive_name.clone());
            }
            EntryKind::File => {
                let bytes = add_file(
                    &mut zip,
                    entry,
                    file_options(options, &entry.path, config),
                    archive_path,
                    &mut tracker,
                    &mut buffer,
                )?;
                report.files_added += 1;
                report.bytes_written += bytes;
                report.entries.push(entry.archive_name.clone());
            }
            EntryKind::Unsupported => {
                report.files_skipped += 1;
                report.add_warning(format!(
                    "skipped entry that is not a file or directory: {}",
                    entry.path.display()
                ));
            }
        }

        tracker.on_entry_complete(display);
    }

    zip.finish()
        .map_err(|e| zip_failure(archive_path, "failed to finish ZIP archive", &e))?;

    tracker.on_complete();

    Ok(report)
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &TreeEntry,
    options: SimpleFileOptions,
    archive_path: &Path,
    tracker: &mut ProgressTracker<'_>,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let file = File::open(&entry.path).map_err(|e| {
        BackupError::archive(
            archive_path,
            io::Error::new(e.kind(), format!("cannot open {}: {e}", entry.path.display())),
        )
    })?;

    zip.start_file(entry.archive_name.as_str(), options)
        .map_err(|e| zip_failure(archive_path, "failed to start file in ZIP", &e))?;

    let mut reader = tracker.reader(file);
    copy_with_buffer(&mut reader, zip, buffer).map_err(|failure| match failure {
        CopyFailure::Read(e) => BackupError::archive(
            archive_path,
            io::Error::new(e.kind(), format!("cannot read {}: {e}", entry.path.display())),
        ),
        CopyFailure::Write(e) => BackupError::archive(archive_path, e),
    })
}

fn file_options(options: SimpleFileOptions, path: &Path, config: &ArchiveConfig) -> SimpleFileOptions {
    if !config.preserve_permissions {
        return options;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            return options.unix_permissions(metadata.permissions().mode());
        }
    }

    #[cfg(not(unix))]
    let _ = path;

    options
}

fn zip_failure(archive_path: &Path, what: &str, err: &zip::result::ZipError) -> BackupError {
    BackupError::archive(archive_path, io::Error::other(format!("{what}: {err}")))
}
