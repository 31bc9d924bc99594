//! Copying matched files into the destination tree.

use crate::BackupError;
use crate::ProgressCallback;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::CopyFailure;
use crate::copy::copy_with_buffer;
use crate::mirror::config::MirrorConfig;
use crate::mirror::config::WriteMode;
use crate::mirror::report::MirrorReport;
use crate::mirror::walker::MatchWalker;
use crate::mirror::walker::MatchedFile;
use crate::mirror::walker::Visit;
use crate::mirror::walker::ensure_source_dir;
use crate::mirror::walker::nested_destination;
use crate::mirror::walker::same_location;
use crate::progress::ProgressTracker;
use crate::report::NoopProgress;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::Instant;

/// Mirrors every matching file under `src_dir` into `dest_dir`.
///
/// Each match lands at `dest_dir/<path relative to src_dir>`. Only the
/// directories needed for actual matches are created, so a run without
/// matches leaves `dest_dir` untouched.
///
/// # Examples
///
/// ```no_run
/// use envbak_core::mirror::MirrorConfig;
/// use envbak_core::mirror::mirror;
/// use std::path::Path;
///
/// let report = mirror(Path::new("proj"), Path::new("proj_bak"), &MirrorConfig::default())?;
/// println!("Copied {} files", report.files_copied);
/// # Ok::<(), envbak_core::BackupError>(())
/// ```
///
/// # Errors
///
/// - [`BackupError::InvalidConfig`] if the configuration is rejected or
///   `dest_dir` resolves to `src_dir`
/// - [`BackupError::SourceUnreadable`] if the tree cannot be walked or a
///   matched file cannot be read
/// - [`BackupError::DestinationWriteFailure`] if a directory or file under
///   `dest_dir` cannot be written
///
/// A match that disappears before it is copied is not an error; it is
/// listed in [`MirrorReport::vanished`] and as a warning.
pub fn mirror(src_dir: &Path, dest_dir: &Path, config: &MirrorConfig) -> Result<MirrorReport> {
    mirror_with_progress(src_dir, dest_dir, config, &mut NoopProgress)
}

/// Mirrors matching files with progress reporting.
///
/// The tree is walked once up front so that `total` in
/// [`ProgressCallback::on_entry_start`] is exact; copying happens afterwards.
///
/// # Errors
///
/// Same as [`mirror`].
pub fn mirror_with_progress(
    src_dir: &Path,
    dest_dir: &Path,
    config: &MirrorConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<MirrorReport> {
    config.validate()?;
    ensure_source_dir(src_dir)?;
    if same_location(src_dir, dest_dir) {
        return Err(BackupError::InvalidConfig {
            reason: format!(
                "destination {} is the source directory itself",
                dest_dir.display()
            ),
        });
    }

    let start = Instant::now();
    let mut report = MirrorReport::default();

    let mut matches = Vec::new();
    let walker = MatchWalker::new(src_dir, config)
        .with_pruned_dir(nested_destination(src_dir, dest_dir));
    for visit in walker.walk() {
        match visit? {
            Visit::Matched(file) => matches.push(file),
            Visit::Excluded(dir) => report.excluded.push(dir),
        }
    }

    let mut tracker = ProgressTracker::new(progress, matches.len());
    let mut buffer = CopyBuffer::new();

    for file in &matches {
        tracker.on_entry_start(&file.relative_path);
        copy_match(file, dest_dir, config.write_mode, &mut buffer, &mut report, &mut tracker)?;
        tracker.on_entry_complete(&file.relative_path);
    }

    report.duration = start.elapsed();
    tracker.on_complete();

    Ok(report)
}

fn copy_match(
    file: &MatchedFile,
    dest_dir: &Path,
    mode: WriteMode,
    buffer: &mut CopyBuffer,
    report: &mut MirrorReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<()> {
    let target = dest_dir.join(&file.relative_path);

    let copied = open_source(&file.path).and_then(|mut source| {
        if let Some(parent) = target.parent() {
            report.directories_created += create_parents(parent)?;
        }
        write_from(&mut source, &file.path, &target, mode, buffer)
    });

    match copied {
        Ok(bytes) => {
            report.files_copied += 1;
            report.bytes_copied += bytes;
            report.copied.push(file.relative_path.clone());
            tracker.on_bytes_written(bytes);
            Ok(())
        }
        Err(BackupError::MatchedFileVanished { path }) => {
            report.add_warning(format!(
                "file disappeared before it could be copied: {}",
                path.display()
            ));
            report.vanished.push(path);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Copies a single file into `dest_file`, creating parent directories.
///
/// With [`WriteMode::Append`] an existing destination keeps its content and
/// the source bytes are appended; with [`WriteMode::Overwrite`] it is
/// truncated first.
///
/// # Examples
///
/// ```no_run
/// use envbak_core::mirror::WriteMode;
/// use envbak_core::mirror::copy_entry;
/// use std::path::Path;
///
/// let bytes = copy_entry(
///     Path::new("proj/api/.env"),
///     Path::new("proj_bak/api/.env"),
///     WriteMode::Overwrite,
/// )?;
/// # Ok::<(), envbak_core::BackupError>(())
/// ```
///
/// # Errors
///
/// - [`BackupError::InvalidConfig`] if both paths resolve to the same file
/// - [`BackupError::MatchedFileVanished`] if `src_file` does not exist
/// - [`BackupError::SourceUnreadable`] if it exists but is not a regular
///   file or cannot be read
/// - [`BackupError::DestinationWriteFailure`] if the destination cannot be
///   created or written
pub fn copy_entry(src_file: &Path, dest_file: &Path, mode: WriteMode) -> Result<u64> {
    if same_location(src_file, dest_file) {
        return Err(BackupError::InvalidConfig {
            reason: format!("{} would be copied onto itself", src_file.display()),
        });
    }
    let mut source = open_source(src_file)?;
    if let Some(parent) = dest_file.parent() {
        create_parents(parent)?;
    }
    write_from(&mut source, src_file, dest_file, mode, &mut CopyBuffer::new())
}

fn open_source(src_file: &Path) -> Result<File> {
    let vanished_or_unreadable = |e: io::Error| {
        if e.kind() == io::ErrorKind::NotFound {
            BackupError::MatchedFileVanished {
                path: src_file.to_path_buf(),
            }
        } else {
            BackupError::source_unreadable(src_file, e)
        }
    };

    // Checked before opening: open(2) on a FIFO blocks until a writer shows up.
    let metadata = fs::metadata(src_file).map_err(vanished_or_unreadable)?;
    if !metadata.is_file() {
        return Err(BackupError::source_unreadable(
            src_file,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }

    File::open(src_file).map_err(vanished_or_unreadable)
}

fn write_from(
    source: &mut File,
    src_file: &Path,
    dest_file: &Path,
    mode: WriteMode,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let mut dest = open_destination(dest_file, mode)
        .map_err(|e| BackupError::destination(dest_file, e))?;

    copy_with_buffer(source, &mut dest, buffer).map_err(|failure| match failure {
        CopyFailure::Read(e) => BackupError::source_unreadable(src_file, e),
        CopyFailure::Write(e) => BackupError::destination(dest_file, e),
    })
}

fn open_destination(path: &Path, mode: WriteMode) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Overwrite => options.write(true).truncate(true),
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options.open(path)
}

/// Creates `dir` and its missing ancestors, returning how many were created.
fn create_parents(dir: &Path) -> Result<usize> {
    let missing = dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .count();
    if missing > 0 {
        fs::create_dir_all(dir).map_err(|e| BackupError::destination(dir, e))?;
    }
    Ok(missing)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::write_tree;
    use tempfile::TempDir;

    #[test]
    fn test_copy_entry_creates_parents() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/.env", "KEY=value")]);

        let dest = temp.path().join("out/a/b/.env");
        let bytes = copy_entry(&temp.path().join("src/.env"), &dest, WriteMode::Append).unwrap();

        assert_eq!(bytes, 9);
        assert_eq!(fs::read_to_string(dest).unwrap(), "KEY=value");
    }

    #[test]
    fn test_copy_entry_append_concatenates() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/.env", "A=1\n")]);
        let src = temp.path().join("src/.env");
        let dest = temp.path().join("bak/.env");

        copy_entry(&src, &dest, WriteMode::Append).unwrap();
        copy_entry(&src, &dest, WriteMode::Append).unwrap();

        assert_eq!(fs::read_to_string(dest).unwrap(), "A=1\nA=1\n");
    }

    #[test]
    fn test_copy_entry_overwrite_replaces() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/.env", "NEW=1"), ("bak/.env", "OLD=much-longer")]);
        let dest = temp.path().join("bak/.env");

        copy_entry(&temp.path().join("src/.env"), &dest, WriteMode::Overwrite).unwrap();

        assert_eq!(fs::read_to_string(dest).unwrap(), "NEW=1");
    }

    #[test]
    fn test_copy_entry_missing_source_is_vanished() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone/.env");

        let err = copy_entry(&missing, &temp.path().join("bak/.env"), WriteMode::Append)
            .unwrap_err();

        match err {
            BackupError::MatchedFileVanished { path } => assert_eq!(path, missing),
            other => panic!("expected MatchedFileVanished, got {other:?}"),
        }
    }

    #[test]
    fn test_copy_entry_destination_blocked_by_file() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/.env", "A=1"), ("bak", "not a dir")]);

        let err = copy_entry(
            &temp.path().join("src/.env"),
            &temp.path().join("bak/.env"),
            WriteMode::Append,
        )
        .unwrap_err();

        assert!(matches!(err, BackupError::DestinationWriteFailure { .. }));
    }

    #[test]
    fn test_create_parents_counts_new_dirs() {
        let temp = TempDir::new().unwrap();
        assert_eq!(create_parents(&temp.path().join("a/b/c")).unwrap(), 3);
        assert_eq!(create_parents(&temp.path().join("a/b/c")).unwrap(), 0);
        assert_eq!(create_parents(&temp.path().join("a/d")).unwrap(), 1);
    }

    #[test]
    fn test_vanished_match_becomes_warning() {
        let temp = TempDir::new().unwrap();
        let file = MatchedFile {
            path: temp.path().join("src/.env"),
            relative_path: ".env".into(),
            size: 3,
        };
        let mut report = MirrorReport::default();
        let mut progress = NoopProgress;
        let mut tracker = ProgressTracker::new(&mut progress, 1);

        copy_match(
            &file,
            &temp.path().join("bak"),
            WriteMode::Append,
            &mut CopyBuffer::new(),
            &mut report,
            &mut tracker,
        )
        .unwrap();

        assert_eq!(report.files_copied, 0);
        assert_eq!(report.directories_created, 0);
        assert!(!temp.path().join("bak").exists());
        assert_eq!(report.vanished, [temp.path().join("src/.env")]);
        assert!(report.has_warnings());
    }

    #[test]
    fn test_mirror_without_matches_leaves_destination_absent() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("proj/readme.md", "hi")]);
        let dest = temp.path().join("proj_bak");

        let report = mirror(&temp.path().join("proj"), &dest, &MirrorConfig::default()).unwrap();

        assert_eq!(report.files_copied, 0);
        assert_eq!(report.directories_created, 0);
        assert!(!dest.exists());
    }

    #[test]
    fn test_mirror_onto_source_is_rejected_in_both_modes() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("proj");
        write_tree(&src, &[(".env", "SECRET=1"), ("api/.env", "API=1")]);

        for mode in [WriteMode::Append, WriteMode::Overwrite] {
            let config = MirrorConfig::default().with_write_mode(mode);
            let err = mirror(&src, &src, &config).unwrap_err();
            assert!(matches!(err, BackupError::InvalidConfig { .. }), "{mode}: {err:?}");
        }

        assert_eq!(fs::read_to_string(src.join(".env")).unwrap(), "SECRET=1");
        assert_eq!(fs::read_to_string(src.join("api/.env")).unwrap(), "API=1");
    }

    #[test]
    fn test_mirror_onto_source_alias_is_rejected() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("proj");
        write_tree(&src, &[(".env", "SECRET=1"), ("api/.env", "API=1")]);

        let err = mirror(&src, &src.join("api/.."), &MirrorConfig::default());
        assert!(matches!(err, Err(BackupError::InvalidConfig { .. })));

        let err = mirror(&src, &src.join("."), &MirrorConfig::default());
        assert!(matches!(err, Err(BackupError::InvalidConfig { .. })));
        assert_eq!(fs::read_to_string(src.join(".env")).unwrap(), "SECRET=1");
    }

    #[test]
    fn test_copy_entry_onto_itself_is_rejected() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[(".env", "A=1")]);
        let file = temp.path().join(".env");

        let err = copy_entry(&file, &file, WriteMode::Append).unwrap_err();

        assert!(matches!(err, BackupError::InvalidConfig { .. }));
        assert_eq!(fs::read_to_string(&file).unwrap(), "A=1");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_entry_rejects_fifo_without_blocking() {
        let temp = TempDir::new().unwrap();
        let fifo = temp.path().join(".env");
        let created = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .is_ok_and(|s| s.success());
        if !created {
            return;
        }

        let err = copy_entry(&fifo, &temp.path().join("bak/.env"), WriteMode::Append)
            .unwrap_err();

        assert!(matches!(err, BackupError::SourceUnreadable { .. }));
        assert!(!temp.path().join("bak").exists());
    }

    #[derive(Default)]
    struct Counter {
        started: Vec<(usize, usize)>,
        bytes: u64,
        completed: usize,
    }

    impl ProgressCallback for Counter {
        fn on_entry_start(&mut self, _path: &Path, total: usize, current: usize) {
            self.started.push((current, total));
        }

        fn on_bytes_written(&mut self, bytes: u64) {
            self.bytes += bytes;
        }

        fn on_entry_complete(&mut self, _path: &Path) {}

        fn on_complete(&mut self) {
            self.completed += 1;
        }
    }

    #[test]
    fn test_progress_numbers_matches() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("p/.env", "A=1"), ("p/x/.env", "BB=22")]);
        let mut counter = Counter::default();

        mirror_with_progress(
            &temp.path().join("p"),
            &temp.path().join("p_bak"),
            &MirrorConfig::default(),
            &mut counter,
        )
        .unwrap();

        assert_eq!(counter.started, [(1, 2), (2, 2)]);
        assert_eq!(counter.bytes, 8);
        assert_eq!(counter.completed, 1);
    }
}
