//! Source tree walking for the mirror pass.
//!
//! The walker descends the source tree in file-name order, prunes excluded
//! directories before entering them, and yields every file whose base name
//! equals the configured target.

use crate::BackupError;
use crate::Result;
use crate::mirror::config::MirrorConfig;
use crate::mirror::filters;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A file selected for backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    /// Full path of the file inside the source tree.
    pub path: PathBuf,

    /// Path relative to the source root; also the path under the
    /// destination root.
    pub relative_path: PathBuf,

    /// Size in bytes at discovery time.
    pub size: u64,
}

/// Something the walker reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// A file that should be copied.
    Matched(MatchedFile),

    /// A directory that was not descended into.
    Excluded(PathBuf),
}

/// Walks a source tree applying the mirror configuration.
///
/// # Examples
///
/// ```no_run
/// use envbak_core::mirror::MirrorConfig;
/// use envbak_core::mirror::walker::MatchWalker;
/// use envbak_core::mirror::walker::Visit;
/// use std::path::Path;
///
/// let config = MirrorConfig::default();
/// for visit in MatchWalker::new(Path::new("./projects"), &config).walk() {
///     if let Visit::Matched(file) = visit? {
///         println!("{}", file.relative_path.display());
///     }
/// }
/// # Ok::<(), envbak_core::BackupError>(())
/// ```
pub struct MatchWalker<'a> {
    root: &'a Path,
    config: &'a MirrorConfig,
    prune: Option<PathBuf>,
}

impl<'a> MatchWalker<'a> {
    /// Creates a walker rooted at `root`.
    #[must_use]
    pub fn new(root: &'a Path, config: &'a MirrorConfig) -> Self {
        Self {
            root,
            config,
            prune: None,
        }
    }

    /// Never descends into `dir`.
    ///
    /// Used to keep a destination that lives inside the source tree out of
    /// its own walk. `dir` must be expressed relative to the same base as
    /// the root (see [`nested_destination`]).
    #[must_use]
    pub fn with_pruned_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.prune = dir;
        self
    }

    /// Returns an iterator over matches and pruned directories.
    ///
    /// The root itself is never excluded, even if its name is in the
    /// exclusion set.
    ///
    /// # Errors
    ///
    /// Yields [`BackupError::SourceUnreadable`] when a directory cannot be
    /// read or, with `follow_symlinks`, when a link cycle is found. Callers
    /// are expected to stop at the first error.
    pub fn walk(&self) -> impl Iterator<Item = Result<Visit>> + '_ {
        Walk {
            inner: WalkDir::new(self.root)
                .follow_links(self.config.follow_symlinks)
                .sort_by_file_name()
                .into_iter(),
            walker: self,
        }
    }

    fn classify(&self, entry: &walkdir::DirEntry) -> Option<Visit> {
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            let pruned = self.prune.as_deref() == Some(path);
            if entry.depth() > 0 && (pruned || self.config.exclusions.is_excluded(path)) {
                return Some(Visit::Excluded(path.to_path_buf()));
            }
            return None;
        }

        if !filters::matches_target(path, &self.config.target_file_name) {
            return None;
        }

        // Only regular files, or links to them, are copied. Opening a FIFO
        // would block the run.
        let regular = file_type.is_file()
            || (file_type.is_symlink() && fs::metadata(path).is_ok_and(|m| m.is_file()));
        if !regular {
            return None;
        }

        let relative_path = path.strip_prefix(self.root).ok()?.to_path_buf();
        let size = entry.metadata().map_or(0, |m| m.len());

        Some(Visit::Matched(MatchedFile {
            path: path.to_path_buf(),
            relative_path,
            size,
        }))
    }
}

struct Walk<'w, 'a> {
    inner: walkdir::IntoIter,
    walker: &'w MatchWalker<'a>,
}

impl Iterator for Walk<'_, '_> {
    type Item = Result<Visit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(walk_error(err, self.walker.root))),
            };

            match self.walker.classify(&entry) {
                Some(Visit::Excluded(path)) => {
                    self.inner.skip_current_dir();
                    return Some(Ok(Visit::Excluded(path)));
                }
                Some(visit) => return Some(Ok(visit)),
                None => {}
            }
        }
    }
}

/// Converts a walkdir error into `SourceUnreadable`, keeping the failing path.
pub(crate) fn walk_error(err: walkdir::Error, root: &Path) -> BackupError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = if let Some(ancestor) = err.loop_ancestor() {
        io::Error::other(format!(
            "file system loop back to {}",
            ancestor.display()
        ))
    } else {
        io::Error::from(err)
    };
    BackupError::source_unreadable(path, source)
}

/// Returns the destination directory as seen from the source walk, if the
/// destination lies inside the source tree.
///
/// Both paths are resolved with [`resolve_lenient`], so an output root that
/// reaches the source through a symlink is still detected. The returned
/// path is rooted at `src` as given, which is how the walk reports entries.
///
/// # Examples
///
/// ```
/// use envbak_core::mirror::walker::nested_destination;
/// use std::path::Path;
///
/// let nested = nested_destination(Path::new("/srv/app"), Path::new("/srv/app/app_bak"));
/// assert_eq!(nested.as_deref(), Some(Path::new("/srv/app/app_bak")));
///
/// assert!(nested_destination(Path::new("/srv/app"), Path::new("/tmp/app_bak")).is_none());
/// ```
#[must_use]
pub fn nested_destination(src: &Path, dest: &Path) -> Option<PathBuf> {
    let src_abs = resolve_lenient(src)?;
    let dest_abs = resolve_lenient(dest)?;
    let relative = dest_abs.strip_prefix(&src_abs).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(src.join(relative))
}

/// Returns true if `a` and `b` name the same directory once resolved.
pub(crate) fn same_location(a: &Path, b: &Path) -> bool {
    match (resolve_lenient(a), resolve_lenient(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Makes `path` absolute and resolves symlinks in its deepest existing
/// ancestor. Components that do not exist yet are appended unchanged.
///
/// Returns `None` only if the current directory cannot be determined.
#[must_use]
pub fn resolve_lenient(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;

    let mut missing = Vec::new();
    let mut current = absolute.as_path();
    loop {
        if let Ok(resolved) = fs::canonicalize(current) {
            return Some(missing.iter().rev().fold(resolved, |acc, name| acc.join(name)));
        }
        match (current.file_name(), current.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name);
                current = parent;
            }
            _ => return Some(absolute.clone()),
        }
    }
}

/// Collects every match under `root` without copying anything.
///
/// # Errors
///
/// Returns [`BackupError::SourceUnreadable`] if the root is missing, is not a
/// directory, or any directory in the tree cannot be read.
pub fn find_matches(root: &Path, config: &MirrorConfig) -> Result<Vec<MatchedFile>> {
    config.validate()?;
    ensure_source_dir(root)?;

    let mut matches = Vec::new();
    for visit in MatchWalker::new(root, config).walk() {
        if let Visit::Matched(file) = visit? {
            matches.push(file);
        }
    }
    Ok(matches)
}

/// Checks that `root` exists and is a directory.
pub(crate) fn ensure_source_dir(root: &Path) -> Result<()> {
    let metadata =
        fs::metadata(root).map_err(|e| BackupError::source_unreadable(root, e))?;
    if !metadata.is_dir() {
        return Err(BackupError::source_unreadable(
            root,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }
    Ok(())
}
