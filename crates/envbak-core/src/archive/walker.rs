//! Tree walking and entry naming for the archive pass.

use crate::BackupError;
use crate::Result;
use crate::mirror::walker::walk_error;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Kind of a tree entry as it will be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or a symlink resolving to one).
    File,

    /// Directory.
    Directory,

    /// Anything that cannot be stored (sockets, FIFOs, devices, dangling or
    /// directory symlinks).
    Unsupported,
}

/// An entry of the tree being archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Full filesystem path.
    pub path: PathBuf,

    /// Name inside the archive: `<base>/<relative>` with `/` separators,
    /// and a trailing `/` for directories.
    pub archive_name: String,

    /// What the entry is.
    pub kind: EntryKind,

    /// Size in bytes (0 for directories).
    pub size: u64,
}

/// Returns the base name used as the archive prefix for `root`.
///
/// Falls back to the canonical path for roots such as `.`.
///
/// # Errors
///
/// Returns [`BackupError::InvalidConfig`] if no base name can be derived
/// (for example `/`) or it is not valid UTF-8.
pub fn tree_base_name(root: &Path) -> Result<String> {
    let name = match root.file_name() {
        Some(name) => name.to_owned(),
        None => root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(ToOwned::to_owned))
            .ok_or_else(|| BackupError::InvalidConfig {
                reason: format!("cannot derive an archive name from {}", root.display()),
            })?,
    };

    name.into_string().map_err(|name| BackupError::InvalidConfig {
        reason: format!("directory name is not valid UTF-8: {}", name.to_string_lossy()),
    })
}

/// Builds the archive name of an entry from the tree base name and the
/// entry's path relative to the tree root.
///
/// # Examples
///
/// ```
/// use envbak_core::archive::walker::archive_entry_name;
/// use std::path::Path;
///
/// assert_eq!(archive_entry_name("proj_bak", Path::new(""), true).unwrap(), "proj_bak/");
/// assert_eq!(
///     archive_entry_name("proj_bak", Path::new("api/.env"), false).unwrap(),
///     "proj_bak/api/.env"
/// );
/// ```
///
/// # Errors
///
/// Returns an `InvalidData` I/O error if a component is not valid UTF-8.
pub fn archive_entry_name(base: &str, relative: &Path, is_dir: bool) -> io::Result<String> {
    let mut name = String::from(base);

    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("path is not valid UTF-8: {}", relative.display()),
                )
            })?;
            name.push('/');
            name.push_str(part);
        }
    }

    if is_dir {
        name.push('/');
    }
    Ok(name)
}

/// Collects every entry of the tree rooted at `root` in pre-order, so a
/// directory always precedes its contents.
///
/// A missing root yields no entries.
///
/// # Errors
///
/// Returns [`BackupError::SourceUnreadable`] if any directory cannot be
/// read, and [`BackupError::ArchiveCreationFailure`] against `archive` if a
/// path cannot be represented in the archive.
pub fn collect_tree_entries(root: &Path, archive: &Path) -> Result<Vec<TreeEntry>> {
    match std::fs::symlink_metadata(root) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BackupError::source_unreadable(root, e)),
    }

    let base = tree_base_name(root)?;
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(e, root))?;
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(Path::new(""));

        let file_type = entry.file_type();
        let (kind, size) = if file_type.is_dir() {
            (EntryKind::Directory, 0)
        } else if file_type.is_file() {
            (EntryKind::File, entry.metadata().map_or(0, |m| m.len()))
        } else if file_type.is_symlink() {
            match std::fs::metadata(path) {
                Ok(target) if target.is_file() => (EntryKind::File, target.len()),
                _ => (EntryKind::Unsupported, 0),
            }
        } else {
            (EntryKind::Unsupported, 0)
        };

        let archive_name = archive_entry_name(&base, relative, kind == EntryKind::Directory)
            .map_err(|e| BackupError::archive(archive, e))?;

        entries.push(TreeEntry {
            path: path.to_path_buf(),
            archive_name,
            kind,
            size,
        });
    }

    Ok(entries)
}
