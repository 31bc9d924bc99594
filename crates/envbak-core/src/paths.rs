//! Path normalization helpers used before any tree is touched.

use crate::BackupError;
use crate::Result;
use chrono::NaiveDate;
use std::path::Path;
use std::path::PathBuf;

/// Placeholder replaced by the home directory in user-supplied paths.
pub const HOME_PLACEHOLDER: &str = "$HOME";

/// Suffix appended to the source name to form the mirror directory name.
pub const MIRROR_SUFFIX: &str = "_bak";

/// Expands `$HOME` anywhere in `input`, and a leading `~`, to `home`.
///
/// This is plain string substitution: `$HOMEDIR` also has its `$HOME`
/// replaced.
///
/// # Examples
///
/// ```
/// use envbak_core::paths::expand_home;
/// use std::path::Path;
/// use std::path::PathBuf;
///
/// let home = Path::new("/home/ada");
/// assert_eq!(expand_home("$HOME/code", home), PathBuf::from("/home/ada/code"));
/// assert_eq!(expand_home("~/code", home), PathBuf::from("/home/ada/code"));
/// assert_eq!(expand_home("~", home), PathBuf::from("/home/ada"));
/// assert_eq!(expand_home("./code", home), PathBuf::from("./code"));
/// ```
#[must_use]
pub fn expand_home(input: &str, home: &Path) -> PathBuf {
    let home_str = home.to_string_lossy();

    let expanded = if input == "~" {
        home_str.to_string()
    } else if let Some(rest) = input.strip_prefix("~/") {
        format!("{home_str}/{rest}")
    } else {
        input.to_string()
    };

    PathBuf::from(expanded.replace(HOME_PLACEHOLDER, &home_str))
}

/// Returns the mirror directory for `source`: `<output_root>/<name>_bak`.
///
/// `source` should already be canonical so that `.` resolves to a name.
///
/// # Examples
///
/// ```
/// use envbak_core::paths::destination_dir;
/// use std::path::Path;
/// use std::path::PathBuf;
///
/// let dest = destination_dir(Path::new("/work/proj"), Path::new("/backups")).unwrap();
/// assert_eq!(dest, PathBuf::from("/backups/proj_bak"));
/// ```
///
/// # Errors
///
/// Returns [`BackupError::InvalidConfig`] if `source` has no base name.
pub fn destination_dir(source: &Path, output_root: &Path) -> Result<PathBuf> {
    let name = source.file_name().ok_or_else(|| BackupError::InvalidConfig {
        reason: format!(
            "cannot derive a backup name from source {}",
            source.display()
        ),
    })?;

    let mut dir_name = name.to_os_string();
    dir_name.push(MIRROR_SUFFIX);
    Ok(output_root.join(dir_name))
}

/// Returns the archive path for a mirror directory: a sibling named
/// `<name>.<YYYYMMDD>.zip`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use envbak_core::paths::archive_file_name;
/// use std::path::Path;
/// use std::path::PathBuf;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(
///     archive_file_name(Path::new("/backups/proj_bak"), date),
///     PathBuf::from("/backups/proj_bak.20240309.zip")
/// );
/// ```
#[must_use]
pub fn archive_file_name(mirror_dir: &Path, date: NaiveDate) -> PathBuf {
    let mut name = mirror_dir
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!(".{}.zip", date.format("%Y%m%d")));
    mirror_dir.with_file_name(name)
}
