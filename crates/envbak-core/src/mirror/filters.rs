//! Name-based filtering for the mirror walk.
//!
//! Both rules compare a single path segment (the entry's base name) for exact
//! equality. Nothing here looks at the full path, so an excluded name is
//! skipped at any depth.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Path;

/// Directory names skipped by default: dependency, VCS, editor and build
/// output directories.
pub const DEFAULT_EXCLUDED_DIRS: [&str; 8] = [
    "node_modules",
    "venv",
    ".git",
    "bin",
    "obj",
    ".vscode",
    "dist",
    "build",
];

/// Set of directory base names whose subtrees are not traversed.
///
/// # Examples
///
/// ```
/// use envbak_core::mirror::ExclusionSet;
/// use std::path::Path;
///
/// let set = ExclusionSet::from_names(["node_modules", "target"]);
/// assert!(set.is_excluded(Path::new("web/node_modules")));
/// assert!(!set.is_excluded(Path::new("node_modules/pkg")));
/// assert!(!set.is_excluded(Path::new("targets")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<OsString>,
}

impl ExclusionSet {
    /// Creates an empty set that excludes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the default set ([`DEFAULT_EXCLUDED_DIRS`]).
    #[must_use]
    pub fn defaults() -> Self {
        Self::from_names(DEFAULT_EXCLUDED_DIRS)
    }

    /// Creates a set from directory names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds a name, returning whether it was new.
    pub fn insert(&mut self, name: impl Into<OsString>) -> bool {
        self.names.insert(name.into())
    }

    /// Returns `true` if `name` is in the set.
    #[must_use]
    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    /// Returns `true` if the base name of `path` is in the set.
    ///
    /// Paths without a base name (`/`, `..`) are never excluded.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.contains(name))
    }

    /// Number of names in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the set excludes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &OsStr> {
        self.names.iter().map(OsString::as_os_str)
    }
}

impl<S: Into<OsString>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

impl<S: Into<OsString>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

/// Returns `true` if the base name of `path` equals `target` exactly.
///
/// # Examples
///
/// ```
/// use envbak_core::mirror::filters::matches_target;
/// use std::path::Path;
///
/// assert!(matches_target(Path::new("api/.env"), ".env"));
/// assert!(!matches_target(Path::new("api/.env.local"), ".env"));
/// assert!(!matches_target(Path::new("api/x.env"), ".env"));
/// ```
#[must_use]
pub fn matches_target(path: &Path, target: &str) -> bool {
    path.file_name().is_some_and(|name| name == target)
}
