//! Configuration for the mirror pass.

use crate::BackupError;
use crate::Result;
use crate::mirror::filters::ExclusionSet;
use std::fmt;
use std::str::FromStr;

/// Base name of the files collected by default.
pub const DEFAULT_TARGET_FILE_NAME: &str = ".env";

/// How a copied file is written when the destination already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Create the file or append to it. Running twice into the same
    /// destination concatenates the content.
    #[default]
    Append,

    /// Create the file or truncate it before writing.
    Overwrite,
}

impl WriteMode {
    /// Lowercase name used on the command line and in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteMode {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(BackupError::InvalidConfig {
                reason: format!("unknown write mode '{other}' (expected append or overwrite)"),
            }),
        }
    }
}

/// Configuration for mirroring matching files into a destination tree.
///
/// # Examples
///
/// ```
/// use envbak_core::mirror::MirrorConfig;
/// use envbak_core::mirror::WriteMode;
///
/// let config = MirrorConfig::default()
///     .with_write_mode(WriteMode::Overwrite)
///     .with_extra_exclusions(["target"]);
///
/// assert_eq!(config.target_file_name, ".env");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Exact base name a file must have to be copied.
    ///
    /// Default: `.env`.
    pub target_file_name: String,

    /// Directory names whose subtrees are skipped.
    ///
    /// Default: [`ExclusionSet::defaults`].
    pub exclusions: ExclusionSet,

    /// Write mode for destination files.
    ///
    /// Default: [`WriteMode::Append`].
    pub write_mode: WriteMode,

    /// Follow symbolic links to directories while walking.
    ///
    /// Default: `false`. When enabled, link cycles abort the walk.
    pub follow_symlinks: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            target_file_name: DEFAULT_TARGET_FILE_NAME.to_string(),
            exclusions: ExclusionSet::defaults(),
            write_mode: WriteMode::default(),
            follow_symlinks: false,
        }
    }
}

impl MirrorConfig {
    /// Creates a new `MirrorConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target file name.
    #[must_use]
    pub fn with_target_file_name(mut self, name: impl Into<String>) -> Self {
        self.target_file_name = name.into();
        self
    }

    /// Replaces the exclusion set.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Adds names to the current exclusion set.
    #[must_use]
    pub fn with_extra_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString>,
    {
        self.exclusions.extend(names);
        self
    }

    /// Sets the write mode.
    #[must_use]
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::InvalidConfig`] if the target name is empty,
    /// is `.` or `..`, or contains a path separator.
    pub fn validate(&self) -> Result<()> {
        let name = self.target_file_name.as_str();
        if name.is_empty() {
            return Err(BackupError::InvalidConfig {
                reason: "target file name must not be empty".to_string(),
            });
        }
        if name == "." || name == ".." {
            return Err(BackupError::InvalidConfig {
                reason: format!("target file name '{name}' is not a file name"),
            });
        }
        if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            return Err(BackupError::InvalidConfig {
                reason: format!("target file name '{name}' must not contain a path separator"),
            });
        }
        Ok(())
    }
}
