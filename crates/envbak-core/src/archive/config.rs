//! Configuration for the archive pass.

use crate::BackupError;
use crate::Result;

/// Default deflate level.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Configuration for writing a tree into a ZIP archive.
///
/// # Examples
///
/// ```
/// use envbak_core::archive::ArchiveConfig;
///
/// let config = ArchiveConfig::default().with_compression_level(9);
/// assert!(config.validate().is_ok());
///
/// let config = ArchiveConfig { compression_level: 12, ..ArchiveConfig::default() };
/// assert!(config.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Deflate level, 1 (fastest) to 9 (smallest).
    ///
    /// Default: `6`.
    pub compression_level: u8,

    /// Store unix permission bits of files in their entries.
    ///
    /// Default: `true`. Has no effect on non-unix hosts.
    pub preserve_permissions: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            preserve_permissions: true,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// Out-of-range values are reported by [`ArchiveConfig::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::InvalidConfig`] if the compression level is not
    /// in `1..=9`.
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(BackupError::InvalidConfig {
                reason: format!(
                    "compression level must be 1-9, got {}",
                    self.compression_level
                ),
            });
        }
        Ok(())
    }
}
