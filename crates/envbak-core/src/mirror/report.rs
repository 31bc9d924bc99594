//! Mirror pass reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of a mirror pass.
///
/// # Examples
///
/// ```
/// use envbak_core::mirror::MirrorReport;
///
/// let mut report = MirrorReport::new();
/// report.files_copied = 2;
/// report.add_warning("file disappeared before it could be copied: a/.env");
/// assert!(report.has_warnings());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MirrorReport {
    /// Number of files copied into the destination.
    pub files_copied: usize,

    /// Total bytes copied.
    pub bytes_copied: u64,

    /// Number of directories created under the destination.
    pub directories_created: usize,

    /// Relative paths of the copied files, in walk order.
    pub copied: Vec<PathBuf>,

    /// Directories that were not descended into.
    pub excluded: Vec<PathBuf>,

    /// Matches that disappeared between discovery and copy.
    pub vanished: Vec<PathBuf>,

    /// Duration of the pass.
    pub duration: Duration,

    /// Warnings generated during the pass.
    pub warnings: Vec<String>,
}

impl MirrorReport {
    /// Creates a new empty mirror report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
