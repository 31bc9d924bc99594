//! Archive pass reporting.

use std::time::Duration;

/// Report of an archive pass.
///
/// # Examples
///
/// ```
/// use envbak_core::archive::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.bytes_written = 1000;
/// report.archive_size = 250;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert_eq!(report.compression_percentage(), 75.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Number of file entries written.
    pub files_added: usize,

    /// Number of directory entries written, including the root entry.
    pub directories_added: usize,

    /// Entry names in the order they were written.
    pub entries: Vec<String>,

    /// Uncompressed bytes read from the tree.
    pub bytes_written: u64,

    /// Size of the finished archive file.
    pub archive_size: u64,

    /// Entries that could not be stored and were skipped.
    pub files_skipped: usize,

    /// Duration of the pass.
    pub duration: Duration,

    /// Warnings generated during the pass.
    pub warnings: Vec<String>,
}

impl ArchiveReport {
    /// Creates a new empty archive report.
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

    /// Total number of entries written.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added
    }

    /// Returns the compression ratio (uncompressed / archive size).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.archive_size as f64
    }

    /// Returns the space saved as a percentage.
    ///
    /// Returns 0.0 if nothing was written and never goes below 0.0, since
    /// container overhead can make tiny archives larger than their content.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        let saved = 1.0 - (self.archive_size as f64 / self.bytes_written as f64);
        (saved * 100.0).max(0.0)
    }
}
