//! Serialization of a directory tree into a single ZIP archive.

pub mod config;
pub mod report;
pub mod walker;
pub mod zip;

pub use config::ArchiveConfig;
pub use report::ArchiveReport;
pub use walker::EntryKind;
pub use walker::TreeEntry;
pub use self::zip::archive_tree;
pub use self::zip::archive_tree_with_progress;
