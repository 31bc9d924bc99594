//! Selective backup of `.env` files.
//!
//! `envbak-core` walks a source tree, mirrors every file with a target base
//! name (`.env` by default) into a parallel destination tree while skipping
//! dependency and build directories, and packs the mirror into a dated ZIP
//! archive.
//!
//! # Examples
//!
//! ```no_run
//! use envbak_core::BackupOptions;
//! use envbak_core::run_backup;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = BackupOptions::new("/work/monorepo").with_output_root("/backups");
//! let report = run_backup(&options)?;
//! println!(
//!     "Backed up {} files into {}",
//!     report.mirror.files_copied,
//!     report.archive_path.display()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The two passes can also be run on their own:
//!
//! ```no_run
//! use envbak_core::ArchiveConfig;
//! use envbak_core::MirrorConfig;
//! use envbak_core::archive::archive_tree;
//! use envbak_core::mirror::mirror;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! mirror(Path::new("proj"), Path::new("proj_bak"), &MirrorConfig::default())?;
//! archive_tree(
//!     Path::new("proj_bak"),
//!     Path::new("proj_bak.zip"),
//!     &ArchiveConfig::default(),
//! )?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod copy;
pub mod error;
pub mod mirror;
pub mod paths;
pub mod progress;
pub mod report;
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::BackupOptions;
pub use api::run_backup;
pub use api::run_backup_with_progress;
pub use archive::ArchiveConfig;
pub use archive::ArchiveReport;
pub use error::BackupError;
pub use error::Result;
pub use mirror::MirrorConfig;
pub use mirror::MirrorReport;
pub use mirror::WriteMode;
pub use report::BackupReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
