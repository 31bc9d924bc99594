//! Selective mirroring of target files into a destination tree.
//!
//! The mirror pass walks a source tree, skips excluded directories, and
//! copies every file whose base name equals the target (`.env` by default)
//! to the same relative path under the destination.

pub mod config;
pub mod copier;
pub mod filters;
pub mod report;
pub mod walker;

pub use config::MirrorConfig;
pub use config::WriteMode;
pub use copier::copy_entry;
pub use copier::mirror;
pub use copier::mirror_with_progress;
pub use filters::ExclusionSet;
pub use report::MirrorReport;
pub use walker::MatchedFile;
pub use walker::find_matches;
