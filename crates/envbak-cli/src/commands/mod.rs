//! Subcommand implementations.

pub mod archive;
pub mod backup;
pub mod completion;
pub mod mirror;
