//! Helpers for building source trees and reading back archives in tests.
//!
//! # Panics
//!
//! All functions in this module panic on I/O errors since they are meant
//! for test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Writes each `(relative path, content)` pair under `root`, creating
/// parent directories as needed.
///
/// # Examples
///
/// ```
/// use envbak_core::test_utils::write_tree;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// write_tree(temp.path(), &[(".env", "A=1"), ("api/.env", "B=2")]);
/// assert!(temp.path().join("api/.env").is_file());
/// ```
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(root).unwrap();
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

/// Reads every entry of a ZIP file as `(name, data)` in archive order.
///
/// Directory entries have empty data.
#[must_use]
pub fn read_zip_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        entries.push((entry.name().to_string(), data));
    }

    entries
}
