//! Integration tests for envbak-core.
//!
//! These tests drive the mirror, archive and full backup passes against
//! real temporary directory trees.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use envbak_core::ArchiveConfig;
use envbak_core::BackupError;
use envbak_core::BackupOptions;
use envbak_core::MirrorConfig;
use envbak_core::WriteMode;
use envbak_core::archive::archive_tree;
use envbak_core::mirror::ExclusionSet;
use envbak_core::mirror::copy_entry;
use envbak_core::mirror::find_matches;
use envbak_core::mirror::mirror;
use envbak_core::run_backup;
use envbak_core::test_utils::read_zip_entries;
use envbak_core::test_utils::write_tree;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn files_only(entries: &[(String, Vec<u8>)]) -> Vec<&(String, Vec<u8>)> {
    entries.iter().filter(|(name, _)| !name.ends_with('/')).collect()
}

fn dirs_only(entries: &[(String, Vec<u8>)]) -> Vec<&str> {
    entries
        .iter()
        .filter(|(name, _)| name.ends_with('/'))
        .map(|(name, _)| name.as_str())
        .collect()
}

#[test]
fn test_node_modules_scenario() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("proj");
    write_tree(&source, &[(".env", "A=1"), ("node_modules/x/.env", "B=2")]);
    let dest = temp.path().join("proj_bak");

    let report = mirror(&source, &dest, &MirrorConfig::default()).unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(fs::read_to_string(dest.join(".env")).unwrap(), "A=1");
    assert!(!dest.join("node_modules").exists());

    let archive = temp.path().join("proj_bak.zip");
    archive_tree(&dest, &archive, &ArchiveConfig::default()).unwrap();

    let entries = read_zip_entries(&archive);
    let files = files_only(&entries);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "proj_bak/.env");
    assert_eq!(files[0].1, b"A=1");
}

#[test]
fn test_clean_run_copies_each_match_once_byte_identical() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("mono");
    let files = [
        (".env", "ROOT=1\n"),
        ("services/api/.env", "API=secret\n"),
        ("services/web/.env", "WEB=\u{1F600}\n"),
        ("services/web/.env.example", "IGNORED=1\n"),
        ("libs/a/b/c/.env", ""),
        ("README.md", "# mono"),
    ];
    write_tree(&source, &files);
    let dest = temp.path().join("mono_bak");

    let report = mirror(&source, &dest, &MirrorConfig::default()).unwrap();

    assert_eq!(report.files_copied, 4);
    assert!(!report.has_warnings());
    for (relative, content) in files.iter().filter(|(p, _)| p.ends_with("/.env") || *p == ".env") {
        assert_eq!(fs::read(dest.join(relative)).unwrap(), content.as_bytes());
    }
    assert!(!dest.join("README.md").exists());
    assert!(!dest.join("services/web/.env.example").exists());
}

#[test]
fn test_every_default_exclusion_is_skipped() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    let mut files = vec![(".env".to_string(), "KEEP=1".to_string())];
    for dir in envbak_core::mirror::filters::DEFAULT_EXCLUDED_DIRS {
        files.push((format!("{dir}/.env"), "SKIP=1".to_string()));
        files.push((format!("pkg/{dir}/deep/.env"), "SKIP=1".to_string()));
    }
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    write_tree(&source, &borrowed);

    let matches = find_matches(&source, &MirrorConfig::default()).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].relative_path, Path::new(".env"));
}

#[test]
fn test_custom_exclusions_replace_defaults() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    write_tree(&source, &[("node_modules/.env", "A"), ("secret/.env", "B")]);

    let config = MirrorConfig::default().with_exclusions(ExclusionSet::from_names(["secret"]));
    let matches = find_matches(&source, &config).unwrap();

    let found: Vec<_> = matches.iter().map(|m| m.relative_path.clone()).collect();
    assert_eq!(found, [Path::new("node_modules/.env")]);
}

#[test]
fn test_rerun_appends_to_existing_destination() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("proj");
    write_tree(&source, &[(".env", "A=1\n"), ("api/.env", "B=2\n")]);
    let dest = temp.path().join("proj_bak");

    mirror(&source, &dest, &MirrorConfig::default()).unwrap();
    mirror(&source, &dest, &MirrorConfig::default()).unwrap();

    assert_eq!(fs::read_to_string(dest.join(".env")).unwrap(), "A=1\nA=1\n");
    assert_eq!(fs::read_to_string(dest.join("api/.env")).unwrap(), "B=2\nB=2\n");
}

#[test]
fn test_rerun_with_overwrite_replaces_destination() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("proj");
    write_tree(&source, &[(".env", "A=1\n")]);
    let dest = temp.path().join("proj_bak");
    let config = MirrorConfig::default().with_write_mode(WriteMode::Overwrite);

    mirror(&source, &dest, &config).unwrap();
    mirror(&source, &dest, &config).unwrap();

    assert_eq!(fs::read_to_string(dest.join(".env")).unwrap(), "A=1\n");
}

#[test]
fn test_copy_entry_modes() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in.env");
    let dst = temp.path().join("out.env");
    fs::write(&src, "X").unwrap();
    fs::write(&dst, "OLD").unwrap();

    assert_eq!(copy_entry(&src, &dst, WriteMode::Append).unwrap(), 1);
    assert_eq!(fs::read_to_string(&dst).unwrap(), "OLDX");

    copy_entry(&src, &dst, WriteMode::Overwrite).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "X");
}

#[test]
fn test_archive_counts_files_and_directories() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("tree");
    write_tree(
        &root,
        &[("a.txt", "1"), ("x/b.txt", "22"), ("x/y/c.txt", "333"), ("z/d.txt", "4444")],
    );
    fs::create_dir_all(root.join("empty")).unwrap();
    let output = temp.path().join("tree.zip");

    let report = archive_tree(&root, &output, &ArchiveConfig::default()).unwrap();

    // 4 files; x, x/y, z, empty plus the root.
    assert_eq!(report.files_added, 4);
    assert_eq!(report.directories_added, 5);

    let entries = read_zip_entries(&output);
    assert_eq!(files_only(&entries).len(), 4);
    assert_eq!(
        dirs_only(&entries),
        ["tree/", "tree/empty/", "tree/x/", "tree/x/y/", "tree/z/"]
    );
    for (name, data) in files_only(&entries) {
        let relative = name.strip_prefix("tree/").unwrap();
        assert_eq!(&fs::read(root.join(relative)).unwrap(), data);
    }
}

#[test]
fn test_empty_source_yields_valid_archive() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("empty");
    write_tree(&source, &[("node_modules/.env", "X"), ("notes.txt", "hi")]);
    let dest = temp.path().join("empty_bak");

    let report = mirror(&source, &dest, &MirrorConfig::default()).unwrap();
    assert_eq!(report.files_copied, 0);
    assert!(!dest.exists());

    let output = temp.path().join("empty_bak.zip");
    let archive = archive_tree(&dest, &output, &ArchiveConfig::default()).unwrap();

    assert!(archive.total_entries() <= 1);
    assert!(read_zip_entries(&output).len() <= 1);
}

#[test]
fn test_full_backup_pipeline() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("app");
    write_tree(
        &source,
        &[(".env", "A=1"), ("dist/.env", "B=2"), ("server/.env", "C=3")],
    );
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    let options = BackupOptions::new(&source)
        .with_output_root(&out)
        .with_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    let report = run_backup(&options).unwrap();

    assert_eq!(report.archive_path, out.join("app_bak.20231231.zip"));
    assert!(!out.join("app_bak").exists());

    let entries = read_zip_entries(&report.archive_path);
    let names: Vec<_> = files_only(&entries).iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, ["app_bak/.env", "app_bak/server/.env"]);
}

#[test]
fn test_source_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    let err = mirror(&file, &temp.path().join("bak"), &MirrorConfig::default()).unwrap_err();

    assert!(matches!(err, BackupError::SourceUnreadable { .. }));
    assert!(err.is_fatal());
    assert_eq!(err.path(), Some(file.as_path()));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_aborts_mirror() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    write_tree(&source, &[("locked/.env", "A")]);
    let locked = source.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the directory anyway.
    let readable = fs::read_dir(&locked).is_ok();
    let result = mirror(&source, &temp.path().join("bak"), &MirrorConfig::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if !readable {
        assert!(matches!(result, Err(BackupError::SourceUnreadable { .. })));
    }
}
