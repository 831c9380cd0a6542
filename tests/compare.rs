//! Integration tests for archive and entry equality.

#![cfg(feature = "deflate")]

mod common;

use std::fs;

use zipedit::edit::{ChangeSet, DuplicatePolicy, rewrite};
use zipedit::{CompressionMethod, archive_equals, entry_equals};

use common::{demo_zip, write_archive};

#[test]
fn test_archive_equals_itself() {
    let dir = tempfile::tempdir().unwrap();
    let zip = demo_zip(dir.path());
    assert!(archive_equals(&zip, &zip).unwrap());
}

#[test]
fn test_add_then_remove_is_equal() {
    let dir = tempfile::tempdir().unwrap();
    let zip = demo_zip(dir.path());
    let added = dir.path().join("added.zip");
    let removed = dir.path().join("removed.zip");

    let _ = rewrite(
        &zip,
        ChangeSet::new().add_bytes("extra/new.txt", b"new".to_vec()),
        DuplicatePolicy::Add,
        &added,
    )
    .unwrap();
    assert!(!archive_equals(&zip, &added).unwrap());

    let _ = rewrite(
        &added,
        ChangeSet::new().remove("extra"),
        DuplicatePolicy::Add,
        &removed,
    )
    .unwrap();
    assert!(archive_equals(&zip, &removed).unwrap());
}

#[test]
fn test_order_and_method_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_archive(
        dir.path(),
        "a.zip",
        Some(CompressionMethod::Stored),
        &[("one.txt", b"1"), ("two/", b""), ("two/three.txt", b"3")],
    );
    let b = write_archive(
        dir.path(),
        "b.zip",
        None,
        &[("two/", b""), ("two/three.txt", b"3"), ("one.txt", b"1")],
    );
    assert!(archive_equals(&a, &b).unwrap());
}

#[test]
fn test_differing_content_is_not_equal() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_archive(dir.path(), "a.zip", None, &[("x.txt", b"abc")]);
    let b = write_archive(dir.path(), "b.zip", None, &[("x.txt", b"abd")]);
    assert!(!archive_equals(&a, &b).unwrap());
    assert!(!archive_equals(&b, &a).unwrap());
}

#[test]
fn test_directory_flag_matters() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_archive(dir.path(), "a.zip", None, &[("x/", b"")]);
    let b = write_archive(dir.path(), "b.zip", None, &[("x", b"")]);
    assert!(!archive_equals(&a, &b).unwrap());
}

#[test]
fn test_extra_entry_is_not_equal() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_archive(dir.path(), "a.zip", None, &[("x.txt", b"1")]);
    let b = write_archive(
        dir.path(),
        "b.zip",
        None,
        &[("x.txt", b"1"), ("y.txt", b"2")],
    );
    assert!(!archive_equals(&a, &b).unwrap());
}

#[test]
fn test_entry_equals_across_names() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_archive(dir.path(), "a.zip", None, &[("left.txt", b"same")]);
    let b = write_archive(
        dir.path(),
        "b.zip",
        Some(CompressionMethod::Stored),
        &[("right.txt", b"same"), ("other.txt", b"different")],
    );

    assert!(entry_equals(&a, &b, "left.txt", "right.txt").unwrap());
    assert!(!entry_equals(&a, &b, "left.txt", "other.txt").unwrap());
    assert!(!entry_equals(&a, &b, "left.txt", "missing.txt").unwrap());
}

#[test]
fn test_compare_missing_archive_fails() {
    let dir = tempfile::tempdir().unwrap();
    let zip = demo_zip(dir.path());
    let missing = dir.path().join("missing.zip");
    assert!(archive_equals(&zip, &missing).is_err());

    fs::write(dir.path().join("junk.zip"), b"junk").unwrap();
    assert!(archive_equals(&zip, dir.path().join("junk.zip")).is_err());
}
