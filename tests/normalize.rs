//! Integration tests for packing, unpacking and root normalization.

#![cfg(feature = "deflate")]

mod common;

use std::fs::{self, File};
use std::path::Path;

use zipedit::pack::{self, PackOptions};
use zipedit::root::{RootDescriptor, root_of};
use zipedit::source::FileSource;
use zipedit::{CompressionMethod, Error, extract};

use common::{
    data_descriptor_zip, demo_zip, expect_err, names, read_contents, write_archive,
};

fn sample_tree(root: &Path) {
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("b.txt"), b"b").unwrap();
    fs::write(root.join("bad.txt"), b"bad").unwrap();
    fs::write(root.join("b/c.txt"), b"c").unwrap();
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

// ============================================================================
// unwrap
// ============================================================================

#[test]
fn test_unwrap_file_packed_with_root() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("parent");
    fs::create_dir(&parent).unwrap();
    fs::write(parent.join("TestFile.txt"), b"test").unwrap();

    let zip = dir.path().join("packed.zip");
    let _ = pack::pack_with(&parent, &zip, &PackOptions::new().preserve_root(true)).unwrap();
    assert_eq!(
        root_of(&zip).unwrap(),
        RootDescriptor::Single("parent".into())
    );

    let dest = dir.path().join("dest");
    let _ = extract::unwrap(&zip, &dest).unwrap();
    assert_eq!(fs::read(dest.join("TestFile.txt")).unwrap(), b"test");
}

#[test]
fn test_unwrap_stream() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("parent");
    fs::create_dir(&parent).unwrap();
    fs::write(parent.join("TestFile.txt"), b"test").unwrap();
    let zip = dir.path().join("packed.zip");
    let _ = pack::pack_with(&parent, &zip, &PackOptions::new().preserve_root(true)).unwrap();

    let dest = dir.path().join("dest");
    let _ = extract::unwrap_stream(File::open(&zip).unwrap(), &dest).unwrap();
    assert!(dest.join("TestFile.txt").exists());
}

#[test]
fn test_unwrap_entries_in_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let zip = demo_zip(dir.path());
    let dest = dir.path().join("dest");

    let err = expect_err(extract::unwrap(&zip, &dest));
    assert!(matches!(err, Error::AmbiguousRoot { .. }));
    assert!(!dest.exists());
}

#[test]
fn test_unwrap_multiple_roots_fails() {
    let dir = tempfile::tempdir().unwrap();
    let zip = write_archive(
        dir.path(),
        "dirs-only.zip",
        Some(CompressionMethod::Stored),
        &[("a/", b""), ("a/b/", b""), ("c/", b"")],
    );
    let err = expect_err(extract::unwrap(&zip, dir.path().join("dest")));
    assert!(
        matches!(err, Error::AmbiguousRoot { ref first, ref second } if first == "a" && second == "c")
    );
}

#[test]
fn test_unwrap_stream_multiple_roots_fails() {
    let dir = tempfile::tempdir().unwrap();
    let zip = demo_zip(dir.path());
    let err = expect_err(extract::unwrap_stream(
        File::open(&zip).unwrap(),
        dir.path().join("dest"),
    ));
    assert!(matches!(err, Error::AmbiguousRoot { .. }));
    assert!(!dir.path().join("dest").exists());
}

#[test]
fn test_unwrap_stream_with_data_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = data_descriptor_zip(&[("root/a.txt", b"alpha"), ("root/sub/b.txt", b"beta")]);
    let dest = dir.path().join("dest");

    let result = extract::unwrap_stream(&bytes[..], &dest).unwrap();
    assert_eq!(result.entries_extracted, 2);
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"alpha");
    assert_eq!(fs::read(dest.join("sub/b.txt")).unwrap(), b"beta");
}

#[test]
fn test_unwrap_single_root_with_structure() {
    let dir = tempfile::tempdir().unwrap();
    let zip = write_archive(
        dir.path(),
        "single-root.zip",
        Some(CompressionMethod::Stored),
        &[
            ("a/", b""),
            ("a/b.txt", b"b"),
            ("a/bad.txt", b"bad"),
            ("a/b/", b""),
            ("a/b/c.txt", b"c"),
        ],
    );
    let dest = dir.path().join("dest");

    let result = extract::unwrap(&zip, &dest).unwrap();
    assert_eq!(result.entries_extracted, 4);
    assert_eq!(result.entries_skipped, 1);
    assert!(dest.join("b.txt").exists());
    assert!(dest.join("bad.txt").exists());
    assert!(dest.join("b").is_dir());
    assert_eq!(fs::read(dest.join("b").join("c.txt")).unwrap(), b"c");
}

#[test]
fn test_unwrap_empty_root_dir() {
    let dir = tempfile::tempdir().unwrap();
    let zip = write_archive(
        dir.path(),
        "empty-root.zip",
        Some(CompressionMethod::Stored),
        &[("a/", b"")],
    );
    let dest = dir.path().join("dest");
    fs::create_dir(&dest).unwrap();

    let _ = extract::unwrap(&zip, &dest).unwrap();
    assert!(is_empty_dir(&dest), "root dir should have been shaved");
}

#[test]
fn test_unwrap_empty_archive() {
    let dir = tempfile::tempdir().unwrap();
    let zip = write_archive(dir.path(), "empty.zip", None, &[]);
    let err = expect_err(extract::unwrap(&zip, dir.path().join("dest")));
    assert!(matches!(err, Error::EmptyArchive));
}

// ============================================================================
// explode / unexplode
// ============================================================================

#[test]
fn test_explode_and_unexplode_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let zip = demo_zip(dir.path());
    let original = read_contents(&zip);

    let exploded = extract::explode(&zip).unwrap();
    assert_eq!(exploded.entries_extracted, 4);
    assert!(zip.is_dir());
    assert_eq!(fs::read(zip.join("foo.txt")).unwrap(), b"foo.txt");

    let _ = pack::unexplode(&zip).unwrap();
    assert!(zip.is_file());
    let mut restored = read_contents(&zip);
    let mut expected = original;
    restored.sort();
    expected.sort();
    assert_eq!(restored, expected);

    // Nothing but the archive is left next to it.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_unexplode_preconditions() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.zip");
    assert!(matches!(
        expect_err(pack::unexplode(&missing)),
        Error::InvalidInput(_)
    ));

    let file = dir.path().join("file.zip");
    fs::write(&file, b"not a directory").unwrap();
    assert!(matches!(
        expect_err(pack::unexplode(&file)),
        Error::InvalidInput(_)
    ));

    let empty = dir.path().join("empty.zip");
    fs::create_dir(&empty).unwrap();
    assert!(matches!(
        expect_err(pack::unexplode(&empty)),
        Error::InvalidInput(_)
    ));
    assert!(empty.is_dir());
}

// ============================================================================
// pack / unpack
// ============================================================================

#[test]
fn test_pack_and_unpack_tree() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("tree");
    sample_tree(&src);
    let zip = dir.path().join("tree.zip");

    let _ = pack::pack(&src, &zip).unwrap();
    assert_eq!(names(&zip), vec!["b/", "b/c.txt", "b.txt", "bad.txt"]);

    let out = dir.path().join("out");
    let result = extract::unpack(&zip, &out).unwrap();
    assert_eq!(result.entries_extracted, 4);
    assert_eq!(fs::read(out.join("b/c.txt")).unwrap(), b"c");
    assert_eq!(fs::read(out.join("bad.txt")).unwrap(), b"bad");
}

#[test]
fn test_pack_stored() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("tree");
    sample_tree(&src);
    let zip = dir.path().join("tree.zip");

    let options = PackOptions::new().method(CompressionMethod::Stored);
    let _ = pack::pack_with(&src, &zip, &options).unwrap();
    assert_eq!(
        zipedit::compression_method_of_entry(&zip, "b/c.txt").unwrap(),
        Some(CompressionMethod::Stored)
    );
}

#[test]
fn test_pack_with_name_mapper() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("tree");
    sample_tree(&src);
    let zip = dir.path().join("tree.zip");

    let _ = pack::pack_mapped(&src, &zip, |name: &str| {
        (!name.starts_with("bad")).then(|| format!("prefixed/{}", name))
    })
    .unwrap();
    assert_eq!(
        names(&zip),
        vec!["prefixed/b/", "prefixed/b/c.txt", "prefixed/b.txt"]
    );
}

#[test]
fn test_pack_missing_source_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let zip = dir.path().join("out.zip");
    let err = expect_err(pack::pack(dir.path().join("nope"), &zip));
    assert!(matches!(err, Error::SourceNotFound { .. }));
    assert!(!zip.exists());
}

#[test]
fn test_pack_entries_and_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let one = dir.path().join("one.txt");
    let two = dir.path().join("two.txt");
    fs::write(&one, b"1").unwrap();
    fs::write(&two, b"2").unwrap();

    let zip = dir.path().join("entries.zip");
    let _ = pack::pack_entries(&[&one, &two], &zip).unwrap();
    assert_eq!(names(&zip), vec!["one.txt", "two.txt"]);

    let mapped = dir.path().join("mapped.zip");
    let _ = pack::pack_entries_mapped(&[&one, &two], &mapped, |name: &str| {
        Some(format!("Changed-{}", name))
    })
    .unwrap();
    assert_eq!(names(&mapped), vec!["Changed-one.txt", "Changed-two.txt"]);

    let paired = dir.path().join("paired.zip");
    let sources = FileSource::pair(&[&one, &two], &["first.txt", "nested/second.txt"]).unwrap();
    let _ = pack::pack_sources(sources, &paired).unwrap();
    let contents = read_contents(&paired);
    assert_eq!(contents[1], ("nested/second.txt".to_string(), b"2".to_vec()));
}

#[test]
fn test_pack_entry_variants() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("TestFile.txt");
    fs::write(&file, b"single").unwrap();

    let zip = dir.path().join("single.zip");
    let _ = pack::pack_entry(&file, &zip).unwrap();
    assert!(zipedit::contains_entry(&zip, "TestFile.txt").unwrap());

    let named = dir.path().join("named.zip");
    let _ = pack::pack_entry_named(&file, &named, "TestFile-II.txt").unwrap();
    assert!(zipedit::contains_entry(&named, "TestFile-II.txt").unwrap());
    assert!(!zipedit::contains_entry(&named, "TestFile.txt").unwrap());

    let missing = expect_err(pack::pack_entry(dir.path().join("nope.txt"), &zip));
    assert!(matches!(missing, Error::SourceNotFound { .. }));
    // The earlier archive is untouched by the failed call.
    assert!(zipedit::contains_entry(&zip, "TestFile.txt").unwrap());
}

#[test]
fn test_unpack_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let zip = dir.path().join("evil.zip");
    {
        // Build an archive with a raw traversal name, bypassing path validation.
        use std::io::Write;
        let mut writer = zip::ZipWriter::new(File::create(&zip).unwrap());
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("ok.txt", options).unwrap();
        writer.write_all(b"ok").unwrap();
        writer.start_file("../escaped.txt", options).unwrap();
        writer.write_all(b"gotcha").unwrap();
        writer.finish().unwrap();
    }

    let out = dir.path().join("out");
    let err = expect_err(extract::unpack(&zip, &out));
    assert!(matches!(err, Error::PathTraversal { ref path } if path == "../escaped.txt"));
    assert!(!out.exists());
    assert!(!dir.path().join("escaped.txt").exists());
}
