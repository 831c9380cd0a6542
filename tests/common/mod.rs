//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use zipedit::read::Archive;
use zipedit::{ArchivePath, CompressionMethod, WriteResult, Writer};

/// Names of the entries in [`demo_zip`], in archive order.
pub const DEMO_NAMES: [&str; 4] = ["foo.txt", "bar.txt", "foo1.txt", "foo2.txt"];

/// Writes entries through any writer. Names ending in `/` become directories.
fn write_entries<W: std::io::Write + std::io::Seek>(
    writer: &mut Writer<W>,
    method: Option<CompressionMethod>,
    entries: &[(&str, &[u8])],
) -> zipedit::Result<()> {
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(&ArchivePath::directory(name)?)?;
        } else {
            writer.add_bytes(&ArchivePath::new(name)?, data, method)?;
        }
    }
    Ok(())
}

/// Creates an in-memory archive using `method` for every file entry.
///
/// `None` uses the default method.
pub fn create_archive_with_method(
    method: Option<CompressionMethod>,
    entries: &[(&str, &[u8])],
) -> zipedit::Result<(Vec<u8>, WriteResult)> {
    let mut writer = Writer::create(Cursor::new(Vec::new()));
    write_entries(&mut writer, method, entries)?;
    let (result, output) = writer.finish_into_inner()?;
    Ok((output.into_inner(), result))
}

/// Creates an in-memory archive with the default method.
pub fn create_archive(entries: &[(&str, &[u8])]) -> zipedit::Result<Vec<u8>> {
    create_archive_with_method(None, entries).map(|(bytes, _)| bytes)
}

/// Writes an archive file named `name` inside `dir`.
pub fn write_archive(
    dir: &Path,
    name: &str,
    method: Option<CompressionMethod>,
    entries: &[(&str, &[u8])],
) -> PathBuf {
    let path = dir.join(name);
    let (bytes, _) = create_archive_with_method(method, entries).expect("create archive");
    std::fs::write(&path, bytes).expect("write archive");
    path
}

/// Writes the four-entry demo archive with Stored entries.
pub fn demo_zip(dir: &Path) -> PathBuf {
    let entries: Vec<(&str, &[u8])> = DEMO_NAMES
        .iter()
        .map(|name| (*name, name.as_bytes()))
        .collect();
    write_archive(dir, "demo.zip", Some(CompressionMethod::Stored), &entries)
}

/// Builds an archive the way a writer on a non-seekable sink does.
///
/// Every entry is Stored with general purpose bit 3 set: the local header
/// carries zero CRC and sizes, and the real values follow the data in a
/// data descriptor. Only the central directory repeats them.
pub fn data_descriptor_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    const FLAGS: u16 = 0x0008;
    const DOS_DATE: u16 = (1 << 5) | 1;

    let mut out = Vec::new();
    let mut central = Vec::new();
    for (name, data) in entries {
        let offset = out.len() as u32;
        let crc = crc32fast::hash(data);
        let size = data.len() as u32;
        let name_len = name.len() as u16;

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        for field in [20u16, FLAGS, 0, 0, DOS_DATE] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&[0; 12]);
        out.extend_from_slice(&name_len.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);
        for field in [0x0807_4b50u32, crc, size, size] {
            out.extend_from_slice(&field.to_le_bytes());
        }

        central.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        for field in [20u16, 20, FLAGS, 0, 0, DOS_DATE] {
            central.extend_from_slice(&field.to_le_bytes());
        }
        for field in [crc, size, size] {
            central.extend_from_slice(&field.to_le_bytes());
        }
        for field in [name_len, 0, 0, 0, 0] {
            central.extend_from_slice(&field.to_le_bytes());
        }
        central.extend_from_slice(&0u32.to_le_bytes());
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name.as_bytes());
    }

    let central_offset = out.len() as u32;
    let count = entries.len() as u16;
    out.extend_from_slice(&central);
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    for field in [0u16, 0, count, count] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// Reads every file entry of an archive on disk as (name, content).
pub fn read_contents(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = Archive::open_path(path).expect("open archive");
    let names: Vec<String> = archive
        .entries()
        .iter()
        .filter(|e| !e.is_directory)
        .map(|e| e.path.clone())
        .collect();
    names
        .into_iter()
        .map(|name| {
            let data = archive
                .read_to_vec(&name)
                .unwrap_or_else(|e| panic!("Failed to read '{}': {}", name, e));
            (name, data)
        })
        .collect()
}

/// Returns every entry name of an archive on disk, in order.
pub fn names(path: &Path) -> Vec<String> {
    zipedit::entry_names(path).expect("list entries")
}

/// Extracts the error from a Result, panicking if it's Ok.
pub fn expect_err<T, E>(result: Result<T, E>) -> E {
    match result {
        Ok(_) => panic!("Expected error but got Ok"),
        Err(e) => e,
    }
}
