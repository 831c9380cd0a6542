//! Semantic archive equality.
//!
//! Two archives are equal when they hold the same set of entry names, each
//! name has the same directory flag on both sides, and every file decodes to
//! the same bytes. Compression method, timestamps and entry order are
//! ignored.

use std::collections::HashSet;
use std::io::{self, Read, Seek};
use std::path::Path;

use crate::READ_BUFFER_SIZE;
use crate::read::Archive;
use crate::{Error, Result};

/// Compares the archives at `a` and `b`.
pub fn archive_equals(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<bool> {
    let mut a = Archive::open_path(a)?;
    let mut b = Archive::open_path(b)?;
    archives_equal(&mut a, &mut b)
}

/// Compares two open archives.
pub fn archives_equal<R1, R2>(a: &mut Archive<R1>, b: &mut Archive<R2>) -> Result<bool>
where
    R1: Read + Seek,
    R2: Read + Seek,
{
    if a.distinct_len() != b.distinct_len() {
        log::debug!(
            "entry counts differ: {} vs {}",
            a.distinct_len(),
            b.distinct_len()
        );
        return Ok(false);
    }

    let names: Vec<String> = a
        .entries()
        .iter()
        .map(|entry| entry.path.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    for name in &names {
        if !same_entry(a, b, name, name)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Compares entry `name_a` of the archive at `a` with entry `name_b` of
/// the archive at `b`.
///
/// Returns `false` if either entry is missing.
pub fn entry_equals(
    a: impl AsRef<Path>,
    b: impl AsRef<Path>,
    name_a: &str,
    name_b: &str,
) -> Result<bool> {
    let mut a = Archive::open_path(a)?;
    let mut b = Archive::open_path(b)?;
    same_entry(&mut a, &mut b, name_a, name_b)
}

fn same_entry<R1, R2>(
    a: &mut Archive<R1>,
    b: &mut Archive<R2>,
    name_a: &str,
    name_b: &str,
) -> Result<bool>
where
    R1: Read + Seek,
    R2: Read + Seek,
{
    let (Some(index_a), Some(index_b)) = (a.index_of(name_a), b.index_of(name_b)) else {
        log::debug!("'{}' or '{}' is missing", name_a, name_b);
        return Ok(false);
    };

    let (entry_a, entry_b) = (&a.entries()[index_a], &b.entries()[index_b]);
    if entry_a.is_directory != entry_b.is_directory {
        log::debug!("'{}' is a directory on one side only", name_a);
        return Ok(false);
    }
    if entry_a.is_directory {
        return Ok(true);
    }
    if entry_a.size != entry_b.size || entry_a.crc32 != entry_b.crc32 {
        log::debug!("'{}' differs in size or CRC-32", name_a);
        return Ok(false);
    }

    let (_, reader_a) = a.entry_reader(index_a)?;
    let (_, reader_b) = b.entry_reader(index_b)?;
    let equal = streams_equal(reader_a, reader_b)?;
    if !equal {
        log::debug!("'{}' differs in content", name_a);
    }
    Ok(equal)
}

/// Compares two readers chunk by chunk.
fn streams_equal(mut a: impl Read, mut b: impl Read) -> Result<bool> {
    let mut buf_a = vec![0u8; READ_BUFFER_SIZE];
    let mut buf_b = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let n = read_full(&mut a, &mut buf_a)?;
        let m = read_full(&mut b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fills `buf` as far as the reader allows; returns the bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}
