//! Extracting archives to the filesystem.
//!
//! Every entry name is validated with [`resolve_entry_path`] before the
//! first file is created, so an archive containing a traversal attempt
//! extracts nothing at all. This holds for [`unwrap_stream`] too, which
//! buffers its input before planning.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipedit::extract;
//!
//! // release.zip holds "release-1.2/bin/...", "release-1.2/README", ...
//! let result = extract::unwrap("release.zip", "/opt/release")?;
//! println!("extracted {} entries", result.entries_extracted);
//! # Ok::<(), zipedit::Error>(())
//! ```

use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::archive_path::strip_root_segment;
use crate::read::{Archive, Entry};
use crate::root::detect_root;
use crate::safety::{resolve_entry_path, write_entry};
use crate::source::{IdentityMapper, NameMapper};
use crate::write::staging_dir;
use crate::{Error, Result};

/// Statistics of an extraction.
#[must_use = "extraction result should be checked to verify expected entries were written"]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractResult {
    /// Entries written to disk, directories included.
    pub entries_extracted: usize,
    /// Entries skipped by a mapper, bare root markers and duplicates.
    pub entries_skipped: usize,
    /// Total bytes written.
    pub bytes_extracted: u64,
}

/// Extracts every entry of `archive` under `dest`.
pub fn unpack(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<ExtractResult> {
    unpack_with(archive, dest, IdentityMapper)
}

/// Extracts entries under the names produced by `mapper`.
///
/// Entries the mapper returns `None` for are skipped.
pub fn unpack_with<M: NameMapper>(
    archive: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    mapper: M,
) -> Result<ExtractResult> {
    let mut archive = Archive::open_path(archive)?;
    extract_archive(&mut archive, dest.as_ref(), |entry| Ok(mapper.map(&entry.path)))
}

/// Extracts an archive whose entries share a single root, dropping that
/// root from every path.
///
/// The bare root directory entry creates nothing.
///
/// # Errors
///
/// Fails before anything is written with [`Error::EmptyArchive`] for an
/// archive without entries, [`Error::AmbiguousRoot`] if entries live under
/// more than one top-level segment, and [`Error::InvalidInput`] if the single
/// root is a file rather than a directory.
pub fn unwrap(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<ExtractResult> {
    let mut archive = Archive::open_path(archive)?;
    unwrap_archive(&mut archive, dest.as_ref())
}

fn unwrap_archive<R: Read + Seek>(archive: &mut Archive<R>, dest: &Path) -> Result<ExtractResult> {
    let root = detect_root(archive).into_root()?;
    log::debug!("unwrapping root '{}'", root);
    extract_archive(archive, dest, unwrapped_name)
}

fn unwrapped_name(entry: &Entry) -> Result<Option<String>> {
    match strip_root_segment(&entry.path) {
        Some(rest) => Ok(Some(rest.to_string())),
        None if entry.is_directory => Ok(None),
        None => Err(Error::InvalidInput(format!(
            "'{}' is a file at the top level and cannot be unwrapped",
            entry.path
        ))),
    }
}

/// Streaming variant of [`unwrap`].
///
/// The stream is buffered with [`Archive::from_stream`] first, so it fails
/// under the same conditions as [`unwrap`], and before anything is written.
pub fn unwrap_stream(reader: impl Read, dest: impl AsRef<Path>) -> Result<ExtractResult> {
    let mut archive = Archive::from_stream(reader)?;
    unwrap_archive(&mut archive, dest.as_ref())
}

/// Replaces an archive file with a directory of the same name holding its
/// extracted content.
///
/// The content is extracted next to the archive first; the archive is only
/// moved aside once extraction succeeded, and is restored if the final
/// rename fails.
pub fn explode(archive: impl AsRef<Path>) -> Result<ExtractResult> {
    let archive = archive.as_ref();
    if !archive.exists() {
        return Err(Error::SourceNotFound {
            path: archive.to_path_buf(),
        });
    }
    if !archive.is_file() {
        return Err(Error::InvalidInput(format!(
            "{} is not an archive file",
            archive.display()
        )));
    }

    let parent = staging_dir(archive);
    let unwritable = |source| Error::DestinationUnwritable {
        path: archive.to_path_buf(),
        source,
    };
    let extracted = tempfile::Builder::new()
        .prefix(".zipedit-")
        .tempdir_in(&parent)
        .map_err(unwritable)?;
    let result = unpack(archive, extracted.path())?;

    // The archive is parked inside a reserved directory, never renamed over
    // an existing file.
    let aside = tempfile::Builder::new()
        .prefix(".zipedit-")
        .tempdir_in(&parent)
        .map_err(unwritable)?;
    let backup = aside.path().join("archive");
    fs::rename(archive, &backup)?;

    let extracted: PathBuf = extracted.keep();
    if let Err(e) = fs::rename(&extracted, archive) {
        if let Err(restore) = fs::rename(&backup, archive) {
            log::warn!(
                "failed to restore {} from {}: {}",
                archive.display(),
                backup.display(),
                restore
            );
        }
        if let Err(cleanup) = fs::remove_dir_all(&extracted) {
            log::warn!("failed to remove {}: {}", extracted.display(), cleanup);
        }
        return Err(Error::Io(e));
    }

    log::debug!(
        "exploded {} ({} entries)",
        archive.display(),
        result.entries_extracted
    );
    Ok(result)
}

/// Plans every entry first, then writes.
fn extract_archive<R, F>(archive: &mut Archive<R>, dest: &Path, mut name_of: F) -> Result<ExtractResult>
where
    R: Read + Seek,
    F: FnMut(&Entry) -> Result<Option<String>>,
{
    let mut result = ExtractResult::default();
    let mut plan = Vec::with_capacity(archive.len());

    for (index, entry) in archive.entries().iter().enumerate() {
        if !archive.is_first_occurrence(index) {
            result.entries_skipped += 1;
            continue;
        }
        match name_of(entry)? {
            Some(name) => {
                let target = resolve_entry_path(dest, &name)?;
                plan.push((index, target, entry.is_directory));
            }
            None => {
                log::trace!("skipping '{}'", entry.path);
                result.entries_skipped += 1;
            }
        }
    }

    fs::create_dir_all(dest)?;
    for (index, target, is_directory) in plan {
        let (_, mut reader) = archive.entry_reader(index)?;
        result.bytes_extracted += write_entry(&target, is_directory, &mut reader)?;
        result.entries_extracted += 1;
    }

    log::debug!(
        "extracted {} entries into {}",
        result.entries_extracted,
        dest.display()
    );
    Ok(result)
}
