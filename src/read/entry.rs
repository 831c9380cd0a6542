//! Archive entry types and selectors.

use std::collections::HashSet;

use crate::archive_path::trim_directory_marker;
use crate::codec::CompressionMethod;
use crate::{ArchivePath, Result};

/// Metadata of one entry in a ZIP archive.
///
/// The path is kept exactly as stored in the archive. Use
/// [`archive_path()`](Self::archive_path) to validate it before turning it
/// into a filesystem location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Entry {
    /// The entry name as stored in the archive (directories end with `/`).
    pub path: String,
    /// Whether this entry is a directory marker.
    pub is_directory: bool,
    /// Compression method of the stored bytes.
    pub method: CompressionMethod,
    /// Size of the stored (compressed) bytes.
    pub compressed_size: u64,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Position of the entry in the archive.
    pub index: usize,
}

impl Entry {
    pub(crate) fn from_parts(
        index: usize,
        path: &str,
        is_directory: bool,
        method: zip::CompressionMethod,
        compressed_size: u64,
        size: u64,
        crc32: u32,
    ) -> Self {
        Self {
            path: path.to_string(),
            is_directory,
            method: CompressionMethod::from_zip(method),
            compressed_size,
            size,
            crc32,
            index,
        }
    }

    /// Returns the file name (last component of the path).
    pub fn name(&self) -> &str {
        let trimmed = trim_directory_marker(&self.path);
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// Returns true if this is a file (not a directory).
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }

    /// Validates the stored path.
    pub fn archive_path(&self) -> Result<ArchivePath> {
        ArchivePath::new(&self.path)
    }
}

/// Trait for selecting which entries to visit.
pub trait EntrySelector {
    /// Returns true if the entry should be selected.
    fn select(&self, entry: &Entry) -> bool;
}

/// Selector that matches all entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAll;

impl EntrySelector for SelectAll {
    fn select(&self, _entry: &Entry) -> bool {
        true
    }
}

/// Selector that matches entries by exact names.
#[derive(Debug, Clone, Default)]
pub struct SelectByName {
    names: HashSet<String>,
}

impl SelectByName {
    /// Creates a selector for the given names.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if no names were given.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl EntrySelector for SelectByName {
    fn select(&self, entry: &Entry) -> bool {
        self.names.contains(&entry.path)
    }
}

/// Selector that matches only files (not directories).
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectFilesOnly;

impl EntrySelector for SelectFilesOnly {
    fn select(&self, entry: &Entry) -> bool {
        entry.is_file()
    }
}

// Implement for closures
impl<F: Fn(&Entry) -> bool> EntrySelector for F {
    fn select(&self, entry: &Entry) -> bool {
        self(entry)
    }
}
