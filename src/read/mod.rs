//! Archive reading API.
//!
//! [`Archive`] indexes the central directory once when opened. Entry content
//! is decoded only when a reader for that entry is requested, so entries
//! whose bytes are never needed cost no decode work.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipedit::read::Archive;
//!
//! let mut archive = Archive::open_path("archive.zip")?;
//! for entry in archive.entries() {
//!     println!("{}: {} bytes ({})", entry.path, entry.size, entry.method);
//! }
//! let readme = archive.read_to_vec("README.txt")?;
//! # Ok::<(), zipedit::Error>(())
//! ```

mod entry;

pub use entry::{Entry, EntrySelector, SelectAll, SelectByName, SelectFilesOnly};

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tempfile::SpooledTempFile;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::{Error, READ_BUFFER_SIZE, Result};

/// Stream input above this size spills from memory to a temporary file.
const SPOOL_LIMIT: usize = 5 * 1024 * 1024;

/// A ZIP archive reader.
pub struct Archive<R> {
    inner: ZipArchive<R>,
    entries: Vec<Entry>,
    /// First index of every distinct entry name.
    by_name: HashMap<String, usize>,
}

impl Archive<BufReader<File>> {
    /// Opens an archive from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if the file does not exist and
    /// [`Error::NotAnArchive`] if it is not a readable ZIP container.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        if path.is_dir() {
            return Err(Error::NotAnArchive {
                path: path.to_path_buf(),
                reason: "is a directory".into(),
            });
        }

        let file = File::open(path)?;
        let inner = ZipArchive::new(BufReader::new(file)).map_err(|e| open_error(path, e))?;
        log::debug!("opened archive {} ({} entries)", path.display(), inner.len());
        Self::from_zip(inner)
    }
}

impl Archive<SpooledTempFile> {
    /// Opens an archive from a forward-only stream.
    ///
    /// The stream is buffered in full, in memory up to a few megabytes and
    /// in an anonymous temporary file beyond that, and then read through its
    /// central directory. Entries written with data descriptors are
    /// therefore handled like any other entry.
    pub fn from_stream(mut reader: impl Read) -> Result<Self> {
        let mut spooled = SpooledTempFile::new(SPOOL_LIMIT);
        let copied = io::copy(&mut reader, &mut spooled)?;
        spooled.seek(SeekFrom::Start(0))?;
        log::debug!("buffered {} bytes of stream input", copied);
        Self::open(spooled)
    }
}

impl<R: Read + Seek> Archive<R> {
    /// Opens an archive from a seekable reader.
    pub fn open(reader: R) -> Result<Self> {
        let inner = ZipArchive::new(reader).map_err(|e| open_error(Path::new("<reader>"), e))?;
        Self::from_zip(inner)
    }

    fn from_zip(mut inner: ZipArchive<R>) -> Result<Self> {
        let mut entries = Vec::with_capacity(inner.len());
        let mut by_name = HashMap::with_capacity(inner.len());

        for index in 0..inner.len() {
            let file = inner.by_index_raw(index)?;
            let entry = Entry::from_parts(
                index,
                file.name(),
                file.is_dir(),
                file.compression(),
                file.compressed_size(),
                file.size(),
                file.crc32(),
            );
            if by_name.contains_key(&entry.path) {
                log::warn!(
                    "duplicate entry '{}' at index {}; the first occurrence wins",
                    entry.path,
                    index
                );
            } else {
                by_name.insert(entry.path.clone(), index);
            }
            entries.push(entry);
        }

        Ok(Self {
            inner,
            entries,
            by_name,
        })
    }

    /// Returns all entries in on-disk order, duplicates included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of distinct entry names.
    pub fn distinct_len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if an entry with this name exists.
    ///
    /// A bare directory name also matches its `name/` entry.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Returns the first entry with the given name.
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.index_of(name).map(|index| &self.entries[index])
    }

    /// Returns the index of the first entry with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name
            .get(name)
            .or_else(|| {
                if name.ends_with('/') {
                    None
                } else {
                    self.by_name.get(&format!("{}/", name))
                }
            })
            .copied()
    }

    /// Returns true if `index` is the first occurrence of its name.
    pub fn is_first_occurrence(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|entry| self.by_name.get(&entry.path) == Some(&index))
    }

    /// Returns the metadata and a decoding reader for the entry at `index`.
    pub fn entry_reader(&mut self, index: usize) -> Result<(&Entry, impl Read + '_)> {
        let entry = self.entries.get(index).ok_or_else(|| Error::EntryNotFound {
            path: format!("#{}", index),
        })?;
        let reader = self.inner.by_index(index)?;
        Ok((entry, reader))
    }

    /// Decodes the first entry with the given name into memory.
    pub fn read_to_vec(&mut self, name: &str) -> Result<Vec<u8>> {
        let index = self.index_of(name).ok_or_else(|| Error::EntryNotFound {
            path: name.to_string(),
        })?;
        let (entry, mut reader) = self.entry_reader(index)?;
        let mut data = Vec::with_capacity(capacity_hint(entry.size));
        reader.read_to_end(&mut data)?;
        Ok(data)
    }

    pub(crate) fn zip_mut(&mut self) -> &mut ZipArchive<R> {
        &mut self.inner
    }
}

/// Maps a failure to read the container structure.
///
/// Truncated input surfaces from the codec as an I/O error, which still
/// means the bytes are not a ZIP archive.
fn open_error(path: &Path, err: ZipError) -> Error {
    match err {
        ZipError::Io(io)
            if !matches!(
                io.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidInput
            ) =>
        {
            Error::Io(io)
        }
        other => Error::NotAnArchive {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

/// Initial buffer size for an entry whose header claims `size` bytes.
///
/// The header is untrusted, so the claim only seeds the buffer.
fn capacity_hint(size: u64) -> usize {
    usize::try_from(size.min(READ_BUFFER_SIZE as u64)).unwrap_or(0)
}
