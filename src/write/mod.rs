//! Archive writing API.
//!
//! [`Writer`] appends entries one at a time. Encoded entries stream their
//! input through the codec; [`Writer::copy_raw`] copies an entry from an
//! existing archive without decoding it, keeping its compressed bytes,
//! method, sizes and CRC bit-identical.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipedit::{ArchivePath, CompressionMethod, Writer};
//!
//! let mut writer = Writer::create_path("new.zip")?;
//! writer.add_bytes(&ArchivePath::new("hello.txt")?, b"Hello, World!", None)?;
//! writer.add_directory(&ArchivePath::directory("empty")?)?;
//! writer.add_bytes(
//!     &ArchivePath::new("raw.bin")?,
//!     &[0u8; 16],
//!     Some(CompressionMethod::Stored),
//! )?;
//! let result = writer.finish()?;
//! assert_eq!(result.entries_written, 3);
//! # Ok::<(), zipedit::Error>(())
//! ```

mod options;
mod staging;

pub use options::WriteOptions;
pub use staging::StagedFile;
pub(crate) use staging::staging_dir;

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, Write};
use std::path::Path;

use zip::ZipWriter;

use crate::archive_path::trim_directory_marker;
use crate::codec::CompressionMethod;
use crate::read::Archive;
use crate::source::EntrySource;
use crate::{ArchivePath, Error, Result};

/// Statistics of a finished archive.
#[must_use = "write result should be checked to verify the archive was written as expected"]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Total number of entries written.
    pub entries_written: usize,
    /// Entries that were copied without decoding.
    pub entries_copied: usize,
    /// Uncompressed bytes fed through the encoder.
    pub bytes_encoded: u64,
}

/// A streaming ZIP writer.
pub struct Writer<W: Write + Seek> {
    inner: ZipWriter<W>,
    options: WriteOptions,
    names: HashSet<String>,
    result: WriteResult,
}

impl Writer<BufWriter<File>> {
    /// Creates a writer that writes directly to a new file.
    ///
    /// Prefer the staged helpers of the higher-level modules when the
    /// destination may already exist.
    pub fn create_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::DestinationUnwritable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::create(BufWriter::new(file)))
    }
}

impl<W: Write + Seek> Writer<W> {
    /// Creates a writer on top of `output`.
    pub fn create(output: W) -> Self {
        Self {
            inner: ZipWriter::new(output),
            options: WriteOptions::default(),
            names: HashSet::new(),
            result: WriteResult::default(),
        }
    }

    /// Sets the write options.
    pub fn options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns true if an entry with this name was already written.
    ///
    /// A directory marker and a file with the same name collide.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(trim_directory_marker(name))
    }

    fn claim(&mut self, name: &str) -> Result<()> {
        if !self.names.insert(trim_directory_marker(name).to_string()) {
            return Err(Error::DuplicateEntry {
                path: name.to_string(),
            });
        }
        Ok(())
    }

    /// Encodes the content of `reader` as a new file entry.
    ///
    /// `method` overrides the writer's default method.
    pub fn add_reader(
        &mut self,
        path: &ArchivePath,
        reader: &mut dyn Read,
        method: Option<CompressionMethod>,
    ) -> Result<u64> {
        if path.is_directory() {
            return Err(Error::InvalidInput(format!(
                "'{}' names a directory, not a file",
                path
            )));
        }
        self.encode(path.as_str(), reader, method)
    }

    /// Writes a file entry under a name that is stored as given.
    fn encode(
        &mut self,
        name: &str,
        reader: &mut dyn Read,
        method: Option<CompressionMethod>,
    ) -> Result<u64> {
        let method = method.unwrap_or(self.options.method);
        let file_options = self.options.file_options(method)?;
        self.claim(name)?;

        self.inner.start_file(name, file_options)?;
        let written = io::copy(reader, &mut self.inner)?;
        log::trace!("encoded '{}' ({} bytes, {})", name, written, method);

        self.result.entries_written += 1;
        self.result.bytes_encoded += written;
        Ok(written)
    }

    /// Encodes an in-memory buffer as a new file entry.
    pub fn add_bytes(
        &mut self,
        path: &ArchivePath,
        data: &[u8],
        method: Option<CompressionMethod>,
    ) -> Result<u64> {
        let mut reader = data;
        self.add_reader(path, &mut reader, method)
    }

    /// Adds a directory marker entry.
    pub fn add_directory(&mut self, path: &ArchivePath) -> Result<()> {
        let dir = if path.is_directory() {
            path.clone()
        } else {
            ArchivePath::directory(path.as_str())?
        };
        self.directory(dir.as_str())
    }

    fn directory(&mut self, name: &str) -> Result<()> {
        let file_options = self.options.file_options(CompressionMethod::Stored)?;
        self.claim(name)?;

        self.inner.add_directory(name, file_options)?;
        log::trace!("added directory '{}'", name);

        self.result.entries_written += 1;
        Ok(())
    }

    /// Writes a pending entry under `path`.
    ///
    /// The source's reader is dropped before this returns, on success and on
    /// failure alike.
    pub fn add_source(
        &mut self,
        path: &ArchivePath,
        source: &dyn EntrySource,
        method: Option<CompressionMethod>,
    ) -> Result<()> {
        if source.is_directory() {
            return self.add_directory(path);
        }
        let mut reader = source.open()?;
        self.add_reader(path, &mut reader, method)?;
        Ok(())
    }

    /// Copies the entry at `index` from `archive` without decoding it.
    pub fn copy_raw<R: Read + Seek>(&mut self, archive: &mut Archive<R>, index: usize) -> Result<()> {
        let name = archive
            .entries()
            .get(index)
            .map(|entry| entry.path.clone())
            .ok_or_else(|| Error::EntryNotFound {
                path: format!("#{}", index),
            })?;
        self.claim(&name)?;

        let file = archive.zip_mut().by_index_raw(index)?;
        self.inner.raw_copy_file(file)?;
        log::trace!("copied '{}' verbatim", name);

        self.result.entries_written += 1;
        self.result.entries_copied += 1;
        Ok(())
    }

    /// Decodes the entry at `index` from `archive` and encodes it again with
    /// the writer's default method.
    ///
    /// The stored name is kept as is, like [`copy_raw`](Self::copy_raw)
    /// does, so names that [`ArchivePath`] would reject still round-trip.
    pub fn reencode<R: Read + Seek>(&mut self, archive: &mut Archive<R>, index: usize) -> Result<u64> {
        let entry = archive.entries().get(index).ok_or_else(|| Error::EntryNotFound {
            path: format!("#{}", index),
        })?;
        if entry.is_directory {
            let name = entry.path.clone();
            self.directory(&name)?;
            return Ok(0);
        }

        let (entry, mut reader) = archive.entry_reader(index)?;
        let name = entry.path.clone();
        self.encode(&name, &mut reader, None)
    }

    /// Writes the central directory and flushes the output.
    pub fn finish(self) -> Result<WriteResult> {
        let (result, _) = self.finish_into_inner()?;
        Ok(result)
    }

    /// Like [`finish`](Self::finish) but also returns the output.
    pub fn finish_into_inner(self) -> Result<(WriteResult, W)> {
        let mut output = self.inner.finish()?;
        output.flush()?;
        Ok((self.result, output))
    }
}
