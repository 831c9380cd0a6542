//! Pending entries and name mapping.
//!
//! An [`EntrySource`] is an entry that has not been written yet: literal
//! bytes ([`ByteSource`]), a file on disk ([`FileSource`]), a directory
//! marker ([`DirectorySource`]), or any of those under another name
//! ([`Renamed`]). Writers open a source exactly once and drop the returned
//! reader as soon as the entry is written.
//!
//! A [`NameMapper`] rewrites entry names while packing or unpacking.
//! Returning `None` from a mapper skips the entry.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// An entry waiting to be written into an archive.
pub trait EntrySource {
    /// The entry name to write (directories end with `/`).
    fn path(&self) -> &str;

    /// Whether this source is a directory marker.
    fn is_directory(&self) -> bool {
        false
    }

    /// Opens the content of this entry.
    ///
    /// Directory sources return an empty reader.
    fn open(&self) -> Result<Box<dyn Read + '_>>;
}

impl<S: EntrySource + ?Sized> EntrySource for Box<S> {
    fn path(&self) -> &str {
        (**self).path()
    }

    fn is_directory(&self) -> bool {
        (**self).is_directory()
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        (**self).open()
    }
}

/// An entry backed by an in-memory buffer.
#[derive(Debug, Clone)]
pub struct ByteSource {
    path: String,
    data: Vec<u8>,
}

impl ByteSource {
    /// Creates a source with the given entry name and content.
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    /// Returns the buffered content.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl EntrySource for ByteSource {
    fn path(&self) -> &str {
        &self.path
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }
}

/// An entry backed by a file on disk.
///
/// The file is opened only when the entry is written.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: String,
    file: PathBuf,
}

impl FileSource {
    /// Creates a source that stores `file` under the entry name `path`.
    pub fn new(path: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: file.into(),
        }
    }

    /// Creates a source named after the file's own name.
    pub fn from_file(file: impl Into<PathBuf>) -> Result<Self> {
        let file = file.into();
        let name = file_name_of(&file)?;
        Ok(Self { path: name, file })
    }

    /// Pairs files with entry names positionally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the slices differ in length.
    pub fn pair<P, S>(files: &[P], names: &[S]) -> Result<Vec<Self>>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        if files.len() != names.len() {
            return Err(Error::InvalidInput(format!(
                "{} files but {} names",
                files.len(),
                names.len()
            )));
        }
        Ok(files
            .iter()
            .zip(names)
            .map(|(file, name)| Self::new(name.as_ref(), file.as_ref()))
            .collect())
    }

    /// Returns the file on disk.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl EntrySource for FileSource {
    fn path(&self) -> &str {
        &self.path
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        let file = File::open(&self.file).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::SourceNotFound {
                path: self.file.clone(),
            },
            _ => Error::Io(e),
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A directory marker entry.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: String,
}

impl DirectorySource {
    /// Creates a directory entry; a trailing `/` is appended if missing.
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.ends_with('/') {
            path.push('/');
        }
        Self { path }
    }
}

impl EntrySource for DirectorySource {
    fn path(&self) -> &str {
        &self.path
    }

    fn is_directory(&self) -> bool {
        true
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(io::empty()))
    }
}

/// Another source written under a different name.
#[derive(Debug, Clone)]
pub struct Renamed<S> {
    inner: S,
    path: String,
}

impl<S: EntrySource> Renamed<S> {
    /// Wraps `inner` so it is written as `path`.
    pub fn new(inner: S, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if inner.is_directory() && !path.ends_with('/') {
            path.push('/');
        }
        Self { inner, path }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EntrySource> EntrySource for Renamed<S> {
    fn path(&self) -> &str {
        &self.path
    }

    fn is_directory(&self) -> bool {
        self.inner.is_directory()
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        self.inner.open()
    }
}

/// Maps entry names while packing or unpacking.
///
/// Any `Fn(&str) -> Option<String>` is a mapper.
pub trait NameMapper {
    /// Returns the new name, or `None` to skip the entry.
    fn map(&self, name: &str) -> Option<String>;
}

/// Mapper that keeps every name unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl NameMapper for IdentityMapper {
    fn map(&self, name: &str) -> Option<String> {
        Some(name.to_string())
    }
}

impl<F: Fn(&str) -> Option<String>> NameMapper for F {
    fn map(&self, name: &str) -> Option<String> {
        self(name)
    }
}

pub(crate) fn file_name_of(file: &Path) -> Result<String> {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidInput(format!("{} has no file name", file.display())))
}
