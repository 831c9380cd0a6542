//! Error types for ZIP archive operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when reading, rewriting, packing or extracting archives,
//! along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Match on
//! specific variants for structural failures:
//!
//! ```rust,no_run
//! use zipedit::{Error, edit};
//!
//! fn add_readme(archive: &str) -> zipedit::Result<()> {
//!     match edit::add_entry_in_place(archive, "README.txt", b"hello".to_vec(), None) {
//!         Ok(_) => Ok(()),
//!         Err(Error::DuplicateEntry { path }) => {
//!             eprintln!("{} already exists, leaving archive untouched", path);
//!             Ok(())
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// The main error type for archive operations.
///
/// | Category | Variants |
/// |----------|----------|
/// | I/O | [`Io`][Self::Io], [`Zip`][Self::Zip], [`DestinationUnwritable`][Self::DestinationUnwritable] |
/// | Input | [`SourceNotFound`][Self::SourceNotFound], [`NotAnArchive`][Self::NotAnArchive], [`InvalidInput`][Self::InvalidInput], [`InvalidCompressionLevel`][Self::InvalidCompressionLevel] |
/// | Rewrite | [`DuplicateEntry`][Self::DuplicateEntry], [`EntryNotFound`][Self::EntryNotFound] |
/// | Structure | [`AmbiguousRoot`][Self::AmbiguousRoot], [`EmptyArchive`][Self::EmptyArchive] |
/// | Paths | [`InvalidArchivePath`][Self::InvalidArchivePath], [`PathTraversal`][Self::PathTraversal] |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or writing bytes.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The ZIP codec reported a failure after the archive was opened.
    ///
    /// Failures while *opening* an archive are reported as
    /// [`NotAnArchive`][Self::NotAnArchive] instead.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The file exists but is not a readable ZIP container.
    #[error("Not a ZIP archive: {}: {reason}", path.display())]
    NotAnArchive {
        /// The file that was opened.
        path: PathBuf,
        /// What the codec reported.
        reason: String,
    },

    /// An input file or directory does not exist.
    #[error("Source not found: {}", path.display())]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A strict add collided with an entry already present in the archive.
    ///
    /// No destination is written when this is returned.
    #[error("Entry already exists: {path}")]
    DuplicateEntry {
        /// The colliding entry path.
        path: String,
    },

    /// A named entry is not present in the archive.
    #[error("Entry not found: {path}")]
    EntryNotFound {
        /// The requested entry path.
        path: String,
    },

    /// The archive has more than one top-level path segment.
    #[error("Archive has more than one root: '{first}' and '{second}'")]
    AmbiguousRoot {
        /// The first root segment seen.
        first: String,
        /// The first conflicting root segment.
        second: String,
    },

    /// The archive has no entries.
    #[error("Archive has no entries")]
    EmptyArchive,

    /// Preconditions of the operation were not met.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A deflate level outside `0..=9` was requested.
    #[error("Invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u32,
    },

    /// An entry path is invalid.
    ///
    /// Entry paths must not be empty, must not contain NUL bytes, must not be
    /// absolute and must not contain empty, `.` or `..` segments.
    #[error("Invalid archive path: {0}")]
    InvalidArchivePath(String),

    /// An entry would be extracted outside of the destination directory.
    #[error("Path traversal detected in entry: {path}")]
    PathTraversal {
        /// The offending entry path.
        path: String,
    },

    /// The destination could not be created or replaced.
    #[error("Cannot write destination {}: {source}", path.display())]
    DestinationUnwritable {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// A specialized Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if this error comes from the underlying byte I/O or codec
    /// rather than from the structure of the request.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::Zip(_) | Error::DestinationUnwritable { .. }
        )
    }
}
