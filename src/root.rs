//! Single-root detection.
//!
//! An archive "has a root" when every entry path starts with the same first
//! segment, as in `project/`, `project/src/main.rs`, `project/README`.

use std::io::{Read, Seek};
use std::path::Path;

use crate::archive_path::root_segment;
use crate::read::Archive;
use crate::{Error, Result};

/// The top-level structure of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootDescriptor {
    /// The archive has no entries.
    Empty,
    /// Every entry lives under this segment.
    Single(String),
    /// Entries live under at least two different segments.
    Ambiguous {
        /// The first segment seen.
        first: String,
        /// The first segment that differed from it.
        second: String,
    },
}

impl RootDescriptor {
    /// Scans entry names in order and stops at the first disagreement.
    ///
    /// ```rust
    /// use zipedit::root::RootDescriptor;
    ///
    /// assert_eq!(
    ///     RootDescriptor::from_names(["app/", "app/bin/run", "app/lib.so"]),
    ///     RootDescriptor::Single("app".into())
    /// );
    /// assert!(matches!(
    ///     RootDescriptor::from_names(["app/x", "other/y"]),
    ///     RootDescriptor::Ambiguous { .. }
    /// ));
    /// ```
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut root: Option<&str> = None;
        for name in names {
            let segment = root_segment(name);
            match root {
                None => root = Some(segment),
                Some(first) if first != segment => {
                    return Self::Ambiguous {
                        first: first.to_string(),
                        second: segment.to_string(),
                    };
                }
                Some(_) => {}
            }
        }
        match root {
            Some(segment) => Self::Single(segment.to_string()),
            None => Self::Empty,
        }
    }

    /// Returns the single root segment, or the matching error.
    pub fn into_root(self) -> Result<String> {
        match self {
            Self::Single(root) => Ok(root),
            Self::Empty => Err(Error::EmptyArchive),
            Self::Ambiguous { first, second } => Err(Error::AmbiguousRoot { first, second }),
        }
    }

    /// Returns true if there is exactly one root.
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }
}

/// Scans every entry of an open archive.
pub fn detect_root<R: Read + Seek>(archive: &Archive<R>) -> RootDescriptor {
    RootDescriptor::from_names(archive.entries().iter().map(|entry| entry.path.as_str()))
}

/// Opens the archive at `path` and scans it.
pub fn root_of(path: impl AsRef<Path>) -> Result<RootDescriptor> {
    let archive = Archive::open_path(path)?;
    Ok(detect_root(&archive))
}
