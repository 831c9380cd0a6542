//! Archive path type with validation for secure path handling.
//!
//! ZIP entry names use `/` as separator and mark directories with a trailing
//! `/`. Every comparison in this module is segment-wise, so `a/b` is a prefix
//! of `a/b/c.txt` but not of `a/bc.txt`.

use crate::{Error, Result};
use std::fmt;

/// Maximum length for archive paths (in bytes).
///
/// The ZIP format stores name lengths in 16 bits.
const MAX_PATH_LENGTH: usize = u16::MAX as usize;

/// A validated archive entry path.
///
/// `ArchivePath` validates that:
/// - No NUL bytes are present
/// - The path is not absolute (does not start with `/`)
/// - No empty segments exist (no `//`), apart from one trailing `/`
/// - No `.` or `..` segments are present (prevents path traversal)
///
/// A single trailing `/` is kept and marks a directory entry.
///
/// # Examples
///
/// ```
/// use zipedit::ArchivePath;
///
/// let path = ArchivePath::new("dir/file.txt").unwrap();
/// assert_eq!(path.as_str(), "dir/file.txt");
///
/// let dir = ArchivePath::new("dir/").unwrap();
/// assert!(dir.is_directory());
///
/// assert!(ArchivePath::new("../secret").is_err());
/// assert!(ArchivePath::new("/absolute/path").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Creates a new `ArchivePath` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchivePath`] if the path is empty, contains
    /// NUL bytes, is absolute, or contains empty, `.` or `..` segments.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Creates a directory path, appending the trailing `/` if missing.
    pub fn directory(s: &str) -> Result<Self> {
        if s.ends_with('/') {
            Self::new(s)
        } else {
            Self::new(&format!("{}/", s))
        }
    }

    fn validate(s: &str) -> Result<()> {
        if s.contains('\0') {
            return Err(Error::InvalidArchivePath("contains NUL byte".into()));
        }

        if s.is_empty() || s == "/" {
            return Err(Error::InvalidArchivePath("empty path".into()));
        }

        if s.len() > MAX_PATH_LENGTH {
            return Err(Error::InvalidArchivePath(format!(
                "path exceeds maximum length of {} bytes",
                MAX_PATH_LENGTH
            )));
        }

        if s.starts_with('/') || s.starts_with('\\') || has_drive_prefix(s) {
            return Err(Error::InvalidArchivePath(
                "absolute path not allowed".into(),
            ));
        }

        for segment in trim_directory_marker(s).split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidArchivePath(
                    "empty segment (consecutive slashes)".into(),
                ));
            }
            if segment == "." {
                return Err(Error::InvalidArchivePath("'.' segment not allowed".into()));
            }
            if segment == ".." {
                return Err(Error::InvalidArchivePath(
                    "'..' segment not allowed (path traversal)".into(),
                ));
            }
        }

        Ok(())
    }

    /// Returns the path as a string slice, including any trailing `/`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this path names a directory entry.
    pub fn is_directory(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Returns the path without the directory marker.
    pub fn trimmed(&self) -> &str {
        trim_directory_marker(&self.0)
    }

    /// Returns the file name (last segment) of this path.
    pub fn file_name(&self) -> &str {
        let trimmed = self.trimmed();
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// Returns the first segment of this path.
    pub fn root_segment(&self) -> &str {
        root_segment(&self.0)
    }

    /// Returns an iterator over the path components (segments).
    ///
    /// # Examples
    ///
    /// ```
    /// use zipedit::ArchivePath;
    ///
    /// let path = ArchivePath::new("a/b/c/").unwrap();
    /// let components: Vec<_> = path.components().collect();
    /// assert_eq!(components, vec!["a", "b", "c"]);
    /// ```
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.trimmed().split('/')
    }

    /// Returns true if this path equals `prefix` or lies under it.
    ///
    /// This performs a component-wise comparison, not a string prefix match.
    ///
    /// ```
    /// use zipedit::ArchivePath;
    ///
    /// let path = ArchivePath::new("dir/subdir/file.txt").unwrap();
    /// assert!(path.starts_with("dir"));
    /// assert!(path.starts_with("dir/subdir/"));
    /// assert!(!path.starts_with("di"));
    /// ```
    pub fn starts_with(&self, prefix: &str) -> bool {
        is_same_or_under(&self.0, prefix)
    }
}

/// Strips one trailing `/` from an entry name.
pub fn trim_directory_marker(name: &str) -> &str {
    name.strip_suffix('/').unwrap_or(name)
}

/// Returns the first `/`-delimited segment of an entry name.
///
/// ```
/// assert_eq!(zipedit::archive_path::root_segment("root/b/c.txt"), "root");
/// assert_eq!(zipedit::archive_path::root_segment("root/"), "root");
/// assert_eq!(zipedit::archive_path::root_segment("file.txt"), "file.txt");
/// ```
pub fn root_segment(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

/// Strips the first segment from an entry name.
///
/// Returns `None` when nothing remains, i.e. the entry is the root itself.
pub fn strip_root_segment(name: &str) -> Option<&str> {
    let (_, rest) = name.split_once('/')?;
    if rest.is_empty() { None } else { Some(rest) }
}

/// Returns true if `name` equals `prefix` or lies strictly under it.
///
/// Trailing directory markers on either side are ignored. An empty prefix
/// matches nothing.
pub fn is_same_or_under(name: &str, prefix: &str) -> bool {
    let name = trim_directory_marker(name);
    let prefix = trim_directory_marker(prefix);
    if prefix.is_empty() {
        return false;
    }

    let mut name_segments = name.split('/');
    prefix
        .split('/')
        .all(|segment| name_segments.next() == Some(segment))
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ArchivePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ArchivePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}
