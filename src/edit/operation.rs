//! Change-sets applied by the archive editor.

use std::fmt;

use crate::codec::CompressionMethod;
use crate::source::{ByteSource, DirectorySource, EntrySource};

/// How additions interact with entries that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Never overwrite: a target that already exists is
    /// [`Error::DuplicateEntry`](crate::Error::DuplicateEntry).
    #[default]
    Add,
    /// Overwrite existing entries; absent targets are simply added.
    Replace,
    /// Overwrite or add, whichever applies.
    AddOrReplace,
}

impl DuplicatePolicy {
    /// Returns the policy name as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::AddOrReplace => "add-or-replace",
        }
    }

    pub(crate) fn overwrites(self) -> bool {
        !matches!(self, Self::Add)
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending entry together with its method override.
pub struct Addition {
    source: Box<dyn EntrySource>,
    method: Option<CompressionMethod>,
}

impl Addition {
    /// Returns the target entry name.
    pub fn path(&self) -> &str {
        self.source.path()
    }

    /// Returns the method override, if any.
    pub fn method(&self) -> Option<CompressionMethod> {
        self.method
    }

    /// Returns the pending source.
    pub fn source(&self) -> &dyn EntrySource {
        self.source.as_ref()
    }
}

impl fmt::Debug for Addition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Addition")
            .field("path", &self.path())
            .field("is_directory", &self.source.is_directory())
            .field("method", &self.method)
            .finish()
    }
}

/// Removals and additions to apply to one archive.
///
/// A removal key drops the entry with that exact name and everything under
/// it, compared segment by segment: removing `a/b` drops `a/b`, `a/b/` and
/// `a/b/c.txt` but keeps `a/bc.txt`. Additions are written in the order they
/// were queued.
///
/// # Example
///
/// ```rust
/// use zipedit::CompressionMethod;
/// use zipedit::edit::ChangeSet;
/// use zipedit::source::FileSource;
///
/// let changes = ChangeSet::new()
///     .remove("docs/old")
///     .add_bytes("docs/new.txt", b"fresh".to_vec())
///     .add_with_method(
///         FileSource::new("bin/tool", "target/release/tool"),
///         CompressionMethod::Stored,
///     );
/// assert_eq!(changes.removals().len(), 1);
/// assert_eq!(changes.additions().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ChangeSet {
    removals: Vec<String>,
    additions: Vec<Addition>,
}

impl ChangeSet {
    /// Creates an empty change-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues removal of `prefix` and everything under it.
    pub fn remove(mut self, prefix: impl Into<String>) -> Self {
        self.removals.push(prefix.into());
        self
    }

    /// Queues removal of several prefixes.
    pub fn remove_all<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.removals.extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Queues a pending entry, encoded with the default method.
    pub fn add(self, source: impl EntrySource + 'static) -> Self {
        self.push(Box::new(source), None)
    }

    /// Queues a pending entry with an explicit compression method.
    pub fn add_with_method(
        self,
        source: impl EntrySource + 'static,
        method: CompressionMethod,
    ) -> Self {
        self.push(Box::new(source), Some(method))
    }

    /// Queues an in-memory entry.
    pub fn add_bytes(self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.add(ByteSource::new(path, data))
    }

    /// Queues a directory marker entry.
    pub fn add_directory(self, path: impl Into<String>) -> Self {
        self.add(DirectorySource::new(path))
    }

    /// Queues a boxed source with an optional method override.
    pub fn push(mut self, source: Box<dyn EntrySource>, method: Option<CompressionMethod>) -> Self {
        self.additions.push(Addition { source, method });
        self
    }

    /// Returns the queued removal keys.
    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    /// Returns the queued additions.
    pub fn additions(&self) -> &[Addition] {
        &self.additions
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Addition>) {
        (self.removals, self.additions)
    }
}
