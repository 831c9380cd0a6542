//! Lookups that only need the central directory.

use std::path::Path;

use crate::Result;
use crate::codec::CompressionMethod;
use crate::read::Archive;

/// Returns true if the archive at `path` contains entry `name`.
///
/// A bare directory name also matches its `name/` entry.
pub fn contains_entry(path: impl AsRef<Path>, name: &str) -> Result<bool> {
    let archive = Archive::open_path(path)?;
    Ok(archive.contains(name))
}

/// Returns true if the archive at `path` contains any of `names`.
pub fn contains_any_entry<I, S>(path: impl AsRef<Path>, names: I) -> Result<bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let archive = Archive::open_path(path)?;
    Ok(names.into_iter().any(|name| archive.contains(name.as_ref())))
}

/// Returns the compression method of entry `name`, or `None` if absent.
pub fn compression_method_of_entry(
    path: impl AsRef<Path>,
    name: &str,
) -> Result<Option<CompressionMethod>> {
    let archive = Archive::open_path(path)?;
    Ok(archive.entry(name).map(|entry| entry.method))
}

/// Returns every entry name in on-disk order.
pub fn entry_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let archive = Archive::open_path(path)?;
    Ok(archive
        .entries()
        .iter()
        .map(|entry| entry.path.clone())
        .collect())
}
