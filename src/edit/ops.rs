//! Single-call editing helpers.
//!
//! Every helper here builds a [`ChangeSet`] and hands it to [`rewrite`];
//! none has behavior of its own. The `*_in_place` variants use the source
//! path as the destination.

use std::path::Path;

use crate::Result;
use crate::codec::CompressionMethod;
use crate::source::{ByteSource, EntrySource};

use super::editor::{EditResult, rewrite};
use super::operation::{ChangeSet, DuplicatePolicy};

fn with_bytes(name: &str, data: Vec<u8>, method: Option<CompressionMethod>) -> ChangeSet {
    ChangeSet::new().push(Box::new(ByteSource::new(name, data)), method)
}

fn with_sources<I, S>(sources: I) -> ChangeSet
where
    I: IntoIterator<Item = S>,
    S: EntrySource + 'static,
{
    sources
        .into_iter()
        .fold(ChangeSet::new(), |changes, source| changes.add(source))
}

/// Copies `source` to `destination` with one new entry.
///
/// Fails with [`DuplicateEntry`](crate::Error::DuplicateEntry) if the name
/// already exists. `method` defaults to Deflated.
pub fn add_entry(
    source: impl AsRef<Path>,
    name: &str,
    data: impl Into<Vec<u8>>,
    destination: impl AsRef<Path>,
    method: Option<CompressionMethod>,
) -> Result<EditResult> {
    rewrite(
        source,
        with_bytes(name, data.into(), method),
        DuplicatePolicy::Add,
        destination,
    )
}

/// In-place variant of [`add_entry`].
pub fn add_entry_in_place(
    archive: impl AsRef<Path>,
    name: &str,
    data: impl Into<Vec<u8>>,
    method: Option<CompressionMethod>,
) -> Result<EditResult> {
    let archive = archive.as_ref();
    add_entry(archive, name, data, archive, method)
}

/// Copies `source` to `destination` with several new entries.
pub fn add_entries<I, S>(
    source: impl AsRef<Path>,
    entries: I,
    destination: impl AsRef<Path>,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: EntrySource + 'static,
{
    rewrite(source, with_sources(entries), DuplicatePolicy::Add, destination)
}

/// In-place variant of [`add_entries`].
pub fn add_entries_in_place<I, S>(archive: impl AsRef<Path>, entries: I) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: EntrySource + 'static,
{
    let archive = archive.as_ref();
    add_entries(archive, entries, archive)
}

/// Copies `source` to `destination`, overwriting one entry.
///
/// An absent entry is added instead. Without an explicit `method` the
/// replaced entry keeps its previous method.
pub fn replace_entry(
    source: impl AsRef<Path>,
    name: &str,
    data: impl Into<Vec<u8>>,
    destination: impl AsRef<Path>,
    method: Option<CompressionMethod>,
) -> Result<EditResult> {
    rewrite(
        source,
        with_bytes(name, data.into(), method),
        DuplicatePolicy::Replace,
        destination,
    )
}

/// In-place variant of [`replace_entry`].
pub fn replace_entry_in_place(
    archive: impl AsRef<Path>,
    name: &str,
    data: impl Into<Vec<u8>>,
    method: Option<CompressionMethod>,
) -> Result<EditResult> {
    let archive = archive.as_ref();
    replace_entry(archive, name, data, archive, method)
}

/// Copies `source` to `destination`, overwriting several entries.
pub fn replace_entries<I, S>(
    source: impl AsRef<Path>,
    entries: I,
    destination: impl AsRef<Path>,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: EntrySource + 'static,
{
    rewrite(
        source,
        with_sources(entries),
        DuplicatePolicy::Replace,
        destination,
    )
}

/// In-place variant of [`replace_entries`].
pub fn replace_entries_in_place<I, S>(archive: impl AsRef<Path>, entries: I) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: EntrySource + 'static,
{
    let archive = archive.as_ref();
    replace_entries(archive, entries, archive)
}

/// Copies `source` to `destination`, adding or overwriting entries.
pub fn add_or_replace_entries<I, S>(
    source: impl AsRef<Path>,
    entries: I,
    destination: impl AsRef<Path>,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: EntrySource + 'static,
{
    rewrite(
        source,
        with_sources(entries),
        DuplicatePolicy::AddOrReplace,
        destination,
    )
}

/// In-place variant of [`add_or_replace_entries`].
pub fn add_or_replace_entries_in_place<I, S>(
    archive: impl AsRef<Path>,
    entries: I,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: EntrySource + 'static,
{
    let archive = archive.as_ref();
    add_or_replace_entries(archive, entries, archive)
}

/// Copies `source` to `destination` without `name` and anything under it.
pub fn remove_entry(
    source: impl AsRef<Path>,
    name: &str,
    destination: impl AsRef<Path>,
) -> Result<EditResult> {
    rewrite(
        source,
        ChangeSet::new().remove(name),
        DuplicatePolicy::Add,
        destination,
    )
}

/// In-place variant of [`remove_entry`].
pub fn remove_entry_in_place(archive: impl AsRef<Path>, name: &str) -> Result<EditResult> {
    let archive = archive.as_ref();
    remove_entry(archive, name, archive)
}

/// Copies `source` to `destination` without any of `names` or anything
/// under them.
pub fn remove_entries<I, S>(
    source: impl AsRef<Path>,
    names: I,
    destination: impl AsRef<Path>,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    rewrite(
        source,
        ChangeSet::new().remove_all(names),
        DuplicatePolicy::Add,
        destination,
    )
}

/// In-place variant of [`remove_entries`].
pub fn remove_entries_in_place<I, S>(archive: impl AsRef<Path>, names: I) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let archive = archive.as_ref();
    remove_entries(archive, names, archive)
}
