//! Callback-driven iteration over archive entries.
//!
//! Handlers run synchronously on the calling thread, once per matched entry,
//! in on-disk order. A handler returns [`Flow::Continue`] to keep going or
//! [`Flow::Break`] to stop early; stopping early is not an error and the
//! call still succeeds. Side effects made by the handler before the break
//! stand. Any `Err` returned by a handler aborts the scan and is passed
//! through to the caller unchanged.
//!
//! Directory entries are visited with an empty reader.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::io::Read;
//! use zipedit::iterate::{self, Flow};
//!
//! // Print the first entry that mentions "TODO" and stop.
//! iterate::iterate("project.zip", |entry, reader| {
//!     let mut text = String::new();
//!     reader.read_to_string(&mut text)?;
//!     if text.contains("TODO") {
//!         println!("{}", entry.path);
//!         return Ok(Flow::Break);
//!     }
//!     Ok(Flow::Continue)
//! })?;
//! # Ok::<(), zipedit::Error>(())
//! ```

use std::io::{Read, Seek};
use std::path::Path;

use crate::Result;
use crate::read::{Archive, Entry, EntrySelector, SelectAll, SelectByName};
use crate::safety::write_entry;

/// What the iteration should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Visit the next matching entry.
    #[default]
    Continue,
    /// Stop visiting entries; the call still succeeds.
    Break,
}

/// Visits every entry of the archive at `path`.
///
/// Returns `true` if at least one entry was visited.
pub fn iterate<F>(path: impl AsRef<Path>, handler: F) -> Result<bool>
where
    F: FnMut(&Entry, &mut dyn Read) -> Result<Flow>,
{
    let mut archive = Archive::open_path(path)?;
    iterate_archive(&mut archive, SelectAll, handler)
}

/// Visits only the entries whose path is one of `names`, in archive order.
///
/// Names with no matching entry are skipped silently.
pub fn iterate_names<F, I, S>(path: impl AsRef<Path>, names: I, handler: F) -> Result<bool>
where
    F: FnMut(&Entry, &mut dyn Read) -> Result<Flow>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut archive = Archive::open_path(path)?;
    iterate_archive(&mut archive, SelectByName::new(names), handler)
}

/// Visits the first entry named `name`.
///
/// Returns whether such an entry was found.
pub fn handle<F>(path: impl AsRef<Path>, name: &str, handler: F) -> Result<bool>
where
    F: FnOnce(&Entry, &mut dyn Read) -> Result<()>,
{
    let mut archive = Archive::open_path(path)?;
    handle_archive(&mut archive, name, handler)
}

/// Visits entries of an open archive that match `selector`.
pub fn iterate_archive<R, S, F>(archive: &mut Archive<R>, selector: S, mut handler: F) -> Result<bool>
where
    R: Read + Seek,
    S: EntrySelector,
    F: FnMut(&Entry, &mut dyn Read) -> Result<Flow>,
{
    let mut visited = false;
    for index in 0..archive.len() {
        if !selector.select(&archive.entries()[index]) {
            continue;
        }
        visited = true;

        let (entry, mut reader) = archive.entry_reader(index)?;
        if handler(entry, &mut reader)? == Flow::Break {
            log::debug!("iteration stopped by handler at '{}'", entry.path);
            break;
        }
    }
    Ok(visited)
}

/// Visits the first entry of an open archive named `name`.
pub fn handle_archive<R, F>(archive: &mut Archive<R>, name: &str, handler: F) -> Result<bool>
where
    R: Read + Seek,
    F: FnOnce(&Entry, &mut dyn Read) -> Result<()>,
{
    let Some(index) = archive.index_of(name) else {
        return Ok(false);
    };
    let (entry, mut reader) = archive.entry_reader(index)?;
    handler(entry, &mut reader)?;
    Ok(true)
}

/// Visits the metadata of every entry without decoding any content.
pub fn iterate_info<F>(path: impl AsRef<Path>, handler: F) -> Result<bool>
where
    F: FnMut(&Entry) -> Result<Flow>,
{
    let archive = Archive::open_path(path)?;
    iterate_info_archive(&archive, SelectAll, handler)
}

/// Metadata-only variant of [`iterate_names`].
pub fn iterate_info_names<F, I, S>(path: impl AsRef<Path>, names: I, handler: F) -> Result<bool>
where
    F: FnMut(&Entry) -> Result<Flow>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let archive = Archive::open_path(path)?;
    iterate_info_archive(&archive, SelectByName::new(names), handler)
}

/// Metadata-only iteration over an open archive.
pub fn iterate_info_archive<R, S, F>(archive: &Archive<R>, selector: S, mut handler: F) -> Result<bool>
where
    R: Read + Seek,
    S: EntrySelector,
    F: FnMut(&Entry) -> Result<Flow>,
{
    let mut visited = false;
    for entry in archive.entries().iter().filter(|e| selector.select(e)) {
        visited = true;
        if handler(entry)? == Flow::Break {
            log::debug!("info iteration stopped by handler at '{}'", entry.path);
            break;
        }
    }
    Ok(visited)
}

/// Visits every entry of a forward-only ZIP stream.
///
/// The stream is buffered with [`Archive::from_stream`] before the first
/// handler runs, so entries are visited in central-directory order and
/// entries followed by data descriptors decode normally.
pub fn iterate_stream<R, F>(reader: R, handler: F) -> Result<bool>
where
    R: Read,
    F: FnMut(&Entry, &mut dyn Read) -> Result<Flow>,
{
    let mut archive = Archive::from_stream(reader)?;
    iterate_archive(&mut archive, SelectAll, handler)
}

/// Name-filtered variant of [`iterate_stream`].
pub fn iterate_stream_names<R, F, I, S>(reader: R, names: I, handler: F) -> Result<bool>
where
    R: Read,
    F: FnMut(&Entry, &mut dyn Read) -> Result<Flow>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut archive = Archive::from_stream(reader)?;
    iterate_archive(&mut archive, SelectByName::new(names), handler)
}

/// Visits the first entry named `name` in a forward-only ZIP stream.
pub fn handle_stream<R, F>(reader: R, name: &str, handler: F) -> Result<bool>
where
    R: Read,
    F: FnOnce(&Entry, &mut dyn Read) -> Result<()>,
{
    let mut archive = Archive::from_stream(reader)?;
    handle_archive(&mut archive, name, handler)
}

/// Decodes the first entry named `name` into memory.
///
/// Returns `None` if there is no such entry.
pub fn unpack_entry(path: impl AsRef<Path>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut data = None;
    handle(path, name, |_, reader| {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        data = Some(buf);
        Ok(())
    })?;
    Ok(data)
}

/// Stream variant of [`unpack_entry`].
pub fn unpack_entry_from_stream(reader: impl Read, name: &str) -> Result<Option<Vec<u8>>> {
    let mut data = None;
    handle_stream(reader, name, |_, reader| {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        data = Some(buf);
        Ok(())
    })?;
    Ok(data)
}

/// Writes the first entry named `name` to `target`.
///
/// A directory entry creates a directory at `target`, replacing a plain
/// file already there. Returns whether the entry was found.
pub fn unpack_entry_to(
    path: impl AsRef<Path>,
    name: &str,
    target: impl AsRef<Path>,
) -> Result<bool> {
    let target = target.as_ref();
    handle(path, name, |entry, reader| {
        write_entry(target, entry.is_directory, reader).map(drop)
    })
}

/// Stream variant of [`unpack_entry_to`].
pub fn unpack_entry_from_stream_to(
    reader: impl Read,
    name: &str,
    target: impl AsRef<Path>,
) -> Result<bool> {
    let target = target.as_ref();
    handle_stream(reader, name, |entry, reader| {
        write_entry(target, entry.is_directory, reader).map(drop)
    })
}
