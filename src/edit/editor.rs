//! Archive editor for rewriting existing archives.

use std::collections::{HashMap, HashSet};
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

use crate::archive_path::{is_same_or_under, trim_directory_marker};
use crate::codec::CompressionMethod;
use crate::read::Archive;
use crate::write::{StagedFile, WriteOptions, Writer};
use crate::{ArchivePath, Error, Result};

use super::operation::{Addition, ChangeSet, DuplicatePolicy};

/// Result of an edit operation.
#[must_use = "edit result should be checked to verify operation completed as expected"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    /// Number of entries copied without decoding.
    pub entries_kept: usize,
    /// Number of source entries dropped by a removal.
    pub entries_removed: usize,
    /// Number of source entries overwritten by an addition.
    pub entries_replaced: usize,
    /// Number of brand-new entries.
    pub entries_added: usize,
    /// Uncompressed bytes encoded for replaced and added entries.
    pub bytes_encoded: u64,
}

impl EditResult {
    /// Returns the total number of entries in the resulting archive.
    pub fn total_entries(&self) -> usize {
        self.entries_kept + self.entries_replaced + self.entries_added
    }

    /// Returns true if the output differs from the source.
    pub fn is_modified(&self) -> bool {
        self.entries_removed + self.entries_replaced + self.entries_added > 0
    }
}

/// What happens to one output slot.
enum Slot {
    Copy(usize),
    Replace {
        index: usize,
        addition: usize,
    },
}

/// The resolved layout of the output archive.
struct Plan {
    slots: Vec<Slot>,
    appended: Vec<usize>,
    removed: usize,
}

/// An editor that applies one [`ChangeSet`] to an archive.
///
/// Entries that are neither removed nor overwritten are copied without
/// decoding, so their compressed bytes, method, sizes and CRC come out
/// bit-identical. An addition that overwrites an entry takes that entry's
/// position; other additions are appended in the order they were queued.
///
/// # Example
///
/// ```rust,no_run
/// use std::fs::File;
/// use zipedit::read::Archive;
/// use zipedit::edit::{ArchiveEditor, ChangeSet, DuplicatePolicy};
///
/// let archive = Archive::open_path("original.zip")?;
/// let changes = ChangeSet::new()
///     .remove("cache")
///     .add_bytes("VERSION", b"2.0".to_vec());
///
/// let output = File::create("modified.zip")?;
/// let result = ArchiveEditor::new(archive, changes)
///     .policy(DuplicatePolicy::AddOrReplace)
///     .apply(output)?;
/// println!("kept {}, removed {}", result.entries_kept, result.entries_removed);
/// # Ok::<(), zipedit::Error>(())
/// ```
pub struct ArchiveEditor<R: Read + Seek> {
    archive: Archive<R>,
    changes: ChangeSet,
    policy: DuplicatePolicy,
    options: WriteOptions,
}

impl<R: Read + Seek> ArchiveEditor<R> {
    /// Creates an editor for the given archive and change-set.
    pub fn new(archive: Archive<R>, changes: ChangeSet) -> Self {
        Self {
            archive,
            changes,
            policy: DuplicatePolicy::default(),
            options: WriteOptions::default(),
        }
    }

    /// Sets the duplicate policy.
    pub fn policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the write options used for additions.
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the archive being edited.
    pub fn archive(&self) -> &Archive<R> {
        &self.archive
    }

    /// Resolves the change-set and writes the new archive to `output`.
    ///
    /// Every check runs before the first byte is written, so a
    /// [`DuplicateEntry`](Error::DuplicateEntry) or invalid target path
    /// leaves `output` untouched.
    pub fn apply<W: Write + Seek>(self, output: W) -> Result<EditResult> {
        let Self {
            mut archive,
            changes,
            policy,
            options,
        } = self;

        let (removals, additions) = changes.into_parts();
        let targets = resolve_targets(&additions, policy)?;
        let plan = plan(&archive, &removals, &targets, policy)?;

        let mut writer = Writer::create(output).options(options);
        let mut result = EditResult {
            entries_removed: plan.removed,
            ..Default::default()
        };

        for slot in &plan.slots {
            match *slot {
                Slot::Copy(index) => {
                    writer.copy_raw(&mut archive, index)?;
                    result.entries_kept += 1;
                }
                Slot::Replace { index, addition } => {
                    let previous = archive.entries()[index].method;
                    let (path, pending) = &targets[addition];
                    let method = pending.method().or(Some(inherited_method(previous)));
                    log::trace!("replacing '{}' ({})", path, policy);
                    writer.add_source(path, pending.source(), method)?;
                    result.entries_replaced += 1;
                }
            }
        }

        for &addition in &plan.appended {
            let (path, pending) = &targets[addition];
            log::trace!("adding '{}'", path);
            writer.add_source(path, pending.source(), pending.method())?;
            result.entries_added += 1;
        }

        let written = writer.finish()?;
        result.bytes_encoded = written.bytes_encoded;
        log::debug!(
            "edit finished: {} kept, {} removed, {} replaced, {} added",
            result.entries_kept,
            result.entries_removed,
            result.entries_replaced,
            result.entries_added
        );
        Ok(result)
    }
}

/// Method for an addition that overwrites an entry without an override.
fn inherited_method(previous: CompressionMethod) -> CompressionMethod {
    if previous.is_writable() {
        previous
    } else {
        CompressionMethod::DEFAULT
    }
}

/// Validates addition targets and collapses repeated targets.
///
/// Under [`DuplicatePolicy::Add`] a repeated target is an error; otherwise
/// the later addition takes the earlier one's place.
fn resolve_targets(
    additions: &[Addition],
    policy: DuplicatePolicy,
) -> Result<Vec<(ArchivePath, &Addition)>> {
    let mut targets: Vec<(ArchivePath, &Addition)> = Vec::with_capacity(additions.len());
    let mut by_key: HashMap<String, usize> = HashMap::with_capacity(additions.len());

    for addition in additions {
        let path = if addition.source().is_directory() {
            ArchivePath::directory(addition.path())?
        } else {
            ArchivePath::new(addition.path())?
        };
        let key = path.trimmed().to_string();

        match by_key.get(&key) {
            Some(&slot) if policy.overwrites() => {
                log::debug!("addition '{}' supersedes an earlier one", path);
                targets[slot] = (path, addition);
            }
            Some(_) => {
                return Err(Error::DuplicateEntry {
                    path: path.as_str().to_string(),
                });
            }
            None => {
                by_key.insert(key, targets.len());
                targets.push((path, addition));
            }
        }
    }
    Ok(targets)
}

fn plan<R: Read + Seek>(
    archive: &Archive<R>,
    removals: &[String],
    targets: &[(ArchivePath, &Addition)],
    policy: DuplicatePolicy,
) -> Result<Plan> {
    let mut pending: HashMap<&str, usize> = targets
        .iter()
        .enumerate()
        .map(|(i, (path, _))| (path.trimmed(), i))
        .collect();

    let mut seen = HashSet::with_capacity(archive.len());
    let mut slots = Vec::with_capacity(archive.len());
    let mut removed = 0;

    for entry in archive.entries() {
        let key = trim_directory_marker(&entry.path);
        if !seen.insert(key) {
            log::warn!(
                "dropping duplicate entry '{}' at index {}",
                entry.path,
                entry.index
            );
            continue;
        }
        if removals.iter().any(|prefix| is_same_or_under(&entry.path, prefix)) {
            log::trace!("removing '{}'", entry.path);
            removed += 1;
            continue;
        }

        match pending.remove(key) {
            Some(addition) if policy.overwrites() => slots.push(Slot::Replace {
                index: entry.index,
                addition,
            }),
            Some(_) => {
                return Err(Error::DuplicateEntry {
                    path: entry.path.clone(),
                });
            }
            None => slots.push(Slot::Copy(entry.index)),
        }
    }

    let mut appended: Vec<usize> = pending.into_values().collect();
    appended.sort_unstable();

    Ok(Plan {
        slots,
        appended,
        removed,
    })
}

/// Applies `changes` to the archive at `source` and writes the result to
/// `destination`.
///
/// `destination` may be the same file as `source`. The new archive is
/// staged next to the destination and moved over it only after the source
/// has been fully read and closed; on any error the destination is left as
/// it was.
pub fn rewrite(
    source: impl AsRef<Path>,
    changes: ChangeSet,
    policy: DuplicatePolicy,
    destination: impl AsRef<Path>,
) -> Result<EditResult> {
    rewrite_with_options(source, changes, policy, WriteOptions::default(), destination)
}

/// Like [`rewrite`] but with explicit write options.
pub fn rewrite_with_options(
    source: impl AsRef<Path>,
    changes: ChangeSet,
    policy: DuplicatePolicy,
    options: WriteOptions,
    destination: impl AsRef<Path>,
) -> Result<EditResult> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    log::debug!(
        "rewriting {} into {} ({})",
        source.display(),
        destination.display(),
        policy
    );

    let archive = Archive::open_path(source)?;
    let mut staged = StagedFile::new(destination)?;
    let result = ArchiveEditor::new(archive, changes)
        .policy(policy)
        .with_options(options)
        .apply(BufWriter::new(staged.file_mut()))?;
    staged.commit()?;
    Ok(result)
}
