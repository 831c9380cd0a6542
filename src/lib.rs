//! # zipedit
//!
//! A library for manipulating ZIP archives without holding them in memory
//! and without re-encoding entries that are not being changed.
//!
//! The crate covers four jobs:
//!
//! - **Rewriting** ([`edit`]): add, replace, add-or-replace and remove
//!   entries. Untouched entries are copied with their compressed bytes
//!   intact, and every rewrite is staged and swapped in atomically, so the
//!   source may also be the destination.
//! - **Root normalization** ([`extract`], [`pack`], [`root`]): unwrap an
//!   archive whose entries share one top-level directory, explode an archive
//!   into a same-named directory, and unexplode it back.
//! - **Iteration** ([`iterate`]): visit entries with a callback that can stop
//!   the scan early by returning [`Flow::Break`].
//! - **Comparison** ([`compare`]): decide whether two archives hold the same
//!   entries with the same content.
//!
//! ## Quick Start
//!
//! ### Editing an Archive
//!
//! ```rust,no_run
//! use zipedit::edit::{self, ChangeSet, DuplicatePolicy};
//! use zipedit::Result;
//!
//! fn main() -> Result<()> {
//!     let changes = ChangeSet::new()
//!         .remove("logs")
//!         .add_bytes("config/app.toml", b"debug = false\n".to_vec());
//!
//!     let result = edit::rewrite("app.zip", changes, DuplicatePolicy::AddOrReplace, "app.zip")?;
//!     println!(
//!         "kept {} entries verbatim, removed {}",
//!         result.entries_kept, result.entries_removed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Iterating with Early Exit
//!
//! ```rust,no_run
//! use zipedit::{Flow, Result, iterate};
//!
//! fn main() -> Result<()> {
//!     let mut largest = None;
//!     iterate::iterate_info("archive.zip", |entry| {
//!         if entry.size > 100 * 1024 * 1024 {
//!             largest = Some(entry.path.clone());
//!             return Ok(Flow::Break);
//!         }
//!         Ok(Flow::Continue)
//!     })?;
//!     println!("{:?}", largest);
//!     Ok(())
//! }
//! ```
//!
//! ### Unwrapping a Single-Root Archive
//!
//! ```rust,no_run
//! use zipedit::{Error, extract};
//!
//! match extract::unwrap("release.zip", "out") {
//!     Ok(result) => println!("extracted {} entries", result.entries_extracted),
//!     Err(Error::AmbiguousRoot { first, second }) => {
//!         eprintln!("release.zip has roots '{}' and '{}'", first, second)
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), zipedit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `deflate` | Yes | Deflate compression support |
//!
//! Without `deflate`, only Stored entries can be encoded. Deflated entries
//! can still be copied verbatim by a rewrite.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: operation
//! summaries at `debug`, per-entry decisions at `trace`, and recovered
//! anomalies such as duplicate entry names at `warn`. Install any `log`
//! backend to see them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default buffer size for read operations (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod archive_path;
pub mod codec;
pub mod compare;
pub mod edit;
pub mod error;
pub mod extract;
pub mod iterate;
pub mod pack;
pub mod query;
pub mod read;
pub mod root;
pub mod safety;
pub mod source;
pub mod write;

pub use archive_path::ArchivePath;
pub use codec::CompressionMethod;
pub use error::{Error, Result};

// Re-export reading API at crate root for convenience
pub use read::{Archive, Entry, EntrySelector, SelectAll, SelectByName, SelectFilesOnly};

// Re-export writing API at crate root for convenience
pub use write::{StagedFile, WriteOptions, WriteResult, Writer};

// Re-export pending entries and name mapping
pub use source::{ByteSource, DirectorySource, EntrySource, FileSource, IdentityMapper, NameMapper, Renamed};

// Re-export iteration API
pub use iterate::{Flow, handle, iterate, iterate_info, iterate_info_names, iterate_names};

// Re-export edit API
pub use edit::{
    ArchiveEditor, ChangeSet, DuplicatePolicy, EditResult, add_entries, add_entries_in_place,
    add_entry, add_entry_in_place, add_or_replace_entries, add_or_replace_entries_in_place,
    remove_entries, remove_entries_in_place, remove_entry, remove_entry_in_place,
    replace_entries, replace_entries_in_place, replace_entry, replace_entry_in_place, repack,
    repack_in_place, rewrite,
};

// Re-export root normalization API
pub use extract::{ExtractResult, explode, unpack, unpack_with, unwrap, unwrap_stream};
pub use pack::{
    PackOptions, pack, pack_entries, pack_entries_mapped, pack_entry, pack_entry_named,
    pack_entry_to_vec, pack_mapped, pack_sources, pack_with, unexplode,
};
pub use root::{RootDescriptor, detect_root};

// Re-export comparison and query API
pub use compare::{archive_equals, entry_equals};
pub use query::{compression_method_of_entry, contains_any_entry, contains_entry, entry_names};
