//! Archive rewriting.
//!
//! An existing archive is never modified in place. Instead a new archive is
//! produced from the source and a [`ChangeSet`]:
//! - entries matched by a removal key (segment-wise prefix) are dropped
//! - additions are written under a [`DuplicatePolicy`]
//! - every other entry is copied without decoding
//!
//! File-level entry points stage the output next to the destination and move
//! it into place only on success, so a failed `*_in_place` call leaves the
//! source untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipedit::edit::{self, ChangeSet, DuplicatePolicy};
//! use zipedit::source::FileSource;
//!
//! let changes = ChangeSet::new()
//!     .remove("docs/drafts")
//!     .add(FileSource::new("docs/index.html", "site/index.html"));
//!
//! let result = edit::rewrite("site.zip", changes, DuplicatePolicy::AddOrReplace, "site.zip")?;
//! println!(
//!     "kept {}, removed {}, replaced {}, added {}",
//!     result.entries_kept, result.entries_removed, result.entries_replaced, result.entries_added
//! );
//! # Ok::<(), zipedit::Error>(())
//! ```

mod editor;
mod operation;
mod ops;
mod repack;

pub use editor::{ArchiveEditor, EditResult, rewrite, rewrite_with_options};
pub use operation::{Addition, ChangeSet, DuplicatePolicy};
pub use ops::{
    add_entries, add_entries_in_place, add_entry, add_entry_in_place, add_or_replace_entries,
    add_or_replace_entries_in_place, remove_entries, remove_entries_in_place, remove_entry,
    remove_entry_in_place, replace_entries, replace_entries_in_place, replace_entry,
    replace_entry_in_place,
};
pub use repack::{repack, repack_in_place};
