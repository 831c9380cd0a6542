//! Extraction path validation.
//!
//! Entry names come from untrusted archives. Before anything is written,
//! each name is resolved against the destination directory and rejected with
//! [`Error::PathTraversal`] if it could land outside it.
//!
//! # Examples
//!
//! ```rust
//! use std::path::Path;
//! use zipedit::safety::resolve_entry_path;
//!
//! let dest = Path::new("out");
//! assert_eq!(
//!     resolve_entry_path(dest, "docs/readme.txt").unwrap(),
//!     Path::new("out").join("docs").join("readme.txt"),
//! );
//! assert!(resolve_entry_path(dest, "../../etc/passwd").is_err());
//! assert!(resolve_entry_path(dest, "/etc/passwd").is_err());
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolves entry `name` to a filesystem path under `dest`.
///
/// Both `/` and `\` are treated as separators. Empty and `.` segments are
/// ignored.
///
/// # Errors
///
/// Returns [`Error::PathTraversal`] for absolute names, drive prefixes,
/// any `..` segment, or a name that resolves to `dest` itself.
pub fn resolve_entry_path(dest: &Path, name: &str) -> Result<PathBuf> {
    let traversal = || Error::PathTraversal {
        path: name.to_string(),
    };

    if name.starts_with('/') || name.starts_with('\\') || has_drive_prefix(name) {
        return Err(traversal());
    }

    let mut resolved = dest.to_path_buf();
    let mut depth = 0usize;
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return Err(traversal()),
            segment if segment.contains('\0') => return Err(traversal()),
            segment => {
                resolved.push(segment);
                depth += 1;
            }
        }
    }

    if depth == 0 {
        return Err(traversal());
    }
    Ok(resolved)
}

/// Validates every name before any of them is extracted.
pub fn validate_entry_names<'a, I>(dest: &Path, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        resolve_entry_path(dest, name)?;
    }
    Ok(())
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Materializes one entry at `target`.
///
/// A directory entry creates the directory, replacing a plain file already
/// at that path. A file entry creates missing parents and overwrites an
/// existing file. Returns the number of bytes written.
pub(crate) fn write_entry(target: &Path, is_directory: bool, reader: &mut dyn Read) -> Result<u64> {
    if is_directory {
        if target.is_file() {
            fs::remove_file(target)?;
        }
        fs::create_dir_all(target)?;
        return Ok(0);
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut output = BufWriter::new(File::create(target)?);
    let written = io::copy(reader, &mut output)?;
    output.flush()?;
    Ok(written)
}
