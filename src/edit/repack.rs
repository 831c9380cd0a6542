//! Re-encoding every entry at a new deflate level.

use std::io::BufWriter;
use std::path::Path;

use crate::codec::CompressionMethod;
use crate::read::Archive;
use crate::write::{StagedFile, WriteOptions, Writer};
use crate::Result;

use super::editor::EditResult;

/// Decodes every entry of `source` and writes it to `destination` as
/// Deflated at `level`.
///
/// Directory entries are kept as directory markers. Names are written as
/// stored, and duplicate names keep their first occurrence.
///
/// # Errors
///
/// Returns [`Error::InvalidCompressionLevel`](crate::Error::InvalidCompressionLevel)
/// if `level` is greater than 9.
pub fn repack(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    level: u32,
) -> Result<EditResult> {
    let options = WriteOptions::new()
        .method(CompressionMethod::Deflated)
        .level(level)?;
    let source = source.as_ref();
    let destination = destination.as_ref();
    log::debug!(
        "repacking {} into {} at level {}",
        source.display(),
        destination.display(),
        level
    );

    let mut archive = Archive::open_path(source)?;
    let mut staged = StagedFile::new(destination)?;
    let mut writer = Writer::create(BufWriter::new(staged.file_mut())).options(options);
    let mut result = EditResult::default();

    for index in 0..archive.len() {
        if !archive.is_first_occurrence(index) {
            continue;
        }
        writer.reencode(&mut archive, index)?;
        result.entries_replaced += 1;
    }

    result.bytes_encoded = writer.finish()?.bytes_encoded;
    drop(archive);
    staged.commit()?;
    Ok(result)
}

/// In-place variant of [`repack`].
pub fn repack_in_place(archive: impl AsRef<Path>, level: u32) -> Result<EditResult> {
    let archive = archive.as_ref();
    repack(archive, archive, level)
}
