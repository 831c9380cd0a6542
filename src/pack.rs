//! Creating archives from files and directories.
//!
//! All functions that write a file stage the archive next to the destination
//! and move it into place only after it is complete. A missing source fails
//! with [`Error::SourceNotFound`] before the destination is touched.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipedit::pack::{self, PackOptions};
//!
//! // site.zip holds "site/index.html", "site/css/main.css", ...
//! let options = PackOptions::new().preserve_root(true);
//! pack::pack_with("site", "site.zip", &options)?;
//!
//! // Back into a directory named "site.zip" and back to an archive again.
//! zipedit::extract::explode("site.zip")?;
//! pack::unexplode("site.zip")?;
//! # Ok::<(), zipedit::Error>(())
//! ```

use std::fs;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use walkdir::WalkDir;

use crate::codec::CompressionMethod;
use crate::source::{EntrySource, FileSource, IdentityMapper, NameMapper, file_name_of};
use crate::write::{StagedFile, WriteOptions, WriteResult, Writer, staging_dir};
use crate::{ArchivePath, Error, Result};

/// Options for packing a directory tree.
///
/// # Examples
///
/// ```rust
/// use zipedit::CompressionMethod;
/// use zipedit::pack::PackOptions;
///
/// let options = PackOptions::new()
///     .preserve_root(true)
///     .method(CompressionMethod::Stored);
/// assert!(options.preserve_root);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackOptions {
    /// Store entries under the source directory's own name.
    pub preserve_root: bool,
    /// Method and level for every file entry.
    pub write: WriteOptions,
}

impl PackOptions {
    /// Creates default pack options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the source directory's name becomes the root segment.
    pub fn preserve_root(mut self, preserve: bool) -> Self {
        self.preserve_root = preserve;
        self
    }

    /// Sets the compression method.
    pub fn method(mut self, method: CompressionMethod) -> Self {
        self.write = self.write.method(method);
        self
    }

    /// Sets the deflate level.
    pub fn level(mut self, level: u32) -> Result<Self> {
        self.write = self.write.level(level)?;
        Ok(self)
    }
}

/// Packs the content of directory `dir` into the archive `dest`.
pub fn pack(dir: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<WriteResult> {
    pack_with(dir, dest, &PackOptions::default())
}

/// Packs a directory with explicit options.
pub fn pack_with(
    dir: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: &PackOptions,
) -> Result<WriteResult> {
    let dir = dir.as_ref();
    let root = if options.preserve_root {
        Some(file_name_of(dir)?)
    } else {
        None
    };
    let mapper = move |name: &str| {
        Some(match &root {
            Some(root) => format!("{}/{}", root, name),
            None => name.to_string(),
        })
    };
    pack_tree(dir, dest.as_ref(), options.write, &mapper)
}

/// Packs a directory, naming entries through `mapper`.
///
/// Directory names passed to the mapper end with `/`.
pub fn pack_mapped<M: NameMapper>(
    dir: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    mapper: M,
) -> Result<WriteResult> {
    pack_tree(dir.as_ref(), dest.as_ref(), WriteOptions::default(), &mapper)
}

fn pack_tree(
    dir: &Path,
    dest: &Path,
    options: WriteOptions,
    mapper: &dyn NameMapper,
) -> Result<WriteResult> {
    check_source_dir(dir)?;
    log::debug!("packing {} into {}", dir.display(), dest.display());

    let mut staged = StagedFile::new(dest)?;
    let mut writer = Writer::create(BufWriter::new(staged.file_mut())).options(options);
    write_tree(&mut writer, dir, mapper)?;
    let result = writer.finish()?;
    staged.commit()?;
    Ok(result)
}

fn check_source_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(Error::SourceNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    if fs::read_dir(dir)?.next().is_none() {
        return Err(Error::InvalidInput(format!(
            "{} does not contain any files",
            dir.display()
        )));
    }
    Ok(())
}

/// Writes every file and directory below `dir`, in name order.
fn write_tree<W: Write + Seek>(
    writer: &mut Writer<W>,
    dir: &Path,
    mapper: &dyn NameMapper,
) -> Result<()> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            log::warn!("skipping symbolic link {}", entry.path().display());
            continue;
        }

        let relative = entry.path().strip_prefix(dir).map_err(|_| {
            Error::InvalidInput(format!("{} is outside {}", entry.path().display(), dir.display()))
        })?;
        let mut name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if file_type.is_dir() {
            name.push('/');
        }

        let Some(mapped) = mapper.map(&name) else {
            log::trace!("mapper skipped '{}'", name);
            continue;
        };
        if file_type.is_dir() {
            writer.add_directory(&ArchivePath::directory(&mapped)?)?;
        } else {
            let source = FileSource::new(mapped.as_str(), entry.path());
            writer.add_source(&ArchivePath::new(&mapped)?, &source, None)?;
        }
    }
    Ok(())
}

/// Packs individual files, each stored under its own file name.
pub fn pack_entries<P: AsRef<Path>>(files: &[P], dest: impl AsRef<Path>) -> Result<WriteResult> {
    pack_entries_mapped(files, dest, IdentityMapper)
}

/// Packs individual files, naming each through `mapper`.
///
/// The mapper receives the file's own name.
pub fn pack_entries_mapped<P, M>(files: &[P], dest: impl AsRef<Path>, mapper: M) -> Result<WriteResult>
where
    P: AsRef<Path>,
    M: NameMapper,
{
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        let file = file.as_ref();
        check_source_file(file)?;
        if let Some(name) = mapper.map(&file_name_of(file)?) {
            sources.push(FileSource::new(name, file));
        }
    }
    pack_sources(sources, dest)
}

/// Packs arbitrary pending entries in the given order.
///
/// Two sources with the same name fail with [`Error::DuplicateEntry`] and
/// leave no destination behind.
pub fn pack_sources<I, S>(sources: I, dest: impl AsRef<Path>) -> Result<WriteResult>
where
    I: IntoIterator<Item = S>,
    S: EntrySource,
{
    let dest = dest.as_ref();
    let mut staged = StagedFile::new(dest)?;
    let mut writer = Writer::create(BufWriter::new(staged.file_mut()));
    write_sources(&mut writer, sources)?;
    let result = writer.finish()?;
    staged.commit()?;
    log::debug!(
        "packed {} entries into {}",
        result.entries_written,
        dest.display()
    );
    Ok(result)
}

fn write_sources<W, I, S>(writer: &mut Writer<W>, sources: I) -> Result<()>
where
    W: Write + Seek,
    I: IntoIterator<Item = S>,
    S: EntrySource,
{
    for source in sources {
        let path = if source.is_directory() {
            ArchivePath::directory(source.path())?
        } else {
            ArchivePath::new(source.path())?
        };
        writer.add_source(&path, &source, None)?;
    }
    Ok(())
}

fn check_source_file(file: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(Error::SourceNotFound {
            path: file.to_path_buf(),
        });
    }
    Ok(())
}

/// Packs a single file under its own name.
pub fn pack_entry(file: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<WriteResult> {
    pack_entries(&[file.as_ref()], dest)
}

/// Packs a single file under `name`.
pub fn pack_entry_named(
    file: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    name: &str,
) -> Result<WriteResult> {
    let file = file.as_ref();
    check_source_file(file)?;
    pack_sources([FileSource::new(name, file)], dest)
}

/// Packs a single file into an in-memory archive.
pub fn pack_entry_to_vec(file: impl AsRef<Path>) -> Result<Vec<u8>> {
    let file = file.as_ref();
    check_source_file(file)?;
    let mut writer = Writer::create(Cursor::new(Vec::new()));
    write_sources(&mut writer, [FileSource::from_file(file)?])?;
    let (_, output) = writer.finish_into_inner()?;
    Ok(output.into_inner())
}

/// Replaces directory `dir` with an archive of the same name holding its
/// content.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `dir` does not exist, is not a
/// directory, or is empty.
pub fn unexplode(dir: impl AsRef<Path>) -> Result<WriteResult> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(Error::InvalidInput(format!(
            "{} does not exist",
            dir.display()
        )));
    }
    check_source_dir(dir)?;

    let mut staged = StagedFile::new(dir)?;
    let mut writer = Writer::create(BufWriter::new(staged.file_mut()));
    write_tree(&mut writer, dir, &IdentityMapper)?;
    let result = writer.finish()?;

    // Move the tree aside so a failed commit can put it back.
    let aside = tempfile::Builder::new()
        .prefix(".zipedit-")
        .tempdir_in(staging_dir(dir))
        .map_err(|source| Error::DestinationUnwritable {
            path: dir.to_path_buf(),
            source,
        })?;
    let moved = aside.path().join("content");
    fs::rename(dir, &moved)?;

    if let Err(e) = staged.commit() {
        if let Err(restore) = fs::rename(&moved, dir) {
            log::warn!(
                "failed to restore {} from {}: {}",
                dir.display(),
                moved.display(),
                restore
            );
        }
        return Err(e);
    }

    log::debug!(
        "unexploded {} ({} entries)",
        dir.display(),
        result.entries_written
    );
    Ok(result)
}
