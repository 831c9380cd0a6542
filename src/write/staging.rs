//! Staged output files.
//!
//! Output is written to a temporary file in the destination's directory and
//! moved over the destination only after it is complete. Dropping a
//! [`StagedFile`] without committing removes the temporary file, so a failed
//! write never leaves a truncated destination behind.
//!
//! A committed file keeps the permissions of the file it replaces. A new
//! destination gets the permissions of any newly created file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A temporary file that replaces `destination` on [`commit`](Self::commit).
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl StagedFile {
    /// Creates a staging file next to `destination`.
    pub fn new(destination: impl AsRef<Path>) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let dir = staging_dir(&destination);
        let mut builder = tempfile::Builder::new();
        builder.prefix(".zipedit-").suffix(".tmp");
        default_permissions(&mut builder);
        let temp = builder
            .tempfile_in(&dir)
            .map_err(|source| Error::DestinationUnwritable {
                path: destination.clone(),
                source,
            })?;
        log::trace!(
            "staging {} at {}",
            destination.display(),
            temp.path().display()
        );
        Ok(Self { temp, destination })
    }

    /// Returns the staging file for writing.
    pub fn file_mut(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }

    /// Returns the final destination.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Atomically moves the staged file over the destination.
    pub fn commit(self) -> Result<()> {
        if let Ok(existing) = fs::metadata(&self.destination) {
            if existing.is_file() {
                self.temp.as_file().set_permissions(existing.permissions())?;
            }
        }
        self.temp.as_file().sync_all()?;
        let destination = self.destination;
        self.temp
            .persist(&destination)
            .map_err(|e| Error::DestinationUnwritable {
                path: destination.clone(),
                source: e.error,
            })?;
        log::trace!("committed {}", destination.display());
        Ok(())
    }
}

/// Creates staging files with mode 0666, narrowed by the process umask.
#[cfg(unix)]
fn default_permissions(builder: &mut tempfile::Builder<'_, '_>) {
    use std::os::unix::fs::PermissionsExt;
    builder.permissions(fs::Permissions::from_mode(0o666));
}

#[cfg(not(unix))]
fn default_permissions(_builder: &mut tempfile::Builder<'_, '_>) {}

/// Directory that holds staging files for `destination`.
pub(crate) fn staging_dir(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_commit_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("out.bin");
        std::fs::write(&destination, b"old").unwrap();

        let mut staged = StagedFile::new(&destination).unwrap();
        staged.file_mut().write_all(b"new").unwrap();
        staged.commit().unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_drop_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("out.bin");
        std::fs::write(&destination, b"old").unwrap();

        {
            let mut staged = StagedFile::new(&destination).unwrap();
            staged.file_mut().write_all(b"partial").unwrap();
        }

        assert_eq!(std::fs::read(&destination).unwrap(), b"old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("no/such/dir/out.zip");
        assert!(matches!(
            StagedFile::new(&destination),
            Err(Error::DestinationUnwritable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_destination_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        for mode in [0o644, 0o640, 0o444] {
            let destination = dir.path().join(format!("out-{:o}.bin", mode));
            std::fs::write(&destination, b"old").unwrap();
            std::fs::set_permissions(&destination, std::fs::Permissions::from_mode(mode)).unwrap();

            let mut staged = StagedFile::new(&destination).unwrap();
            staged.file_mut().write_all(b"new").unwrap();
            staged.commit().unwrap();

            let actual = std::fs::metadata(&destination).unwrap().permissions().mode() & 0o777;
            assert_eq!(actual, mode);
            assert_eq!(std::fs::read(&destination).unwrap(), b"new");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_new_destination_gets_default_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("reference.bin");
        std::fs::write(&reference, b"").unwrap();
        let expected = std::fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        let destination = dir.path().join("fresh.bin");
        let mut staged = StagedFile::new(&destination).unwrap();
        staged.file_mut().write_all(b"new").unwrap();
        staged.commit().unwrap();

        let actual = std::fs::metadata(&destination).unwrap().permissions().mode() & 0o777;
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_staging_dir_of_bare_name() {
        assert_eq!(staging_dir(Path::new("out.zip")), PathBuf::from("."));
    }
}
