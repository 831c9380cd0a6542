//! Write options.

use zip::write::SimpleFileOptions;

use crate::codec::CompressionMethod;
use crate::{Error, Result};

/// Options applied to entries encoded by a [`Writer`](super::Writer).
///
/// # Examples
///
/// ```rust
/// use zipedit::{CompressionMethod, WriteOptions};
///
/// let options = WriteOptions::new()
///     .method(CompressionMethod::Deflated)
///     .level(9)
///     .unwrap();
/// assert_eq!(options.level, Some(9));
/// assert!(WriteOptions::new().level(10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Method used when an entry carries no method of its own.
    pub method: CompressionMethod,
    /// Deflate level (0-9); `None` uses the codec default.
    pub level: Option<u32>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            method: CompressionMethod::DEFAULT,
            level: None,
        }
    }
}

impl WriteOptions {
    /// Creates default write options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default compression method.
    pub fn method(mut self, method: CompressionMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the deflate level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if level is greater than 9.
    pub fn level(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidCompressionLevel { level });
        }
        self.level = Some(level);
        Ok(self)
    }

    /// Builds codec options for one entry.
    pub(crate) fn file_options(&self, method: CompressionMethod) -> Result<SimpleFileOptions> {
        let options = SimpleFileOptions::default().compression_method(method.to_zip()?);
        Ok(match (method, self.level) {
            (CompressionMethod::Deflated, Some(level)) => {
                options.compression_level(Some(i64::from(level)))
            }
            _ => options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = WriteOptions::default();
        assert_eq!(options.method, CompressionMethod::Deflated);
        assert_eq!(options.level, None);
    }

    #[test]
    fn test_level_validation() {
        assert!(WriteOptions::new().level(0).is_ok());
        assert!(WriteOptions::new().level(9).is_ok());
        assert!(matches!(
            WriteOptions::new().level(12),
            Err(Error::InvalidCompressionLevel { level: 12 })
        ));
    }

    #[test]
    fn test_stored_file_options() {
        let options = WriteOptions::new().level(5).unwrap();
        assert!(options.file_options(CompressionMethod::Stored).is_ok());
        assert!(options.file_options(CompressionMethod::Other).is_err());
    }
}
