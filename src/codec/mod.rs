//! Compression method mapping onto the `zip` codec.
//!
//! The actual (de)compression is performed by the `zip` crate. This module
//! only names the methods this crate writes and maps them to and from the
//! codec's own enum.

use std::fmt;

use crate::{Error, Result};

/// Compression method of a ZIP entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// No compression (ZIP method 0).
    Stored,
    /// Deflate compression (ZIP method 8).
    Deflated,
    /// Any other method found in an existing archive.
    ///
    /// Entries with such methods can be passed through unchanged but cannot
    /// be written by this crate.
    Other,
}

impl CompressionMethod {
    /// Method used for brand-new entries when the caller gives no override.
    pub const DEFAULT: Self = Self::Deflated;

    /// Returns the ZIP method code, if the method is known.
    pub fn code(self) -> Option<u16> {
        match self {
            Self::Stored => Some(0),
            Self::Deflated => Some(8),
            Self::Other => None,
        }
    }

    /// Returns true if entries with this method can be written.
    pub fn is_writable(self) -> bool {
        match self {
            Self::Stored => true,
            Self::Deflated => cfg!(feature = "deflate"),
            Self::Other => false,
        }
    }

    pub(crate) fn from_zip(method: zip::CompressionMethod) -> Self {
        match method {
            zip::CompressionMethod::Stored => Self::Stored,
            #[cfg(feature = "deflate")]
            zip::CompressionMethod::Deflated => Self::Deflated,
            _ => Self::Other,
        }
    }

    pub(crate) fn to_zip(self) -> Result<zip::CompressionMethod> {
        match self {
            Self::Stored => Ok(zip::CompressionMethod::Stored),
            #[cfg(feature = "deflate")]
            Self::Deflated => Ok(zip::CompressionMethod::Deflated),
            #[cfg(not(feature = "deflate"))]
            Self::Deflated => Err(Error::InvalidInput(
                "deflate support is disabled (enable the `deflate` feature)".into(),
            )),
            Self::Other => Err(Error::InvalidInput(
                "cannot encode entries with an unknown compression method".into(),
            )),
        }
    }
}

impl Default for CompressionMethod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => write!(f, "stored"),
            Self::Deflated => write!(f, "deflated"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CompressionMethod::Stored.code(), Some(0));
        assert_eq!(CompressionMethod::Deflated.code(), Some(8));
        assert_eq!(CompressionMethod::Other.code(), None);
    }

    #[test]
    fn test_stored_round_trips_through_zip() {
        let zip_method = CompressionMethod::Stored.to_zip().unwrap();
        assert_eq!(CompressionMethod::from_zip(zip_method), CompressionMethod::Stored);
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_deflated_round_trips_through_zip() {
        let zip_method = CompressionMethod::Deflated.to_zip().unwrap();
        assert_eq!(
            CompressionMethod::from_zip(zip_method),
            CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_other_is_not_writable() {
        assert!(!CompressionMethod::Other.is_writable());
        assert!(CompressionMethod::Other.to_zip().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CompressionMethod::Stored.to_string(), "stored");
        assert_eq!(CompressionMethod::Deflated.to_string(), "deflated");
    }
}
