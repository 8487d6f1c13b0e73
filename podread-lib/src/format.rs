use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Error, Result};

/// Hardware family a file was produced by.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Fpod,
    Cpod,
}

/// The four supported file variants.
///
/// `*1` files hold the raw click stream, `*3` files hold the stream after the
/// vendor train classifier has been run over it.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Fp1,
    Fp3,
    Cp1,
    Cp3,
}

impl FileFormat {
    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Self::Fp1 | Self::Fp3 => Family::Fpod,
            Self::Cp1 | Self::Cp3 => Family::Cpod,
        }
    }

    #[must_use]
    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Fp3 | Self::Cp3)
    }

    /// Number of bytes in the fixed header at the start of the file.
    #[must_use]
    pub fn header_len(&self) -> usize {
        match self {
            Self::Cp1 => 360,
            Self::Cp3 => 720,
            Self::Fp1 | Self::Fp3 => 1024,
        }
    }

    /// Number of bytes in each record chunk following the header.
    #[must_use]
    pub fn chunk_len(&self) -> usize {
        match self {
            Self::Cp1 => 10,
            Self::Cp3 => 40,
            Self::Fp1 | Self::Fp3 => 16,
        }
    }

    /// Upper bound on the number of records for a file of `file_size` bytes.
    #[must_use]
    pub fn max_records(&self, file_size: u64) -> usize {
        let data = file_size.saturating_sub(self.header_len() as u64);
        usize::try_from(data / self.chunk_len() as u64).unwrap_or(usize::MAX)
    }

    /// Case-insensitive lookup of a bare extension, e.g., `"fp3"`.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_uppercase().as_str() {
            "FP1" => Some(Self::Fp1),
            "FP3" => Some(Self::Fp3),
            "CP1" => Some(Self::Cp1),
            "CP3" => Some(Self::Cp3),
            _ => None,
        }
    }

    /// Determine the format from the extension of `path`.
    ///
    /// # Errors
    /// [Error::UnsupportedFormat] if the path has no extension or an unknown one.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.to_ascii_uppercase(),
        })
    }
}

impl Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fp1 => "FP1",
            Self::Fp3 => "FP3",
            Self::Cp1 => "CP1",
            Self::Cp3 => "CP3",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("{s} is not one of FP1, FP3, CP1, CP3"))
    }
}
