//! Species group labels assigned by the vendor train classifier.
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::FileFormat;

/// Coarse species group.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Narrow-band high-frequency cetaceans, e.g., porpoises.
    #[cfg_attr(feature = "serde", serde(rename = "NBHF"))]
    Nbhf,
    OtherCet,
    Unclassed,
    Sonar,
}

const FPOD_SPECIES: [Species; 4] = [
    Species::Nbhf,
    Species::OtherCet,
    Species::Unclassed,
    Species::Sonar,
];

const CPOD_SPECIES: [Species; 8] = [
    Species::Nbhf,
    Species::Nbhf,
    Species::OtherCet,
    Species::OtherCet,
    Species::Unclassed,
    Species::Unclassed,
    Species::Sonar,
    Species::Sonar,
];

impl Species {
    /// Map a classifier code to a species group.
    ///
    /// `code` must already be masked/shifted out of its record byte. Codes outside
    /// the range valid for `format`, and any code for an unclassified format,
    /// produce `None`.
    #[must_use]
    pub fn from_code(code: u8, format: FileFormat) -> Option<Self> {
        let table: &[Species] = match format {
            FileFormat::Fp3 => &FPOD_SPECIES,
            FileFormat::Cp3 => &CPOD_SPECIES,
            FileFormat::Fp1 | FileFormat::Cp1 => return None,
        };
        table.get(usize::from(code)).copied()
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nbhf => "NBHF",
            Self::OtherCet => "OtherCet",
            Self::Unclassed => "Unclassed",
            Self::Sonar => "Sonar",
        }
    }
}

impl Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Label for an optional species, empty when there is none.
#[must_use]
pub fn label(species: Option<Species>) -> &'static str {
    species.map_or("", |s| s.label())
}
