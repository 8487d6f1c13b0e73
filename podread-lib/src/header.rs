//! Fixed layout file headers.
//!
//! All multi-byte numbers are big-endian. Text fields are fixed width and keep
//! whatever padding the device wrote; see [trim].
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::format::{Family, FileFormat};

/// FPOD (FP1/FP3) file header.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpodHeader {
    pub pod_id: u32,
    pub first_logged_min: i32,
    pub last_logged_min: i32,
    pub water_depth: u16,
    pub deployment_depth: u16,
    pub lat_text: String,
    pub lon_text: String,
    pub location_text: String,
    pub notes_text: String,
    pub gmt_text: String,
    /// Microcontroller firmware version.
    pub pic_version: u8,
    /// FPGA firmware version.
    pub fpga_version: u16,
    /// True when the device firmware supports extended amplitude calibration.
    pub extended_amps: bool,
    /// Number of clicks in the FP1 file this FP3 file was produced from.
    pub clicks_in_fp1: Option<i64>,
}

/// CPOD (CP1/CP3) file header.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpodHeader {
    pub pod_id: String,
    pub first_logged_min: i32,
    pub last_logged_min: i32,
    pub water_depth: u16,
    pub deployment_depth: u16,
    pub lat_text: String,
    pub lon_text: String,
    pub location_text: String,
    pub notes_text: String,
    /// Number of clicks in the CP1 file this CP3 file was produced from.
    pub clicks_in_cp1: Option<u32>,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileHeader {
    Fpod(FpodHeader),
    Cpod(CpodHeader),
}

/// Big-endian integer from `len` bytes at `offset`.
fn be_uint(buf: &[u8], offset: usize, len: usize) -> u64 {
    buf[offset..offset + len]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Fixed width text, one char per byte.
fn text(buf: &[u8], offset: usize, len: usize) -> String {
    buf[offset..offset + len].iter().map(|&b| char::from(b)).collect()
}

/// Strip the trailing NUL/space padding devices write into text fields.
#[must_use]
pub fn trim(s: &str) -> &str {
    s.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}

impl FpodHeader {
    pub const LEN: usize = 1024;

    /// Decode from bytes. Returns `None` if there are not enough bytes.
    #[must_use]
    pub fn decode(buf: &[u8], format: FileFormat) -> Option<Self> {
        if buf.len() < Self::LEN {
            return None;
        }
        let fpga_version = u16::from_be_bytes([buf[39], buf[40]]);
        Some(FpodHeader {
            pod_id: 100 * u32::from(buf[3]) + u32::from(buf[4]),
            first_logged_min: be_uint(buf, 256, 4) as u32 as i32,
            last_logged_min: be_uint(buf, 260, 4) as u32 as i32,
            water_depth: u16::from_be_bytes([buf[131], buf[132]]),
            deployment_depth: u16::from_be_bytes([buf[129], buf[130]]),
            lat_text: text(buf, 133, 11),
            lon_text: text(buf, 145, 11),
            location_text: text(buf, 157, 30),
            notes_text: text(buf, 188, 43),
            gmt_text: text(buf, 232, 11),
            pic_version: buf[37],
            fpga_version,
            extended_amps: fpga_version > 0,
            // overlaps the tail of the notes field in the FP3 layout
            clicks_in_fp1: (format == FileFormat::Fp3).then(|| be_uint(buf, 231, 8) as i64),
        })
    }
}

impl CpodHeader {
    /// Decode from bytes. Returns `None` if there are not enough bytes for `format`.
    #[must_use]
    pub fn decode(buf: &[u8], format: FileFormat) -> Option<Self> {
        if buf.len() < format.header_len() {
            return None;
        }
        Some(CpodHeader {
            pod_id: text(buf, 164, 4),
            first_logged_min: be_uint(buf, 256, 4) as u32 as i32,
            last_logged_min: be_uint(buf, 260, 4) as u32 as i32,
            water_depth: u16::from_be_bytes([buf[31], buf[32]]),
            deployment_depth: u16::from_be_bytes([buf[29], buf[30]]),
            lat_text: text(buf, 13, 8),
            lon_text: text(buf, 21, 8),
            location_text: text(buf, 33, 31),
            notes_text: text(buf, 211, 50),
            clicks_in_cp1: (format == FileFormat::Cp3).then(|| be_uint(buf, 128, 4) as u32),
        })
    }
}

impl FileHeader {
    /// Decode the header layout for `format` from `buf`. Returns `None` if `buf` is
    /// shorter than [FileFormat::header_len].
    #[must_use]
    pub fn decode(buf: &[u8], format: FileFormat) -> Option<Self> {
        match format.family() {
            Family::Fpod => FpodHeader::decode(buf, format).map(Self::Fpod),
            Family::Cpod => CpodHeader::decode(buf, format).map(Self::Cpod),
        }
    }

    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Self::Fpod(_) => Family::Fpod,
            Self::Cpod(_) => Family::Cpod,
        }
    }

    /// Device identifier as text.
    #[must_use]
    pub fn pod_id(&self) -> String {
        match self {
            Self::Fpod(h) => h.pod_id.to_string(),
            Self::Cpod(h) => trim(&h.pod_id).to_string(),
        }
    }

    #[must_use]
    pub fn first_logged_min(&self) -> i32 {
        match self {
            Self::Fpod(h) => h.first_logged_min,
            Self::Cpod(h) => h.first_logged_min,
        }
    }

    #[must_use]
    pub fn last_logged_min(&self) -> i32 {
        match self {
            Self::Fpod(h) => h.last_logged_min,
            Self::Cpod(h) => h.last_logged_min,
        }
    }

    #[must_use]
    pub fn location_text(&self) -> &str {
        match self {
            Self::Fpod(h) => &h.location_text,
            Self::Cpod(h) => &h.location_text,
        }
    }
}
