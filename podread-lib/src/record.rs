//! Decoded output records.
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::chunk::{WavSample, WAV_SAMPLES_PER_CHUNK};
use crate::species::Species;

/// Classifier train assignment for a click.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainClassification {
    /// Train identifier, 1 to 255. Reused by the device, so not globally unique.
    pub train_id: u8,
    pub species: Option<Species>,
    /// 1 (low) to 3 (high).
    pub quality_level: u8,
    /// FPOD only.
    pub echo: Option<bool>,
}

/// A single detected click.
///
/// Fields only produced for FPOD files are `None` for CPOD files.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    /// Minute counter value when the click was logged. -1 before the first minute
    /// boundary.
    pub minute: i32,
    pub microsec: u32,
    /// 1-based sequence number in file order.
    pub click_no: u32,
    pub ncyc: u8,
    pub pkat: Option<u8>,
    pub clk_ipi_range: Option<u8>,
    /// IPI before the max amplitude cycle, 250ns units.
    pub ipi_pre_max: Option<u16>,
    /// IPI at the max amplitude cycle, 250ns units.
    pub ipi_at_max: Option<u16>,
    pub khz: Option<u16>,
    /// Compressed amplitude code as logged.
    pub amp_at_max: u8,
    /// Extended-range amplitude, set by calibration.
    pub amp: Option<u32>,
    pub amp_reversals: Option<u8>,
    pub duration: Option<f64>,
    pub has_wav: bool,
    pub train: Option<TrainClassification>,
}

/// Environmental readings logged at a minute boundary.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvSample {
    /// Same minute counter value carried by clicks logged after this boundary.
    ///
    /// Zero-based: the first boundary in a file is minute 0, so a 1-based
    /// row index is always `minute + 1`.
    pub minute: i32,
    /// Degrees C.
    pub temperature: u8,
    pub battery1: u8,
    pub battery2: u8,
}

/// Pseudo-waveform for a single click, built from one or more waveform chunks.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavSequence {
    pub click_no: u32,
    chunks: Vec<[WavSample; WAV_SAMPLES_PER_CHUNK]>,
}

impl WavSequence {
    pub(crate) fn new(samples: [WavSample; WAV_SAMPLES_PER_CHUNK]) -> Self {
        WavSequence {
            click_no: 0,
            chunks: vec![samples],
        }
    }

    pub(crate) fn extend(&mut self, samples: [WavSample; WAV_SAMPLES_PER_CHUNK]) {
        self.chunks.push(samples);
    }

    /// Samples in waveform order. Chunks are logged last-first, so the most recently
    /// read chunk comes first.
    pub fn samples(&self) -> impl Iterator<Item = &WavSample> {
        self.chunks.iter().rev().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len() * WAV_SAMPLES_PER_CHUNK
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Flattened waveform sample.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavRow {
    pub click_no: u32,
    pub ipi: u8,
    pub amp: u8,
}
