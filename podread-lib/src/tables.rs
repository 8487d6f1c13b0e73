//! Static calibration tables for FPOD click data.
//!
//! Tables are built once on first use and are read-only afterwards.
//!
//! The amplitude tables are generated curves, not measured hydrophone
//! calibration data. Extended amplitudes are only comparable with other output
//! of this crate.
use std::collections::HashMap;
use std::sync::LazyLock;

/// Largest IPI value a click can carry (raw byte + 1).
pub const MAX_IPI: u16 = 256;

/// Raw amplitude codes at or below this value are never clipped.
const LINEAR_KNEE: u8 = 128;
/// Amplitude codes per doubling above [LINEAR_KNEE].
const CODES_PER_OCTAVE: f64 = 32.0;
/// Lowest raw amplitude code with a clipped-table entry.
const CLIPPED_FIRST_AMP: u8 = 223;
/// IPI range covered by the clipped table.
const CLIPPED_IPI: std::ops::RangeInclusive<u16> = 10..=80;

/// IPI (units of 250ns) to whole kHz, rounded to nearest.
static IPI_KHZ: [u16; MAX_IPI as usize + 1] = build_ipi_khz();

const fn build_ipi_khz() -> [u16; MAX_IPI as usize + 1] {
    let mut table = [0u16; MAX_IPI as usize + 1];
    let mut ipi = 1;
    while ipi <= MAX_IPI as usize {
        table[ipi] = ((4000 + ipi / 2) / ipi) as u16;
        ipi += 1;
    }
    table
}

static LINEAR_AMP: LazyLock<[u32; 256]> = LazyLock::new(|| {
    let mut table = [0u32; 256];
    for (code, val) in table.iter_mut().enumerate() {
        *val = if code <= usize::from(LINEAR_KNEE) {
            code as u32
        } else {
            let octaves = (code - usize::from(LINEAR_KNEE)) as f64 / CODES_PER_OCTAVE;
            (f64::from(LINEAR_KNEE) * octaves.exp2()).round() as u32
        };
    }
    table
});

static CLIPPED_AMP: LazyLock<HashMap<(u8, u16), u32>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for amp in CLIPPED_FIRST_AMP..=u8::MAX {
        let base = f64::from(LINEAR_AMP[usize::from(amp)]);
        let depth =
            f64::from(amp - CLIPPED_FIRST_AMP + 1) / f64::from(u8::MAX - CLIPPED_FIRST_AMP + 1);
        for ipi in CLIPPED_IPI {
            let factor = 1.0 + depth * f64::from(ipi) / 20.0;
            table.insert((amp, ipi), (base * factor).round() as u32);
        }
    }
    table
});

/// Frequency in kHz for an inter-peak interval. `None` for 0 or out of range.
#[must_use]
pub fn ipi_to_khz(ipi: u16) -> Option<u16> {
    match IPI_KHZ.get(usize::from(ipi)) {
        Some(0) | None => None,
        Some(khz) => Some(*khz),
    }
}

/// Extended-range amplitude for a raw code on the linear curve.
#[must_use]
pub fn linear_amplitude(raw: u8) -> u32 {
    LINEAR_AMP[usize::from(raw)]
}

/// Extended-range amplitude for a clipped click, if the table covers `(raw, ipi)`.
#[must_use]
pub fn clipped_amplitude(raw: u8, ipi: u16) -> Option<u32> {
    CLIPPED_AMP.get(&(raw, ipi)).copied()
}
