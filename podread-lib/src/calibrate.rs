//! Post-decode calibration of FPOD clicks.
//!
//! Raw amplitude codes are compressed; firmware with extended amplitude support
//! allows recovering values beyond the clipping point from the click IPI.
use crate::header::FpodHeader;
use crate::record::Click;
use crate::tables;

/// Firmware versions above this report the IPI at the max amplitude cycle as the
/// clipping reference; earlier ones use the IPI before it.
pub const AT_MAX_FPGA_VERSION: u16 = 801;
/// Minimum IPI for which clipped amplitudes can be extrapolated.
pub const CLIPPED_MIN_IPI: u16 = 10;
/// Raw amplitude codes above this are treated as clipped.
pub const CLIPPED_MIN_AMP: u8 = 222;

/// Choose the IPI used as the clipping reference for `fpga_version`.
#[must_use]
pub fn reference_ipi(ipi_pre_max: u16, ipi_at_max: u16, fpga_version: u16) -> u16 {
    if fpga_version > AT_MAX_FPGA_VERSION {
        ipi_at_max
    } else {
        ipi_pre_max
    }
}

/// Extended-range amplitude for a raw amplitude code.
///
/// Returns `None` only for clipped clicks not covered by the clipped table.
#[must_use]
pub fn extrapolate_amplitude(raw: u8, ipi: u16, extended: bool) -> Option<u32> {
    if raw == 0 {
        return Some(1);
    }
    if extended && ipi >= CLIPPED_MIN_IPI && raw > CLIPPED_MIN_AMP {
        tables::clipped_amplitude(raw, ipi)
    } else {
        Some(tables::linear_amplitude(raw))
    }
}

/// Fill in `khz` and `amp` for FPOD clicks.
pub fn calibrate(clicks: &mut [Click], header: &FpodHeader) {
    for click in clicks {
        let (Some(pre), Some(at)) = (click.ipi_pre_max, click.ipi_at_max) else {
            continue;
        };
        click.khz = tables::ipi_to_khz(at);
        let ipi = reference_ipi(pre, at, header.fpga_version);
        click.amp = extrapolate_amplitude(click.amp_at_max, ipi, header.extended_amps);
    }
}
