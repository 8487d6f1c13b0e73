//! Typed classification of the fixed size record chunks that follow the header.
//!
//! Each family has its own layout. FPOD chunks are tagged by their first byte,
//! CPOD chunks by their last byte.
use crate::species::Species;
use crate::FileFormat;

/// FPOD tag values of the first chunk byte.
const FPOD_CLICK_LIMIT: u8 = 184;
const FPOD_TRAIN: u8 = 249;
const FPOD_WAV: u8 = 250;
const FPOD_MINUTE: u8 = 254;

/// CPOD last-byte value marking a minute boundary.
const CPOD_MINUTE: u8 = 254;
/// Number of non-0xFF bytes tolerated in a CPOD fill chunk.
const CPOD_FILL_TOLERANCE: usize = 5;

/// Samples carried by a single FPOD waveform chunk.
pub const WAV_SAMPLES_PER_CHUNK: usize = 7;

/// Sub-second tick count in the first 3 bytes converted to microseconds.
fn microsec(buf: &[u8]) -> u32 {
    let ticks = u32::from_be_bytes([0, buf[0], buf[1], buf[2]]);
    (f64::from(ticks) / 200.0 * 1000.0) as u32
}

/// Decode the FPOD click IPI range code from the low nibble of its byte.
#[must_use]
pub fn ipi_range_code(nibble: u8) -> u8 {
    let nibble = nibble & 0xf;
    if nibble == 15 {
        65
    } else if nibble & 0x8 == 0x8 {
        ((nibble & 0x7) + 1) << 3
    } else {
        nibble & 0x7
    }
}

/// Click fields decoded from an FPOD click chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpodClick {
    pub microsec: u32,
    pub ncyc: u8,
    pub pkat: u8,
    pub clk_ipi_range: u8,
    pub ipi_pre_max: u16,
    pub ipi_at_max: u16,
    pub amp_at_max: u8,
    pub amp_reversals: u8,
    pub duration: u32,
}

/// Train classification carried by an FPOD train chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainTag {
    pub train_id: u8,
    pub species: Option<Species>,
    pub quality_level: u8,
    pub echo: bool,
}

/// A single pseudo-waveform sample.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSample {
    pub ipi: u8,
    pub amp: u8,
}

/// Environmental readings from an FPOD minute chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteReading {
    pub temperature: u8,
    pub battery1: u8,
    pub battery2: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FpodChunk {
    Click(FpodClick),
    /// Describes the next click in the stream.
    Train(TrainTag),
    /// Describes the next click in the stream.
    Wav([WavSample; WAV_SAMPLES_PER_CHUNK]),
    Minute(MinuteReading),
    /// Tag value with no known meaning.
    Unknown(u8),
}

impl FpodChunk {
    /// Classify and decode a 16 byte FPOD chunk.
    ///
    /// `pic_version` is required to locate battery readings in minute chunks.
    ///
    /// # Panics
    /// If `buf` is shorter than 16 bytes.
    #[must_use]
    pub fn decode(buf: &[u8], format: FileFormat, pic_version: u8) -> Self {
        match buf[0] {
            tag if tag < FPOD_CLICK_LIMIT => Self::Click(FpodClick {
                microsec: microsec(buf),
                ncyc: buf[3],
                pkat: buf[4] >> 4,
                clk_ipi_range: ipi_range_code(buf[4]),
                ipi_pre_max: u16::from(buf[5]) + 1,
                ipi_at_max: u16::from(buf[6]) + 1,
                // codes below 2 are not valid amplitudes
                amp_at_max: buf[10].max(2),
                amp_reversals: buf[13] & 0x0f,
                duration: (u32::from(buf[13] & 0xf0) * 16 + u32::from(buf[14])) / 5,
            }),
            FPOD_TRAIN => Self::Train(TrainTag {
                train_id: buf[15],
                species: Species::from_code((buf[14] >> 2) & 0x3, format),
                quality_level: buf[14] & 0x3,
                echo: buf[14] & 0x20 == 0x20,
            }),
            FPOD_WAV => {
                let mut samples = [WavSample { ipi: 0, amp: 0 }; WAV_SAMPLES_PER_CHUNK];
                for (sample, pos) in samples.iter_mut().zip((0..=12).rev().step_by(2)) {
                    *sample = WavSample {
                        ipi: buf[pos + 1],
                        amp: buf[pos + 2],
                    };
                }
                Self::Wav(samples)
            }
            FPOD_MINUTE => {
                // Older firmware shifted the battery bytes by one.
                let (battery1, battery2) = if pic_version < 28 && buf[11] == 0 && buf[13] != 0 {
                    (buf[12], buf[13])
                } else {
                    (buf[11], buf[12])
                };
                Self::Minute(MinuteReading {
                    temperature: buf[7],
                    battery1,
                    battery2,
                })
            }
            tag => Self::Unknown(tag),
        }
    }
}

/// Click fields decoded from a CPOD click chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct CpodClick {
    pub microsec: u32,
    pub ncyc: u8,
    /// Coarse frequency code, also used as the amplitude.
    pub khz: u8,
    pub duration: Option<f64>,
    /// Only present for CP3 files.
    pub train: Option<CpodTrain>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpodTrain {
    pub train_id: u8,
    pub species: Option<Species>,
    pub quality_level: u8,
}

/// A CPOD chunk classified on its last byte.
///
/// Fill status is independent of the kind, see [is_fill].
#[derive(Debug, Clone, PartialEq)]
pub enum CpodChunk {
    Minute,
    Click(CpodClick),
}

/// True if at most [CPOD_FILL_TOLERANCE] bytes of `buf` are not 0xFF.
///
/// A fill chunk is still classified like any other chunk; two in a row end
/// the data.
#[must_use]
pub fn is_fill(buf: &[u8]) -> bool {
    let count = buf.iter().filter(|b| **b == 0xff).count();
    count + CPOD_FILL_TOLERANCE >= buf.len()
}

impl CpodChunk {
    /// Classify and decode a CPOD chunk of `format.chunk_len()` bytes.
    ///
    /// # Panics
    /// If `buf` is shorter than the chunk length for `format`.
    #[must_use]
    pub fn decode(buf: &[u8], format: FileFormat) -> Self {
        if buf[buf.len() - 1] == CPOD_MINUTE {
            return Self::Minute;
        }
        let khz = buf[5];
        let train = (format == FileFormat::Cp3).then(|| CpodTrain {
            train_id: buf[39],
            species: Species::from_code(buf[36] >> 3, format),
            quality_level: buf[36] & 0x3,
        });
        Self::Click(CpodClick {
            microsec: microsec(buf),
            ncyc: buf[3],
            khz,
            duration: (khz > 0).then(|| f64::from(buf[3]) / f64::from(khz)),
            train,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn fpod(hex: &str) -> FpodChunk {
        let buf = hex::decode(hex).unwrap();
        FpodChunk::decode(&buf, FileFormat::Fp3, 30)
    }

    #[test_case(0x2f, 65 ; "all bits")]
    #[test_case(0x29, 16 ; "bit3 set")]
    #[test_case(0x23, 3 ; "bit3 clear")]
    #[test_case(0x08, 8 ; "bit3 only")]
    #[test_case(0x0e, 56 ; "max shifted")]
    fn range_code(byte: u8, expected: u8) {
        assert_eq!(ipi_range_code(byte), expected);
    }

    #[test]
    fn fpod_click() {
        // ticks 0x000190 = 400 -> 2000us
        let FpodChunk::Click(click) = fpod("000190142f1e1f0000000001005a4600") else {
            panic!("expected click");
        };
        assert_eq!(click.microsec, 2000);
        assert_eq!(click.ncyc, 0x14);
        assert_eq!(click.pkat, 2);
        assert_eq!(click.clk_ipi_range, 65);
        assert_eq!(click.ipi_pre_max, 0x1f);
        assert_eq!(click.ipi_at_max, 0x20);
        assert_eq!(click.amp_at_max, 2, "amplitude code 0 should clamp to 2");
        assert_eq!(click.amp_reversals, 0xa);
        // ((0x50 * 16) + 0x46) / 5
        assert_eq!(click.duration, (0x50 * 16 + 0x46) / 5);
    }

    #[test]
    fn fpod_click_microsec_truncates() {
        // 0xb7ffff is the largest click tick count
        let FpodChunk::Click(click) = fpod("b7ffff00000000000000000000000000") else {
            panic!("expected click");
        };
        assert_eq!(click.microsec, (f64::from(0xb7ffffu32) / 200.0 * 1000.0) as u32);
    }

    #[test]
    fn fpod_train() {
        // byte 14 = 0b0010_0110: echo, species code 1, quality 2
        let FpodChunk::Train(tag) = fpod("f90000000000000000000000000026c8") else {
            panic!("expected train");
        };
        assert_eq!(tag.train_id, 200);
        assert_eq!(tag.species, Some(Species::OtherCet));
        assert_eq!(tag.quality_level, 2);
        assert!(tag.echo);
    }

    #[test]
    fn fpod_train_raw_format_has_no_species() {
        let buf = hex::decode("f90000000000000000000000000026c8").unwrap();
        let FpodChunk::Train(tag) = FpodChunk::decode(&buf, FileFormat::Fp1, 30) else {
            panic!("expected train");
        };
        assert_eq!(tag.species, None);
    }

    #[test]
    fn fpod_wav_sample_order() {
        let FpodChunk::Wav(samples) = fpod("fa0102030405060708090a0b0c0d0e0f") else {
            panic!("expected wav");
        };
        let got: Vec<(u8, u8)> = samples.iter().map(|s| (s.ipi, s.amp)).collect();
        assert_eq!(
            got,
            vec![
                (0x0d, 0x0e),
                (0x0b, 0x0c),
                (0x09, 0x0a),
                (0x07, 0x08),
                (0x05, 0x06),
                (0x03, 0x04),
                (0x01, 0x02),
            ]
        );
    }

    #[test]
    fn fpod_minute_batteries() {
        let buf = hex::decode("fe000000000000120000005a5b5c0000").unwrap();
        let FpodChunk::Minute(m) = FpodChunk::decode(&buf, FileFormat::Fp1, 30) else {
            panic!("expected minute");
        };
        assert_eq!(m.temperature, 0x12);
        assert_eq!((m.battery1, m.battery2), (0x5a, 0x5b));
    }

    #[test]
    fn fpod_minute_batteries_shifted_for_old_firmware() {
        let buf = hex::decode("fe000000000000120000005a5b5c0000").unwrap();
        // byte 11 is 0x5a so no shift even on old firmware
        let FpodChunk::Minute(m) = FpodChunk::decode(&buf, FileFormat::Fp1, 27) else {
            panic!("expected minute");
        };
        assert_eq!((m.battery1, m.battery2), (0x5a, 0x5b));

        let buf = hex::decode("fe0000000000001200000000a1a20000").unwrap();
        let FpodChunk::Minute(m) = FpodChunk::decode(&buf, FileFormat::Fp1, 27) else {
            panic!("expected minute");
        };
        assert_eq!((m.battery1, m.battery2), (0xa1, 0xa2));

        // same bytes on newer firmware are not shifted
        let FpodChunk::Minute(m) = FpodChunk::decode(&buf, FileFormat::Fp1, 28) else {
            panic!("expected minute");
        };
        assert_eq!((m.battery1, m.battery2), (0x00, 0xa1));
    }

    #[test]
    fn fpod_unknown() {
        assert_eq!(fpod("b8000000000000000000000000000000"), FpodChunk::Unknown(184));
        assert_eq!(fpod("ff000000000000000000000000000000"), FpodChunk::Unknown(255));
    }

    #[test]
    fn fill_tolerance() {
        let mut buf = [0xffu8; 10];
        assert!(is_fill(&buf));
        buf[..5].copy_from_slice(&[0, 0, 0, 0, 0]);
        assert!(is_fill(&buf), "5 non-fill bytes are tolerated");
        buf[5] = 0;
        assert!(!is_fill(&buf), "6 non-fill bytes are not");
    }

    #[test]
    fn fill_chunk_classified_on_last_byte() {
        let buf = hex::decode("00000000fffffffffffe").unwrap();
        assert!(is_fill(&buf));
        assert_eq!(CpodChunk::decode(&buf, FileFormat::Cp1), CpodChunk::Minute);

        let buf = hex::decode("ffffffffffffffff0010").unwrap();
        assert!(is_fill(&buf));
        let CpodChunk::Click(click) = CpodChunk::decode(&buf, FileFormat::Cp1) else {
            panic!("expected click");
        };
        assert_eq!(click.ncyc, 0xff);
    }

    #[test]
    fn cpod_click() {
        let buf = hex::decode("0003e8280014000000fd").unwrap();
        let CpodChunk::Click(click) = CpodChunk::decode(&buf, FileFormat::Cp1) else {
            panic!("expected click");
        };
        assert_eq!(click.microsec, 5000);
        assert_eq!(click.ncyc, 40);
        assert_eq!(click.khz, 20);
        assert_eq!(click.duration, Some(2.0));
        assert_eq!(click.train, None);
    }

    #[test]
    fn cpod_click_zero_khz_has_no_duration() {
        let buf = hex::decode("00000005000000000000").unwrap();
        let CpodChunk::Click(click) = CpodChunk::decode(&buf, FileFormat::Cp1) else {
            panic!("expected click");
        };
        assert_eq!(click.duration, None);
    }

    #[test]
    fn cpod_minute() {
        let buf = hex::decode("000000000000000000fe").unwrap();
        assert_eq!(CpodChunk::decode(&buf, FileFormat::Cp1), CpodChunk::Minute);
    }

    #[test]
    fn cp3_click_train() {
        let mut buf = vec![0u8; 40];
        buf[3] = 10;
        buf[5] = 4;
        // species code 3 << 3 | quality 1
        buf[36] = (3 << 3) | 1;
        buf[39] = 77;
        let CpodChunk::Click(click) = CpodChunk::decode(&buf, FileFormat::Cp3) else {
            panic!("expected click");
        };
        let train = click.train.unwrap();
        assert_eq!(train.train_id, 77);
        assert_eq!(train.species, Some(Species::OtherCet));
        assert_eq!(train.quality_level, 1);
        assert_eq!(click.duration, Some(2.5));
    }
}
