#[cfg(feature = "serde")]
use serde::Serialize;

use crate::decoder::MINUTE_NOT_STARTED;
use crate::header::FileHeader;
use crate::record::{Click, EnvSample, WavRow, WavSequence};

/// Everything decoded from a single file.
///
/// `env` and `wav` are always empty for CPOD files.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub filename: String,
    pub header: FileHeader,
    pub clicks: Vec<Click>,
    pub env: Vec<EnvSample>,
    pub wav: Vec<WavSequence>,
}

impl Bundle {
    /// Package decoded records, releasing any unused pre-allocated capacity.
    pub(crate) fn assemble(
        filename: String,
        header: FileHeader,
        mut clicks: Vec<Click>,
        mut env: Vec<EnvSample>,
        mut wav: Vec<WavSequence>,
    ) -> Self {
        clicks.shrink_to_fit();
        env.shrink_to_fit();
        wav.shrink_to_fit();
        Bundle {
            filename,
            header,
            clicks,
            env,
            wav,
        }
    }

    /// All waveform samples as rows, ordered by click then waveform order.
    pub fn wav_rows(&self) -> impl Iterator<Item = WavRow> + '_ {
        self.wav.iter().flat_map(|seq| {
            seq.samples().map(move |s| WavRow {
                click_no: seq.click_no,
                ipi: s.ipi,
                amp: s.amp,
            })
        })
    }

    /// Number of clicks with a train classification.
    #[must_use]
    pub fn num_classified(&self) -> usize {
        self.clicks.iter().filter(|c| c.train.is_some()).count()
    }

    /// True if there are clicks but none was logged after a minute boundary.
    ///
    /// Every real recording starts with a minute boundary, so this usually
    /// means a corrupt or misidentified file.
    #[must_use]
    pub fn missing_minutes(&self) -> bool {
        !self.clicks.is_empty() && self.clicks.iter().all(|c| c.minute == MINUTE_NOT_STARTED)
    }
}
