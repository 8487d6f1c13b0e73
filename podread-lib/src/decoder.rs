//! Chunk-by-chunk record decoders.
//!
//! Both decoders carry the running click and minute counters across chunks. FPOD
//! train and waveform chunks describe the click that follows them, so their data
//! is held until that click arrives.
use std::io::Read;

use tracing::{debug, trace};

use crate::bytes::Chunks;
use crate::chunk::{is_fill, CpodChunk, CpodClick, FpodChunk, TrainTag, WavSample, WAV_SAMPLES_PER_CHUNK};
use crate::record::{Click, EnvSample, TrainClassification, WavSequence};
use crate::{FileFormat, Result};

/// Minute counter value before any minute boundary has been seen.
pub const MINUTE_NOT_STARTED: i32 = -1;

/// Whether a decoder wants more chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Records accumulated by a decoder.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Records {
    pub clicks: Vec<Click>,
    pub env: Vec<EnvSample>,
    pub wav: Vec<WavSequence>,
}

impl Records {
    fn with_capacity(capacity: usize) -> Self {
        Records {
            clicks: Vec::with_capacity(capacity),
            env: Vec::new(),
            wav: Vec::new(),
        }
    }
}

/// Decodes the record chunks of a single file.
pub trait ChunkDecoder {
    /// Process one complete chunk.
    fn push(&mut self, chunk: &[u8]) -> Flow;

    /// Consume the decoder, returning everything decoded so far.
    fn finish(self) -> Records;
}

/// Feed all complete chunks in `reader` to `decoder` until the data ends or the
/// decoder stops.
///
/// # Errors
/// Any `std::io::Error` reading other than a short final chunk.
pub fn decode_chunks<D, R>(mut decoder: D, reader: R, chunk_len: usize) -> Result<Records>
where
    D: ChunkDecoder,
    R: Read,
{
    let mut chunks = Chunks::new(reader, chunk_len);
    loop {
        let Some(chunk) = chunks.next_chunk()? else {
            debug!(offset = chunks.offset(), "end of data");
            break;
        };
        if decoder.push(chunk) == Flow::Stop {
            debug!(offset = chunks.offset(), "end of data marker");
            break;
        }
    }
    Ok(decoder.finish())
}

/// Record decoder for FP1/FP3 data.
pub struct FpodDecoder {
    format: FileFormat,
    pic_version: u8,
    minute: i32,
    records: Records,
    pending_train: Option<TrainTag>,
    pending_wav: Option<WavSequence>,
}

impl FpodDecoder {
    #[must_use]
    pub fn new(format: FileFormat, pic_version: u8) -> Self {
        Self::with_capacity(format, pic_version, 0)
    }

    /// Create a decoder with room for `capacity` clicks.
    #[must_use]
    pub fn with_capacity(format: FileFormat, pic_version: u8, capacity: usize) -> Self {
        FpodDecoder {
            format,
            pic_version,
            minute: MINUTE_NOT_STARTED,
            records: Records::with_capacity(capacity),
            pending_train: None,
            pending_wav: None,
        }
    }

    /// Current value of the minute counter.
    #[must_use]
    pub fn minute(&self) -> i32 {
        self.minute
    }

    /// Clicks decoded so far.
    #[must_use]
    pub fn clicks(&self) -> &[Click] {
        &self.records.clicks
    }

    fn add_wav(&mut self, samples: [WavSample; WAV_SAMPLES_PER_CHUNK]) {
        match self.pending_wav.as_mut() {
            Some(seq) => seq.extend(samples),
            None => self.pending_wav = Some(WavSequence::new(samples)),
        }
    }
}

impl ChunkDecoder for FpodDecoder {
    fn push(&mut self, chunk: &[u8]) -> Flow {
        match FpodChunk::decode(chunk, self.format, self.pic_version) {
            FpodChunk::Click(c) => {
                let click_no = self.records.clicks.len() as u32 + 1;
                let has_wav = match self.pending_wav.take() {
                    Some(mut seq) => {
                        seq.click_no = click_no;
                        self.records.wav.push(seq);
                        true
                    }
                    None => false,
                };
                let train = self.pending_train.take().map(|t| TrainClassification {
                    train_id: t.train_id,
                    species: t.species,
                    quality_level: t.quality_level,
                    echo: Some(t.echo),
                });
                self.records.clicks.push(Click {
                    minute: self.minute,
                    microsec: c.microsec,
                    click_no,
                    ncyc: c.ncyc,
                    pkat: Some(c.pkat),
                    clk_ipi_range: Some(c.clk_ipi_range),
                    ipi_pre_max: Some(c.ipi_pre_max),
                    ipi_at_max: Some(c.ipi_at_max),
                    khz: None,
                    amp_at_max: c.amp_at_max,
                    amp: None,
                    amp_reversals: Some(c.amp_reversals),
                    duration: Some(f64::from(c.duration)),
                    has_wav,
                    train,
                });
            }
            FpodChunk::Train(tag) => {
                if self.pending_train.is_some() {
                    trace!(train_id = tag.train_id, "replacing pending train tag");
                }
                self.pending_train = Some(tag);
            }
            FpodChunk::Wav(samples) => self.add_wav(samples),
            FpodChunk::Minute(m) => {
                self.minute += 1;
                self.records.env.push(EnvSample {
                    minute: self.minute,
                    temperature: m.temperature,
                    battery1: m.battery1,
                    battery2: m.battery2,
                });
            }
            FpodChunk::Unknown(tag) => trace!(tag, "skipping unknown chunk"),
        }
        Flow::Continue
    }

    fn finish(self) -> Records {
        if self.pending_train.is_some() || self.pending_wav.is_some() {
            debug!("dropping train/waveform data with no following click");
        }
        self.records
    }
}

/// Record decoder for CP1/CP3 data.
pub struct CpodDecoder {
    format: FileFormat,
    minute: i32,
    fills: u8,
    /// The most recent click was decoded from a fill chunk.
    fill_click: bool,
    records: Records,
}

impl CpodDecoder {
    /// Consecutive fill chunks that mark the end of data.
    const END_FILLS: u8 = 2;

    #[must_use]
    pub fn new(format: FileFormat) -> Self {
        Self::with_capacity(format, 0)
    }

    /// Create a decoder with room for `capacity` clicks.
    #[must_use]
    pub fn with_capacity(format: FileFormat, capacity: usize) -> Self {
        CpodDecoder {
            format,
            minute: MINUTE_NOT_STARTED,
            fills: 0,
            fill_click: false,
            records: Records::with_capacity(capacity),
        }
    }

    /// Current value of the minute counter.
    #[must_use]
    pub fn minute(&self) -> i32 {
        self.minute
    }

    /// Clicks decoded so far.
    #[must_use]
    pub fn clicks(&self) -> &[Click] {
        &self.records.clicks
    }

    fn add_click(&mut self, c: CpodClick) {
        let click_no = self.records.clicks.len() as u32 + 1;
        self.records.clicks.push(Click {
            minute: self.minute,
            microsec: c.microsec,
            click_no,
            ncyc: c.ncyc,
            pkat: None,
            clk_ipi_range: None,
            ipi_pre_max: None,
            ipi_at_max: None,
            khz: Some(u16::from(c.khz)),
            amp_at_max: c.khz,
            amp: None,
            amp_reversals: None,
            duration: c.duration,
            has_wav: false,
            train: c.train.map(|t| TrainClassification {
                train_id: t.train_id,
                species: t.species,
                quality_level: t.quality_level,
                echo: None,
            }),
        });
    }
}

impl ChunkDecoder for CpodDecoder {
    fn push(&mut self, chunk: &[u8]) -> Flow {
        if self.fills >= Self::END_FILLS {
            return Flow::Stop;
        }
        let fill = is_fill(chunk);
        if fill {
            self.fills += 1;
            if self.fills >= Self::END_FILLS {
                // the first chunk of the terminating pair is not data
                if self.fill_click {
                    self.records.clicks.pop();
                }
                trace!(clicks = self.records.clicks.len(), "end of data fill");
                return Flow::Stop;
            }
        } else {
            self.fills = 0;
        }
        self.fill_click = false;

        match CpodChunk::decode(chunk, self.format) {
            CpodChunk::Minute => self.minute += 1,
            CpodChunk::Click(c) => {
                self.fill_click = fill;
                self.add_click(c);
            }
        }
        Flow::Continue
    }

    fn finish(self) -> Records {
        self.records
    }
}
