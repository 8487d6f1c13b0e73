use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::bundle::Bundle;
use crate::bytes::read_up_to;
use crate::calibrate::calibrate;
use crate::decoder::{decode_chunks, CpodDecoder, FpodDecoder};
use crate::header::FileHeader;
use crate::{Error, FileFormat, Result};

/// Reads FPOD/CPOD files into a [Bundle].
///
/// # Example
/// ```no_run
/// use podread::PodReader;
///
/// let bundle = PodReader::builder()
///     .calibrate(false)
///     .build()
///     .read("deployment.FP1")
///     .unwrap();
/// println!("{} clicks", bundle.clicks.len());
/// ```
#[derive(TypedBuilder, Debug, Clone)]
pub struct PodReader {
    /// Apply IPI to kHz and amplitude extrapolation to FPOD clicks.
    #[builder(default = true)]
    calibrate: bool,
    /// Use this format rather than determining it from the file extension.
    #[builder(default)]
    format: Option<FileFormat>,
}

impl Default for PodReader {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PodReader {
    /// Read and decode the file at `path`.
    ///
    /// The format is determined from the file extension before the file is opened.
    ///
    /// # Errors
    /// [Error::UnsupportedFormat] for an unknown extension, [Error::FileAccess] if the
    /// file cannot be opened, [Error::TruncatedHeader] if it is shorter than the header,
    /// or [Error::Io] for any other read failure.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Bundle> {
        let path = path.as_ref();
        let format = match self.format {
            Some(format) => format,
            None => FileFormat::from_path(path)?,
        };
        let file = File::open(path).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let size = file.metadata()?.len();
        debug!(?path, %format, size, "reading");

        self.decode(BufReader::new(file), format, path, Some(size))
    }

    /// Decode a file's bytes from `reader`.
    ///
    /// `path` is only used to name the source in the result and errors. `size_hint`,
    /// the total number of bytes including the header, is used to pre-allocate.
    ///
    /// # Errors
    /// [Error::TruncatedHeader] if `reader` does not contain a full header, or
    /// [Error::Io] for any other read failure.
    pub fn decode<R: Read>(
        &self,
        mut reader: R,
        format: FileFormat,
        path: &Path,
        size_hint: Option<u64>,
    ) -> Result<Bundle> {
        let buf = read_up_to(&mut reader, format.header_len())?;
        let header = FileHeader::decode(&buf, format).ok_or_else(|| Error::TruncatedHeader {
            path: path.to_path_buf(),
            actual: buf.len(),
            minimum: format.header_len(),
        })?;
        let capacity = size_hint.map_or(0, |size| format.max_records(size));

        let mut records = match &header {
            FileHeader::Fpod(hdr) => {
                let decoder = FpodDecoder::with_capacity(format, hdr.pic_version, capacity);
                decode_chunks(decoder, reader, format.chunk_len())?
            }
            FileHeader::Cpod(_) => {
                let decoder = CpodDecoder::with_capacity(format, capacity);
                decode_chunks(decoder, reader, format.chunk_len())?
            }
        };

        if let FileHeader::Fpod(hdr) = &header {
            if self.calibrate {
                calibrate(&mut records.clicks, hdr);
            }
        }

        debug!(
            clicks = records.clicks.len(),
            minutes = records.env.len(),
            wavs = records.wav.len(),
            "decoded"
        );

        let bundle = Bundle::assemble(
            path.to_string_lossy().to_string(),
            header,
            records.clicks,
            records.env,
            records.wav,
        );
        if bundle.missing_minutes() {
            warn!(?path, "no minute boundaries before any click; file may be malformed");
        }
        Ok(bundle)
    }
}

/// Read the file at `path` using default options.
///
/// # Errors
/// See [PodReader::read].
pub fn read_pod_file<P: AsRef<Path>>(path: P) -> Result<Bundle> {
    PodReader::default().read(path)
}
