use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input file could not be opened.
    #[error("unable to open file {path:?}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fewer bytes were available than the header for the format requires.
    #[error("unable to read header from {path:?}; got {actual} bytes, need {minimum}")]
    TruncatedHeader {
        path: PathBuf,
        /// Number of bytes we got
        actual: usize,
        /// Number of bytes the header layout requires
        minimum: usize,
    },

    /// The file extension is not one of FP1, FP3, CP1 or CP3.
    #[error("unknown file type {extension:?} for {path:?}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
