#![doc = include_str!("../README.md")]

mod bundle;
mod bytes;
mod error;
mod reader;

pub mod calibrate;
pub mod chunk;
pub mod decoder;
pub mod format;
pub mod header;
pub mod record;
pub mod species;
pub mod tables;

pub use bundle::Bundle;
pub use error::{Error, Result};
pub use format::{Family, FileFormat};
pub use header::{CpodHeader, FileHeader, FpodHeader};
pub use reader::{read_pod_file, PodReader};
pub use record::{Click, EnvSample, TrainClassification, WavRow, WavSequence};
pub use species::Species;
