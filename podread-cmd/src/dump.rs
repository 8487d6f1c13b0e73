use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use podread::{Bundle, PodReader, WavRow};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone)]
pub enum Table {
    All,
    Clicks,
    Env,
    Wav,
}

impl clap::ValueEnum for Table {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::All, Self::Clicks, Self::Env, Self::Wav]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::All => Some(clap::builder::PossibleValue::new("all")),
            Self::Clicks => Some(clap::builder::PossibleValue::new("clicks")),
            Self::Env => Some(clap::builder::PossibleValue::new("env")),
            Self::Wav => Some(clap::builder::PossibleValue::new("wav")),
        }
    }
}

/// Everything, with waveforms flattened to rows.
#[derive(Serialize)]
struct All<'a> {
    filename: &'a str,
    header: &'a podread::FileHeader,
    clicks: &'a [podread::Click],
    env: &'a [podread::EnvSample],
    wav: Vec<WavRow>,
}

fn write_table<W: Write>(bundle: &Bundle, table: &Table, mut dest: W) -> Result<()> {
    let zult = match table {
        Table::All => {
            let all = All {
                filename: &bundle.filename,
                header: &bundle.header,
                clicks: &bundle.clicks,
                env: &bundle.env,
                wav: bundle.wav_rows().collect(),
            };
            serde_json::to_writer_pretty(&mut dest, &all)
        }
        Table::Clicks => serde_json::to_writer_pretty(&mut dest, &bundle.clicks),
        Table::Env => serde_json::to_writer_pretty(&mut dest, &bundle.env),
        Table::Wav => {
            let rows: Vec<WavRow> = bundle.wav_rows().collect();
            serde_json::to_writer_pretty(&mut dest, &rows)
        }
    };
    zult.context("serializing to json")?;
    dest.flush().context("flushing output")
}

pub fn dump(
    reader: &PodReader,
    input: &Path,
    table: &Table,
    output: Option<&Path>,
    clobber: bool,
) -> Result<()> {
    let bundle = reader
        .read(input)
        .with_context(|| format!("decoding {input:?}"))?;
    info!(
        "decoded {} clicks, {} minutes from {input:?}",
        bundle.clicks.len(),
        bundle.env.len()
    );

    match output {
        Some(path) => {
            if !clobber && path.exists() {
                bail!("{path:?} exists; use --clobber");
            }
            let dest = File::create(path)
                .with_context(|| format!("failed to create output {path:?}"))?;
            write_table(&bundle, table, BufWriter::new(dest))
        }
        None => write_table(&bundle, table, stdout().lock()),
    }
}
