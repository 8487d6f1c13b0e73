mod dump;
mod info;

use std::io::stderr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header information and record counts for a FPOD/CPOD file.
    Info {
        /// Input FP1, FP3, CP1 or CP3 file
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: info::Format,
    },
    /// Write decoded records as JSON.
    Dump {
        /// Input FP1, FP3, CP1 or CP3 file
        input: PathBuf,

        /// Which records to write. `all` writes the header and all record tables.
        #[arg(short, long, default_value = "all")]
        table: dump::Table,

        /// Do not apply IPI to kHz and amplitude calibration to FPOD clicks.
        #[arg(long, action)]
        no_calibrate: bool,

        /// Decode using this format (FP1, FP3, CP1, CP3) rather than the file extension.
        #[arg(long, value_name = "format")]
        format: Option<podread::FileFormat>,

        /// Delete output file if it already exists
        #[arg(long, action)]
        clobber: bool,

        /// Output file path. Writes to stdout if not provided.
        #[arg(short, long, value_name = "path")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("PODREAD_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Info { input, format } => info::info(input, format),
        Commands::Dump {
            input,
            table,
            no_calibrate,
            format,
            clobber,
            output,
        } => {
            let reader = podread::PodReader::builder()
                .calibrate(!no_calibrate)
                .format(*format)
                .build();
            dump::dump(&reader, input, table, output.as_deref(), *clobber)
        }
    }
}
