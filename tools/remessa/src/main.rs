//! CLI tool that builds a CNAB240 remessa file from a JSON job.
//!
//! # Usage
//!
//! ```bash
//! # Write the remessa next to the job
//! cnab-remessa --input job.json --output COB0001.REM
//!
//! # Read the job from stdin, write the file to stdout
//! cat job.json | cnab-remessa > COB0001.REM
//!
//! # See what the assembler does
//! RUST_LOG=cnab=debug cnab-remessa -i job.json -o COB0001.REM
//! ```
//!
//! The job names the bank and carries settings, account and batches:
//!
//! ```json
//! {
//!   "bank": { "code": "sicoob", "parcel": "01", "form_type": "4" },
//!   "settings": { "generated_at": "2015-07-14T09:15:00", "file_sequence": 1 },
//!   "account": { "company_name": "...", "agency": "4327", "...": "..." },
//!   "batches": [ { "payments": [ { "amount": 5000, "...": "..." } ] } ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Write, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cnab::prelude::*;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build a CNAB240 remessa file from a JSON job.
///
/// Validates the whole job first; nothing is written when any field
/// is out of range.
#[derive(Parser, Debug)]
#[command(name = "cnab-remessa")]
#[command(version, about)]
struct Args {
    /// Job file path. If not specified, reads from stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file path. If not specified, writes to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Bank of the remessa and its parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "code", rename_all = "lowercase")]
enum BankArg {
    Sicoob {
        #[serde(default = "default_parcel")]
        parcel: String,
        #[serde(default = "default_form_type")]
        form_type: char,
    },
    Sicredi {
        station: String,
        #[serde(default = "default_byte_idt")]
        byte_idt: char,
    },
    Cecred,
}

fn default_parcel() -> String {
    "01".to_string()
}

fn default_form_type() -> char {
    '4'
}

fn default_byte_idt() -> char {
    '2'
}

impl BankArg {
    fn layout(&self) -> CnabResult<Box<dyn BankLayout>> {
        Ok(match self {
            Self::Sicoob { parcel, form_type } => Box::new(Sicoob::new(parcel, *form_type)?),
            Self::Sicredi { station, byte_idt } => Box::new(Sicredi::new(station, *byte_idt)?),
            Self::Cecred => Box::new(Cecred),
        })
    }
}

/// One remessa to build.
#[derive(Debug, Clone, Deserialize)]
struct Job {
    bank: BankArg,
    settings: FileSettings,
    account: AccountConfig,
    batches: Vec<Batch>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let input: Box<dyn Read> = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdin().lock()),
    };
    let job = read_job(input)?;

    // The output file is only created for a valid job
    let file = build(&job)?;

    let output: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout().lock()),
    };
    let count = file.write_to(output).context("Failed to write remessa")?;

    eprintln!("Wrote {count} line(s)");

    Ok(())
}

/// Parses the JSON job.
fn read_job<R: Read>(input: R) -> Result<Job> {
    serde_json::from_reader(BufReader::new(input)).context("Failed to parse job")
}

/// Validates the job and assembles the file in memory.
fn build(job: &Job) -> Result<RemessaFile> {
    let layout = job.bank.layout().context("Invalid bank parameters")?;
    info!(bank = layout.bank_name(), batches = job.batches.len(), "building remessa");
    RemessaAssembler::new(layout.as_ref(), &job.account, &job.settings)
        .assemble(&job.batches)
        .context("Failed to build remessa")
}
