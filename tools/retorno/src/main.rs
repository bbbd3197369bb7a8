//! CLI tool for turning CNAB retorno files into CSV or JSON lines.
//!
//! # Usage
//!
//! ```bash
//! # Banco do Nordeste CNAB400 to CSV
//! cnab-retorno --input CNAB400BANCONORDESTE.RET --layout banco-nordeste --output out.csv
//!
//! # One JSON object per record on stdout
//! cat CNAB400BANCONORDESTE.RET | cnab-retorno --layout banco-nordeste --format json
//! ```

use std::fs::File;
use std::io::{Read, Write, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cnab::prelude::*;
use cnab::retorno::{by_name, write_csv, write_json_lines};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parse a fixed-width retorno file.
///
/// The first line is the file header and is skipped; the trailer is
/// recognized by the layout.
#[derive(Parser, Debug)]
#[command(name = "cnab-retorno")]
#[command(version, about)]
struct Args {
    /// Retorno file path. If not specified, reads from stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Column layout of the file (banco-nordeste).
    #[arg(short, long, value_parser = parse_layout)]
    layout: &'static RetornoLayout,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,

    /// Output file path. If not specified, writes to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Resolves `--layout` against the built-in layouts.
fn parse_layout(name: &str) -> Result<&'static RetornoLayout, String> {
    by_name(name).ok_or_else(|| format!("unknown layout '{name}', expected banco-nordeste"))
}

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// CSV with a header row of column names.
    Csv,
    /// One JSON object per line.
    Json,
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

    let layout = args.layout;
    let records = read_records(input, layout)?;

    // The output file is only touched once the whole input parsed
    let output: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout().lock()),
    };

    let count = write_records(&records, output, layout, args.format)?;

    // stdout may carry the records
    eprintln!("Parsed {count} record(s)");

    Ok(())
}

/// Reads every record of `input`.
fn read_records<R: Read>(input: R, layout: &RetornoLayout) -> Result<Vec<RetornoRecord>> {
    let records = RetornoReader::new(input, RetornoParser::new(layout))
        .collect::<CnabResult<Vec<_>>>()
        .context("Failed to parse retorno")?;
    info!(layout = layout.name(), records = records.len(), "parsed retorno");
    Ok(records)
}

/// Writes `records` in `format`.
fn write_records<W: Write>(
    records: &[RetornoRecord],
    output: W,
    layout: &RetornoLayout,
    format: FormatArg,
) -> Result<usize> {
    let written = match format {
        FormatArg::Csv => write_csv(layout, records, output),
        FormatArg::Json => write_json_lines(records, output),
    }
    .context("Failed to write output")?;
    Ok(written)
}
