//! # treecast CLI Entry Point
//!
//! Binary entry point for the treecast converter.
//!
//! ## Usage
//!
//! ```bash
//! # Stream converted records
//! treecast events.json events
//!
//! # Print the derived schema only
//! treecast --mode=schema events.json events
//!
//! # Convert a sub-range, renaming the root record
//! treecast --start=100 --end=200 --name=Event --ns=physics events.json events
//! ```

use eyre::{bail, Result, WrapErr};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use treecast::driver::{convert, ConvertOptions, Mode};
use treecast::reader::MemoryDataset;
use treecast::DatasetReader;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let mut options = ConvertOptions::default();
    let mut dataset_path: Option<PathBuf> = None;
    let mut table: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("treecast {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            arg if arg.starts_with("--mode=") => {
                options.mode = match &arg["--mode=".len()..] {
                    "schema" => Mode::Schema,
                    "data" => Mode::Data,
                    other => bail!("Unknown mode: {} (expected schema or data)", other),
                };
            }
            arg if arg.starts_with("--start=") => {
                options.start = Some(parse_entry(&arg["--start=".len()..], "--start")?);
            }
            arg if arg.starts_with("--end=") => {
                options.end = Some(parse_entry(&arg["--end=".len()..], "--end")?);
            }
            arg if arg.starts_with("--name=") => {
                options.schema_name = Some(arg["--name=".len()..].to_string());
            }
            arg if arg.starts_with("--ns=") => {
                options.namespace = Some(arg["--ns=".len()..].to_string());
            }
            arg if arg.starts_with('-') => {
                bail!("Unknown option: {}", arg);
            }
            value => {
                if dataset_path.is_none() {
                    dataset_path = Some(PathBuf::from(value));
                } else if table.is_none() {
                    table = Some(value.to_string());
                } else {
                    bail!("Unexpected argument: {}", value);
                }
            }
        }
        i += 1;
    }

    let (Some(dataset_path), Some(table)) = (dataset_path, table) else {
        print_usage();
        return Ok(());
    };

    let dataset = MemoryDataset::from_path(&dataset_path)
        .wrap_err_with(|| format!("failed to load dataset at {:?}", dataset_path))?;
    if dataset.name() != table {
        bail!(
            "dataset at {:?} holds table `{}`, not `{}`",
            dataset_path,
            dataset.name(),
            table
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    convert(&dataset, &options, &mut out)?;
    out.flush()?;

    Ok(())
}

fn parse_entry(text: &str, flag: &str) -> Result<u64> {
    text.parse::<u64>()
        .wrap_err_with(|| format!("{flag} expects a non-negative entry number, got `{text}`"))
}

fn print_usage() {
    println!("treecast - Typed columnar tree converter");
    println!();
    println!("USAGE:");
    println!("    treecast [OPTIONS] <DATASET> <TABLE>");
    println!();
    println!("ARGS:");
    println!("    <DATASET>    Path to the dataset document");
    println!("    <TABLE>      Name of the table to convert");
    println!();
    println!("OPTIONS:");
    println!("    --mode=MODE      schema (declaration only) or data (records); default data");
    println!("    --start=N        First entry to convert (inclusive, default 0)");
    println!("    --end=N          End of the entry range (exclusive, default: all)");
    println!("    --name=NAME      Root record type name (default: table name)");
    println!("    --ns=NAMESPACE   Dot-separated namespace for record identities");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
    println!();
    println!("EXAMPLES:");
    println!("    treecast events.json events                 Convert every entry");
    println!("    treecast --mode=schema events.json events   Print the schema");
}
