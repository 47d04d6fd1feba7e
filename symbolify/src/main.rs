//! # symbolify - Main Entry Point
//!
//! Builds the symbol table once (disassemble -> parse -> offset -> normalize),
//! then streams the log from stdin (or `--input`) to stdout, annotating each
//! line. With `--dump` the table is printed instead.
//!
//! Diagnostics go to stderr and are controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use symbolify::annotate::{AnnotateStats, Annotator};
use symbolify::cli::Args;
use symbolify::domain::SymbolifyError;
use symbolify::symbolization::{build_table, SymbolTable};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SymbolifyError>() {
        Some(SymbolifyError::NoSymbolSources) => EXIT_USAGE,
        _ => EXIT_ERROR,
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let sources = args.symbol_sources();
    if sources.is_empty() {
        return Err(SymbolifyError::NoSymbolSources.into());
    }

    let table = build_table(&sources, &args.disassembler(), args.offset, args.parse_options())
        .context("Failed to build symbol table")?;
    info!("Symbol table ready: {} keys (load offset {})", table.len(), args.offset);

    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());

    let result = if args.dump {
        dump_table(&table, writer).map(|()| None)
    } else {
        let annotator = Annotator::new(&table);
        match &args.input {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                annotator.annotate_stream(BufReader::new(file), writer).map(Some)
            }
            None => annotator.annotate_stream(io::stdin().lock(), writer).map(Some),
        }
    };

    match result {
        Ok(stats) => {
            if let Some(AnnotateStats { lines, annotated_lines, annotations }) = stats {
                info!("{lines} lines read, {annotated_lines} annotated ({annotations} symbols)");
            }
            Ok(())
        }
        // The reader of our output went away (e.g. `| head`); nothing left to do.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e).context("Failed to annotate input"),
    }
}

/// Print every key of the table as `key -> symbol`, sorted by key.
fn dump_table<W: Write>(table: &SymbolTable, mut writer: W) -> io::Result<()> {
    for (key, entry) in table.iter() {
        writeln!(writer, "{key} -> {entry}")?;
    }
    writer.flush()
}
