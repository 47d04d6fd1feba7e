//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::disassembly::ParseOptions;
use crate::domain::LoadOffset;
use crate::objdump::{Disassembler, SymbolSource, DEFAULT_OBJDUMP};

#[derive(Parser, Debug)]
#[command(
    name = "symbolify",
    about = "Annotate hex addresses in a log with symbols from a binary's disassembly",
    after_help = "\
EXAMPLES:
    qemu-system-aarch64 ... | symbolify 0 build/kernel.elf
    symbolify 0x40080000 build/loader.elf < crash.log
    symbolify -1000 --disassembly kernel.dis --input trace.txt"
)]
pub struct Args {
    /// Load offset added to every disassembly address (hex, may be negative)
    #[arg(value_name = "OFFSET", allow_hyphen_values = true, value_parser = parse_offset)]
    pub offset: LoadOffset,

    /// Binaries to disassemble, in order; later ones win on equal addresses
    #[arg(value_name = "BINARY")]
    pub binaries: Vec<PathBuf>,

    /// Pre-made disassembly listing, used after the binaries (repeatable)
    #[arg(long, value_name = "FILE")]
    pub disassembly: Vec<PathBuf>,

    /// Disassembler program
    #[arg(long, value_name = "PROGRAM", env = "SYMBOLIFY_OBJDUMP", default_value = DEFAULT_OBJDUMP)]
    pub objdump: String,

    /// Replace the default disassembler flags (-C -d); repeat once per flag
    #[arg(long = "objdump-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub objdump_args: Vec<String>,

    /// Read the log from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Demangle Rust symbol names
    #[arg(long)]
    pub demangle: bool,

    /// Print the final symbol table instead of annotating
    #[arg(long)]
    pub dump: bool,
}

fn parse_offset(s: &str) -> Result<LoadOffset, String> {
    s.parse::<LoadOffset>().map_err(|e| e.to_string())
}

impl Args {
    /// Symbol sources in the order they are merged: binaries first, then
    /// listings.
    #[must_use]
    pub fn symbol_sources(&self) -> Vec<SymbolSource> {
        self.binaries
            .iter()
            .cloned()
            .map(SymbolSource::Binary)
            .chain(self.disassembly.iter().cloned().map(SymbolSource::Disassembly))
            .collect()
    }

    #[must_use]
    pub fn disassembler(&self) -> Disassembler {
        let disassembler = Disassembler::new(self.objdump.clone());
        if self.objdump_args.is_empty() {
            disassembler
        } else {
            disassembler.with_args(self.objdump_args.iter().cloned())
        }
    }

    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions { demangle: self.demangle }
    }
}
