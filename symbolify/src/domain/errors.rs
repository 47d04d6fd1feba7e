//! Structured error types for symbolify
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolifyError {
    #[error("Failed to run disassembler '{program}': {source}")]
    DisassemblerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Disassembler '{program}' failed on {} ({status})", .binary.display())]
    DisassemblerFailed { program: String, binary: PathBuf, status: ExitStatus },

    #[error("Failed to read disassembly from {}: {source}", .path.display())]
    DisassemblyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid load offset '{0}': expected a hexadecimal value such as 0x40080000 or -1000")]
    InvalidOffset(String),

    #[error("No symbol sources given: pass at least one BINARY or --disassembly FILE")]
    NoSymbolSources,
}
