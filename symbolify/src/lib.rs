//! # symbolify - Annotate Addresses in Logs with Disassembly Symbols
//!
//! symbolify reads crash logs, register dumps or trace output that contain
//! bare hexadecimal addresses and appends the symbol each address belongs to.
//! The ground truth comes from the disassembly (`objdump -C -d`) of one or more
//! binaries: label lines give function names, instruction lines give the
//! addresses inside each function.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌────────────────────┐     ┌────────────────────┐
//! │  objdump -C -d bin │     │ pre-made .dis file │
//! └─────────┬──────────┘     └─────────┬──────────┘
//!           │ disassembly text         │
//!           ▼                          ▼
//! ┌─────────────────────────────────────────────────┐
//! │ disassembly: label / instruction state machine  │
//! └───────────────────────┬─────────────────────────┘
//!                         │ SymbolTable (raw keys)
//!                         ▼
//! ┌─────────────────────────────────────────────────┐
//! │ symbolization: apply load offset, then          │
//! │                normalize key widths             │
//! └───────────────────────┬─────────────────────────┘
//!                         │ SymbolTable (final, read-only)
//!                         ▼
//! ┌─────────────────────────────────────────────────┐
//! │ annotate: stdin ──▶ `line | 1004 -> main+0` ──▶ │
//! │           stdout, one line in, one line out     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`hex`]: hex token recognition shared by the parser and the annotator
//! - [`disassembly`]: turns disassembly text into a [`SymbolTable`]
//! - [`symbolization`]: the table itself, load offset correction, key
//!   normalization and the pipeline that composes them in the right order
//! - [`annotate`]: streaming line annotator
//! - [`objdump`]: symbol sources and the disassembler subprocess
//! - [`cli`]: command-line argument definitions
//! - [`domain`]: core types ([`SymbolEntry`], [`LoadOffset`]) and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Kernel loaded at its link address
//! qemu-system-aarch64 ... | symbolify 0 build/kernel.elf
//!
//! # Image linked at 0 but running at 0x40080000
//! symbolify 0x40080000 build/loader.elf < crash.log
//! ```
//!
//! [`SymbolTable`]: symbolization::SymbolTable
//! [`SymbolEntry`]: domain::SymbolEntry
//! [`LoadOffset`]: domain::LoadOffset

/// Declare a lazily compiled, process-wide regex.
macro_rules! static_regex {
    ($name:ident, $str:expr) => {
        static $name: ::once_cell::sync::Lazy<::regex::Regex> =
            ::once_cell::sync::Lazy::new(|| ::regex::Regex::new($str).unwrap());
    };
    (bytes $name:ident, $str:expr) => {
        static $name: ::once_cell::sync::Lazy<::regex::bytes::Regex> =
            ::once_cell::sync::Lazy::new(|| ::regex::bytes::Regex::new($str).unwrap());
    };
}

pub mod annotate;
pub mod cli;
pub mod disassembly;
pub mod domain;
pub mod hex;
pub mod objdump;
pub mod symbolization;
