//! # Disassembly Parsing
//!
//! Turns the textual output of `objdump -C -d` into a [`SymbolTable`].
//!
//! ## Recognized Lines
//!
//! ```text
//! 00001000 <main>:              label: 1000 -> main, ordinal reset to 0
//!     1004:  d2800000  mov ...  instruction: 1004 -> main+0
//!     1008:  d65f03c0  ret      instruction: 1008 -> main+1
//! Disassembly of section .text: anything else is skipped
//! ```
//!
//! The ordinal in `main+N` counts instructions since the label, not bytes.
//! Instructions seen before the first label belong to `<none>`.
//!
//! ## Multiple Binaries
//!
//! Each listing is parsed on its own (fresh state) and the resulting tables
//! are merged in order. When two listings define the same address key the
//! later one wins without complaint: this is usually the same region
//! disassembled twice.

mod parser;

pub use parser::{parse_disassembly, widen_address, DisassemblyParser, ParseOptions, NO_SYMBOL};

use crate::symbolization::SymbolTable;

/// Parse several listings and merge them, later listings overwriting earlier
/// ones on equal keys.
#[must_use]
pub fn build_symbol_table<'a, I>(listings: I, options: ParseOptions) -> SymbolTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = SymbolTable::new();
    for listing in listings {
        table.merge(parse_disassembly(listing, options));
    }
    table
}
