//! # Symbol Table Construction
//!
//! The table that log lines are matched against is built in three steps,
//! each a pure function from one table to the next:
//!
//! ```text
//! 1. build       disassembly text -> raw keys as printed by objdump
//!                00001000 -> main, 00001004 -> main+0
//!
//! 2. offset      + one key per entry at key + load offset
//!                (offset 0x10000) 11000 -> main, 11004 -> main+0
//!
//! 3. normalize   + stripped and 8-digit padded spellings of every key;
//!                all spellings of one address share its latest entry
//!                1000, 1004, 00011000, 00011004 ...
//! ```
//!
//! The order matters: normalizing before offsetting would leave the shifted
//! keys without their padded spellings. [`build_table`] and
//! [`finalize_table`] fix the order so callers cannot get it wrong.
//!
//! ## Why String Keys
//!
//! The annotator looks up tokens exactly as they appear in the log, so the
//! table stores every spelling a log is likely to use instead of parsing and
//! re-formatting each token. Lookups are a single map probe.

pub mod normalize;
pub mod offset;
pub mod table;

pub use normalize::{normalize_keys, strip_leading_zeros, CANONICAL_WIDTH};
pub use offset::apply_offset;
pub use table::SymbolTable;

use log::{debug, warn};

use crate::disassembly::{parse_disassembly, ParseOptions};
use crate::domain::{LoadOffset, SymbolifyError};
use crate::objdump::{Disassembler, SymbolSource};

/// Apply the load offset, then normalize key widths.
#[must_use]
pub fn finalize_table(raw: &SymbolTable, offset: LoadOffset) -> SymbolTable {
    let shifted = apply_offset(raw, offset);
    debug!("{} keys after applying offset {offset}", shifted.len());

    let normalized = normalize_keys(&shifted);
    debug!("{} keys after normalization", normalized.len());
    normalized
}

/// Load every source in order, parse it, merge the results and finalize the
/// table for lookups.
///
/// # Errors
/// Fails on the first source that cannot be loaded. No partial table is
/// returned.
pub fn build_table(
    sources: &[SymbolSource],
    disassembler: &Disassembler,
    offset: LoadOffset,
    options: ParseOptions,
) -> Result<SymbolTable, SymbolifyError> {
    if sources.is_empty() {
        return Err(SymbolifyError::NoSymbolSources);
    }

    let mut raw = SymbolTable::new();
    for source in sources {
        let text = source.load(disassembler)?;
        let table = parse_disassembly(&text, options);
        if table.is_empty() {
            warn!("{source}: no labels or instructions found");
        } else {
            debug!("{source}: {} symbol keys", table.len());
        }
        raw.merge(table);
    }
    debug!("{} keys from {} sources", raw.len(), sources.len());

    Ok(finalize_table(&raw, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disassembly::build_symbol_table;

    const LISTING: &str = "00001000 <main>:\n    1004:\tmov\n    1008:\tret\n";

    #[test]
    fn test_finalize_scenario() {
        let raw = build_symbol_table([LISTING], ParseOptions::default());
        let table = finalize_table(&raw, LoadOffset(0));

        assert_eq!(table.get("1000").unwrap().to_string(), "main");
        assert_eq!(table.get("1004").unwrap().to_string(), "main+0");
        assert_eq!(table.get("1008").unwrap().to_string(), "main+1");
        assert_eq!(table.get("00001004").unwrap().to_string(), "main+0");
    }

    #[test]
    fn test_finalize_normalizes_shifted_keys() {
        let raw = build_symbol_table([LISTING], ParseOptions::default());
        let table = finalize_table(&raw, LoadOffset(0x10000));

        assert_eq!(table.get("11004").unwrap().to_string(), "main+0");
        assert_eq!(table.get("00011004").unwrap().to_string(), "main+0");
        assert_eq!(table.get("1004").unwrap().to_string(), "main+0");
    }

    #[test]
    fn test_width_invariance() {
        let raw = build_symbol_table([LISTING], ParseOptions::default());
        let table = finalize_table(&raw, LoadOffset(0));

        for (key, entry) in raw.iter() {
            let stripped = strip_leading_zeros(key);
            assert_eq!(table.get(stripped), Some(entry), "{key} stripped");
            if stripped.len() < CANONICAL_WIDTH {
                let padded = format!("{stripped:0>8}");
                assert_eq!(table.get(&padded), Some(entry), "{key} padded");
            }
        }
    }

    fn assert_width_invariant(table: &SymbolTable) {
        for (key, _) in table.iter() {
            let stripped = strip_leading_zeros(key);
            assert_eq!(table.get(key), table.get(stripped), "{key} stripped");
            if stripped.len() < CANONICAL_WIDTH {
                let padded = format!("{stripped:0>8}");
                assert_eq!(table.get(stripped), table.get(&padded), "{key} padded");
            }
        }
    }

    #[test]
    fn test_shifted_key_collides_with_padded_label() {
        let text = "00001000 <main>:\n    1004:\tnop\n00011004 <other>:\n";
        let raw = build_symbol_table([text], ParseOptions::default());
        let table = finalize_table(&raw, LoadOffset(0x10000));

        assert_width_invariant(&table);
        // The shifted key is written last.
        assert_eq!(table.get("11004").unwrap().to_string(), "main+0");
        assert_eq!(table.get("00011004").unwrap().to_string(), "main+0");
    }

    #[test]
    fn test_listings_print_same_address_at_different_widths() {
        let raw = build_symbol_table(["  1000:\tnop\n", "00001000 <main>:\n"], ParseOptions::default());
        let table = finalize_table(&raw, LoadOffset(0));

        assert_width_invariant(&table);
        assert_eq!(table.get("1000").unwrap().to_string(), "main");
        assert_eq!(table.get("00001000").unwrap().to_string(), "main");
    }

    #[test]
    fn test_build_table_requires_sources() {
        let err = build_table(&[], &Disassembler::default(), LoadOffset(0), ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, SymbolifyError::NoSymbolSources));
    }
}
