//! Load offset correction
//!
//! A binary disassembled at address 0 but running at 0x40080000 shows up in
//! logs with runtime addresses. Adding the offset to every key makes the table
//! answer for both address spaces at once.

use log::{debug, trace};
use std::rc::Rc;

use super::SymbolTable;
use crate::domain::LoadOffset;
use crate::hex::{format_address, parse_address};

/// Return a copy of `table` with one extra key per entry at `key + offset`.
///
/// Shifted keys are rendered as unpadded lowercase hex and written after
/// every existing key, so a shifted key that collides with an existing one
/// replaces its entry. Entries are always taken from `table`, never from a
/// key shifted earlier in the same pass. Keys that would leave the 64-bit
/// address space are skipped.
#[must_use]
pub fn apply_offset(table: &SymbolTable, offset: LoadOffset) -> SymbolTable {
    let mut shifted = table.clone();
    if offset.is_zero() {
        return shifted;
    }

    let mut skipped = 0usize;
    for (key, entry) in table.write_order() {
        let Some(addr) = parse_address(key).and_then(|addr| offset.apply(addr)) else {
            skipped += 1;
            continue;
        };
        if let Some(previous) = shifted.insert_shared(format_address(addr), Rc::clone(entry)) {
            trace!("{key} shifted onto an existing key, {previous} replaced by {entry}");
        }
    }

    if skipped > 0 {
        debug!("{skipped} keys could not be shifted by {offset}");
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SymbolEntry;

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.insert("00001000", SymbolEntry::Label("main".to_string()));
        table.insert(
            "1004",
            SymbolEntry::Instruction { function: "main".to_string(), ordinal: 0 },
        );
        table
    }

    #[test]
    fn test_zero_offset_is_identity() {
        let original = table();
        assert_eq!(apply_offset(&original, LoadOffset(0)), original);
    }

    #[test]
    fn test_positive_offset() {
        let shifted = apply_offset(&table(), LoadOffset(0x10000));
        assert_eq!(shifted.len(), 4);
        assert_eq!(shifted.get("11000").unwrap().to_string(), "main");
        assert_eq!(shifted.get("11004").unwrap().to_string(), "main+0");
        // Originals survive.
        assert_eq!(shifted.get("00001000").unwrap().to_string(), "main");
        assert_eq!(shifted.get("1004").unwrap().to_string(), "main+0");
    }

    #[test]
    fn test_negative_offset_skips_underflow() {
        let shifted = apply_offset(&table(), LoadOffset(-0x1002));
        assert_eq!(shifted.get("2").unwrap().to_string(), "main+0");
        // 0x1000 - 0x1002 is below zero.
        assert_eq!(shifted.len(), 3);
    }

    #[test]
    fn test_shifted_key_overwrites_existing() {
        let mut original = SymbolTable::new();
        original.insert("1000", SymbolEntry::Label("low".to_string()));
        original.insert("2000", SymbolEntry::Label("high".to_string()));

        let shifted = apply_offset(&original, LoadOffset(0x1000));
        assert_eq!(shifted.get("1000").unwrap().to_string(), "low");
        // 1000 + 0x1000 lands on 2000 and replaces it.
        assert_eq!(shifted.get("2000").unwrap().to_string(), "low");
        // 3000 comes from the unshifted 2000.
        assert_eq!(shifted.get("3000").unwrap().to_string(), "high");
    }

    #[test]
    fn test_shifted_spellings_collide_last_write_wins() {
        let mut original = SymbolTable::new();
        original.insert("00001000", SymbolEntry::Label("padded".to_string()));
        original.insert("1000", SymbolEntry::Label("bare".to_string()));

        let shifted = apply_offset(&original, LoadOffset(0x10000));
        assert_eq!(shifted.get("11000").unwrap().to_string(), "bare");
    }
}
