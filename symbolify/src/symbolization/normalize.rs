//! Address key width normalization
//!
//! Logs print the same address as `1000`, `00001000` or `0x00001000`. The
//! table is extended so that each of those spellings is a direct hit.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::SymbolTable;
use crate::domain::SymbolEntry;

/// Width every short key is additionally padded to.
pub const CANONICAL_WIDTH: usize = 8;

/// Strip leading zeros, keeping at least one digit.
#[must_use]
pub fn strip_leading_zeros(key: &str) -> &str {
    let stripped = key.trim_start_matches('0');
    if stripped.is_empty() && !key.is_empty() {
        &key[key.len() - 1..]
    } else {
        stripped
    }
}

/// Return a copy of `table` where every key can also be found stripped of
/// leading zeros and, if shorter than [`CANONICAL_WIDTH`], padded to it.
///
/// Keys that spell the same address (`1000`, `0001000`, `00001000`) are
/// folded into one group. Every spelling in the group, plus the stripped and
/// padded forms, then maps to the entry of the group's most recently written
/// key. Running this twice changes nothing.
#[must_use]
pub fn normalize_keys(table: &SymbolTable) -> SymbolTable {
    let mut groups: BTreeMap<&str, (Rc<SymbolEntry>, Vec<&str>)> = BTreeMap::new();
    for (key, entry) in table.write_order() {
        let (latest, spellings) = groups
            .entry(strip_leading_zeros(key))
            .or_insert_with(|| (Rc::clone(entry), Vec::new()));
        *latest = Rc::clone(entry);
        spellings.push(key);
    }

    let mut normalized = table.clone();
    for (stripped, (entry, spellings)) in groups {
        let padded = (stripped.len() < CANONICAL_WIDTH)
            .then(|| format!("{stripped:0>width$}", width = CANONICAL_WIDTH));
        let derived = [Some(stripped.to_string()), padded].into_iter().flatten();

        for key in spellings.into_iter().map(str::to_string).chain(derived) {
            normalized.insert_shared(key, Rc::clone(&entry));
        }
    }

    normalized
}
