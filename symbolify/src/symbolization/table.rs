//! Address key -> symbol mapping

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::domain::SymbolEntry;

#[derive(Debug, Clone)]
struct Slot {
    entry: Rc<SymbolEntry>,
    /// Position of the write that stored this entry, for last-writer-wins.
    revision: u64,
}

/// Mapping from a textual hex address to the symbol it resolves to
///
/// Keys are kept as strings because the same address is stored under several
/// spellings (`1000`, `00001000`) so that lookups from logs need no parsing.
/// Entries are shared between those spellings.
///
/// The table remembers the order keys were written in, so passes that fold
/// several keys into one address can let the most recent write win. Two
/// tables compare equal when they map the same keys to the same entries,
/// whatever order they were written in.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: BTreeMap<String, Slot>,
    next_revision: u64,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a key exactly as written. No width normalization happens here.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SymbolEntry> {
        self.entries.get(key).map(|slot| slot.entry.as_ref())
    }

    /// Insert or overwrite the entry for `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, entry: SymbolEntry) -> Option<Rc<SymbolEntry>> {
        self.insert_shared(key.into(), Rc::new(entry))
    }

    /// Insert or overwrite `key` with an entry shared with other keys.
    pub(crate) fn insert_shared(
        &mut self,
        key: String,
        entry: Rc<SymbolEntry>,
    ) -> Option<Rc<SymbolEntry>> {
        let revision = self.next_revision;
        self.next_revision += 1;
        self.entries.insert(key, Slot { entry, revision }).map(|previous| previous.entry)
    }

    /// Merge `other` into `self`; entries of `other` win on equal keys and
    /// count as written after everything already in `self`.
    pub fn merge(&mut self, other: SymbolTable) {
        for (key, entry) in other.write_order() {
            if let Some(previous) = self.get(key) {
                if previous != entry.as_ref() {
                    log::trace!("{key}: {previous} replaced by {entry}");
                }
            }
            self.insert_shared(key.to_string(), Rc::clone(entry));
        }
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> {
        self.entries.iter().map(|(key, slot)| (key.as_str(), slot.entry.as_ref()))
    }

    /// Keys with their shared entries, oldest write first.
    pub(crate) fn write_order(&self) -> Vec<(&str, &Rc<SymbolEntry>)> {
        let mut slots: Vec<(&str, &Slot)> =
            self.entries.iter().map(|(key, slot)| (key.as_str(), slot)).collect();
        slots.sort_by_key(|(_, slot)| slot.revision);
        slots.into_iter().map(|(key, slot)| (key, &slot.entry)).collect()
    }
}

impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for SymbolTable {}
