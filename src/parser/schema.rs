//! Decoded pprof data: symbol table and raw stack samples.

use crate::utils::config::UNKNOWN_SYMBOL;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Address to symbol name mapping from the `--- symbol` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: HashMap<u64, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; a repeated address replaces the earlier symbol
    pub(crate) fn insert(&mut self, address: u64, symbol: String) -> Option<String> {
        self.symbols.insert(address, symbol)
    }

    pub fn get(&self, address: u64) -> Option<&str> {
        self.symbols.get(&address).map(String::as_str)
    }

    /// Symbol for `address`, or [`UNKNOWN_SYMBOL`] when the table has no entry
    pub fn resolve(&self, address: u64) -> &str {
        self.get(address).unwrap_or(UNKNOWN_SYMBOL)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

}

impl FromIterator<(u64, String)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

/// One stack-trace capture
///
/// `frames` is leaf-first and never holds the same symbol twice in a row.
/// `count` is 32 bits wide so any number of samples sums safely in a `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub count: u32,
    pub frames: Vec<String>,
}

impl RawSample {
    pub fn new(count: u32, frames: Vec<String>) -> Self {
        Self { count, frames }
    }

    /// Frames from the outermost caller down to the leaf
    pub fn root_first(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().rev().map(String::as_str)
    }
}

/// Everything read from one dump
#[derive(Debug, Clone)]
pub struct DecodedTrace {
    /// Value of the `binary=` header line
    pub binary: String,

    /// Canonical name of the charset used for the text sections
    pub encoding: String,

    pub symbols: SymbolTable,

    /// Samples in file order
    pub samples: Vec<RawSample>,
}

impl DecodedTrace {
    /// Sum of all sample counts
    pub fn total_samples(&self) -> u64 {
        total_count(&self.samples)
    }
}

pub(crate) fn total_count(samples: &[RawSample]) -> u64 {
    samples
        .iter()
        .fold(0u64, |acc, sample| acc.saturating_add(u64::from(sample.count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_to_unknown() {
        let table: SymbolTable = [(0x1, "main".to_string())].into_iter().collect();
        assert_eq!(table.resolve(0x1), "main");
        assert_eq!(table.resolve(0x2), UNKNOWN_SYMBOL);
        assert_eq!(table.get(0x2), None);
    }

    #[test]
    fn test_insert_last_write_wins() {
        let mut table = SymbolTable::new();
        assert!(table.insert(0x10, "old".to_string()).is_none());
        assert_eq!(table.insert(0x10, "new".to_string()).as_deref(), Some("old"));
        assert_eq!(table.resolve(0x10), "new");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_root_first() {
        let sample = RawSample::new(1, vec!["bar".into(), "foo".into(), "main".into()]);
        let order: Vec<&str> = sample.root_first().collect();
        assert_eq!(order, vec!["main", "foo", "bar"]);
    }

    #[test]
    fn test_total_samples_past_32_bits() {
        let trace = DecodedTrace {
            binary: "app".into(),
            encoding: "UTF-8".into(),
            symbols: SymbolTable::new(),
            samples: vec![
                RawSample::new(u32::MAX, vec!["a".into()]),
                RawSample::new(u32::MAX, vec!["b".into()]),
                RawSample::new(2, vec!["c".into()]),
            ],
        };
        assert_eq!(trace.total_samples(), 2 * u64::from(u32::MAX) + 2);
    }
}
