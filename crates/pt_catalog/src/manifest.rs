//! Per-file set of commands a rewritten file must import.

use indexmap::IndexMap;

use crate::CommandEntry;

/// Insertion-ordered, keyed by the host identifier so a command is imported
/// at most once no matter how often (or under which identifier) it occurs.
/// The catalog guarantees that one host identifier names one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportManifest {
    entries: IndexMap<String, CommandEntry>,
}

impl ImportManifest {
    /// Record a referenced command. Returns `false` if it was already present.
    pub fn insert(&mut self, entry: &CommandEntry) -> bool {
        let ident = entry.ident();
        if self.entries.contains_key(&ident) {
            return false;
        }
        self.entries.insert(ident, entry.clone());
        true
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.entries.contains_key(ident)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.values()
    }

    /// Imported identifiers in first-reference order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
