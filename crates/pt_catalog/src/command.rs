//! The command catalog: every legacy command the Command Library provides.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// One command exposed by the Command Library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Bare command name as the legacy dialect spells it (`Current date`).
    pub name: String,
    /// Versioned identifier found in tokenized source (`Current date:C33`).
    pub id: String,
    /// Path of the implementing module, relative to the library root.
    /// Left empty in configuration to use `commands/<ident>.js`.
    #[serde(default)]
    pub path: String,
}

impl CommandEntry {
    pub fn new(name: &str, number: u32) -> Self {
        let mut entry = Self {
            name: name.to_string(),
            id: format!("{name}:C{number}"),
            path: String::new(),
        };
        entry.path = entry.default_path();
        entry
    }

    /// Host-language identifier the command is imported and called as.
    ///
    /// Names that would clash with a reserved word or a standard global get a
    /// trailing `_` (`String` → `String_`).
    pub fn ident(&self) -> String {
        let mut ident: String = self
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
            .collect();
        if ident.starts_with(|c: char| c.is_ascii_digit()) {
            ident.insert(0, '_');
        }
        if RESERVED.contains(&ident.as_str()) {
            ident.push('_');
        }
        ident
    }

    fn default_path(&self) -> String {
        format!("commands/{}.js", self.ident())
    }
}

/// ES reserved words and the globals a module-level import would shadow.
const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval", "undefined", "NaN", "Infinity", "globalThis", "Array", "BigInt", "Boolean", "Date",
    "Error", "Function", "JSON", "Map", "Math", "Number", "Object", "Promise", "Proxy",
    "Reflect", "RegExp", "Set", "String", "Symbol", "WeakMap", "WeakSet", "console", "process",
    "require", "module", "fetch", "Request", "Response", "Headers", "URL", "Buffer",
];

const BUILTIN: &[(&str, u32)] = &[
    ("ALERT", 41),
    ("CONFIRM", 162),
    ("Request", 163),
    ("TRACE", 157),
    ("BEEP", 151),
    ("ALL RECORDS", 47),
    ("QUERY", 277),
    ("QUERY SELECTION", 341),
    ("ORDER BY", 49),
    ("FIRST RECORD", 50),
    ("NEXT RECORD", 51),
    ("PREVIOUS RECORD", 110),
    ("LAST RECORD", 200),
    ("GOTO RECORD", 242),
    ("Record number", 243),
    ("Records in selection", 76),
    ("Records in table", 83),
    ("End selection", 36),
    ("CREATE RECORD", 68),
    ("SAVE RECORD", 53),
    ("DELETE RECORD", 58),
    ("READ ONLY", 145),
    ("READ WRITE", 146),
    ("LOAD RECORD", 52),
    ("UNLOAD RECORD", 212),
    ("START TRANSACTION", 239),
    ("VALIDATE TRANSACTION", 240),
    ("CANCEL TRANSACTION", 241),
    ("In transaction", 397),
    ("Create document", 266),
    ("Open document", 264),
    ("Append document", 265),
    ("CLOSE DOCUMENT", 267),
    ("SEND PACKET", 103),
    ("RECEIVE PACKET", 104),
    ("Document to text", 1236),
    ("TEXT TO DOCUMENT", 1237),
    ("Test path name", 476),
    ("HTTP Get", 1157),
    ("HTTP Request", 1158),
    ("Length", 16),
    ("Substring", 12),
    ("Position", 15),
    ("Uppercase", 13),
    ("Lowercase", 14),
    ("Replace string", 233),
    ("Char", 90),
    ("Character code", 91),
    ("String", 10),
    ("Num", 11),
    ("Current date", 33),
    ("Current time", 178),
    ("Add to date", 393),
    ("Milliseconds", 459),
    ("Timestamp", 1445),
    ("DELAY PROCESS", 323),
    ("Current method name", 684),
    ("Count parameters", 259),
    ("Generate UUID", 1066),
    ("New object", 1471),
    ("New collection", 1472),
    ("OB Get", 1224),
    ("OB SET", 1220),
    ("OB Is defined", 1231),
    ("JSON Stringify", 1217),
    ("JSON Parse", 1218),
    ("Size of array", 274),
    ("APPEND TO ARRAY", 911),
    ("INSERT IN ARRAY", 227),
    ("DELETE FROM ARRAY", 228),
    ("Find in array", 230),
    ("SORT ARRAY", 229),
    ("ARRAY TEXT", 222),
    ("ARRAY LONGINT", 221),
    ("ARRAY REAL", 219),
    ("ARRAY BOOLEAN", 223),
    ("ON ERR CALL", 155),
    ("Undefined", 82),
];

/// Catalog entries plus a longest-first lookup index.
///
/// Identifiers may be textual prefixes of one another (`String:C1` and
/// `String:C10`), so lookups always try longer identifiers first. Entries
/// sharing a host identifier must share a module path.
#[derive(Debug, Clone, Default)]
pub struct CommandCatalog {
    entries: Vec<CommandEntry>,
    by_first_char: HashMap<char, Vec<usize>>,
}

impl CommandCatalog {
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (name, number) in BUILTIN {
            // Built-in identifiers are unique.
            let _ = catalog.insert(CommandEntry::new(name, *number));
        }
        catalog
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = CommandEntry>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, mut entry: CommandEntry) -> Result<(), CatalogError> {
        let Some(first) = entry.id.chars().next() else {
            return Err(CatalogError::EmptyIdentifier { name: entry.name });
        };
        if self.get(&entry.id).is_some() {
            return Err(CatalogError::DuplicateCommand { id: entry.id });
        }
        if entry.path.is_empty() {
            entry.path = entry.default_path();
        }
        let ident = entry.ident();
        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.path != entry.path && e.ident() == ident)
        {
            return Err(CatalogError::IdentCollision {
                ident,
                id: entry.id,
                existing: existing.id.clone(),
            });
        }

        let index = self.entries.len();
        self.entries.push(entry);

        let bucket = self.by_first_char.entry(first).or_default();
        bucket.push(index);
        let entries = &self.entries;
        bucket.sort_by(|a, b| entries[*b].id.len().cmp(&entries[*a].id.len()));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Find the longest identifier that `rest` starts with.
    ///
    /// A candidate only matches if the character after it is not a digit,
    /// so `String:C1` never matches the head of `String:C10`.
    pub fn match_at(&self, rest: &str) -> Option<&CommandEntry> {
        let first = rest.chars().next()?;
        let bucket = self.by_first_char.get(&first)?;
        bucket.iter().map(|&i| &self.entries[i]).find(|entry| {
            rest.starts_with(entry.id.as_str())
                && !rest[entry.id.len()..].starts_with(|c: char| c.is_ascii_digit())
        })
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
