//! Project configuration, read from `porter.json`.

use serde::{Deserialize, Serialize};

use crate::{CatalogError, CommandEntry, DeclarationRule, LiteralRule, RewriteTables};

pub const DEFAULT_SOURCE_EXTENSION: &str = "4dm";
pub const DEFAULT_LIBRARY_DIR: &str = "lib";

/// Flags selecting which rewrite passes run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Passes {
    pub literals: bool,
    pub declarations: bool,
    pub commands: bool,
}

impl Default for Passes {
    fn default() -> Self {
        Self {
            literals: true,
            declarations: true,
            commands: true,
        }
    }
}

/// Everything a project can override. Each list extends the built-in tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PorterConfig {
    /// Extension (without the dot) identifying legacy source files.
    pub source_extension: Option<String>,
    /// Directory name the Command Library is copied to in the output tree.
    pub library_dir: Option<String>,
    pub passes: Passes,
    pub commands: Vec<CommandEntry>,
    pub literals: Vec<LiteralRule>,
    pub types: Vec<DeclarationRule>,
}

impl PorterConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn source_extension(&self) -> &str {
        self.source_extension
            .as_deref()
            .map(|ext| ext.trim_start_matches('.'))
            .unwrap_or(DEFAULT_SOURCE_EXTENSION)
    }

    pub fn library_dir(&self) -> &str {
        self.library_dir.as_deref().unwrap_or(DEFAULT_LIBRARY_DIR)
    }

    /// Built-in tables extended with this configuration's entries.
    pub fn tables(&self) -> Result<RewriteTables, CatalogError> {
        let mut tables = RewriteTables::builtin();
        for rule in &self.types {
            tables.declarations.insert(rule.clone())?;
        }
        for rule in &self.literals {
            tables.literals.push(rule.clone())?;
        }
        for entry in &self.commands {
            tables.catalog.insert(entry.clone())?;
        }
        Ok(tables)
    }
}
