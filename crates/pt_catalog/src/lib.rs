//! Static tables driving the porter rewrite pipeline.
//!
//! Everything here is data. The tables are built once at startup, optionally
//! extended from a [`PorterConfig`], and then only ever read:
//!
//! - [`DeclarationTable`]: type keyword → host default value, for the legacy
//!   `C_TYPE($a;$b)` syntax and the modern `var $a : Type` syntax
//! - [`LiteralTable`]: fixed legacy tokens → fixed host-language text
//! - [`CommandCatalog`]: every command the Command Library exposes
//! - [`ImportManifest`]: the per-file set of commands a rewritten file imports

pub mod command;
pub mod config;
pub mod decl;
pub mod error;
pub mod literal;
pub mod manifest;

pub use command::{CommandCatalog, CommandEntry};
pub use config::{Passes, PorterConfig};
pub use decl::{DeclDialect, DeclarationRule, DeclarationTable};
pub use error::CatalogError;
pub use literal::{LiteralRule, LiteralTable};
pub use manifest::ImportManifest;

/// The full set of read-only tables a rewrite consults.
#[derive(Debug, Clone)]
pub struct RewriteTables {
    pub declarations: DeclarationTable,
    pub literals: LiteralTable,
    pub catalog: CommandCatalog,
}

impl RewriteTables {
    /// Tables containing only the built-in entries.
    pub fn builtin() -> Self {
        Self {
            declarations: DeclarationTable::builtin(),
            literals: LiteralTable::builtin(),
            catalog: CommandCatalog::builtin(),
        }
    }
}

impl Default for RewriteTables {
    fn default() -> Self {
        Self::builtin()
    }
}
