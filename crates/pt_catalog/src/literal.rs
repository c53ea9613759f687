//! Fixed-string substitutions applied before any structural rewrite.

use serde::{Deserialize, Serialize};

use crate::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralRule {
    pub from: String,
    pub to: String,
}

const BUILTIN: &[(&str, &str)] = &[
    ("True:C214", "true"),
    ("False:C215", "false"),
    ("Is Windows:C1573", "(process.platform === \"win32\")"),
    ("Is macOS:C1572", "(process.platform === \"darwin\")"),
    ("Abs:C99", "Math.abs"),
    ("Int:C8", "Math.floor"),
    ("Square root:C539", "Math.sqrt"),
    ("Sin:C17", "Math.sin"),
    ("Cos:C18", "Math.cos"),
    ("Tan:C19", "Math.tan"),
    ("Arctan:C20", "Math.atan"),
    ("Exp:C21", "Math.exp"),
    ("Log:C22", "Math.log"),
    (":=", "="),
];

/// Ordered list of substitutions. The first rule registered for a pattern wins.
#[derive(Debug, Clone, Default)]
pub struct LiteralTable {
    rules: Vec<LiteralRule>,
}

impl LiteralTable {
    pub fn builtin() -> Self {
        let rules = BUILTIN
            .iter()
            .map(|(from, to)| LiteralRule {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();
        Self { rules }
    }

    /// Append a rule. Returns `Ok(false)` when the pattern is already registered.
    pub fn push(&mut self, rule: LiteralRule) -> Result<bool, CatalogError> {
        if rule.from.is_empty() {
            return Err(CatalogError::EmptyPattern);
        }
        if self.rules.iter().any(|r| r.from == rule.from) {
            return Ok(false);
        }
        self.rules.push(rule);
        Ok(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiteralRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
