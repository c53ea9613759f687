//! Declaration table: type keyword → default value in the host language.

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Which declaration syntax a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclDialect {
    /// `C_LONGINT:C283($a;$b)`. Versioned command-style keywords.
    Legacy,
    /// `var $a, $b : Integer`. Unsuffixed type names.
    Modern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRule {
    /// Bare keyword (`C_LONGINT`) or type name (`Integer`).
    pub keyword: String,
    /// Tokenized form of a legacy keyword, e.g. `C_LONGINT:C283`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioned: Option<String>,
    /// Host-language expression every declared name is bound to.
    pub default: String,
    pub dialect: DeclDialect,
}

impl DeclarationRule {
    pub fn legacy(keyword: &str, versioned: &str, default: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            versioned: Some(versioned.to_string()),
            default: default.to_string(),
            dialect: DeclDialect::Legacy,
        }
    }

    pub fn modern(keyword: &str, default: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            versioned: None,
            default: default.to_string(),
            dialect: DeclDialect::Modern,
        }
    }
}

const LEGACY: &[(&str, &str, &str)] = &[
    ("C_LONGINT", "C_LONGINT:C283", "0"),
    ("C_INTEGER", "C_INTEGER:C282", "0"),
    ("C_REAL", "C_REAL:C285", "0"),
    ("C_TEXT", "C_TEXT:C284", "\"\""),
    ("C_STRING", "C_STRING:C293", "\"\""),
    ("C_BOOLEAN", "C_BOOLEAN:C305", "false"),
    ("C_DATE", "C_DATE:C307", "new Date(0)"),
    ("C_TIME", "C_TIME:C306", "0"),
    ("C_OBJECT", "C_OBJECT:C1216", "{}"),
    ("C_COLLECTION", "C_COLLECTION:C1488", "[]"),
    ("C_POINTER", "C_POINTER:C301", "null"),
    ("C_PICTURE", "C_PICTURE:C286", "null"),
    ("C_BLOB", "C_BLOB:C604", "new Uint8Array(0)"),
    ("C_VARIANT", "C_VARIANT:C1683", "undefined"),
];

const MODERN: &[(&str, &str)] = &[
    ("Integer", "0"),
    ("Real", "0"),
    ("Text", "\"\""),
    ("Boolean", "false"),
    ("Date", "new Date(0)"),
    ("Time", "0"),
    ("Object", "{}"),
    ("Collection", "[]"),
    ("Pointer", "null"),
    ("Picture", "null"),
    ("Blob", "new Uint8Array(0)"),
    ("Variant", "undefined"),
];

/// Both declaration dialects, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct DeclarationTable {
    legacy: Vec<DeclarationRule>,
    modern: Vec<DeclarationRule>,
}

impl DeclarationTable {
    pub fn builtin() -> Self {
        Self {
            legacy: LEGACY
                .iter()
                .map(|(kw, versioned, default)| DeclarationRule::legacy(kw, versioned, default))
                .collect(),
            modern: MODERN
                .iter()
                .map(|(kw, default)| DeclarationRule::modern(kw, default))
                .collect(),
        }
    }

    /// Add a rule, replacing any existing rule for the same keyword and dialect.
    pub fn insert(&mut self, rule: DeclarationRule) -> Result<(), CatalogError> {
        if rule.keyword.trim().is_empty() {
            return Err(CatalogError::EmptyKeyword);
        }
        let rules = match rule.dialect {
            DeclDialect::Legacy => &mut self.legacy,
            DeclDialect::Modern => &mut self.modern,
        };
        match rules.iter_mut().find(|r| r.keyword == rule.keyword) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
        Ok(())
    }

    /// Look up a legacy keyword by its bare or versioned spelling.
    pub fn legacy(&self, keyword: &str) -> Option<&DeclarationRule> {
        self.legacy
            .iter()
            .find(|r| r.keyword == keyword || r.versioned.as_deref() == Some(keyword))
    }

    /// Look up a modern type name. Matching ignores ASCII case.
    pub fn modern(&self, type_name: &str) -> Option<&DeclarationRule> {
        self.modern
            .iter()
            .find(|r| r.keyword.eq_ignore_ascii_case(type_name))
    }

    pub fn legacy_rules(&self) -> impl Iterator<Item = &DeclarationRule> {
        self.legacy.iter()
    }

    pub fn modern_rules(&self) -> impl Iterator<Item = &DeclarationRule> {
        self.modern.iter()
    }
}
