//! Fixed-string substitution restricted to code regions.

use pt_catalog::{DeclarationTable, LiteralTable};
use pt_lexer::segments;

/// Apply every literal rule in table order, replacing all occurrences.
pub fn apply_literals(source: &str, table: &LiteralTable) -> String {
    table.iter().fold(source.to_string(), |text, rule| {
        replace_in_code(&text, &rule.from, &rule.to)
    })
}

/// Rewrite versioned legacy type keywords to their bare form
/// (`C_LONGINT:C283` → `C_LONGINT`) so the declaration pass sees one spelling.
pub fn normalize_legacy_keywords(source: &str, table: &DeclarationTable) -> String {
    table.legacy_rules().fold(source.to_string(), |text, rule| {
        match rule.versioned.as_deref() {
            Some(versioned) if !versioned.is_empty() => {
                replace_in_code(&text, versioned, &rule.keyword)
            }
            _ => text,
        }
    })
}

fn replace_in_code(source: &str, from: &str, to: &str) -> String {
    if !source.contains(from) {
        return source.to_string();
    }
    let mut result = String::with_capacity(source.len());
    for segment in segments(source) {
        let text = segment.text(source);
        if segment.is_code() {
            result.push_str(&text.replace(from, to));
        } else {
            result.push_str(text);
        }
    }
    result
}
