use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// `C_XXX(...)` with a keyword missing from the legacy table.
    UnknownLegacyType,
    /// `var $x : Foo` with a type missing from the modern table.
    UnknownType,
}

/// Advisory report about a line the pipeline left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub keyword: String,
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            DiagnosticKind::UnknownLegacyType => "unknown declaration keyword",
            DiagnosticKind::UnknownType => "unknown type",
        };
        write!(
            f,
            "{}:{}: {what} '{}', line left unchanged",
            self.path.display(),
            self.line,
            self.keyword
        )
    }
}
