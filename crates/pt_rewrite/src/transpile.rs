use std::path::{Path, PathBuf};

use pt_catalog::{ImportManifest, Passes, RewriteTables};
use pt_lexer::{line_of, lines_inside_block_comment};
use tracing::{debug, warn};

use crate::rewrite::{command_pass, decl_pass, literal_pass};
use crate::rewrite::decl_pass::{DeclForm, DeclRewrite};
use crate::{Diagnostic, DiagnosticKind, RewriteError};

/// Read-only inputs shared by every file of a run.
#[derive(Debug, Clone)]
pub struct RewriteContext<'a> {
    pub tables: &'a RewriteTables,
    pub passes: &'a Passes,
    /// Prepended to each catalog path in the import preamble, e.g. `../lib/`.
    pub import_prefix: String,
}

/// Result of rewriting one source file.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    pub path: PathBuf,
    /// Import preamble, blank line, rewritten body.
    pub text: String,
    /// The import lines alone; empty when nothing is imported.
    pub preamble: String,
    pub manifest: ImportManifest,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrite one legacy source file.
///
/// 1. Literal substitution, then versioned type keywords → bare keywords.
/// 2. Declarations, line by line.
/// 3. Command invocations over the whole text, collecting the manifest.
/// 4. Prepend one import per manifest entry.
///
/// Unknown types only produce diagnostics. The file fails only when an
/// invocation's parenthesis is never closed.
pub fn rewrite(
    source: &str,
    path: &Path,
    ctx: &RewriteContext<'_>,
) -> Result<RewriteResult, RewriteError> {
    let tables = ctx.tables;
    let mut text = source.to_string();
    let mut diagnostics = Vec::new();

    if ctx.passes.literals {
        text = literal_pass::apply_literals(&text, &tables.literals);
    }

    if ctx.passes.declarations {
        text = literal_pass::normalize_legacy_keywords(&text, &tables.declarations);
        text = rewrite_declarations(&text, tables, path, &mut diagnostics);
    }

    let mut manifest = ImportManifest::default();
    if ctx.passes.commands {
        let rewritten = command_pass::rewrite_commands(&text, &tables.catalog).map_err(|e| {
            RewriteError::UnclosedInvocation {
                line: line_of(&e.text, e.offset),
                command: e.command,
                path: path.to_path_buf(),
            }
        })?;
        text = rewritten.text;
        manifest = rewritten.manifest;
    }

    let preamble = pt_emit::render_preamble(&manifest, &ctx.import_prefix).map_err(|source| {
        RewriteError::Emit {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let text = if preamble.is_empty() {
        text
    } else {
        format!("{preamble}\n\n{text}")
    };

    debug!(
        path = %path.display(),
        imports = manifest.len(),
        diagnostics = diagnostics.len(),
        "rewrote file"
    );

    Ok(RewriteResult {
        path: path.to_path_buf(),
        text,
        preamble,
        manifest,
        diagnostics,
    })
}

fn rewrite_declarations(
    source: &str,
    tables: &RewriteTables,
    path: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let in_comment = lines_inside_block_comment(source);
    let mut result = String::with_capacity(source.len());

    for (index, raw) in source.split_inclusive('\n').enumerate() {
        if in_comment.get(index).copied().unwrap_or(false) {
            result.push_str(raw);
            continue;
        }

        let body = raw
            .strip_suffix("\r\n")
            .or_else(|| raw.strip_suffix('\n'))
            .unwrap_or(raw);
        let ending = &raw[body.len()..];

        match decl_pass::rewrite_line(body, &tables.declarations) {
            DeclRewrite::Rewritten { line, names, .. } => {
                debug!(names = ?names, line = index + 1, "rewrote declaration");
                result.push_str(&line);
                result.push_str(ending);
            }
            DeclRewrite::Unresolved { form, keyword } => {
                let kind = match form {
                    DeclForm::Legacy => DiagnosticKind::UnknownLegacyType,
                    DeclForm::Assign | DeclForm::Default => DiagnosticKind::UnknownType,
                };
                let diagnostic = Diagnostic {
                    kind,
                    keyword,
                    path: path.to_path_buf(),
                    line: index + 1,
                };
                warn!("{diagnostic}");
                diagnostics.push(diagnostic);
                result.push_str(raw);
            }
            DeclRewrite::Unchanged => result.push_str(raw),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Result<RewriteResult, RewriteError> {
        let tables = RewriteTables::builtin();
        let passes = Passes::default();
        let ctx = RewriteContext {
            tables: &tables,
            passes: &passes,
            import_prefix: "./lib/".to_string(),
        };
        rewrite(source, Path::new("Methods/demo.4dm"), &ctx)
    }

    #[test]
    fn unrecognized_text_is_byte_identical() {
        let source = "If ($a>1)\r\n\t$b+1 // note\r\nEnd if\n";
        let result = run(source).unwrap();
        assert_eq!(result.text, source);
        assert!(result.preamble.is_empty());
        assert!(result.manifest.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn full_pipeline_order() {
        let source = "C_LONGINT:C283($i;$j)\nvar $a : Integer:=4\n$ok:=True:C214\nALERT:C41(\"Hi\")\n";
        let result = run(source).unwrap();
        let (preamble, body) = result.text.split_once("\n\n").unwrap();
        assert_eq!(preamble, result.preamble);
        assert_eq!(preamble.lines().count(), 1);
        assert!(preamble.contains("ALERT"));
        assert!(preamble.contains("./lib/commands/ALERT.js"));
        assert_eq!(
            body,
            "let $i = 0, $j = 0\nlet $a = 4\n$ok=true\nALERT(\"Hi\")\n"
        );
    }

    #[test]
    fn same_command_twice_gives_one_import() {
        let result = run("ALERT:C41(\"a\")\nALERT:C41(\"b\")").unwrap();
        assert_eq!(result.preamble.lines().count(), 1);
        assert_eq!(result.text.matches("ALERT(").count(), 2);
    }

    #[test]
    fn unknown_type_is_a_diagnostic() {
        let source = "var $a, $b : Integer\nvar $inv : cs.Invoice\n";
        let result = run(source).unwrap();
        assert_eq!(result.text, "let $a = 0, $b = 0\nvar $inv : cs.Invoice\n");
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic {
                kind: DiagnosticKind::UnknownType,
                keyword: "cs.Invoice".into(),
                path: PathBuf::from("Methods/demo.4dm"),
                line: 2,
            }]
        );
    }

    #[test]
    fn declarations_inside_block_comments_are_kept() {
        let source = "/*\nvar $a : Integer\n*/\nvar $b : Text\n";
        let result = run(source).unwrap();
        assert_eq!(result.text, "/*\nvar $a : Integer\n*/\nlet $b = \"\"\n");
    }

    #[test]
    fn unclosed_invocation_fails_with_line() {
        let err = run("$a:=1\n$b:=2\nALERT:C41(\"x\"\n").unwrap_err();
        match err {
            RewriteError::UnclosedInvocation {
                command, line, ..
            } => {
                assert_eq!(command, "ALERT:C41");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn disabled_passes_are_skipped() {
        let tables = RewriteTables::builtin();
        let passes = Passes {
            literals: false,
            declarations: true,
            commands: false,
        };
        let ctx = RewriteContext {
            tables: &tables,
            passes: &passes,
            import_prefix: String::new(),
        };
        let result = rewrite(
            "var $a : Text\n$b:=True:C214\nALERT:C41(1)",
            Path::new("x.4dm"),
            &ctx,
        )
        .unwrap();
        assert_eq!(result.text, "let $a = \"\"\n$b:=True:C214\nALERT:C41(1)");
    }
}
