//! Command invocation rewriting.
//!
//! Finds every versioned command identifier (`ALERT:C41`) in code and
//! rewrites it to a direct call of the library function:
//!
//! - `ALERT:C41("Hi"; $x)` → `ALERT("Hi", $x)`
//! - `Current date:C33` → `Current_date`
//!
//! The scan runs left to right over a working buffer and edits it in place,
//! resuming right after the new callee so nested invocations inside the
//! argument list are reached next.

use pt_catalog::{CommandCatalog, ImportManifest};
use pt_lexer::{find_matching_paren, segments, skip_non_code, split_top_level, SegmentKind};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRewrite {
    pub text: String,
    pub manifest: ImportManifest,
}

/// An invocation whose `(` is never closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnclosedInvocation {
    pub command: String,
    /// Byte offset of the identifier in the partially rewritten text.
    pub offset: usize,
    /// Text as rewritten up to the failure.
    pub text: String,
}

pub fn rewrite_commands(
    source: &str,
    catalog: &CommandCatalog,
) -> Result<CommandRewrite, UnclosedInvocation> {
    let mut buffer = source.to_string();
    let mut manifest = ImportManifest::default();
    let mut i = 0;

    while i < buffer.len() {
        if let Some(next) = skip_non_code(buffer.as_bytes(), i) {
            i = next;
            continue;
        }

        let entry = if is_word_start(&buffer, i) {
            catalog.match_at(&buffer[i..])
        } else {
            None
        };
        let Some(entry) = entry else {
            i += buffer[i..].chars().next().map_or(1, char::len_utf8);
            continue;
        };

        let ident = entry.ident();
        let id_end = i + entry.id.len();
        if manifest.insert(entry) {
            debug!(command = %entry.id, "first reference");
        }

        if buffer.as_bytes().get(id_end) == Some(&b'(') {
            let Some(close) = find_matching_paren(&buffer, id_end) else {
                return Err(UnclosedInvocation {
                    command: entry.id.clone(),
                    offset: i,
                    text: buffer,
                });
            };
            let args = split_top_level(&buffer[id_end + 1..close], b';')
                .into_iter()
                .map(argument)
                .collect::<Vec<_>>()
                .join(", ");
            let call = format!("{ident}({args})");
            buffer.replace_range(i..=close, &call);
            i += ident.len() + 1;
        } else {
            buffer.replace_range(i..id_end, &ident);
            i += ident.len();
        }
    }

    Ok(CommandRewrite {
        text: buffer,
        manifest,
    })
}

/// Trimmed argument text. An argument ending in a line comment keeps a
/// newline so the following `,` or `)` stays code.
fn argument(piece: &str) -> String {
    let trimmed = piece.trim();
    let ends_in_line_comment = segments(trimmed)
        .last()
        .is_some_and(|s| s.kind == SegmentKind::LineComment);
    if ends_in_line_comment {
        format!("{trimmed}\n")
    } else {
        trimmed.to_string()
    }
}

/// True unless the previous character would make `i` the middle of a word.
fn is_word_start(text: &str, i: usize) -> bool {
    text[..i]
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_catalog::CommandEntry;

    fn rewrite(source: &str) -> CommandRewrite {
        rewrite_commands(source, &CommandCatalog::builtin()).unwrap()
    }

    #[test]
    fn call_with_arguments() {
        let out = rewrite("ALERT:C41(\"Hi\")");
        assert_eq!(out.text, "ALERT(\"Hi\")");
        assert_eq!(out.manifest.names(), vec!["ALERT"]);
    }

    #[test]
    fn parameters_are_rejoined_with_commas() {
        let out = rewrite("$p:=Position:C15( \"b\" ; $text ;  3 )");
        assert_eq!(out.text, "$p:=Position(\"b\", $text, 3)");
    }

    #[test]
    fn bare_identifier_without_parens() {
        let out = rewrite("$d:=Current date:C33\nNEXT RECORD:C51([Invoices])");
        assert_eq!(out.text, "$d:=Current_date\nNEXT_RECORD([Invoices])");
        assert_eq!(out.manifest.names(), vec!["Current_date", "NEXT_RECORD"]);
    }

    #[test]
    fn repeated_command_imported_once() {
        let out = rewrite("ALERT:C41(\"a\")\nALERT:C41(\"b\")");
        assert_eq!(out.text, "ALERT(\"a\")\nALERT(\"b\")");
        assert_eq!(out.manifest.len(), 1);
    }

    #[test]
    fn unreferenced_commands_are_not_imported() {
        let out = rewrite("TRACE:C157");
        assert!(out.manifest.contains("TRACE"));
        assert!(!out.manifest.contains("ALERT"));
        assert_eq!(out.manifest.len(), 1);
    }

    #[test]
    fn nested_invocations_are_rewritten() {
        let out = rewrite("ALERT:C41(String:C10(Length:C16($t); \"###\"))");
        assert_eq!(out.text, "ALERT(String_(Length($t), \"###\"))");
        assert_eq!(out.manifest.names(), vec!["ALERT", "String_", "Length"]);
    }

    #[test]
    fn quoted_semicolon_stays_in_one_argument() {
        let out = rewrite("ALERT:C41(\"a;b\"; $c)");
        assert_eq!(out.text, "ALERT(\"a;b\", $c)");
    }

    #[test]
    fn identifiers_in_strings_and_comments_are_ignored() {
        let input = "$t:=\"ALERT:C41(1)\" // ALERT:C41\n/* TRACE:C157 */";
        let out = rewrite(input);
        assert_eq!(out.text, input);
        assert!(out.manifest.is_empty());
    }

    #[test]
    fn longer_identifier_is_not_split() {
        let catalog = CommandCatalog::from_entries([
            CommandEntry::new("String", 1),
            CommandEntry::new("Stringify", 10),
            CommandEntry::new("String", 10),
        ])
        .unwrap();
        let out = rewrite_commands("String:C10($n)\nString:C1($m)", &catalog).unwrap();
        assert_eq!(out.text, "String_($n)\nString_($m)");
        assert_eq!(out.manifest.len(), 1);
        let imported = out.manifest.iter().next().unwrap();
        assert_eq!(imported.id, "String:C10");
        assert_eq!(imported.path, "commands/String_.js");
    }

    #[test]
    fn trailing_line_comment_keeps_its_newline() {
        let out = rewrite("ALERT:C41($x // why\n)");
        assert_eq!(out.text, "ALERT($x // why\n)");

        let out = rewrite("ALERT:C41($x // first\n; $y // second\n)");
        assert_eq!(out.text, "ALERT($x // first\n, $y // second\n)");
    }

    #[test]
    fn block_comment_in_argument_is_kept_inline() {
        let out = rewrite("ALERT:C41($x /* why */ ; $y)");
        assert_eq!(out.text, "ALERT($x /* why */, $y)");
    }

    #[test]
    fn each_referenced_module_is_imported() {
        let mut catalog = CommandCatalog::builtin();
        catalog
            .insert(CommandEntry {
                name: "Today".into(),
                id: "Today:C9000".into(),
                path: "custom/today.js".into(),
            })
            .unwrap();
        let out = rewrite_commands("$a:=Current date:C33\n$b:=Today:C9000", &catalog).unwrap();
        assert_eq!(out.text, "$a:=Current_date\n$b:=Today");
        let paths: Vec<&str> = out.manifest.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["commands/Current_date.js", "custom/today.js"]);
    }

    #[test]
    fn unclosed_invocation_is_an_error() {
        let err = rewrite_commands("TRACE:C157\nALERT:C41(\"x\"", &CommandCatalog::builtin())
            .unwrap_err();
        assert_eq!(err.command, "ALERT:C41");
        assert_eq!(err.offset, "TRACE\n".len());
    }

    #[test]
    fn text_without_commands_is_identical() {
        let input = "If ($a>1)\n\t$b:=2 // note\nEnd if\n";
        let out = rewrite(input);
        assert_eq!(out.text, input);
        assert!(out.manifest.is_empty());
    }
}
