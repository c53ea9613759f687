//! `import { NAME } from "<prefix><path>";` for every manifest entry.

use pt_catalog::{CommandEntry, ImportManifest};
use swc_common::{sync::Lrc, SourceMap, DUMMY_SP};
use swc_ecma_ast as ast;
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

use crate::EmitError;

/// Build `import { <ident> } from "<prefix><entry.path>"`.
pub fn build_import(entry: &CommandEntry, prefix: &str) -> ast::ModuleItem {
    let local = ast::Ident::new_no_ctxt(entry.ident().into(), DUMMY_SP);
    let src = format!("{prefix}{}", entry.path);

    ast::ModuleItem::ModuleDecl(ast::ModuleDecl::Import(ast::ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![ast::ImportSpecifier::Named(ast::ImportNamedSpecifier {
            span: DUMMY_SP,
            local,
            imported: None,
            is_type_only: false,
        })],
        src: Box::new(ast::Str {
            span: DUMMY_SP,
            value: src.as_str().into(),
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: Default::default(),
    }))
}

/// Print the manifest as import statements, one per line, in manifest order.
///
/// An empty manifest renders as an empty string.
pub fn render_preamble(manifest: &ImportManifest, prefix: &str) -> Result<String, EmitError> {
    if manifest.is_empty() {
        return Ok(String::new());
    }

    let module = ast::Module {
        span: DUMMY_SP,
        body: manifest.iter().map(|e| build_import(e, prefix)).collect(),
        shebang: None,
    };

    let source_map: Lrc<SourceMap> = Default::default();
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(ast::EsVersion::latest()),
            cm: source_map,
            comments: None,
            wr: writer,
        };
        module.emit_with(&mut emitter)?;
    }

    let printed = String::from_utf8(buf)?;
    Ok(printed
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(entries: &[CommandEntry]) -> ImportManifest {
        let mut manifest = ImportManifest::default();
        for e in entries {
            manifest.insert(e);
        }
        manifest
    }

    #[test]
    fn empty_manifest_renders_nothing() {
        assert_eq!(render_preamble(&ImportManifest::default(), "./lib/").unwrap(), "");
    }

    #[test]
    fn one_line_per_command_in_order() {
        let m = manifest(&[CommandEntry::new("ALERT", 41), CommandEntry::new("Current date", 33)]);
        let out = render_preamble(&m, "../lib/").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("import"));
        assert!(lines[0].contains("ALERT"));
        assert!(lines[0].contains("../lib/commands/ALERT.js"));
        assert!(lines[1].contains("Current_date"));
        assert!(lines[1].contains("../lib/commands/Current_date.js"));
    }

    #[test]
    fn rendered_preamble_is_a_valid_module() {
        let m = manifest(&[CommandEntry::new("ALERT", 41), CommandEntry::new("TRACE", 157)]);
        let out = render_preamble(&m, "./lib/").unwrap();
        crate::validate_module(&out, "preamble.js").unwrap();
    }
}
