//! Project driver: mirror an input tree into an output tree, rewriting
//! legacy sources and copying everything else.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pt_catalog::{Passes, RewriteTables};
use pt_rewrite::{rewrite, Diagnostic, RewriteContext};
use tracing::{debug, error, info};

pub struct Driver<'a> {
    pub tables: &'a RewriteTables,
    pub passes: &'a Passes,
    /// Without the leading dot.
    pub source_extension: String,
    /// Name of the library directory inside the output tree.
    pub library_dir: String,
}

#[derive(Debug, Default)]
pub struct Summary {
    pub rewritten: usize,
    pub copied: usize,
    pub library_files: usize,
    pub failed: Vec<(PathBuf, String)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Driver<'_> {
    /// Rewrite every source file under `input` into `output`.
    ///
    /// A file that fails to read, rewrite or write is recorded in the
    /// summary and the run moves on to the next one. Each destination is
    /// written once; a later file mapping to a taken destination fails.
    pub fn run(&self, input: &Path, output: &Path, library: Option<&Path>) -> Result<Summary> {
        let mut summary = Summary::default();
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        let skip = fs::canonicalize(output).ok();

        for file in walk(input, skip.as_deref())
            .with_context(|| format!("failed to read {}", input.display()))?
        {
            let relative = file.strip_prefix(input).unwrap_or(&file);
            let dest = self.destination(relative, output);
            if let Some(reason) = claim(&mut claimed, &dest, &file) {
                error!(path = %file.display(), "{reason}");
                summary.failed.push((file.clone(), reason));
                continue;
            }

            if self.is_source(&file) {
                match self.rewrite_file(&file, relative, &dest) {
                    Ok(diagnostics) => {
                        summary.rewritten += 1;
                        summary.diagnostics.extend(diagnostics);
                    }
                    Err(e) => {
                        error!(path = %file.display(), "{e:#}");
                        summary.failed.push((file.clone(), format!("{e:#}")));
                    }
                }
            } else {
                match copy_file(&file, &dest) {
                    Ok(()) => summary.copied += 1,
                    Err(e) => {
                        error!(path = %file.display(), "{e:#}");
                        summary.failed.push((file.clone(), format!("{e:#}")));
                    }
                }
            }
        }

        if let Some(library) = library {
            let dest = output.join(&self.library_dir);
            for file in walk(library, None)
                .with_context(|| format!("failed to read library {}", library.display()))?
            {
                let relative = file.strip_prefix(library).unwrap_or(&file);
                let target = dest.join(relative);
                if let Some(reason) = claim(&mut claimed, &target, &file) {
                    error!(path = %file.display(), "{reason}");
                    summary.failed.push((file.clone(), reason));
                    continue;
                }
                copy_file(&file, &target)?;
                summary.library_files += 1;
            }
        }

        info!(
            rewritten = summary.rewritten,
            copied = summary.copied,
            library = summary.library_files,
            failed = summary.failed.len(),
            diagnostics = summary.diagnostics.len(),
            "done"
        );
        Ok(summary)
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.source_extension.as_str()))
    }

    fn destination(&self, relative: &Path, output: &Path) -> PathBuf {
        let dest = output.join(relative);
        if self.is_source(relative) {
            dest.with_extension("js")
        } else {
            dest
        }
    }

    fn rewrite_file(&self, file: &Path, relative: &Path, dest: &Path) -> Result<Vec<Diagnostic>> {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;

        let ctx = RewriteContext {
            tables: self.tables,
            passes: self.passes,
            import_prefix: import_prefix_for(relative, &self.library_dir),
        };
        let result = rewrite(&source, file, &ctx)?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out =
            File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
        out.write_all(result.text.as_bytes())?;

        debug!(from = %file.display(), to = %dest.display(), imports = result.manifest.len(), "rewrote");
        Ok(result.diagnostics)
    }
}

/// Record `file` as the writer of `dest`, or explain who already is.
fn claim(claimed: &mut HashMap<PathBuf, PathBuf>, dest: &Path, file: &Path) -> Option<String> {
    if let Some(owner) = claimed.get(dest) {
        return Some(format!(
            "{} is already written from {}",
            dest.display(),
            owner.display()
        ));
    }
    claimed.insert(dest.to_path_buf(), file.to_path_buf());
    None
}

/// Relative path from a file at `relative` to the library root.
pub fn import_prefix_for(relative: &Path, library_dir: &str) -> String {
    let depth = relative
        .parent()
        .map(|p| p.components().count())
        .unwrap_or(0);
    if depth == 0 {
        format!("./{library_dir}/")
    } else {
        format!("{}{library_dir}/", "../".repeat(depth))
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("failed to copy {}", from.display()))?;
    Ok(())
}

/// All files below `dir`, sorted. Directories canonicalizing to `skip` are
/// not entered.
fn walk(dir: &Path, skip: Option<&Path>) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                let canonical = fs::canonicalize(&path).ok();
                if skip.is_some() && canonical.as_deref() == skip {
                    continue;
                }
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn driver<'a>(tables: &'a RewriteTables, passes: &'a Passes) -> Driver<'a> {
        Driver {
            tables,
            passes,
            source_extension: "4dm".into(),
            library_dir: "lib".into(),
        }
    }

    #[test]
    fn prefix_climbs_to_the_library() {
        assert_eq!(import_prefix_for(Path::new("a.4dm"), "lib"), "./lib/");
        assert_eq!(
            import_prefix_for(Path::new("Methods/Sub/a.4dm"), "lib"),
            "../../lib/"
        );
    }

    #[test]
    fn mirrors_tree_and_continues_past_failures() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let library = tempfile::tempdir().unwrap();

        write(&input.path().join("Methods/greet.4dm"), "var $n : Text\nALERT:C41(\"Hi\")\n");
        write(&input.path().join("Methods/broken.4dm"), "ALERT:C41(\"x\"\n");
        write(&input.path().join("Resources/logo.txt"), "asset");
        write(&library.path().join("commands/ALERT.js"), "export function ALERT() {}\n");

        let tables = RewriteTables::builtin();
        let passes = Passes::default();
        let summary = driver(&tables, &passes)
            .run(input.path(), output.path(), Some(library.path()))
            .unwrap();

        assert_eq!(summary.rewritten, 1);
        assert_eq!(summary.copied, 1);
        assert_eq!(summary.library_files, 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("broken.4dm"));

        let greet = fs::read_to_string(output.path().join("Methods/greet.js")).unwrap();
        assert!(greet.contains("../lib/commands/ALERT.js"));
        assert!(greet.ends_with("let $n = \"\"\nALERT(\"Hi\")\n"));
        assert!(!output.path().join("Methods/broken.js").exists());
        assert_eq!(
            fs::read_to_string(output.path().join("Resources/logo.txt")).unwrap(),
            "asset"
        );
        assert!(output.path().join("lib/commands/ALERT.js").exists());
    }

    #[test]
    fn collects_diagnostics_from_every_file() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&input.path().join("a.4dm"), "var $x : cs.Thing\n");
        write(&input.path().join("b.4DM"), "C_WIDGET($w)\n");

        let tables = RewriteTables::builtin();
        let passes = Passes::default();
        let summary = driver(&tables, &passes)
            .run(input.path(), output.path(), None)
            .unwrap();

        assert_eq!(summary.rewritten, 2);
        assert_eq!(summary.diagnostics.len(), 2);
        assert_eq!(
            fs::read_to_string(output.path().join("a.js")).unwrap(),
            "var $x : cs.Thing\n"
        );
    }

    #[test]
    fn clashing_destinations_are_reported() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&input.path().join("Methods/greet.4dm"), "ALERT:C41(\"Hi\")\n");
        write(&input.path().join("Methods/greet.js"), "// hand-written\n");

        let tables = RewriteTables::builtin();
        let passes = Passes::default();
        let summary = driver(&tables, &passes)
            .run(input.path(), output.path(), None)
            .unwrap();

        assert_eq!(summary.rewritten, 1);
        assert_eq!(summary.copied, 0);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("greet.js"));
        assert!(summary.failed[0].1.contains("greet.4dm"));
        let written = fs::read_to_string(output.path().join("Methods/greet.js")).unwrap();
        assert!(written.ends_with("ALERT(\"Hi\")\n"));
    }

    #[test]
    fn output_inside_input_is_not_walked() {
        let input = tempfile::tempdir().unwrap();
        write(&input.path().join("a.4dm"), "TRACE:C157\n");
        let output = input.path().join("out");
        fs::create_dir_all(&output).unwrap();
        write(&output.join("stale.txt"), "old");

        let tables = RewriteTables::builtin();
        let passes = Passes::default();
        let summary = driver(&tables, &passes)
            .run(input.path(), &output, None)
            .unwrap();

        assert_eq!(summary.rewritten, 1);
        assert_eq!(summary.copied, 0);
    }
}
