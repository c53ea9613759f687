//! Declaration rewriting, one line at a time.
//!
//! Three forms are recognized, tried in order; the first that matches wins:
//!
//! 1. `C_LONGINT($a;$b)`: legacy declaration command
//! 2. `var $a : Integer:=4`: declaration with an explicit value
//! 3. `var $a, $b : Integer`: declaration with the type's default value
//!
//! Each becomes a single `let` statement. Indentation and any trailing
//! comment are kept.

use std::sync::LazyLock;

use pt_catalog::DeclarationTable;
use pt_lexer::comment_start;
use regex::Regex;

static LEGACY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)(?P<keyword>C_[A-Z_]+)(?::C\d+)?\s*\((?P<names>[^()]*)\)$")
        .unwrap()
});

// `:?=` because the literal pass may already have turned `:=` into `=`.
static ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>\s*)var\s+(?P<name>[^\s,:=]+)\s*:\s*(?P<ty>[^:=]+?)\s*:?=\s*(?P<value>\S.*)$",
    )
    .unwrap()
});

static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)var\s+(?P<names>[^:=]+?)\s*:\s*(?P<ty>[\w.]+)$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclForm {
    Legacy,
    Assign,
    Default,
}

/// Outcome of rewriting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclRewrite {
    Rewritten {
        line: String,
        form: DeclForm,
        names: Vec<String>,
        /// Value every name is bound to.
        value: String,
    },
    /// Declaration-shaped, but the type keyword is unknown. Left as is.
    Unresolved { form: DeclForm, keyword: String },
    Unchanged,
}

/// Rewrite a single line (without its line terminator).
pub fn rewrite_line(line: &str, table: &DeclarationTable) -> DeclRewrite {
    let code_end = comment_start(line).unwrap_or(line.len());
    let code = line[..code_end].trim_end();
    let tail = &line[code.len()..];

    if let Some(caps) = LEGACY_RE.captures(code) {
        let keyword = &caps["keyword"];
        let Some(names) = split_names(&caps["names"], ';') else {
            return DeclRewrite::Unchanged;
        };
        return match table.legacy(keyword) {
            Some(rule) => render(&caps["indent"], DeclForm::Legacy, names, &rule.default, tail),
            None => DeclRewrite::Unresolved {
                form: DeclForm::Legacy,
                keyword: keyword.to_string(),
            },
        };
    }

    if let Some(caps) = ASSIGN_RE.captures(code) {
        let names = vec![caps["name"].to_string()];
        return render(&caps["indent"], DeclForm::Assign, names, caps["value"].trim(), tail);
    }

    if let Some(caps) = DEFAULT_RE.captures(code) {
        let Some(names) = split_names(&caps["names"], ',') else {
            return DeclRewrite::Unchanged;
        };
        let ty = &caps["ty"];
        return match table.modern(ty) {
            Some(rule) => render(&caps["indent"], DeclForm::Default, names, &rule.default, tail),
            None => DeclRewrite::Unresolved {
                form: DeclForm::Default,
                keyword: ty.to_string(),
            },
        };
    }

    DeclRewrite::Unchanged
}

/// Names separated by `sep`; `None` if any is empty or contains whitespace.
fn split_names(list: &str, sep: char) -> Option<Vec<String>> {
    list.split(sep)
        .map(str::trim)
        .map(|name| {
            (!name.is_empty() && !name.contains(char::is_whitespace)).then(|| name.to_string())
        })
        .collect()
}

fn render(indent: &str, form: DeclForm, names: Vec<String>, value: &str, tail: &str) -> DeclRewrite {
    let bindings = names
        .iter()
        .map(|name| format!("{name} = {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    DeclRewrite::Rewritten {
        line: format!("{indent}let {bindings}{tail}"),
        form,
        names,
        value: value.to_string(),
    }
}
