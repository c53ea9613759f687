//! JavaScript emission for porter.
//!
//! The rewritten method body stays text, but the import preamble is built as
//! real SWC AST nodes and printed with the SWC code generator, so every
//! import line is well-formed however odd the library path is.

pub mod imports;
pub mod validate;

pub use imports::{build_import, render_preamble};
pub use validate::validate_module;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("code generation failed: {0}")]
    Codegen(#[from] std::io::Error),

    #[error("generated code is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{filename}: not a valid module: {message}")]
    Invalid { filename: String, message: String },
}
