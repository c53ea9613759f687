//! Legacy 4D method source → JavaScript, at the text level.
//!
//! The pipeline never builds a full syntax tree. It recognizes three kinds
//! of dialect syntax embedded in otherwise free-form text:
//!
//! - fixed tokens and operators (`True:C214`, `:=`)
//! - typed declarations (`C_LONGINT($a;$b)`, `var $a : Integer`)
//! - versioned command invocations (`ALERT:C41("Hi")`)
//!
//! and rewrites each in place, collecting the commands a file uses so an
//! import preamble can be prepended. String literals and comments are never
//! rewritten.

pub mod diagnostic;
pub mod error;
pub mod rewrite;
pub mod transpile;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::RewriteError;
pub use transpile::{rewrite, RewriteContext, RewriteResult};
