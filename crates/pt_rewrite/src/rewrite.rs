//! The individual rewrite passes.
//!
//! Each pass is a pure function of its input text and the read-only tables.
//! [`crate::transpile::rewrite`] runs them in this order:
//! 1. Literal substitution, then legacy keyword normalization
//! 2. Declarations, line by line
//! 3. Command invocations over the whole text

pub mod command_pass;
pub mod decl_pass;
pub mod literal_pass;
