use std::path::PathBuf;

use pt_emit::EmitError;
use thiserror::Error;

/// Failures that stop the rewrite of a single file.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("{}:{line}: '(' after '{command}' is never closed", .path.display())]
    UnclosedInvocation {
        command: String,
        path: PathBuf,
        line: usize,
    },

    #[error("{}: failed to render imports: {source}", .path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: EmitError,
    },
}
