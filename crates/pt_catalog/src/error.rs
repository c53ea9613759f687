use thiserror::Error;

/// Errors raised while building or extending the rewrite tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("literal substitution pattern must not be empty")]
    EmptyPattern,

    #[error("declaration keyword must not be empty")]
    EmptyKeyword,

    #[error("command '{name}' has an empty identifier")]
    EmptyIdentifier { name: String },

    #[error("command identifier '{id}' is registered twice")]
    DuplicateCommand { id: String },

    #[error("command '{id}' would be imported as '{ident}', already taken by '{existing}' from another module")]
    IdentCollision {
        ident: String,
        id: String,
        existing: String,
    },
}
