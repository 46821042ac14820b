use std::io;

use crate::binding::BindFailure;

/// Errors that can occur while collecting, resolving or binding services
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("{contract}: Cannot load configuration: {source}")]
    ResourceLookup {
        contract: String,
        #[source]
        source: io::Error,
    },

    #[error("{contract}: {resource}: Cannot read service configuration: {source}")]
    ResourceRead {
        contract: String,
        resource: String,
        #[source]
        source: io::Error,
    },

    #[error("{contract}: {resource}:{line}: Cannot bind implementation for {entry}")]
    ClassNotFound {
        contract: String,
        resource: String,
        line: usize,
        entry: String,
    },

    #[error("{contract}: {resource}:{line}: Illegal implementation name {entry:?}")]
    MalformedEntry {
        contract: String,
        resource: String,
        line: usize,
        entry: String,
    },

    #[error("{contract}: Cannot bind implementation {implementation}: {source}")]
    Binding {
        contract: String,
        implementation: String,
        #[source]
        source: BindFailure,
    },
}

/// Result type alias for bindery operations
pub type Result<T> = std::result::Result<T, Error>;
