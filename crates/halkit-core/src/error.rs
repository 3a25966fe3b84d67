//! Error types for halkit.

use std::fmt;

use thiserror::Error;

/// Top-level result type for halkit operations.
pub type Result<T> = std::result::Result<T, HalError>;

/// Which relation registry of a resource an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Link,
    Embedded,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Link => f.write_str("link"),
            RelationKind::Embedded => f.write_str("embedded resource"),
        }
    }
}

/// Top-level error type for halkit.
#[derive(Debug, Error)]
pub enum HalError {
    #[error("a {kind} with relation type '{rel}' already exists")]
    DuplicateRelation { kind: RelationKind, rel: String },

    #[error("no {kind} with relation type '{rel}' exists")]
    NotFound { kind: RelationKind, rel: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed HAL document: {0}")]
    MalformedDocument(String),

    #[error("property '{name}' cannot be converted to {target}: {source}")]
    TypeConversion {
        name: String,
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HalError {
    pub(crate) fn duplicate(kind: RelationKind, rel: &str) -> Self {
        HalError::DuplicateRelation {
            kind,
            rel: rel.to_string(),
        }
    }

    pub(crate) fn not_found(kind: RelationKind, rel: &str) -> Self {
        HalError::NotFound {
            kind,
            rel: rel.to_string(),
        }
    }
}
