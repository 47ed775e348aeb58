//! Error types for the reconcile crate

use crate::kind::ResourceKind;
use thiserror::Error;

/// Boxed error reported by a schema source
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while registering, loading, or diffing
#[derive(Error, Debug)]
pub enum Error {
    /// A declared resource is malformed
    #[error("invalid {kind} '{name}': {reason}")]
    Validation {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    /// `load_schema` was called more than once on the same session
    #[error("schema already loaded for this session")]
    AlreadyLoaded,

    /// `diff` was called before a successful schema load
    #[error("schema not loaded; call load_schema first")]
    SchemaNotLoaded,

    /// Transport, auth, or service failure while loading the schema
    #[error("remote schema load failed: {0}")]
    Remote(#[source] SourceError),

    /// A kind name that does not map to a known resource kind
    #[error("unknown resource kind: {0}")]
    UnknownResourceKind(String),
}

impl Error {
    /// Create a validation error for a declared resource.
    pub fn validation(kind: ResourceKind, name: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap any source error as a remote failure.
    pub fn remote(err: impl Into<SourceError>) -> Self {
        Self::Remote(err.into())
    }
}

/// Result type for reconcile operations
pub type Result<T> = std::result::Result<T, Error>;
