//! Error types for the catalog
//!
//! Plain lookups report absence through `Option`; this enum covers the
//! failures that callers must handle explicitly.

use thiserror::Error;

/// The main error type for catalog operations
#[derive(Error, Debug)]
pub enum Error {
    // ========== Lookup Errors ==========
    #[error("Catalog error: {kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    // ========== Type Errors ==========
    #[error("Type error: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Type error: {0} is not a finite number")]
    NonFinite(String),

    #[error("Type error: unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    // ========== Constraint Errors ==========
    #[error("Constraint error: field '{field}' has invalid bounds - {reason}")]
    InvalidBounds { field: String, reason: String },

    #[error("Constraint error: index '{index}' is invalid - {reason}")]
    InvalidIndex { index: String, reason: String },

    // ========== Serialization Errors ==========
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, name: &str) -> Self {
        Error::NotFound {
            kind,
            name: name.to_string(),
        }
    }
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;
