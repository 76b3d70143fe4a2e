//! Domain-specific error types and error handling.

mod types;

// Re-export all error types and utilities
pub use types::{ErrorResponse, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
///
/// Token errors are authentication outcomes and carry no process-level
/// severity; `Internal` wraps persistence-layer faults so callers can tell
/// an unavailable store apart from a rejected credential.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;
