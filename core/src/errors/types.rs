//! Token error types and the API error response shape
//!
//! These errors represent refresh credential validation and rotation
//! failures. All of them surface to the client as authentication failures;
//! the distinction matters to the rotation engine, which revokes whole
//! families on some of them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// Unknown id, id/user mismatch, or secret verification failure.
    /// No side effects on other records.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// The presented string could not be split into an id and a secret
    #[error("Invalid refresh token format")]
    InvalidTokenFormat,

    /// A terminal (already used or revoked) record was presented again.
    /// The whole family is revoked as containment.
    #[error("Refresh token reuse detected")]
    ReuseDetected,

    /// The record's validity window has passed; the family is revoked
    /// as hygiene.
    #[error("Refresh token expired")]
    RefreshTokenExpired,

    /// Secret generation or hashing failed during issuance
    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Unified error response structure for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a single detail to the error response
    pub fn with_detail(mut self, key: impl ToString, value: serde_json::Value) -> Self {
        let mut details = self.details.unwrap_or_default();
        details.insert(key.to_string(), value);
        self.details = Some(details);
        self
    }
}

/// Convert TokenError to ErrorResponse
impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        let error_code = match &err {
            TokenError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            TokenError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            TokenError::ReuseDetected => "TOKEN_REUSE_DETECTED",
            TokenError::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}
