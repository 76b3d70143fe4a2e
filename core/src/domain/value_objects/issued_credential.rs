//! Issued credential value object returned to the auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of issuing or rotating a refresh credential
///
/// Contains the opaque credential string in `id.secret` form together with
/// the metadata the auth endpoint needs to set cookie lifetimes and track
/// the session family. The raw secret inside `refresh_token` exists only
/// here and in the caller's hands; storage keeps a salted hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredential {
    /// Opaque credential string handed to the client
    pub refresh_token: String,

    /// Rotation family the credential belongs to
    pub family_id: Uuid,

    /// User the credential was issued to
    pub user_id: Uuid,

    /// Expiry of the underlying token record
    pub expires_at: DateTime<Utc>,
}

impl IssuedCredential {
    /// Creates a new issued credential
    pub fn new(
        refresh_token: String,
        family_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            refresh_token,
            family_id,
            user_id,
            expires_at,
        }
    }
}
