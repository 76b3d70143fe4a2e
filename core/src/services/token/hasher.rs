//! Credential hashing for refresh token secrets.

use crate::errors::{DomainError, TokenError};

/// One-way, salted hashing of credential secrets
///
/// Implementations must embed a per-call salt in the output encoding and
/// compare in constant time. The trait is injected into the rotation
/// engine so tests and alternative backends can substitute their own.
pub trait CredentialHasher: Send + Sync {
    /// Hash a raw secret for storage
    ///
    /// # Returns
    /// * `Ok(String)` - Self-contained hash string including the salt
    /// * `Err(DomainError)` - Hashing failed
    fn hash(&self, secret: &str) -> Result<String, DomainError>;

    /// Verify a presented secret against a stored hash
    ///
    /// # Returns
    /// * `Ok(true)` - The secret matches
    /// * `Ok(false)` - The secret does not match
    /// * `Err(DomainError)` - The stored hash could not be parsed
    fn verify(&self, secret: &str, secret_hash: &str) -> Result<bool, DomainError>;
}

/// bcrypt-backed credential hasher
///
/// The modular-crypt output string carries the per-call salt, and
/// `bcrypt::verify` compares in constant time.
#[derive(Debug, Clone)]
pub struct BcryptCredentialHasher {
    cost: u32,
}

impl BcryptCredentialHasher {
    /// Creates a hasher with an explicit work factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptCredentialHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl CredentialHasher for BcryptCredentialHasher {
    fn hash(&self, secret: &str) -> Result<String, DomainError> {
        bcrypt::hash(secret, self.cost)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    fn verify(&self, secret: &str, secret_hash: &str) -> Result<bool, DomainError> {
        bcrypt::verify(secret, secret_hash).map_err(|e| DomainError::Internal {
            message: format!("Stored secret hash unreadable: {}", e),
        })
    }
}
