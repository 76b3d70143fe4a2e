//! Rotation engine for refresh session credentials.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::domain::value_objects::{ClientContext, Credential, IssuedCredential};
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::config::RotationConfig;
use super::hasher::CredentialHasher;
use super::secret::generate_secret;

/// Service for issuing and rotating refresh credentials
///
/// Every login event starts a new credential family; every refresh
/// exchanges the presented single-use credential for a successor in the
/// same family. Presenting a credential that was already redeemed or
/// revoked is treated as theft and revokes the whole family.
pub struct RotationService<R: TokenRepository, H: CredentialHasher> {
    pub(crate) repository: R,
    hasher: H,
    config: RotationConfig,
}

impl<R: TokenRepository, H: CredentialHasher> RotationService<R, H> {
    /// Creates a new rotation service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Token record persistence
    /// * `hasher` - Credential hashing implementation
    /// * `config` - Rotation configuration
    pub fn new(repository: R, hasher: H, config: RotationConfig) -> Self {
        Self {
            repository,
            hasher,
            config,
        }
    }

    /// Issues the first credential of a brand-new family
    ///
    /// Called after the user's identity has been established by the login
    /// flow. Generates a fresh family id and a fresh secret, persists the
    /// hashed record, and hands back the opaque `id.secret` credential.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The authenticated user's UUID
    /// * `context` - Client metadata recorded on the token
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCredential)` - The new credential and its family id
    /// * `Err(DomainError)` - Hashing or persistence failed
    pub async fn issue_new_family(
        &self,
        user_id: Uuid,
        context: &ClientContext,
    ) -> Result<IssuedCredential, DomainError> {
        let family_id = Uuid::new_v4();
        let secret = generate_secret();
        let secret_hash = self.hasher.hash(&secret)?;

        let record = RefreshToken::new(user_id, family_id, secret_hash, self.config.ttl(), context);
        let saved = self.repository.save(record).await?;

        info!(
            "Issued new refresh token family {} for user {}",
            family_id, user_id
        );

        Ok(IssuedCredential::new(
            Credential::new(saved.id, secret).to_string(),
            family_id,
            user_id,
            saved.expires_at,
        ))
    }

    /// Exchanges a live credential for its successor
    ///
    /// The presented string is split into record id and secret, the record
    /// looked up for the expected user, and the secret verified against
    /// its stored hash. On success the record is atomically marked used
    /// and a successor in the same family is persisted and returned.
    ///
    /// Failure modes:
    /// * unknown id, id/user mismatch, or wrong secret - `InvalidRefreshToken`,
    ///   no side effects
    /// * record already used or revoked - `ReuseDetected`, whole family
    ///   revoked
    /// * record past its expiry - `RefreshTokenExpired`, whole family revoked
    /// * lost a concurrent redemption race - reported as `ReuseDetected`,
    ///   since the engine cannot tell a double-spend race from theft
    pub async fn rotate(
        &self,
        presented: &str,
        expected_user_id: Uuid,
        context: &ClientContext,
    ) -> Result<IssuedCredential, DomainError> {
        let credential: Credential = presented.parse()?;

        let record = self
            .repository
            .find_by_id_and_user(credential.token_id, expected_user_id)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        if record.is_terminal() {
            warn!(
                "Terminal refresh token {} presented again for user {}, revoking family {}",
                record.id, expected_user_id, record.family_id
            );
            self.revoke_family(record.family_id).await?;
            return Err(TokenError::ReuseDetected.into());
        }

        if record.is_expired() {
            self.revoke_family(record.family_id).await?;
            return Err(TokenError::RefreshTokenExpired.into());
        }

        if !self.hasher.verify(&credential.secret, &record.secret_hash)? {
            // A bare secret mismatch leaves the family untouched
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let secret = generate_secret();
        let secret_hash = self.hasher.hash(&secret)?;
        let successor = RefreshToken::new(
            expected_user_id,
            record.family_id,
            secret_hash,
            self.config.ttl(),
            context,
        );

        match self
            .repository
            .redeem(record.id, expected_user_id, Utc::now(), successor)
            .await?
        {
            Some(saved) => Ok(IssuedCredential::new(
                Credential::new(saved.id, secret).to_string(),
                saved.family_id,
                expected_user_id,
                saved.expires_at,
            )),
            None => {
                warn!(
                    "Lost redemption race on refresh token {} for user {}, revoking family {}",
                    record.id, expected_user_id, record.family_id
                );
                self.revoke_family(record.family_id).await?;
                Err(TokenError::ReuseDetected.into())
            }
        }
    }

    /// Revokes every record of a family
    ///
    /// Invoked automatically on reuse and expiry detection, and exposed
    /// for the explicit "sign out this session everywhere" action.
    /// Idempotent: records that already carry `revoked_at` keep their
    /// original timestamp.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records newly revoked
    pub async fn revoke_family(&self, family_id: Uuid) -> Result<usize, DomainError> {
        let records = self.repository.find_by_family(family_id).await?;

        let mut revoked: Vec<RefreshToken> = records
            .into_iter()
            .filter(|r| r.revoked_at.is_none())
            .collect();

        if revoked.is_empty() {
            return Ok(0);
        }

        for record in &mut revoked {
            record.revoke();
        }

        self.repository.save_all(&revoked).await?;

        info!(
            "Revoked {} refresh tokens in family {}",
            revoked.len(),
            family_id
        );

        Ok(revoked.len())
    }

    /// Revokes every unrevoked record the user owns
    ///
    /// "Sign out everywhere" across all of the user's families and
    /// devices.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records newly revoked
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut records = self.repository.find_by_user(user_id).await?;

        if records.is_empty() {
            return Ok(0);
        }

        for record in &mut records {
            record.revoke();
        }

        self.repository.save_all(&records).await?;

        info!(
            "Revoked {} refresh tokens for user {}",
            records.len(),
            user_id
        );

        Ok(records.len())
    }
}
