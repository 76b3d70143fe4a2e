//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken entity persistence operations
///
/// This trait defines the contract for managing refresh token records in
/// storage. The rotation engine is generic over it; the MySQL implementation
/// lives in the infrastructure crate and an in-memory mock backs the unit
/// tests.
///
/// # Concurrency
///
/// The read-then-write transition of redemption goes through [`redeem`],
/// which must be atomic: of any number of concurrent callers presenting the
/// same record, at most one may win. Every other method is a plain read or
/// write with no ordering requirements beyond the store's own consistency.
///
/// [`redeem`]: TokenRepository::redeem
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token record
    ///
    /// # Arguments
    /// * `token` - The record to persist; its `id` must be 0 (unsaved)
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved record with the store-assigned id
    /// * `Err(DomainError)` - Save failed
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Persist updates to a batch of already-saved records as one unit
    ///
    /// Used by family revocation to stamp `revoked_at` across a family.
    ///
    /// # Arguments
    /// * `tokens` - Records to upsert; all must carry store-assigned ids
    async fn save_all(&self, tokens: &[RefreshToken]) -> Result<(), DomainError>;

    /// Find a token record by its id, scoped to its owning user
    ///
    /// The user scoping means a credential presented with the wrong user
    /// simply does not resolve, indistinguishable from an unknown id.
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Record found and owned by `user_id`
    /// * `Ok(None)` - No such record for this user
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_id_and_user(
        &self,
        token_id: i64,
        user_id: Uuid,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Find every record belonging to a rotation family
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use sq_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository, family_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    /// let records = repo.find_by_family(family_id).await?;
    /// println!("family has {} records", records.len());
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_family(&self, family_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Find a user's records that have not been revoked yet
    ///
    /// Backs the "sign out everywhere" action, which spans every family the
    /// user has open.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Atomically redeem a record and persist its successor
    ///
    /// In one unit: save `successor`, then set `used_at` and
    /// `replaced_by_id` on the presented record - but only if that record
    /// is still unused and unrevoked. If the guard fails (another caller
    /// got there first, or the record turned terminal in between), nothing
    /// is persisted.
    ///
    /// # Arguments
    /// * `token_id` - The presented record's id
    /// * `user_id` - The presented record's owner
    /// * `used_at` - Redemption timestamp to stamp on the presented record
    /// * `successor` - The replacement record (same family, id 0)
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - This caller won; the saved successor
    /// * `Ok(None)` - Lost the race or the record was already terminal
    /// * `Err(DomainError)` - Storage error occurred
    async fn redeem(
        &self,
        token_id: i64,
        user_id: Uuid,
        used_at: DateTime<Utc>,
        successor: RefreshToken,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Delete terminal records that are past their retention window
    ///
    /// Removes records whose expiry lies more than `grace` in the past and
    /// revoked records older than `grace`. Housekeeping only; the rotation
    /// engine itself never deletes.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_expired(&self, grace: Duration) -> Result<usize, DomainError>;

    /// Count a user's active (redeemable) records
    async fn count_active_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let tokens = self.find_by_user(user_id).await?;
        Ok(tokens.iter().filter(|t| t.is_active()).count())
    }
}
