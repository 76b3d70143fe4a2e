//! Mock implementation of TokenRepository for testing

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// In-memory token repository for testing
///
/// Ids are assigned from an atomic counter; `redeem` holds the write lock
/// across its check-and-update, which gives it the same at-most-one-winner
/// guarantee the MySQL implementation gets from its guarded UPDATE.
pub struct MockTokenRepository {
    tokens: Arc<RwLock<Vec<RefreshToken>>>,
    next_id: AtomicI64,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }

    fn assign_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, mut token: RefreshToken) -> Result<RefreshToken, DomainError> {
        if token.id != 0 {
            return Err(DomainError::Validation {
                message: "Record already persisted".to_string(),
            });
        }

        token.id = self.assign_id();

        let mut tokens = self.tokens.write().await;
        tokens.push(token.clone());
        Ok(token)
    }

    async fn save_all(&self, updated: &[RefreshToken]) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        for update in updated {
            match tokens.iter_mut().find(|t| t.id == update.id) {
                Some(existing) => *existing = update.clone(),
                None => {
                    return Err(DomainError::NotFound {
                        resource: format!("refresh token {}", update.id),
                    })
                }
            }
        }

        Ok(())
    }

    async fn find_by_id_and_user(
        &self,
        token_id: i64,
        user_id: Uuid,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .find(|t| t.id == token_id && t.user_id == user_id)
            .cloned())
    }

    async fn find_by_family(&self, family_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .filter(|t| t.family_id == family_id)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .filter(|t| t.user_id == user_id && t.revoked_at.is_none())
            .cloned()
            .collect())
    }

    async fn redeem(
        &self,
        token_id: i64,
        user_id: Uuid,
        used_at: DateTime<Utc>,
        mut successor: RefreshToken,
    ) -> Result<Option<RefreshToken>, DomainError> {
        // The write lock spans the guard check and both writes
        let mut tokens = self.tokens.write().await;

        let still_active = tokens
            .iter()
            .any(|t| {
                t.id == token_id
                    && t.user_id == user_id
                    && t.used_at.is_none()
                    && t.revoked_at.is_none()
            });

        if !still_active {
            return Ok(None);
        }

        successor.id = self.assign_id();
        tokens.push(successor.clone());

        let presented = tokens
            .iter_mut()
            .find(|t| t.id == token_id)
            .expect("record checked above");
        presented.mark_used(used_at, successor.id);

        Ok(Some(successor))
    }

    async fn delete_expired(&self, grace: Duration) -> Result<usize, DomainError> {
        let cutoff = Utc::now() - grace;
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|t| {
            let long_expired = t.expires_at < cutoff;
            let long_revoked = t.revoked_at.map(|at| at < cutoff).unwrap_or(false);
            !long_expired && !long_revoked
        });

        Ok(initial_count - tokens.len())
    }
}
