//! Refresh token entities for rotating session credentials.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ClientContext;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Refresh token record stored in the database
///
/// Each record is a single-use credential in a rotation chain. All records
/// descending from one login event share a `family_id`; redemption links a
/// record to its successor through `replaced_by_id`. Once `used_at` or
/// `revoked_at` is set the record is terminal and never passes verification
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Store-assigned identifier; 0 until the record is first saved
    pub id: i64,

    /// Family this record belongs to, fixed at creation
    pub family_id: Uuid,

    /// User this record belongs to, fixed at creation
    pub user_id: Uuid,

    /// Salted hash of the single-use secret; the plaintext is never stored
    pub secret_hash: String,

    /// Timestamp when the record was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the record expires
    pub expires_at: DateTime<Utc>,

    /// Set exactly once, the moment the record is redeemed
    pub used_at: Option<DateTime<Utc>>,

    /// Set when the family is invalidated
    pub revoked_at: Option<DateTime<Utc>>,

    /// Identifier of the record that succeeded this one via rotation
    pub replaced_by_id: Option<i64>,

    /// Client IP captured at issuance, audit metadata only
    pub ip: Option<String>,

    /// Client user agent captured at issuance, audit metadata only
    pub user_agent: Option<String>,
}

impl RefreshToken {
    /// Creates a new refresh token record
    ///
    /// # Arguments
    ///
    /// * `user_id` - The owning user's UUID
    /// * `family_id` - The rotation family the record belongs to
    /// * `secret_hash` - The hashed single-use secret
    /// * `ttl` - Validity window from now
    /// * `context` - Client metadata captured at issuance
    ///
    /// # Returns
    ///
    /// A new `RefreshToken` with `id` 0; the repository assigns the real
    /// identifier on save.
    pub fn new(
        user_id: Uuid,
        family_id: Uuid,
        secret_hash: String,
        ttl: Duration,
        context: &ClientContext,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: 0,
            family_id,
            user_id,
            secret_hash,
            issued_at: now,
            expires_at: now + ttl,
            used_at: None,
            revoked_at: None,
            replaced_by_id: None,
            ip: context.ip.clone(),
            user_agent: context.user_agent.clone(),
        }
    }

    /// Checks if the record's validity window has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the record is terminal (already redeemed or revoked)
    pub fn is_terminal(&self) -> bool {
        self.used_at.is_some() || self.revoked_at.is_some()
    }

    /// Checks if the record can still be redeemed
    ///
    /// A record is active iff it has not been used, has not been revoked,
    /// and has not expired.
    pub fn is_active(&self) -> bool {
        !self.is_terminal() && !self.is_expired()
    }

    /// Marks the record as redeemed, linking it to its successor
    ///
    /// # Arguments
    ///
    /// * `at` - Redemption timestamp
    /// * `replaced_by` - Identifier of the successor record
    pub fn mark_used(&mut self, at: DateTime<Utc>, replaced_by: i64) {
        self.used_at = Some(at);
        self.replaced_by_id = Some(replaced_by);
    }

    /// Revokes the record; repeated calls keep the original timestamp
    pub fn revoke(&mut self) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(Utc::now());
        }
    }

    /// Gets the time remaining until expiration
    ///
    /// # Returns
    ///
    /// A `Duration` representing the time until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(user_id: Uuid) -> RefreshToken {
        RefreshToken::new(
            user_id,
            Uuid::new_v4(),
            "hashed_secret_value".to_string(),
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            &ClientContext::default(),
        )
    }

    #[test]
    fn test_refresh_token_creation() {
        let user_id = Uuid::new_v4();
        let token = make_token(user_id);

        assert_eq!(token.id, 0);
        assert_eq!(token.user_id, user_id);
        assert_eq!(token.secret_hash, "hashed_secret_value");
        assert!(token.used_at.is_none());
        assert!(token.revoked_at.is_none());
        assert!(token.replaced_by_id.is_none());
        assert!(token.expires_at > token.issued_at);
        assert!(token.is_active());
    }

    #[test]
    fn test_refresh_token_expiration() {
        let mut token = make_token(Uuid::new_v4());

        // Manually set expiration to past
        token.expires_at = Utc::now() - Duration::days(1);

        assert!(token.is_expired());
        assert!(!token.is_terminal());
        assert!(!token.is_active());
    }

    #[test]
    fn test_mark_used_is_terminal() {
        let mut token = make_token(Uuid::new_v4());
        let now = Utc::now();

        token.mark_used(now, 42);

        assert_eq!(token.used_at, Some(now));
        assert_eq!(token.replaced_by_id, Some(42));
        assert!(token.is_terminal());
        assert!(!token.is_active());
    }

    #[test]
    fn test_revoke_keeps_first_timestamp() {
        let mut token = make_token(Uuid::new_v4());

        token.revoke();
        let first = token.revoked_at;
        assert!(first.is_some());

        token.revoke();
        assert_eq!(token.revoked_at, first);
        assert!(token.is_terminal());
    }

    #[test]
    fn test_context_metadata_captured() {
        let context = ClientContext::new(
            Some("203.0.113.7".to_string()),
            Some("Mozilla/5.0".to_string()),
        );
        let token = RefreshToken::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "hash".to_string(),
            Duration::days(7),
            &context,
        );

        assert_eq!(token.ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(token.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_time_until_expiration() {
        let token = make_token(Uuid::new_v4());

        let time_remaining = token.time_until_expiration();
        let expected_max = Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);
        let expected_min = Duration::days(REFRESH_TOKEN_EXPIRY_DAYS - 1);

        assert!(time_remaining <= expected_max);
        assert!(time_remaining > expected_min);
    }

    #[test]
    fn test_refresh_token_serialization() {
        let token = make_token(Uuid::new_v4());

        let json = serde_json::to_string(&token).unwrap();
        let deserialized: RefreshToken = serde_json::from_str(&json).unwrap();

        assert_eq!(token, deserialized);
    }
}
