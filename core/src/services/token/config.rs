//! Configuration for the rotation service

use chrono::Duration;

use crate::domain::entities::token::REFRESH_TOKEN_EXPIRY_DAYS;

/// Configuration for the rotation service
#[derive(Debug, Clone)]
pub struct RotationConfig {
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl RotationConfig {
    /// Validity window of newly issued records
    pub fn ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            refresh_token_expiry_days: REFRESH_TOKEN_EXPIRY_DAYS,
        }
    }
}
