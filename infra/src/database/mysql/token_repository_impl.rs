//! MySQL implementation of the TokenRepository trait.
//!
//! This module provides the concrete implementation of refresh token
//! persistence using MySQL with SQLx. Redemption runs inside a database
//! transaction whose guarded UPDATE gives the at-most-one-writer contract
//! the rotation engine relies on.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sq_core::domain::entities::token::RefreshToken;
use sq_core::errors::DomainError;
use sq_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Earliest timestamp a terminal record may carry and survive cleanup
    fn retention_cutoff(grace: Duration) -> DateTime<Utc> {
        Utc::now() - grace
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let family_id: String = row
            .try_get("family_id")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get family_id: {}", e),
            })?;

        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;

        Ok(RefreshToken {
            id: row.try_get("id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get id: {}", e),
            })?,
            family_id: Uuid::parse_str(&family_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid family UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            secret_hash: row
                .try_get("secret_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get secret_hash: {}", e),
                })?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get issued_at: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("used_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get used_at: {}", e),
                })?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get revoked_at: {}", e),
                })?,
            replaced_by_id: row
                .try_get("replaced_by_id")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get replaced_by_id: {}", e),
                })?,
            ip: row.try_get("ip").map_err(|e| DomainError::Internal {
                message: format!("Failed to get ip: {}", e),
            })?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get user_agent: {}", e),
                })?,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, family_id, user_id, secret_hash, issued_at, expires_at,
           used_at, revoked_at, replaced_by_id, ip, user_agent
    FROM refresh_tokens
"#;

const INSERT_TOKEN: &str = r#"
    INSERT INTO refresh_tokens (
        family_id, user_id, secret_hash, issued_at, expires_at,
        used_at, revoked_at, replaced_by_id, ip, user_agent
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, mut token: RefreshToken) -> Result<RefreshToken, DomainError> {
        if token.id != 0 {
            return Err(DomainError::Validation {
                message: "Record already persisted".to_string(),
            });
        }

        let result = sqlx::query(INSERT_TOKEN)
            .bind(token.family_id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.secret_hash)
            .bind(token.issued_at)
            .bind(token.expires_at)
            .bind(token.used_at)
            .bind(token.revoked_at)
            .bind(token.replaced_by_id)
            .bind(&token.ip)
            .bind(&token.user_agent)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to save refresh token: {}", e),
            })?;

        token.id = result.last_insert_id() as i64;
        Ok(token)
    }

    async fn save_all(&self, tokens: &[RefreshToken]) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let query = r#"
            UPDATE refresh_tokens
            SET secret_hash = ?, expires_at = ?, used_at = ?, revoked_at = ?,
                replaced_by_id = ?
            WHERE id = ?
        "#;

        for token in tokens {
            sqlx::query(query)
                .bind(&token.secret_hash)
                .bind(token.expires_at)
                .bind(token.used_at)
                .bind(token.revoked_at)
                .bind(token.replaced_by_id)
                .bind(token.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to update refresh token {}: {}", token.id, e),
                })?;
        }

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit token updates: {}", e),
        })?;

        Ok(())
    }

    async fn find_by_id_and_user(
        &self,
        token_id: i64,
        user_id: Uuid,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!("{} WHERE id = ? AND user_id = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(token_id)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find refresh token: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_family(&self, family_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!("{} WHERE family_id = ? ORDER BY issued_at ASC", SELECT_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(family_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find token family: {}", e),
            })?;

        let mut tokens = Vec::new();
        for row in rows {
            tokens.push(Self::row_to_token(&row)?);
        }

        Ok(tokens)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "{} WHERE user_id = ? AND revoked_at IS NULL ORDER BY issued_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user tokens: {}", e),
            })?;

        let mut tokens = Vec::new();
        for row in rows {
            tokens.push(Self::row_to_token(&row)?);
        }

        Ok(tokens)
    }

    async fn redeem(
        &self,
        token_id: i64,
        user_id: Uuid,
        used_at: DateTime<Utc>,
        mut successor: RefreshToken,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Insert the successor first so its id exists for the back-link
        let inserted = sqlx::query(INSERT_TOKEN)
            .bind(successor.family_id.to_string())
            .bind(successor.user_id.to_string())
            .bind(&successor.secret_hash)
            .bind(successor.issued_at)
            .bind(successor.expires_at)
            .bind(successor.used_at)
            .bind(successor.revoked_at)
            .bind(successor.replaced_by_id)
            .bind(&successor.ip)
            .bind(&successor.user_agent)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to save successor token: {}", e),
            })?;

        let successor_id = inserted.last_insert_id() as i64;

        // Guarded update: only an unused, unrevoked record can be redeemed.
        // A concurrent redeemer blocks on the row lock and then matches
        // zero rows.
        let updated = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET used_at = ?, replaced_by_id = ?
            WHERE id = ? AND user_id = ? AND used_at IS NULL AND revoked_at IS NULL
            "#,
        )
        .bind(used_at)
        .bind(successor_id)
        .bind(token_id)
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to redeem refresh token: {}", e),
        })?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| DomainError::Internal {
                message: format!("Failed to roll back redemption: {}", e),
            })?;
            return Ok(None);
        }

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit redemption: {}", e),
        })?;

        successor.id = successor_id;
        Ok(Some(successor))
    }

    async fn delete_expired(&self, grace: Duration) -> Result<usize, DomainError> {
        let cutoff = Self::retention_cutoff(grace);

        let query = r#"
            DELETE FROM refresh_tokens
            WHERE expires_at < ? OR (revoked_at IS NOT NULL AND revoked_at < ?)
        "#;

        let result = sqlx::query(query)
            .bind(cutoff)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete expired tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
