//! Unit tests for the token cleanup service

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::domain::value_objects::ClientContext;
use crate::repositories::token::{MockTokenRepository, TokenRepository};
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

fn make_token(user_id: Uuid) -> RefreshToken {
    RefreshToken::new(
        user_id,
        Uuid::new_v4(),
        "hash".to_string(),
        Duration::days(7),
        &ClientContext::default(),
    )
}

#[tokio::test]
async fn test_cleanup_removes_only_stale_records() {
    let repo = Arc::new(MockTokenRepository::new());
    let user_id = Uuid::new_v4();

    // Active record, kept
    repo.save(make_token(user_id)).await.unwrap();

    // Expired well past the grace window, removed
    let mut stale = make_token(user_id);
    stale.expires_at = Utc::now() - Duration::days(30);
    let stale = repo.save(stale).await.unwrap();

    // Revoked yesterday, still inside the grace window, kept
    let mut recent = repo.save(make_token(user_id)).await.unwrap();
    recent.revoked_at = Some(Utc::now() - Duration::days(1));
    repo.save_all(std::slice::from_ref(&recent)).await.unwrap();

    let service = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());
    let deleted = service.run_cleanup().await.unwrap();

    assert_eq!(deleted, 1);
    assert!(repo
        .find_by_id_and_user(stale.id, user_id)
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .find_by_id_and_user(recent.id, user_id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_cleanup_disabled_deletes_nothing() {
    let repo = Arc::new(MockTokenRepository::new());

    let mut stale = make_token(Uuid::new_v4());
    stale.expires_at = Utc::now() - Duration::days(30);
    repo.save(stale).await.unwrap();

    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };
    let service = TokenCleanupService::new(Arc::clone(&repo), config);

    let deleted = service.run_cleanup().await.unwrap();
    assert_eq!(deleted, 0);
}
