//! Unit tests for the mock token repository implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::domain::value_objects::ClientContext;
use crate::errors::DomainError;
use crate::repositories::token::{MockTokenRepository, TokenRepository};

fn make_token(user_id: Uuid, family_id: Uuid) -> RefreshToken {
    RefreshToken::new(
        user_id,
        family_id,
        "hash".to_string(),
        Duration::days(7),
        &ClientContext::default(),
    )
}

#[tokio::test]
async fn test_save_assigns_id_and_find() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    let saved = repo
        .save(make_token(user_id, Uuid::new_v4()))
        .await
        .unwrap();
    assert!(saved.id > 0);

    let found = repo
        .find_by_id_and_user(saved.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, saved);
}

#[tokio::test]
async fn test_find_with_wrong_user_resolves_to_none() {
    let repo = MockTokenRepository::new();
    let saved = repo
        .save(make_token(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let found = repo
        .find_by_id_and_user(saved.id, Uuid::new_v4())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_save_rejects_already_persisted_record() {
    let repo = MockTokenRepository::new();
    let saved = repo
        .save(make_token(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let result = repo.save(saved).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_find_by_family() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();

    repo.save(make_token(user_id, family_id)).await.unwrap();
    repo.save(make_token(user_id, family_id)).await.unwrap();
    repo.save(make_token(user_id, Uuid::new_v4())).await.unwrap();

    let family = repo.find_by_family(family_id).await.unwrap();
    assert_eq!(family.len(), 2);
    assert!(family.iter().all(|t| t.family_id == family_id));
}

#[tokio::test]
async fn test_find_by_user_excludes_revoked() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    let kept = repo.save(make_token(user_id, Uuid::new_v4())).await.unwrap();
    let mut revoked = repo.save(make_token(user_id, Uuid::new_v4())).await.unwrap();
    revoked.revoke();
    repo.save_all(std::slice::from_ref(&revoked)).await.unwrap();

    let found = repo.find_by_user(user_id).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, kept.id);
}

#[tokio::test]
async fn test_save_all_updates_existing_records() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();

    let mut a = repo.save(make_token(user_id, family_id)).await.unwrap();
    let mut b = repo.save(make_token(user_id, family_id)).await.unwrap();
    a.revoke();
    b.revoke();

    repo.save_all(&[a.clone(), b.clone()]).await.unwrap();

    let family = repo.find_by_family(family_id).await.unwrap();
    assert!(family.iter().all(|t| t.revoked_at.is_some()));
}

#[tokio::test]
async fn test_save_all_unknown_record_fails() {
    let repo = MockTokenRepository::new();
    let mut phantom = make_token(Uuid::new_v4(), Uuid::new_v4());
    phantom.id = 999;

    let result = repo.save_all(&[phantom]).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_redeem_marks_presented_and_links_successor() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();
    let presented = repo.save(make_token(user_id, family_id)).await.unwrap();

    let now = Utc::now();
    let successor = repo
        .redeem(presented.id, user_id, now, make_token(user_id, family_id))
        .await
        .unwrap()
        .expect("first redeem wins");

    assert!(successor.id > 0);
    assert_ne!(successor.id, presented.id);
    assert_eq!(successor.family_id, family_id);

    let presented = repo
        .find_by_id_and_user(presented.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(presented.used_at, Some(now));
    assert_eq!(presented.replaced_by_id, Some(successor.id));
}

#[tokio::test]
async fn test_redeem_of_terminal_record_loses() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();
    let presented = repo.save(make_token(user_id, family_id)).await.unwrap();

    let first = repo
        .redeem(presented.id, user_id, Utc::now(), make_token(user_id, family_id))
        .await
        .unwrap();
    assert!(first.is_some());

    let second = repo
        .redeem(presented.id, user_id, Utc::now(), make_token(user_id, family_id))
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn test_concurrent_redeems_have_one_winner() {
    let repo = Arc::new(MockTokenRepository::new());
    let user_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();
    let presented = repo.save(make_token(user_id, family_id)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = Arc::clone(&repo);
        let successor = make_token(user_id, family_id);
        let id = presented.id;
        handles.push(tokio::spawn(async move {
            repo.redeem(id, user_id, Utc::now(), successor).await.unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_delete_expired_honors_grace_window() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    // Expired long before the grace window
    let mut stale = make_token(user_id, Uuid::new_v4());
    stale.expires_at = Utc::now() - Duration::days(30);
    stale.issued_at = stale.expires_at - Duration::days(7);
    repo.save(stale).await.unwrap();

    // Revoked long ago
    let mut old_revoked = repo.save(make_token(user_id, Uuid::new_v4())).await.unwrap();
    old_revoked.revoked_at = Some(Utc::now() - Duration::days(30));
    repo.save_all(std::slice::from_ref(&old_revoked)).await.unwrap();

    // Freshly revoked, inside the grace window
    let mut fresh_revoked = repo.save(make_token(user_id, Uuid::new_v4())).await.unwrap();
    fresh_revoked.revoke();
    repo.save_all(std::slice::from_ref(&fresh_revoked)).await.unwrap();

    // Still active
    repo.save(make_token(user_id, Uuid::new_v4())).await.unwrap();

    let deleted = repo.delete_expired(Duration::days(7)).await.unwrap();
    assert_eq!(deleted, 2);
}
