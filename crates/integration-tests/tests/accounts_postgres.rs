//! Integration tests for the account directory on `PostgreSQL`.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `JUNGLE_TEST_DATABASE_URL` pointing at it
//!
//! Run with: cargo test -p jungle-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use jungle_accounts::db::{NewUserRecord, RepositoryError, UserStore};
use jungle_accounts::models::{NewUser, UserChanges};
use jungle_accounts::validation::{Field, ValidationError};
use jungle_core::NormalizedEmail;
use jungle_integration_tests::{TestContext, unique_email};

fn candidate(email: &str) -> NewUser {
    NewUser::new("name", email, "password", "password")
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_save_and_authenticate() {
    let ctx = TestContext::new().await;
    let directory = ctx.directory();
    let email = unique_email();

    let saved = directory.save(&candidate(&email)).await.unwrap();

    let shouted = format!("  {}  ", email.to_uppercase());
    let user = directory
        .authenticate_with_credentials(&shouted, "password")
        .await
        .unwrap();
    assert_eq!(user.map(|u| u.id), Some(saved.id));

    let wrong = directory
        .authenticate_with_credentials(&email, "pass")
        .await
        .unwrap();
    assert!(wrong.is_none());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_password_is_stored_hashed() {
    let ctx = TestContext::new().await;
    let directory = ctx.directory();
    let email = unique_email();

    let saved = directory.save(&candidate(&email)).await.unwrap();

    let hash: String = sqlx::query_scalar("SELECT password_hash FROM jungle.user WHERE id = $1")
        .bind(saved.id.as_i32())
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains("password"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_duplicate_email_rejected() {
    let ctx = TestContext::new().await;
    let directory = ctx.directory();
    let email = unique_email();

    directory.save(&candidate(&email)).await.unwrap();
    let err = directory
        .save(&candidate(&email.to_uppercase()))
        .await
        .unwrap_err();

    assert!(
        err.validation_errors()
            .unwrap()
            .contains(&ValidationError::DuplicateField(Field::Email))
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_unique_constraint_is_authoritative() {
    let ctx = TestContext::new().await;
    let directory = ctx.directory();
    let email = unique_email();

    directory.save(&candidate(&email)).await.unwrap();

    // Bypass validation and write straight to the store.
    let err = directory
        .store()
        .insert(NewUserRecord {
            name: "name".to_owned(),
            email: email.clone(),
            normalized_email: NormalizedEmail::parse(&email).unwrap(),
            password_hash: "hash".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_concurrent_saves_create_one_user() {
    let ctx = TestContext::new().await;
    let directory = ctx.directory();
    let email = unique_email();
    let first = candidate(&email);
    let second = candidate(&email);

    let (a, b) = tokio::join!(directory.save(&first), directory.save(&second));
    assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_update_changes_email_and_password() {
    let ctx = TestContext::new().await;
    let directory = ctx.directory();
    let saved = directory.save(&candidate(&unique_email())).await.unwrap();
    let new_email = unique_email();

    let updated = directory
        .update(
            saved.id,
            &UserChanges::default()
                .email(new_email.clone())
                .password("new-password", "new-password"),
        )
        .await
        .unwrap();
    assert_eq!(updated.email, new_email);
    assert!(updated.updated_at >= saved.updated_at);

    let user = directory
        .authenticate_with_credentials(&new_email, "new-password")
        .await
        .unwrap();
    assert_eq!(user.map(|u| u.id), Some(saved.id));
}
