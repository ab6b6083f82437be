//! Session lifecycle tests: registration, login, logout, and rehydration
//! against the in-process stub backend.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use gatherlove_client::error::ApiError;
use gatherlove_client::guard::{AccessGuard, RolePredicate};
use gatherlove_client::models::{Credentials, RegisterData};
use gatherlove_client::session::SessionSnapshot;
use gatherlove_core::{Email, Role};
use gatherlove_integration_tests::{TestContext, issue_token};

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: Email::parse(email).unwrap(),
        password: SecretString::from(password.to_owned()),
    }
}

/// A session is authenticated exactly when the user and token are both set.
fn assert_consistent(snapshot: &SessionSnapshot) {
    assert_eq!(
        snapshot.is_authenticated(),
        snapshot.user.is_some() && snapshot.has_token,
        "user and token must be set or cleared together"
    );
    assert_eq!(snapshot.user.is_some(), snapshot.has_token);
}

// ============================================================================
// Login / logout
// ============================================================================

#[tokio::test]
async fn test_login_then_logout_clears_everything() {
    let ctx = TestContext::start().await;
    ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);

    let session = ctx.client.session();
    session.initialize().await.unwrap();

    session
        .login(&credentials("donor@example.com", "hunter2"))
        .await
        .unwrap();
    assert_consistent(&session.snapshot().await);
    assert!(session.is_authenticated().await);
    assert!(ctx.persisted_token().is_some());

    session.logout().await;
    let snapshot = session.snapshot().await;
    assert_consistent(&snapshot);
    assert!(!snapshot.is_authenticated());
    assert!(snapshot.user.is_none());
    assert!(!snapshot.has_token);
    assert!(ctx.persisted_token().is_none());
}

#[tokio::test]
async fn test_rejected_credentials_leave_session_cleared() {
    let ctx = TestContext::start().await;
    ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);

    let session = ctx.client.session();
    session.initialize().await.unwrap();

    let err = session
        .login(&credentials("donor@example.com", "wrong"))
        .await
        .expect_err("wrong password must be rejected");

    // The backend's message is surfaced, not a generic error.
    assert!(matches!(
        err,
        ApiError::Backend { status: 401, ref message } if message == "Invalid email or password"
    ));

    let snapshot = session.snapshot().await;
    assert_consistent(&snapshot);
    assert!(!snapshot.is_authenticated());
    assert!(ctx.persisted_token().is_none());
}

// ============================================================================
// Register then login
// ============================================================================

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let ctx = TestContext::start().await;
    let session = ctx.client.session();
    session.initialize().await.unwrap();

    session
        .register(&RegisterData {
            name: "Alice".to_owned(),
            email: Email::parse("a@b.com").unwrap(),
            password: SecretString::from("Aa123456"),
            phone_number: None,
            bio: None,
            profile_picture_url: None,
        })
        .await
        .unwrap();

    // Registration alone does not create a session.
    assert!(!session.is_authenticated().await);

    session
        .login(&credentials("a@b.com", "Aa123456"))
        .await
        .unwrap();

    let user = session.current_user().await.unwrap();
    assert_eq!(user.email.as_str(), "a@b.com");
    assert_eq!(user.name, "Alice");
}

#[tokio::test]
async fn test_duplicate_registration_surfaces_server_message() {
    let ctx = TestContext::start().await;
    ctx.seed_account("taken@example.com", "pw", "Taken", &["DONOR"]);

    let session = ctx.client.session();
    session.initialize().await.unwrap();

    let err = session
        .register(&RegisterData {
            name: "Dup".to_owned(),
            email: Email::parse("taken@example.com").unwrap(),
            password: SecretString::from("pw"),
            phone_number: None,
            bio: None,
            profile_picture_url: None,
        })
        .await
        .expect_err("duplicate email must be rejected");

    assert!(matches!(
        err,
        ApiError::Backend { ref message, .. } if message == "Email already registered"
    ));
}

// ============================================================================
// Rehydration
// ============================================================================

#[tokio::test]
async fn test_initialize_rehydrates_persisted_session() {
    let ctx = TestContext::start().await;
    ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);
    ctx.write_persisted_token(&issue_token(
        "donor@example.com",
        chrono::Utc::now().timestamp() + 3_600,
    ));

    let session = ctx.client.session();
    session.initialize().await.unwrap();

    let user = session.current_user().await.unwrap();
    assert_eq!(user.email.as_str(), "donor@example.com");
    assert_consistent(&session.snapshot().await);
}

#[tokio::test]
async fn test_initialize_with_unresolvable_token_clears_quietly() {
    let ctx = TestContext::start().await;
    // Token for an account the identity service does not know.
    ctx.write_persisted_token(&issue_token(
        "ghost@example.com",
        chrono::Utc::now().timestamp() + 3_600,
    ));

    let session = ctx.client.session();
    // Failed rehydration means logged out, not an error.
    session.initialize().await.unwrap();

    let snapshot = session.snapshot().await;
    assert_consistent(&snapshot);
    assert!(!snapshot.is_authenticated());
    assert!(!snapshot.is_loading);
    assert!(ctx.persisted_token().is_none());
}

#[tokio::test]
async fn test_session_survives_process_restart() {
    let ctx = TestContext::start().await;
    ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);

    ctx.client.session().initialize().await.unwrap();
    ctx.client
        .session()
        .login(&credentials("donor@example.com", "hunter2"))
        .await
        .unwrap();

    // A fresh client over the same state directory picks the session up.
    let restarted = ctx.new_client();
    restarted.session().initialize().await.unwrap();
    assert!(restarted.session().is_authenticated().await);
}

// ============================================================================
// Role upgrade and guard integration
// ============================================================================

#[tokio::test]
async fn test_upgrade_to_fundraiser_refreshes_roles() {
    let ctx = TestContext::start().await;
    ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);

    let session = ctx.client.session();
    session.initialize().await.unwrap();
    session
        .login(&credentials("donor@example.com", "hunter2"))
        .await
        .unwrap();

    let user = session.upgrade_to_fundraiser().await.unwrap();
    assert!(user.has_role(Role::Fundraiser));
    assert!(user.has_role(Role::Donor));
}

#[tokio::test]
async fn test_update_profile_refreshes_current_user() {
    let ctx = TestContext::start().await;
    ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);

    let session = ctx.client.session();
    session.initialize().await.unwrap();
    session
        .login(&credentials("donor@example.com", "hunter2"))
        .await
        .unwrap();

    let updated = session
        .update_profile(&gatherlove_client::session::ProfileUpdate {
            name: "Donor Renamed".to_owned(),
            phone_number: None,
            bio: None,
            profile_picture_url: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.name, "Donor Renamed");
    assert_eq!(
        session.current_user().await.unwrap().name,
        "Donor Renamed"
    );
}

#[tokio::test]
async fn test_guard_follows_session_state() {
    let ctx = TestContext::start().await;
    ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);

    let session = ctx.client.session();
    let guard = AccessGuard::new(RolePredicate::HasRole(Role::Donor));

    // Before initialize: pending, no redirect.
    let decision = guard.evaluate(&session.snapshot().await, "/wallet");
    assert!(!decision.grants_access());
    assert!(decision.effect.is_none());

    session.initialize().await.unwrap();
    session
        .login(&credentials("donor@example.com", "hunter2"))
        .await
        .unwrap();
    assert!(
        guard
            .evaluate(&session.snapshot().await, "/wallet")
            .grants_access()
    );

    session.logout().await;
    let decision = guard.evaluate(&session.snapshot().await, "/wallet");
    assert!(!decision.grants_access());
    assert!(decision.effect.is_some());
}
