//! Session lifecycle against the identity backend.
//!
//! The [`SessionManager`] is the single source of truth for "who is logged
//! in". It owns the persisted token, the in-memory session state, and the
//! shared transport slot; every other component holds only a read-only
//! snapshot plus the operations exposed here.
//!
//! # Invariants
//!
//! - A session is authenticated iff both the user profile and the token are
//!   present. Operations set or clear both together; no partial state
//!   outlives an operation.
//! - While `is_loading` is true, consumers must not make access-control
//!   decisions (the guard module returns a pending decision).
//! - Overlapping `login` calls are serialized by an internal mutex, so two
//!   in-flight attempts can never interleave into the token of one paired
//!   with the profile of the other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::models::{Credentials, RegisterData, UserProfile};
use crate::token::{TokenSlot, TokenStore};
use crate::transport::Http;

/// Read-only view of the session for access-control decisions.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Whether a session operation (initial hydration or login) is in flight.
    pub is_loading: bool,
    /// The authenticated user, when present.
    pub user: Option<UserProfile>,
    /// Whether a bearer token is held.
    pub has_token: bool,
}

impl SessionSnapshot {
    /// Authenticated means both the user and the token are present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.has_token
    }
}

/// Session manager: owns the authenticated-user state and the bearer token.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

struct SessionInner {
    /// Identity backend transport.
    auth: Http,
    store: TokenStore,
    slot: TokenSlot,
    state: RwLock<SessionState>,
    /// Serializes overlapping login attempts.
    login_lock: Mutex<()>,
    initialized: AtomicBool,
}

struct SessionState {
    user: Option<UserProfile>,
    token: Option<SecretString>,
    is_loading: bool,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default)]
    email: Option<String>,
}

/// Fields an account holder may edit on their own profile.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// Display name.
    pub name: String,
    /// Contact phone; `None` clears the field.
    pub phone_number: Option<String>,
    /// Free-form bio, at most 500 characters.
    pub bio: Option<String>,
    /// Avatar URL.
    pub profile_picture_url: Option<String>,
}

/// Longest accepted bio, in characters.
pub const MAX_BIO_LENGTH: usize = 500;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdateRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_picture_url: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_picture_url: Option<&'a str>,
}

impl SessionManager {
    /// Create a session manager over the identity transport.
    ///
    /// The session starts empty and loading; call [`Self::initialize`] once
    /// to rehydrate from the persisted token.
    #[must_use]
    pub fn new(auth: Http, store: TokenStore, slot: TokenSlot) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                auth,
                store,
                slot,
                state: RwLock::new(SessionState {
                    user: None,
                    token: None,
                    is_loading: true,
                }),
                login_lock: Mutex::new(()),
                initialized: AtomicBool::new(false),
            }),
        }
    }

    /// Take a read-only snapshot of the session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.read().await;
        SessionSnapshot {
            is_loading: state.is_loading,
            user: state.user.clone(),
            has_token: state.token.is_some(),
        }
    }

    /// Whether a user is logged in (user and token both present).
    pub async fn is_authenticated(&self) -> bool {
        self.snapshot().await.is_authenticated()
    }

    /// The current user's profile, if authenticated.
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.inner.state.read().await.user.clone()
    }

    /// Rehydrate the session from the persisted token.
    ///
    /// Absent token: the session is marked empty and loading finishes.
    /// Present token: it is published to the transport slot optimistically,
    /// then the identity is resolved in two steps. Any failure atomically
    /// clears the persisted token, the in-memory session, and the slot.
    ///
    /// Idempotent: calls after the first are no-ops.
    ///
    /// # Errors
    ///
    /// Reserved; rehydration failures clear the session rather than error,
    /// matching the "failed rehydration means logged out" lifecycle.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), ApiError> {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let persisted = match self.inner.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "failed to read persisted token");
                None
            }
        };

        let Some(raw) = persisted else {
            self.finish_loading_empty().await;
            return Ok(());
        };

        let token = SecretString::from(raw);
        // Publish before the profile fetch so it goes out authenticated.
        self.inner.slot.set(token.clone()).await;

        match self.resolve_profile().await {
            Ok(user) => {
                self.set_session(user, token).await;
            }
            Err(e) => {
                warn!(error = %e, "session rehydration failed, clearing session");
                self.clear_session().await;
            }
        }
        Ok(())
    }

    /// Log in with email and password.
    ///
    /// On success the token is persisted and published to the transport slot
    /// before the profile fetch is issued, then the profile is resolved and
    /// the session populated. On any failure the session is left fully
    /// cleared and the error returned for display.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] for rejected credentials,
    /// [`ApiError::MissingToken`] when the response carries no token, and
    /// transport errors otherwise.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let _guard = self.inner.login_lock.lock().await;

        self.inner.state.write().await.is_loading = true;

        match self.login_inner(credentials).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.clear_session().await;
                Err(e)
            }
        }
    }

    async fn login_inner(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response: LoginResponse = self
            .inner
            .auth
            .post(
                "/auth/login",
                &LoginRequest {
                    email: credentials.email.as_str(),
                    password: credentials.password.expose_secret(),
                },
            )
            .await?;

        let token = SecretString::from(response.token.ok_or(ApiError::MissingToken)?);

        // Persistence and slot publication complete, in program order,
        // before the profile fetch is issued.
        self.inner.store.save(&token)?;
        self.inner.slot.set(token.clone()).await;

        let user = self.resolve_profile().await?;
        self.set_session(user, token).await;
        Ok(())
    }

    /// Log out: clear the persisted token (including legacy keys), the
    /// in-memory session, and the transport slot.
    ///
    /// Pure cleanup; never fails, safe to call from any state. A logout
    /// issued while a login is in flight is ordered after it, so the
    /// completing attempt cannot repopulate a session the user ended.
    pub async fn logout(&self) {
        let _guard = self.inner.login_lock.lock().await;
        self.clear_session().await;
    }

    /// Register a new account.
    ///
    /// Does not log the user in; a successful registration routes the user
    /// to the login flow.
    ///
    /// # Errors
    ///
    /// Surfaces the server-provided message via [`ApiError::Backend`] when
    /// present, or the transport error otherwise.
    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn register(&self, data: &RegisterData) -> Result<(), ApiError> {
        self.inner
            .auth
            .post_unit(
                "/auth/register",
                &RegisterRequest {
                    name: &data.name,
                    email: data.email.as_str(),
                    password: data.password.expose_secret(),
                    phone_number: data.phone_number.as_deref(),
                    bio: data.bio.as_deref(),
                    profile_picture_url: data.profile_picture_url.as_deref(),
                },
            )
            .await
    }

    /// Re-fetch the current identity's detailed profile.
    ///
    /// For use after any operation that changes profile data (e.g. a role
    /// upgrade). Updates `current_user` only; the token is never altered.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] without a token, or the
    /// transport error from the fetch. The session is not cleared on
    /// failure; the previous profile stays visible.
    #[instrument(skip(self))]
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        if !self.inner.slot.is_set().await {
            return Err(ApiError::NotAuthenticated);
        }

        let user = self.resolve_profile().await?;
        self.inner.state.write().await.user = Some(user.clone());
        Ok(user)
    }

    /// Update the current user's editable profile fields, then refresh the
    /// profile so the changes are visible.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] without a session,
    /// [`ApiError::Validation`] for an over-long bio (nothing is sent in
    /// that case), or the backend's rejection.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        if !self.inner.slot.is_set().await {
            return Err(ApiError::NotAuthenticated);
        }
        if update.bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_LENGTH) {
            return Err(ApiError::Validation {
                message: format!("bio must be at most {MAX_BIO_LENGTH} characters"),
            });
        }

        self.inner
            .auth
            .put_unit(
                "/api/users/profile/me",
                &ProfileUpdateRequest {
                    name: &update.name,
                    phone_number: update.phone_number.as_deref(),
                    bio: update.bio.as_deref(),
                    profile_picture_url: update.profile_picture_url.as_deref(),
                },
            )
            .await?;
        self.refresh_profile().await
    }

    /// Upgrade the current account to the fundraiser role, then refresh the
    /// profile so the new role is visible.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] without a session, or the
    /// backend's rejection.
    #[instrument(skip(self))]
    pub async fn upgrade_to_fundraiser(&self) -> Result<UserProfile, ApiError> {
        if !self.inner.slot.is_set().await {
            return Err(ApiError::NotAuthenticated);
        }

        self.inner.auth.post_empty("/auth/upgrade", &[]).await?;
        self.refresh_profile().await
    }

    /// Two-step identity resolution: the authentication marker from
    /// `/auth/me`, then the full profile keyed by that marker.
    async fn resolve_profile(&self) -> Result<UserProfile, ApiError> {
        let me: MeResponse = self.inner.auth.get("/auth/me", &[]).await?;
        let email = me.email.ok_or(ApiError::MissingIdentity)?;

        self.inner
            .auth
            .get(&format!("/api/users/email/{email}"), &[])
            .await
    }

    async fn set_session(&self, user: UserProfile, token: SecretString) {
        let mut state = self.inner.state.write().await;
        state.user = Some(user);
        state.token = Some(token);
        state.is_loading = false;
    }

    async fn finish_loading_empty(&self) {
        let mut state = self.inner.state.write().await;
        state.user = None;
        state.token = None;
        state.is_loading = false;
    }

    async fn clear_session(&self) {
        self.inner.store.clear_all();
        self.inner.slot.clear().await;
        self.finish_loading_empty().await;
    }
}
