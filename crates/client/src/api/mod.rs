//! Typed wrappers over the core application backend's REST surface.
//!
//! One wrapper struct per endpoint area, each holding a clone of the shared
//! [`Http`](crate::transport::Http) transport. Wrappers are stateless beyond
//! the transport; session state lives in
//! [`SessionManager`](crate::session::SessionManager).
//!
//! Admin-console operations (the `admin` and announcement-management
//! surfaces) additionally check the persisted token's expiry before sending
//! anything, via [`ExpiryGuard`].

pub mod admin;
pub mod announcements;
pub mod campaigns;
pub mod donations;
pub mod wallet;

use chrono::Utc;
use tracing::warn;

use crate::error::{ApiError, EXPIRED_LOGIN_ROUTE};
use crate::token::{self, TokenStore};

/// Pre-flight expiry check for admin-console calls.
///
/// Inspects the persisted token's `exp` claim before the request is built.
/// An expired (or undecodable) token is fatal-in-place: persisted state is
/// cleared and the caller gets a session-expired error carrying the login
/// route, without any request going out.
#[derive(Debug, Clone)]
pub(crate) struct ExpiryGuard {
    store: TokenStore,
}

impl ExpiryGuard {
    pub(crate) const fn new(store: TokenStore) -> Self {
        Self { store }
    }

    pub(crate) fn check(&self) -> Result<(), ApiError> {
        let token = self.store.load()?.ok_or(ApiError::NotAuthenticated)?;

        if token::is_expired(&token, Utc::now().timestamp()) {
            warn!("persisted token is expired, clearing stored session");
            self.store.clear_all();
            return Err(ApiError::SessionExpired {
                login_route: EXPIRED_LOGIN_ROUTE.to_owned(),
            });
        }
        Ok(())
    }
}
