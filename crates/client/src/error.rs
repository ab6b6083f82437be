//! Unified error handling for the client.
//!
//! The error shape is decided once at the transport boundary rather than
//! probed ad hoc at every call site: a request either failed to produce a
//! response ([`ApiError::Network`]), produced an error status whose JSON
//! `message` field is surfaced ([`ApiError::Backend`]), or produced a body
//! this client could not decode ([`ApiError::Parse`]). Client-side checks
//! that never reach the wire report [`ApiError::Validation`].

use thiserror::Error;

use gatherlove_core::AmountError;

use crate::token::StoreError;

/// Login route used when an expired token is detected before an admin call.
pub const EXPIRED_LOGIN_ROUTE: &str = "/auth/login?expired=true";

/// Errors that can occur when talking to the GatherLove backends.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with an error status.
    #[error("backend error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the status reason when absent.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A client-side check failed; no request was sent.
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable description of the failed check.
        message: String,
    },

    /// The persisted token's `exp` claim is in the past. Storage has already
    /// been cleared; the caller should navigate to [`EXPIRED_LOGIN_ROUTE`].
    #[error("session expired, re-authentication required")]
    SessionExpired {
        /// Route the caller should navigate to.
        login_route: String,
    },

    /// An operation that requires a session was called without one.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The identity endpoint answered without an email marker.
    #[error("identity response did not include an email")]
    MissingIdentity,

    /// The login response did not carry a token.
    #[error("token not found in login response")]
    MissingToken,

    /// Reading or writing the persisted token failed.
    #[error("token store error: {0}")]
    Store(#[from] StoreError),
}

impl From<AmountError> for ApiError {
    fn from(err: AmountError) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("state directory error: {0}")]
    StateDir(#[from] std::io::Error),
}
