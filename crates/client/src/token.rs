//! Bearer token handling: the shared in-memory slot, the persisted store,
//! and client-side JWT expiry detection.
//!
//! The token is a JWT-shaped string issued by the identity backend. This
//! client never verifies the signature (the backend owns that); it only
//! decodes the payload's `exp` claim to short-circuit requests that would be
//! rejected anyway. A token whose payload cannot be decoded counts as
//! expired.

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

/// Storage key for the bearer token.
const TOKEN_KEY: &str = "token";

/// Key names written by earlier clients; logout clears these too.
const LEGACY_KEYS: &[&str] = &[
    "access_token",
    "refresh_token",
    "user_id",
    "is_logged_in",
    "user",
];

/// Errors that can occur when reading or writing the persisted token.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the token file failed.
    #[error("failed to read persisted token: {0}")]
    Read(std::io::Error),

    /// Writing the token file failed.
    #[error("failed to persist token: {0}")]
    Write(std::io::Error),
}

// =============================================================================
// In-memory slot
// =============================================================================

/// Shared slot holding the current bearer token.
///
/// Both transports read this lazily at request-send time, so a token change
/// from login/logout takes effect on the very next outgoing request.
#[derive(Clone, Default)]
pub struct TokenSlot {
    inner: Arc<RwLock<Option<SecretString>>>,
}

impl std::fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSlot").field("token", &"[REDACTED]").finish()
    }
}

impl TokenSlot {
    /// Publish a new token to the slot.
    pub async fn set(&self, token: SecretString) {
        *self.inner.write().await = Some(token);
    }

    /// Clear the slot.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Get the current token (if set).
    pub async fn get(&self) -> Option<SecretString> {
        self.inner.read().await.clone()
    }

    /// Whether a token is currently set.
    pub async fn is_set(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

// =============================================================================
// Persisted store
// =============================================================================

/// File-backed token store: one file per key under a state directory.
///
/// The browser original kept the token in `localStorage` under the key
/// `token`; this is the same contract with files standing in for keys.
#[derive(Debug, Clone)]
pub struct TokenStore {
    root: PathBuf,
}

impl TokenStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Load the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] for I/O failures other than the file
    /// simply not existing.
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.root.join(TOKEN_KEY)) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_owned()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    /// Persist the token under the well-known key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be written.
    pub fn save(&self, token: &SecretString) -> Result<(), StoreError> {
        std::fs::write(self.root.join(TOKEN_KEY), token.expose_secret())
            .map_err(StoreError::Write)
    }

    /// Remove the token and every legacy key.
    ///
    /// Never fails: this is pure cleanup, safe to call from any state.
    /// Failures other than "already gone" are logged and swallowed.
    pub fn clear_all(&self) {
        for key in std::iter::once(&TOKEN_KEY).chain(LEGACY_KEYS) {
            if let Err(e) = std::fs::remove_file(self.root.join(key))
                && e.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(key, error = %e, "failed to remove persisted key");
            }
        }
    }
}

// =============================================================================
// JWT expiry
// =============================================================================

/// The only claim this client reads.
#[derive(Deserialize)]
struct Claims {
    /// Expiry, seconds since the Unix epoch.
    exp: i64,
}

/// Decode the `exp` claim from a JWT-shaped token without verifying it.
///
/// Returns `None` when the token is not three dot-separated segments, the
/// payload is not valid base64url, or the claims lack an `exp`.
#[must_use]
pub fn decode_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

/// Whether the token is expired as of `now` (seconds since the Unix epoch).
///
/// Malformed tokens count as expired.
#[must_use]
pub fn is_expired(token: &str, now: i64) -> bool {
    decode_expiry(token).is_none_or(|exp| now >= exp)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Build an unsigned JWT-shaped token with the given `exp`.
    pub(crate) fn token_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn test_decode_expiry() {
        let token = token_with_exp(1_700_000_000);
        assert_eq!(decode_expiry(&token), Some(1_700_000_000));
    }

    #[test]
    fn test_expired_token() {
        let token = token_with_exp(1_000);
        assert!(is_expired(&token, 2_000));
        assert!(!is_expired(&token, 500));
    }

    #[test]
    fn test_exact_expiry_counts_as_expired() {
        let token = token_with_exp(1_000);
        assert!(is_expired(&token, 1_000));
    }

    #[test]
    fn test_malformed_tokens_count_as_expired() {
        assert!(is_expired("not-a-jwt", 0));
        assert!(is_expired("a.!!!.c", 0));
        let no_exp = format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode(br#"{"sub":"user-1"}"#)
        );
        assert!(is_expired(&no_exp, 0));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("gl-store-{}", uuid::Uuid::new_v4()));
        let store = TokenStore::new(dir.clone()).unwrap();

        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("abc.def.ghi")).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));

        store.clear_all();
        assert!(store.load().unwrap().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_clear_all_removes_legacy_keys() {
        let dir = std::env::temp_dir().join(format!("gl-store-{}", uuid::Uuid::new_v4()));
        let store = TokenStore::new(dir.clone()).unwrap();

        for key in LEGACY_KEYS {
            std::fs::write(dir.join(key), "stale").unwrap();
        }
        store.save(&SecretString::from("tok")).unwrap();

        store.clear_all();
        for key in LEGACY_KEYS {
            assert!(!dir.join(key).exists(), "legacy key {key} should be gone");
        }
        assert!(!dir.join(TOKEN_KEY).exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_slot_set_get_clear() {
        let slot = TokenSlot::default();
        assert!(!slot.is_set().await);

        slot.set(SecretString::from("tok")).await;
        assert!(slot.is_set().await);
        assert_eq!(slot.get().await.unwrap().expose_secret(), "tok");

        slot.clear().await;
        assert!(slot.get().await.is_none());
    }

    #[test]
    fn test_slot_debug_redacts() {
        let slot = TokenSlot::default();
        assert!(!format!("{slot:?}").contains("tok"));
        assert!(format!("{slot:?}").contains("REDACTED"));
    }
}
