//! Session domain types.
//!
//! Beyond role-based gating the profile is an opaque payload mirrored from
//! the backend; only `roles` carries client-side meaning.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use gatherlove_core::{Email, Role, UserId};

/// The authenticated user's profile as returned by the identity backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email, also the profile lookup key.
    pub email: Email,
    /// Role set driving access-control decisions.
    pub roles: Vec<Role>,
    /// Optional contact phone.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Optional free-form bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// Optional avatar URL.
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    /// Wallet identifier, when the account has one.
    #[serde(default)]
    pub wallet_id: Option<i64>,
    /// Whether the account is active (admins can block accounts).
    #[serde(default)]
    pub active: Option<bool>,
}

impl UserProfile {
    /// Whether the user's role set contains `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Login credentials.
///
/// The password is held as a secret and only exposed when the login request
/// body is built.
pub struct Credentials {
    /// Account email.
    pub email: Email,
    /// Account password.
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration payload.
///
/// Registration does not log the user in; a successful call routes the user
/// to the login flow.
pub struct RegisterData {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Account password.
    pub password: SecretString,
    /// Optional contact phone.
    pub phone_number: Option<String>,
    /// Optional free-form bio.
    pub bio: Option<String>,
    /// Optional avatar URL.
    pub profile_picture_url: Option<String>,
}

impl std::fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterData")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_camel_case() {
        let json = r#"{
            "id": "user-001",
            "name": "Alice",
            "email": "alice@example.com",
            "roles": ["DONOR", "FUNDRAISER"],
            "phoneNumber": "0812",
            "walletId": 7,
            "active": true
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id.as_str(), "user-001");
        assert_eq!(profile.phone_number.as_deref(), Some("0812"));
        assert_eq!(profile.wallet_id, Some(7));
        assert!(profile.has_role(Role::Fundraiser));
        assert!(!profile.has_role(Role::Admin));
    }

    #[test]
    fn test_profile_optional_fields_default() {
        let json = r#"{
            "id": "user-002",
            "name": "Bob",
            "email": "bob@example.com",
            "roles": ["DONOR"]
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.bio.is_none());
        assert!(profile.active.is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            email: Email::parse("a@b.com").unwrap(),
            password: SecretString::from("hunter2"),
        };
        let debug_output = format!("{credentials:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }
}
