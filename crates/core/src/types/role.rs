//! User roles for access-control decisions.

use serde::{Deserialize, Serialize};

/// A role attached to a user account.
///
/// The backend serializes roles as SCREAMING_SNAKE strings inside the user
/// profile's `roles` array. Access-control decisions are pure functions over
/// this set; see the client crate's guard module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Default role for every registered user; may donate and top up.
    Donor,
    /// May create and manage fundraising campaigns.
    Fundraiser,
    /// May moderate campaigns, users, and announcements.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Donor => write!(f, "DONOR"),
            Self::Fundraiser => write!(f, "FUNDRAISER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DONOR" => Ok(Self::Donor),
            "FUNDRAISER" => Ok(Self::Fundraiser),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_screaming_snake() {
        let json = serde_json::to_string(&Role::Fundraiser).unwrap();
        assert_eq!(json, "\"FUNDRAISER\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("MODERATOR".parse::<Role>().is_err());
        assert_eq!("DONOR".parse::<Role>().unwrap(), Role::Donor);
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
    }
}
