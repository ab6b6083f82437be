//! Command implementations, one module per endpoint area.

pub mod admin;
pub mod announcements;
pub mod auth;
pub mod campaigns;
pub mod donations;
pub mod wallet;

use thiserror::Error;

use gatherlove_client::error::{ApiError, ConfigError};
use gatherlove_client::models::UserProfile;
use gatherlove_client::{Client, config::ClientConfig};
use gatherlove_core::EmailError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An email argument failed validation.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// A command that needs a session was run while logged out.
    #[error("not logged in; run `gl-cli auth login` first")]
    NotLoggedIn,

    /// A command argument could not be parsed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced entity was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Build a client from the environment.
pub fn client() -> Result<Client, CliError> {
    dotenvy::dotenv().ok();
    Ok(Client::new(ClientConfig::from_env()?)?)
}

/// The logged-in user, or a friendly error.
pub async fn require_user(client: &Client) -> Result<UserProfile, CliError> {
    client
        .session()
        .current_user()
        .await
        .ok_or(CliError::NotLoggedIn)
}
