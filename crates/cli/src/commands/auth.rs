//! Session and account commands.

use secrecy::SecretString;

use gatherlove_client::Client;
use gatherlove_client::models::{Credentials, RegisterData};
use gatherlove_client::session::ProfileUpdate;
use gatherlove_core::Email;

use super::{CliError, require_user};

/// Log in and persist the session token.
pub async fn login(client: &Client, email: &str, password: &str) -> Result<(), CliError> {
    let credentials = Credentials {
        email: Email::parse(email)?,
        password: SecretString::from(password.to_owned()),
    };

    client.session().login(&credentials).await?;

    let user = require_user(client).await?;
    println!("Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

/// Clear the persisted session.
pub async fn logout(client: &Client) {
    client.session().logout().await;
    println!("Logged out.");
}

/// Register a new account. Does not log in.
pub async fn register(
    client: &Client,
    name: &str,
    email: &str,
    password: &str,
    phone: Option<String>,
    bio: Option<String>,
) -> Result<(), CliError> {
    let data = RegisterData {
        name: name.to_owned(),
        email: Email::parse(email)?,
        password: SecretString::from(password.to_owned()),
        phone_number: phone,
        bio,
        profile_picture_url: None,
    };

    client.session().register(&data).await?;
    println!("Registered {email}. Log in with `gl-cli auth login`.");
    Ok(())
}

/// Show the current session's profile.
pub async fn me(client: &Client) -> Result<(), CliError> {
    let user = require_user(client).await?;

    println!("{} <{}>", user.name, user.email);
    println!(
        "  roles: {}",
        user.roles
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Some(phone) = &user.phone_number {
        println!("  phone: {phone}");
    }
    if let Some(bio) = &user.bio {
        println!("  bio: {bio}");
    }
    Ok(())
}

/// Edit the current session's profile.
pub async fn edit(
    client: &Client,
    name: String,
    phone: Option<String>,
    bio: Option<String>,
    picture: Option<String>,
) -> Result<(), CliError> {
    require_user(client).await?;

    let user = client
        .session()
        .update_profile(&ProfileUpdate {
            name,
            phone_number: phone,
            bio,
            profile_picture_url: picture,
        })
        .await?;

    println!("Profile updated: {} <{}>", user.name, user.email);
    Ok(())
}

/// Upgrade the current account to the fundraiser role.
pub async fn upgrade(client: &Client) -> Result<(), CliError> {
    require_user(client).await?;
    let user = client.session().upgrade_to_fundraiser().await?;

    println!(
        "Upgraded. Roles are now: {}",
        user.roles
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
