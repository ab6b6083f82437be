//! Announcement commands.

use gatherlove_client::Client;

use super::CliError;

/// List public announcements.
pub async fn list(client: &Client) -> Result<(), CliError> {
    let announcements = client.announcements().list().await?;

    for announcement in &announcements {
        println!(
            "[{}] {} ({})",
            announcement.created_at.format("%Y-%m-%d"),
            announcement.title,
            announcement.id
        );
        println!("  {}", announcement.content);
    }
    Ok(())
}

/// Publish an announcement.
pub async fn create(client: &Client, title: &str, content: &str) -> Result<(), CliError> {
    client.announcements().create(title, content).await?;
    println!("Announcement published.");
    Ok(())
}

/// Remove an announcement.
pub async fn delete(client: &Client, id: &str) -> Result<(), CliError> {
    client.announcements().delete(&id.into()).await?;
    println!("Deleted announcement {id}.");
    Ok(())
}
