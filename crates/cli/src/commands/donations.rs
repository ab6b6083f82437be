//! Donation commands.

use gatherlove_client::Client;
use gatherlove_core::Amount;

use super::{CliError, require_user};

/// List the current user's donations.
pub async fn list(client: &Client) -> Result<(), CliError> {
    require_user(client).await?;
    let donations = client.donations().my_donations().await?;

    for donation in &donations {
        println!(
            "{}  {:>12}  {}",
            donation.created_at.format("%Y-%m-%d %H:%M"),
            format!("Rp {}", donation.amount),
            donation.message.as_deref().unwrap_or("-")
        );
    }
    println!("{} donation(s)", donations.len());
    Ok(())
}

/// Donate to a campaign.
pub async fn give(
    client: &Client,
    campaign_id: &str,
    amount: i64,
    message: Option<&str>,
) -> Result<(), CliError> {
    require_user(client).await?;

    client
        .donations()
        .donate(&campaign_id.into(), Amount::new(amount), message)
        .await?;

    println!("Donated Rp {amount} to {campaign_id}. Terima kasih!");
    Ok(())
}
