//! Admin console commands.

use gatherlove_client::Client;

use super::CliError;

/// Dashboard statistics.
pub async fn stats(client: &Client) -> Result<(), CliError> {
    let stats = client.admin().statistics().await?;

    println!("Users:              {}", stats.total_users);
    println!("Campaigns:          {}", stats.total_campaigns);
    println!("Pending campaigns:  {}", stats.pending_campaigns);
    println!("Donations:          {}", stats.total_donations);
    println!("Total donated:      Rp {}", stats.total_amount);
    Ok(())
}

/// List campaigns in the moderation queue.
pub async fn campaigns(client: &Client) -> Result<(), CliError> {
    let campaigns = client.admin().campaigns().await?;

    for campaign in &campaigns {
        println!(
            "{}  {:?}  {}",
            campaign.campaign_id,
            campaign.status,
            campaign.title
        );
    }
    println!("{} campaign(s)", campaigns.len());
    Ok(())
}

/// Approve a pending campaign.
pub async fn approve(client: &Client, id: &str) -> Result<(), CliError> {
    client.admin().approve_campaign(&id.into()).await?;
    println!("Approved {id}.");
    Ok(())
}

/// Reject a pending campaign.
pub async fn reject(client: &Client, id: &str, reason: &str) -> Result<(), CliError> {
    client.admin().reject_campaign(&id.into(), reason).await?;
    println!("Rejected {id}.");
    Ok(())
}

/// List users.
pub async fn users(client: &Client, page: u32, size: u32) -> Result<(), CliError> {
    let users = client.admin().users(page, size).await?;

    for user in &users.content {
        let state = match user.active {
            Some(false) => "blocked",
            _ => "active",
        };
        println!("{}  {:8}  {} <{}>", user.id, state, user.name, user.email);
    }
    println!(
        "Page {}/{} ({} total)",
        users.number + 1,
        users.total_pages,
        users.total_elements
    );
    Ok(())
}

/// Block a user.
pub async fn block(client: &Client, id: &str, reason: &str) -> Result<(), CliError> {
    client.admin().block_user(&id.into(), reason).await?;
    println!("Blocked {id}.");
    Ok(())
}

/// Unblock a user.
pub async fn unblock(client: &Client, id: &str) -> Result<(), CliError> {
    client.admin().unblock_user(&id.into()).await?;
    println!("Unblocked {id}.");
    Ok(())
}
