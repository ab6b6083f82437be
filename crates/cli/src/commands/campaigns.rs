//! Campaign commands.

use chrono::NaiveDate;

use gatherlove_client::Client;
use gatherlove_client::api::campaigns::{Campaign, CampaignDraft};
use gatherlove_core::Amount;

use super::{CliError, require_user};

/// List public campaigns.
pub async fn list(client: &Client) -> Result<(), CliError> {
    let campaigns = client.campaigns().list().await?;
    for campaign in &campaigns {
        print_campaign(campaign);
    }
    println!("{} campaign(s)", campaigns.len());
    Ok(())
}

/// Show one campaign.
pub async fn show(client: &Client, id: &str) -> Result<(), CliError> {
    let campaign = client.campaigns().detail(&id.into()).await?;

    println!("{} ({})", campaign.title, campaign.campaign_id);
    println!("  {}", campaign.description);
    println!(
        "  Rp {} / Rp {} ({}%)",
        campaign.funds_collected,
        campaign.target_amount,
        campaign.progress_percent()
    );
    if let (Some(start), Some(end)) = (campaign.start_date, campaign.end_date) {
        println!("  {start} to {end}");
    }
    if let Some(status) = &campaign.status {
        println!("  status: {status:?}");
    }
    Ok(())
}

/// List campaigns owned by the current fundraiser.
pub async fn mine(client: &Client) -> Result<(), CliError> {
    let user = require_user(client).await?;
    let campaigns = client.campaigns().by_fundraiser(&user.id).await?;

    for campaign in &campaigns {
        print_campaign(campaign);
    }
    println!("{} campaign(s)", campaigns.len());
    Ok(())
}

/// Create a campaign.
pub async fn create(
    client: &Client,
    title: &str,
    description: &str,
    target: i64,
    start: &str,
    end: &str,
) -> Result<(), CliError> {
    let user = require_user(client).await?;

    let draft = CampaignDraft {
        title: title.to_owned(),
        description: description.to_owned(),
        target_amount: Amount::new(target),
        start_date: parse_date(start)?,
        end_date: parse_date(end)?,
    };

    let campaign_id = client.campaigns().create(&user.id, &draft).await?;
    println!("Created campaign {campaign_id}.");
    Ok(())
}

/// Replace an owned campaign's editable fields.
pub async fn edit(
    client: &Client,
    id: &str,
    title: &str,
    description: &str,
    target: i64,
    start: &str,
    end: &str,
) -> Result<(), CliError> {
    let user = require_user(client).await?;

    let draft = CampaignDraft {
        title: title.to_owned(),
        description: description.to_owned(),
        target_amount: Amount::new(target),
        start_date: parse_date(start)?,
        end_date: parse_date(end)?,
    };

    client.campaigns().update(&id.into(), &user.id, &draft).await?;
    println!("Updated campaign {id}.");
    Ok(())
}

/// Attach a fund-usage proof link.
pub async fn upload_proof(client: &Client, id: &str, link: &str) -> Result<(), CliError> {
    client
        .campaigns()
        .upload_usage_proof(&id.into(), link)
        .await?;
    println!("Usage proof attached to {id}.");
    Ok(())
}

/// Delete a campaign.
pub async fn delete(client: &Client, id: &str) -> Result<(), CliError> {
    client.campaigns().delete(&id.into()).await?;
    println!("Deleted campaign {id}.");
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    raw.parse()
        .map_err(|_| CliError::InvalidArgument(format!("expected YYYY-MM-DD, got {raw}")))
}

fn print_campaign(campaign: &Campaign) {
    println!(
        "{}  {:>3}%  {}",
        campaign.campaign_id,
        campaign.progress_percent(),
        campaign.title
    );
}
