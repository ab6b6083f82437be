//! Wallet commands.

use gatherlove_client::Client;
use gatherlove_client::api::wallet::Transaction;
use gatherlove_core::Amount;

use super::{CliError, require_user};

/// Show the wallet balance.
pub async fn balance(client: &Client) -> Result<(), CliError> {
    let user = require_user(client).await?;
    let balance = client.wallet().balance(&user.id).await?;

    println!("Balance: Rp {balance}");
    Ok(())
}

/// List one page of transactions.
pub async fn transactions(client: &Client, page: u32, size: u32) -> Result<(), CliError> {
    let user = require_user(client).await?;
    let transactions = client.wallet().transactions(&user.id, page, size).await?;

    for tx in &transactions.content {
        print_transaction(tx);
    }
    println!(
        "Page {}/{} ({} total)",
        transactions.number + 1,
        transactions.total_pages,
        transactions.total_elements
    );
    Ok(())
}

/// Top up the wallet.
pub async fn top_up(
    client: &Client,
    amount: i64,
    method: &str,
    phone: Option<&str>,
) -> Result<(), CliError> {
    let user = require_user(client).await?;
    let method = method
        .parse()
        .map_err(CliError::InvalidArgument)?;

    client
        .wallet()
        .top_up(&user.id, Amount::new(amount), method, phone)
        .await?;

    println!("Top-up of Rp {amount} submitted.");
    Ok(())
}

/// Delete a top-up transaction by ID.
///
/// The backend exposes no single-transaction endpoint, so the entry is
/// located by scanning the history first.
pub async fn delete_transaction(client: &Client, id: &str) -> Result<(), CliError> {
    let user = require_user(client).await?;

    let page = client.wallet().transactions(&user.id, 0, 100).await?;
    let transaction = page
        .content
        .iter()
        .find(|tx| tx.id.as_str() == id)
        .ok_or_else(|| CliError::NotFound(format!("transaction {id}")))?;

    client
        .wallet()
        .delete_transaction(&user.id, transaction)
        .await?;

    println!("Deleted transaction {id}.");
    Ok(())
}

fn print_transaction(tx: &Transaction) {
    println!(
        "{}  {:>12}  {}  {}",
        tx.created_at.format("%Y-%m-%d %H:%M"),
        format!("Rp {}", tx.amount),
        tx.id,
        tx.description
    );
}
