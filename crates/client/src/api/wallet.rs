//! Wallet operations: balance, transaction history, top-ups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gatherlove_core::{Amount, CampaignId, Page, PaymentMethod, TransactionId, TransactionType, UserId};

use crate::error::ApiError;
use crate::transport::Http;

/// Balance direction of a wallet transaction, as the ledger reports it.
///
/// Orthogonal to [`TransactionType`]: a donation shows up as a `WITHDRAWAL`
/// with `originalType: DONATION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionDirection {
    /// Money into the wallet.
    Deposit,
    /// Money out of the wallet.
    Withdrawal,
    /// Any direction string this client does not know about.
    #[serde(untagged)]
    Other(String),
}

/// One wallet ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Ledger entry ID.
    pub id: TransactionId,
    /// Signed rupiah amount.
    pub amount: i64,
    /// Balance direction.
    #[serde(rename = "type")]
    pub direction: TransactionDirection,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// When the transaction was recorded.
    pub created_at: DateTime<Utc>,
    /// The originating operation, when the backend reports one.
    #[serde(default)]
    pub original_type: Option<TransactionType>,
    /// Campaign involved, for donation-backed entries.
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
}

impl Transaction {
    /// Whether the owner may delete this entry. Only top-ups qualify.
    #[must_use]
    pub fn is_deletable(&self) -> bool {
        self.original_type
            .as_ref()
            .is_some_and(TransactionType::is_deletable)
    }
}

#[derive(Deserialize)]
struct BalanceResponse {
    balance: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TopUpRequest<'a> {
    user_id: &'a str,
    amount: i64,
    payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_phone: Option<&'a str>,
}

/// Wallet endpoint wrapper.
#[derive(Debug, Clone)]
pub struct WalletApi {
    http: Http,
}

impl WalletApi {
    pub(crate) const fn new(http: Http) -> Self {
        Self { http }
    }

    /// Current wallet balance in rupiah.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn balance(&self, user_id: &UserId) -> Result<i64, ApiError> {
        let response: BalanceResponse = self
            .http
            .get(
                "/api/wallet/balance",
                &[("userId", user_id.as_str().to_owned())],
            )
            .await?;
        Ok(response.balance)
    }

    /// Paged transaction history, newest first.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn transactions(
        &self,
        user_id: &UserId,
        page: u32,
        size: u32,
    ) -> Result<Page<Transaction>, ApiError> {
        self.http
            .get(
                "/api/wallet/transactions",
                &[
                    ("userId", user_id.as_str().to_owned()),
                    ("page", page.to_string()),
                    ("size", size.to_string()),
                ],
            )
            .await
    }

    /// The `limit` most recent transactions.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn recent_transactions(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.http
            .get(
                "/api/wallet/transactions",
                &[
                    ("userId", user_id.as_str().to_owned()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    /// Top up the wallet through a payment provider.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a non-positive amount without
    /// sending anything; transport errors otherwise.
    #[instrument(skip(self, payment_phone))]
    pub async fn top_up(
        &self,
        user_id: &UserId,
        amount: Amount,
        payment_method: PaymentMethod,
        payment_phone: Option<&str>,
    ) -> Result<(), ApiError> {
        amount.validate_top_up()?;

        self.http
            .post_unit(
                "/api/wallet/top-ups",
                &TopUpRequest {
                    user_id: user_id.as_str(),
                    amount: amount.as_i64(),
                    payment_method,
                    payment_phone,
                },
            )
            .await
    }

    /// Delete a transaction the user owns.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] without sending anything unless the
    /// entry's original type is a top-up; transport errors otherwise.
    #[instrument(skip(self, transaction), fields(transaction_id = %transaction.id))]
    pub async fn delete_transaction(
        &self,
        user_id: &UserId,
        transaction: &Transaction,
    ) -> Result<(), ApiError> {
        if !transaction.is_deletable() {
            return Err(ApiError::Validation {
                message: "only top-up transactions can be deleted".to_owned(),
            });
        }

        self.http
            .delete(
                &format!("/api/wallet/transactions/{}", transaction.id),
                &[("userId", user_id.as_str().to_owned())],
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn transaction(original_type: Option<TransactionType>) -> Transaction {
        Transaction {
            id: "tx-1".into(),
            amount: 50_000,
            direction: TransactionDirection::Deposit,
            description: "Top-up".to_owned(),
            created_at: Utc::now(),
            original_type,
            campaign_id: None,
        }
    }

    #[test]
    fn test_only_top_up_entries_are_deletable() {
        assert!(transaction(Some(TransactionType::TopUp)).is_deletable());
        assert!(!transaction(Some(TransactionType::Donation)).is_deletable());
        assert!(!transaction(None).is_deletable());
    }

    #[test]
    fn test_transaction_deserializes_wire_shape() {
        let json = r#"{
            "id": "tx-42",
            "amount": 100000,
            "type": "DEPOSIT",
            "description": "Wallet top-up",
            "createdAt": "2025-05-01T10:00:00Z",
            "originalType": "TOP_UP"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.direction, TransactionDirection::Deposit);
        assert!(tx.is_deletable());
        assert!(tx.campaign_id.is_none());
    }

    #[test]
    fn test_top_up_request_wire_shape() {
        let request = TopUpRequest {
            user_id: "user-1",
            amount: 50_000,
            payment_method: PaymentMethod::EWallet,
            payment_phone: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"userId\":\"user-1\""));
        assert!(json.contains("\"paymentMethod\":\"E_WALLET\""));
        assert!(!json.contains("paymentPhone"));
    }
}
