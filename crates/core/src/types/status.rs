//! Status enums for campaigns, transactions, and payments.

use serde::{Deserialize, Serialize};

/// Campaign moderation status.
///
/// Maps to the backend's campaign status values. The vocabulary is open on
/// the backend side, so unknown strings deserialize into `Other` rather than
/// failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    /// Awaiting admin verification before going live.
    PendingVerification,
    /// Approved and accepting donations.
    Active,
    /// Rejected by an admin.
    Rejected,
    /// Reached its end date or target.
    Completed,
    /// Any status string this client does not know about.
    #[serde(untagged)]
    Other(String),
}

/// The underlying type of a wallet transaction.
///
/// `DEPOSIT`/`WITHDRAWAL` describe the balance direction; this describes the
/// originating operation. Only `TOP_UP` transactions may be deleted by the
/// user (business rule enforced client-side).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Wallet top-up through a payment provider.
    TopUp,
    /// Outgoing donation to a campaign.
    Donation,
    /// Fundraiser withdrawal of collected funds.
    Withdrawal,
    /// Any type string this client does not know about.
    #[serde(untagged)]
    Other(String),
}

impl TransactionType {
    /// Whether a transaction of this type may be deleted by its owner.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::TopUp)
    }
}

/// Payment method for wallet top-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    BankTransfer,
    CreditCard,
    EWallet,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BankTransfer => write!(f, "BANK_TRANSFER"),
            Self::CreditCard => write!(f, "CREDIT_CARD"),
            Self::EWallet => write!(f, "E_WALLET"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BANK_TRANSFER" => Ok(Self::BankTransfer),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "E_WALLET" => Ok(Self::EWallet),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
