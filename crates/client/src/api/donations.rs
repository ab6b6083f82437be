//! Donation operations: giving to a campaign, listing own donations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gatherlove_core::{Amount, CampaignId, DonationId};

use crate::error::ApiError;
use crate::transport::Http;

/// One donation made by the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Donation ID.
    pub donation_id: DonationId,
    /// Backend workflow state (e.g. `PENDING`, `COMPLETED`).
    #[serde(default)]
    pub state_name: Option<String>,
    /// When the donation was made.
    pub created_at: DateTime<Utc>,
    /// Optional message to the fundraiser.
    #[serde(default)]
    pub message: Option<String>,
    /// Donated rupiah.
    pub amount: i64,
    /// Target campaign, when the backend includes it.
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DonateRequest<'a> {
    campaign_id: &'a str,
    amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

/// Donation endpoint wrapper.
#[derive(Debug, Clone)]
pub struct DonationsApi {
    http: Http,
}

impl DonationsApi {
    pub(crate) const fn new(http: Http) -> Self {
        Self { http }
    }

    /// The current user's donations.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn my_donations(&self) -> Result<Vec<Donation>, ApiError> {
        self.http.get("/api/donations/self", &[]).await
    }

    /// Donate to a campaign.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] without sending anything when the
    /// amount is outside the accepted donation range (1_000 to 10_000_000
    /// rupiah, both inclusive); transport errors otherwise.
    #[instrument(skip(self, message))]
    pub async fn donate(
        &self,
        campaign_id: &CampaignId,
        amount: Amount,
        message: Option<&str>,
    ) -> Result<(), ApiError> {
        amount.validate_donation()?;

        self.http
            .post_unit(
                "/api/donations",
                &DonateRequest {
                    campaign_id: campaign_id.as_str(),
                    amount: amount.as_i64(),
                    message,
                },
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_donation_deserializes_wire_shape() {
        let json = r#"{
            "donationId": "don-1",
            "stateName": "COMPLETED",
            "createdAt": "2025-05-01T10:00:00Z",
            "message": "Semoga membantu",
            "amount": 25000
        }"#;

        let donation: Donation = serde_json::from_str(json).unwrap();
        assert_eq!(donation.amount, 25_000);
        assert_eq!(donation.state_name.as_deref(), Some("COMPLETED"));
        assert!(donation.campaign_id.is_none());
    }

    #[test]
    fn test_donate_request_omits_absent_message() {
        let request = DonateRequest {
            campaign_id: "camp-1",
            amount: 1_000,
            message: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"campaignId":"camp-1","amount":1000}"#);
    }
}
