//! Campaign browsing plus the fundraiser's own-campaign CRUD.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gatherlove_core::{Amount, CampaignId, CampaignStatus, UserId};

use crate::error::ApiError;
use crate::transport::Http;

/// One campaign as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Campaign ID.
    pub campaign_id: CampaignId,
    /// Title shown to donors.
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Fundraising target in rupiah.
    #[serde(default)]
    pub target_amount: i64,
    /// Rupiah collected so far.
    #[serde(default)]
    pub funds_collected: i64,
    /// First day donations are accepted.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day donations are accepted.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Moderation status.
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    /// Owning fundraiser.
    #[serde(default)]
    pub fundraiser_id: Option<UserId>,
    /// Link to the fund-usage proof, once uploaded.
    #[serde(default)]
    pub usage_proof_link: Option<String>,
}

impl Campaign {
    /// Collected funds as a share of the target, clamped to 0..=100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.target_amount <= 0 {
            return 0;
        }
        let percent = self.funds_collected.saturating_mul(100) / self.target_amount;
        u8::try_from(percent.clamp(0, 100)).unwrap_or(100)
    }
}

/// Fields a fundraiser submits when creating or editing a campaign.
#[derive(Debug, Clone)]
pub struct CampaignDraft {
    /// Title shown to donors.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Fundraising target.
    pub target_amount: Amount,
    /// First day donations are accepted.
    pub start_date: NaiveDate,
    /// Last day donations are accepted.
    pub end_date: NaiveDate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignRequest<'a> {
    title: &'a str,
    description: &'a str,
    target_amount: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    fundraiser_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedCampaign {
    campaign_id: CampaignId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageProofRequest<'a> {
    usage_proof_link: &'a str,
}

/// Campaign endpoint wrapper.
#[derive(Debug, Clone)]
pub struct CampaignsApi {
    http: Http,
}

impl CampaignsApi {
    pub(crate) const fn new(http: Http) -> Self {
        Self { http }
    }

    /// All publicly listed campaigns.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Campaign>, ApiError> {
        self.http.get("/api/campaign", &[]).await
    }

    /// One campaign by ID.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn detail(&self, campaign_id: &CampaignId) -> Result<Campaign, ApiError> {
        self.http
            .get(&format!("/api/campaign/{campaign_id}"), &[])
            .await
    }

    /// Campaigns owned by one fundraiser.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn by_fundraiser(&self, fundraiser_id: &UserId) -> Result<Vec<Campaign>, ApiError> {
        self.http
            .get(&format!("/api/campaign/user/{fundraiser_id}"), &[])
            .await
    }

    /// Create a campaign; the backend decides its initial moderation status.
    ///
    /// Returns the new campaign's ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] without sending anything when the
    /// target amount is not positive or the date range is inverted.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(
        &self,
        fundraiser_id: &UserId,
        draft: &CampaignDraft,
    ) -> Result<CampaignId, ApiError> {
        validate_draft(draft)?;

        let created: CreatedCampaign = self
            .http
            .post("/api/campaign", &request_body(fundraiser_id, draft))
            .await?;
        Ok(created.campaign_id)
    }

    /// Update an existing campaign's submitted fields.
    ///
    /// # Errors
    ///
    /// Same validation as [`Self::create`]; transport errors otherwise.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn update(
        &self,
        campaign_id: &CampaignId,
        fundraiser_id: &UserId,
        draft: &CampaignDraft,
    ) -> Result<(), ApiError> {
        validate_draft(draft)?;

        self.http
            .put_unit(
                &format!("/api/campaign/{campaign_id}"),
                &request_body(fundraiser_id, draft),
            )
            .await
    }

    /// Delete a campaign.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn delete(&self, campaign_id: &CampaignId) -> Result<(), ApiError> {
        self.http
            .delete(&format!("/api/campaign/{campaign_id}"), &[])
            .await
    }

    /// Attach a fund-usage proof link to a completed campaign.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty link; transport errors
    /// otherwise.
    #[instrument(skip(self, link))]
    pub async fn upload_usage_proof(
        &self,
        campaign_id: &CampaignId,
        link: &str,
    ) -> Result<(), ApiError> {
        if link.trim().is_empty() {
            return Err(ApiError::Validation {
                message: "usage proof link must not be empty".to_owned(),
            });
        }

        self.http
            .post_unit(
                &format!("/api/campaign/{campaign_id}/usage-proof"),
                &UsageProofRequest {
                    usage_proof_link: link,
                },
            )
            .await
    }
}

fn validate_draft(draft: &CampaignDraft) -> Result<(), ApiError> {
    draft.target_amount.validate_top_up()?;
    if draft.end_date < draft.start_date {
        return Err(ApiError::Validation {
            message: "campaign end date precedes its start date".to_owned(),
        });
    }
    Ok(())
}

fn request_body<'a>(fundraiser_id: &'a UserId, draft: &'a CampaignDraft) -> CampaignRequest<'a> {
    CampaignRequest {
        title: &draft.title,
        description: &draft.description,
        target_amount: draft.target_amount.as_i64(),
        start_date: draft.start_date,
        end_date: draft.end_date,
        fundraiser_id: fundraiser_id.as_str(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> CampaignDraft {
        CampaignDraft {
            title: "Bantu Sekolah".to_owned(),
            description: "Renovasi perpustakaan".to_owned(),
            target_amount: Amount::new(5_000_000),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        }
    }

    #[test]
    fn test_draft_validation() {
        assert!(validate_draft(&draft()).is_ok());

        let mut inverted = draft();
        inverted.end_date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert!(matches!(
            validate_draft(&inverted),
            Err(ApiError::Validation { .. })
        ));

        let mut zero_target = draft();
        zero_target.target_amount = Amount::new(0);
        assert!(validate_draft(&zero_target).is_err());
    }

    #[test]
    fn test_campaign_deserializes_with_unknown_status() {
        let json = r#"{
            "campaignId": "camp-1",
            "title": "Bantu Sekolah",
            "description": "Renovasi",
            "targetAmount": 5000000,
            "fundsCollected": 1250000,
            "startDate": "2025-06-01",
            "endDate": "2025-08-01",
            "status": "SEDANG_BERLANGSUNG"
        }"#;

        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(
            campaign.status,
            Some(CampaignStatus::Other("SEDANG_BERLANGSUNG".to_owned()))
        );
        assert_eq!(campaign.progress_percent(), 25);
    }

    #[test]
    fn test_progress_percent_handles_zero_target() {
        let json = r#"{"campaignId": "c", "title": "t"}"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.progress_percent(), 0);
    }

    #[test]
    fn test_request_body_wire_shape() {
        let fundraiser: UserId = "user-7".into();
        let body = serde_json::to_string(&request_body(&fundraiser, &draft())).unwrap();
        assert!(body.contains("\"targetAmount\":5000000"));
        assert!(body.contains("\"startDate\":\"2025-06-01\""));
        assert!(body.contains("\"fundraiserId\":\"user-7\""));
    }
}
