//! Admin console operations: dashboard statistics, campaign moderation, and
//! user moderation.
//!
//! Every call here checks the persisted token's `exp` claim before building
//! the request (see [`ExpiryGuard`]); an expired token never reaches the
//! wire.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use gatherlove_core::{CampaignId, Page, UserId};

use crate::api::ExpiryGuard;
use crate::api::campaigns::Campaign;
use crate::error::ApiError;
use crate::models::UserProfile;
use crate::token::TokenStore;
use crate::transport::Http;

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatistics {
    /// Registered accounts.
    pub total_users: i64,
    /// Campaigns ever created.
    pub total_campaigns: i64,
    /// Donations ever made.
    pub total_donations: i64,
    /// Campaigns awaiting verification.
    pub pending_campaigns: i64,
    /// Total rupiah donated.
    pub total_amount: i64,
}

#[derive(Serialize)]
struct RejectRequest<'a> {
    reason: &'a str,
}

/// Admin endpoint wrapper.
#[derive(Debug, Clone)]
pub struct AdminApi {
    http: Http,
    guard: ExpiryGuard,
}

impl AdminApi {
    pub(crate) const fn new(http: Http, store: TokenStore) -> Self {
        Self {
            http,
            guard: ExpiryGuard::new(store),
        }
    }

    /// Dashboard statistics.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; [`ApiError::SessionExpired`] when the persisted
    /// token has lapsed (nothing is sent in that case).
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> Result<AdminStatistics, ApiError> {
        self.guard.check()?;
        self.http.get("/api/admin/dashboard/statistics", &[]).await
    }

    /// All campaigns, for the moderation queue.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        self.guard.check()?;
        self.http.get("/api/admin/campaigns", &[]).await
    }

    /// One campaign with moderation detail.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn campaign_detail(&self, campaign_id: &CampaignId) -> Result<Campaign, ApiError> {
        self.guard.check()?;
        self.http
            .get(&format!("/api/admin/campaigns/{campaign_id}"), &[])
            .await
    }

    /// Approve a pending campaign.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn approve_campaign(&self, campaign_id: &CampaignId) -> Result<(), ApiError> {
        self.guard.check()?;
        self.http
            .post_empty(&format!("/api/admin/campaigns/{campaign_id}/approve"), &[])
            .await
    }

    /// Reject a pending campaign with a reason shown to the fundraiser.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self, reason))]
    pub async fn reject_campaign(
        &self,
        campaign_id: &CampaignId,
        reason: &str,
    ) -> Result<(), ApiError> {
        self.guard.check()?;
        self.http
            .post_unit(
                &format!("/api/admin/campaigns/{campaign_id}/reject"),
                &RejectRequest { reason },
            )
            .await
    }

    /// Reject a campaign and block its fundraiser in one step.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self, rejection_reason, block_reason))]
    pub async fn reject_campaign_and_block_user(
        &self,
        campaign_id: &CampaignId,
        rejection_reason: &str,
        block_reason: &str,
    ) -> Result<(), ApiError> {
        self.guard.check()?;
        self.http
            .post_empty(
                &format!("/api/admin/campaigns/{campaign_id}/reject-with-block"),
                &[
                    ("rejectionReason", rejection_reason.to_owned()),
                    ("blockReason", block_reason.to_owned()),
                ],
            )
            .await
    }

    /// Paged user list.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn users(&self, page: u32, size: u32) -> Result<Page<UserProfile>, ApiError> {
        self.guard.check()?;
        self.http
            .get(
                "/api/admin/users",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }

    /// One user's profile, for the moderation view.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn user_detail(&self, user_id: &UserId) -> Result<UserProfile, ApiError> {
        self.guard.check()?;
        self.http
            .get(&format!("/api/admin/users/{user_id}"), &[])
            .await
    }

    /// Block an account with a reason shown to the user.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self, reason))]
    pub async fn block_user(&self, user_id: &UserId, reason: &str) -> Result<(), ApiError> {
        self.guard.check()?;
        self.http
            .put_empty(
                &format!("/api/admin/users/{user_id}/block"),
                &[("reason", reason.to_owned())],
            )
            .await
    }

    /// Lift a block on an account.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn unblock_user(&self, user_id: &UserId) -> Result<(), ApiError> {
        self.guard.check()?;
        self.http
            .put_empty(&format!("/api/admin/users/{user_id}/unblock"), &[])
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_deserialize() {
        let json = r#"{
            "totalUsers": 120,
            "totalCampaigns": 34,
            "totalDonations": 560,
            "pendingCampaigns": 4,
            "totalAmount": 87500000
        }"#;

        let stats: AdminStatistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.pending_campaigns, 4);
        assert_eq!(stats.total_amount, 87_500_000);
    }
}
