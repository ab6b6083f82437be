//! Platform announcements: a public list plus admin-only create and delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gatherlove_core::{AnnouncementId, Page};

use crate::api::ExpiryGuard;
use crate::error::ApiError;
use crate::token::TokenStore;
use crate::transport::Http;

/// One platform announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Announcement ID.
    pub id: AnnouncementId,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// When it was published.
    pub created_at: DateTime<Utc>,
    /// When it was last edited, if ever.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CreateAnnouncementRequest<'a> {
    title: &'a str,
    content: &'a str,
}

/// Announcement endpoint wrapper.
#[derive(Debug, Clone)]
pub struct AnnouncementsApi {
    http: Http,
    guard: ExpiryGuard,
}

impl AnnouncementsApi {
    pub(crate) const fn new(http: Http, store: TokenStore) -> Self {
        Self {
            http,
            guard: ExpiryGuard::new(store),
        }
    }

    /// Publicly visible announcements, newest first. No session required.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Announcement>, ApiError> {
        self.http.get("/api/admin/announcements/list", &[]).await
    }

    /// Paged announcement list for the admin console.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; [`ApiError::SessionExpired`] when the persisted
    /// token has lapsed (nothing is sent in that case).
    #[instrument(skip(self))]
    pub async fn list_paged(&self, page: u32, size: u32) -> Result<Page<Announcement>, ApiError> {
        self.guard.check()?;
        self.http
            .get(
                "/api/admin/announcements/list",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }

    /// Publish an announcement (admin only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty title or body without
    /// sending anything; see [`ApiError`] otherwise.
    #[instrument(skip(self, title, content))]
    pub async fn create(&self, title: &str, content: &str) -> Result<(), ApiError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(ApiError::Validation {
                message: "announcement title and content must not be empty".to_owned(),
            });
        }

        self.guard.check()?;
        self.http
            .post_unit(
                "/api/admin/announcements/create",
                &CreateAnnouncementRequest { title, content },
            )
            .await
    }

    /// Remove an announcement (admin only).
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &AnnouncementId) -> Result<(), ApiError> {
        self.guard.check()?;
        self.http
            .delete(&format!("/api/admin/announcements/{id}"), &[])
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_deserializes_without_updated_at() {
        let json = r#"{
            "id": "ann-1",
            "title": "Maintenance window",
            "content": "Sunday 02:00-04:00 WIB",
            "createdAt": "2025-05-01T10:00:00Z"
        }"#;

        let announcement: Announcement = serde_json::from_str(json).unwrap();
        assert_eq!(announcement.title, "Maintenance window");
        assert!(announcement.updated_at.is_none());
    }
}
