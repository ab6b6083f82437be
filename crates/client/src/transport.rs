//! HTTP transport shared by the session manager and every endpoint wrapper.
//!
//! One [`Http`] instance exists per backend base URL (identity service and
//! core application service). The bearer token is read from the shared
//! [`TokenSlot`] at request-send time, never cached at construction, so a
//! login or logout is visible to the very next request.
//!
//! This is intentionally minimal middleware, not a resilience layer: no
//! retry, no backoff. A failed request propagates its error unchanged.

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::ApiError;
use crate::token::TokenSlot;

/// Request timeout for both backends.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Body shape of backend error responses.
#[derive(serde::Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Base-URL-scoped HTTP client with lazy bearer-token injection.
#[derive(Debug, Clone)]
pub struct Http {
    client: reqwest::Client,
    base_url: Url,
    token: TokenSlot,
}

impl Http {
    /// Create a transport for one backend.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(base_url: Url, token: TokenSlot) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            token,
        }
    }

    /// The base URL this transport is scoped to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the transport/backend/parse taxonomy.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send_json(Method::GET, path, query, None::<&()>).await
    }

    /// POST a JSON `body` to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(Method::POST, path, &[], Some(body)).await
    }

    /// POST a JSON `body` to `path`, discarding any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// POST to `path` with no body and the given query, discarding the response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_empty(&self, path: &str, query: &[(&str, String)]) -> Result<(), ApiError> {
        let response = self.send(Method::POST, path, query, None::<&()>).await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// PUT to `path` with no body and the given query, discarding the response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put_empty(&self, path: &str, query: &[(&str, String)]) -> Result<(), ApiError> {
        let response = self.send(Method::PUT, path, query, None::<&()>).await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// PUT a JSON `body` to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(Method::PUT, path, &[], Some(body)).await
    }

    /// PUT a JSON `body` to `path`, discarding any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self.send(Method::PUT, path, &[], Some(body)).await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// DELETE `path` with the given query, discarding any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<(), ApiError> {
        let response = self.send(Method::DELETE, path, query, None::<&()>).await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, query, body).await?;
        let text = Self::check_status(response).await?;
        Ok(serde_json::from_str(&text)?)
    }

    #[instrument(skip(self, body), fields(base = %self.base_url))]
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Validation {
                message: format!("invalid request path {path}: {e}"),
            })?;

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        // Token is read here, at send time, so login/logout take effect on
        // the next request without rebuilding the transport.
        if let Some(token) = self.token.get().await {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        debug!(status = %response.status(), path, "backend response");
        Ok(response)
    }

    /// Decide the error shape once: success passes the body through, error
    /// statuses surface the backend's JSON `message` when present.
    async fn check_status(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }

        let message = serde_json::from_str::<BackendErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or_else(|| default_status_message(status));

        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

fn default_status_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_message() {
        assert_eq!(
            default_status_message(StatusCode::UNAUTHORIZED),
            "Unauthorized"
        );
    }

    #[test]
    fn test_error_body_prefers_message_over_error() {
        let body: BackendErrorBody =
            serde_json::from_str(r#"{"message":"nope","error":"bad"}"#)
                .expect("valid error body");
        assert_eq!(body.message.or(body.error).as_deref(), Some("nope"));
    }

    #[test]
    fn test_error_body_falls_back_to_error_field() {
        let body: BackendErrorBody =
            serde_json::from_str(r#"{"error":"bad"}"#).expect("valid error body");
        assert_eq!(body.message.or(body.error).as_deref(), Some("bad"));
    }
}
