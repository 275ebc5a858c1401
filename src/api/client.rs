//! API client for communicating with the Atelier REST API.
//!
//! This module provides the `ApiClient` struct: request plumbing that
//! attaches the current bearer token to every outgoing request and
//! transparently recovers from token expiry with a single silent refresh.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::Session;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds, applied to every outgoing request.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How many times a 429 response is re-sent before the error surfaces.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Backoff before the first 429 retry, in milliseconds. Doubles per retry.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Response body of `/auth/login`, `/auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    token: String,
}

/// Image bytes for a multipart upload. Held as owned bytes so a request can
/// be rebuilt for the post-refresh resend.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

/// API client for the Atelier platform.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    refresh_gate: Arc<tokio::sync::Mutex<()>>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    ///
    /// The cookie store is enabled so the refresh endpoint can authenticate
    /// with its ambient HTTP-only session cookie.
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            session,
            refresh_gate: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// The session this client reads tokens from.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Request plumbing =====

    /// Send a request built by `build`, attaching the current bearer token.
    ///
    /// The token is re-read from the session store for every attempt, so the
    /// resend after a refresh automatically carries the new credential. On a
    /// first 401 (when `refresh_on_unauthorized` is set) exactly one silent
    /// refresh runs and the request is re-issued exactly once; a second 401
    /// propagates as `ApiError::Unauthorized`. 429 responses are retried with
    /// bounded exponential backoff, independent of the auth path.
    pub(crate) async fn execute<F>(&self, build: F, refresh_on_unauthorized: bool) -> Result<Response>
    where
        F: Fn(&Client) -> Result<RequestBuilder>,
    {
        let mut retried_auth = false;
        let mut rate_retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let token = self.session.token();
            let mut request = build(&self.client)?;
            if let Some(ref token) = token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(ApiError::Network)?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status.as_u16() == 401 && refresh_on_unauthorized && !retried_auth {
                retried_auth = true;
                debug!("Request returned 401, attempting silent token refresh");
                self.refresh_token(token).await?;
                continue;
            }

            if status.as_u16() == 401 && refresh_on_unauthorized && retried_auth {
                // The resend is still unauthorized: the session is revoked
                // server-side, not merely expired. Force a clean re-login.
                warn!("Resent request still unauthorized, clearing session");
                if let Err(clear_err) = self.session.clear() {
                    warn!(error = %clear_err, "Failed to clear session state");
                }
            }

            if status.as_u16() == 429 && rate_retries < MAX_RATE_LIMIT_RETRIES {
                rate_retries += 1;
                warn!(retry = rate_retries, backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body).into());
        }
    }

    /// Obtain a fresh token via `/auth/refresh`, single-flight.
    ///
    /// Concurrent 401s queue on the gate; whoever wins performs the one
    /// refresh call and the rest observe the replaced token and skip their
    /// own. `stale` is the token the failing request was sent with.
    async fn refresh_token(&self, stale: Option<String>) -> Result<String> {
        let _guard = self.refresh_gate.lock().await;

        match self.session.token() {
            Some(current) if stale.as_deref() != Some(current.as_str()) => {
                debug!("Token already refreshed by a concurrent request");
                return Ok(current);
            }
            None if stale.is_some() => {
                // A concurrent refresh already failed and cleared the session;
                // issuing another refresh here would just fail again.
                return Err(ApiError::SessionExpired.into());
            }
            _ => {}
        }

        match self.request_refresh().await {
            Ok(token) => {
                self.session.apply_token(&token)?;
                debug!("Token refresh succeeded");
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                if let Err(clear_err) = self.session.clear() {
                    warn!(error = %clear_err, "Failed to clear session state");
                }
                Err(ApiError::SessionExpired.into())
            }
        }
    }

    /// The refresh call itself: cookie-authenticated, no bearer, never retried.
    async fn request_refresh(&self) -> Result<String> {
        let response = self
            .client
            .post(self.url("/auth/refresh"))
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body).into());
        }

        let refresh: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse refresh response")?;
        Ok(refresh.token)
    }

    // ===== Typed helpers =====

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let url = self.url(path);
        let response = self
            .execute(|client| Ok(client.get(&url).query(query)), true)
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        let response = self
            .execute(|client| Ok(client.post(&url).json(body)), true)
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// POST with no request body, response body ignored. Used by toggle
    /// endpoints (heart, follow, save).
    pub(crate) async fn post_empty(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        self.execute(|client| Ok(client.post(&url)), true).await?;
        Ok(())
    }

    pub(crate) async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        let response = self
            .execute(|client| Ok(client.patch(&url).json(body)), true)
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// PATCH with no request body, response body ignored.
    pub(crate) async fn patch_empty(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        self.execute(|client| Ok(client.patch(&url)), true).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        self.execute(|client| Ok(client.delete(&url)), true).await?;
        Ok(())
    }

    // ===== Auth endpoints =====
    //
    // These never enter the 401-refresh path: a 401 from login means bad
    // credentials, and retrying registration would be meaningless.

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let url = self.url("/auth/register");
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        let response = self
            .execute(|client| Ok(client.post(&url).json(&body)), false)
            .await?;
        response
            .json()
            .await
            .context("Failed to parse registration response")
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let url = self.url("/auth/login");
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let response = self
            .execute(|client| Ok(client.post(&url).json(&body)), false)
            .await?;
        response.json().await.context("Failed to parse login response")
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let url = self.url("/auth/forgot-password");
        let body = serde_json::json!({ "email": email });
        self.execute(|client| Ok(client.post(&url).json(&body)), false)
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let url = self.url("/auth/reset-password");
        let body = serde_json::json!({
            "token": token,
            "newPassword": new_password,
        });
        self.execute(|client| Ok(client.post(&url).json(&body)), false)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_base_url_trailing_slashes_are_trimmed() {
        let session = Arc::new(Session::new(Arc::new(MemoryStore::new())));
        let client = ApiClient::new("http://localhost:8080//", session).expect("client");
        assert_eq!(
            client.url("/publication"),
            "http://localhost:8080/publication"
        );
    }
}
