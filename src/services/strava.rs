// SPDX-License-Identifier: MIT

//! Strava API client for OAuth and activity/stream fetching.

use crate::error::AppError;
use crate::models::strava::{Activity, ActivityStreams, ActivitySummary, TokenResponse};
use crate::token_store::{Provider, StoredToken, TokenStore};
use serde::Deserialize;
use std::sync::Arc;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base: String,
    oauth_base: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a client against the production Strava endpoints.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            "https://www.strava.com/api/v3",
            "https://www.strava.com/oauth",
            client_id,
            client_secret,
        )
    }

    /// Create a client with overridden endpoints. Tests point this at a stub
    /// server on localhost.
    pub fn with_base_urls(
        api_base: impl Into<String>,
        oauth_base: impl Into<String>,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            oauth_base: oauth_base.into(),
            client_id,
            client_secret,
        }
    }

    /// Authorization URL the browser is sent to at the start of the OAuth
    /// flow.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope=activity:read_all&approval_prompt=force",
            self.oauth_base,
            self.client_id,
            urlencoding::encode(redirect_uri)
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let url = format!("{}/token", self.oauth_base);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ProviderApi(format!("Strava token exchange failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// List the athlete's activities, most recent first.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.api_base);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ProviderApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get a detailed activity by ID, splits included.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<Activity, AppError> {
        let url = format!("{}/activities/{}", self.api_base, activity_id);
        self.get_json(&url, access_token).await
    }

    /// Get the raw data streams for an activity, keyed by stream type.
    pub async fn get_activity_streams(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<ActivityStreams, AppError> {
        let url = format!("{}/activities/{}/streams", self.api_base, activity_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("keys", "time,distance,velocity_smooth,altitude,heartrate"),
                ("key_by_type", "true"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ProviderApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ProviderApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderApi(format!(
                "Strava HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ProviderApi(format!("Strava JSON parse error: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - token resolution + degraded read paths
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Strava service combining the API client with token resolution.
///
/// Read methods return `Option`: a missing token, an empty account, or an
/// upstream failure all surface as "no data" (warn-logged), never as a hard
/// error. Only the OAuth exchange propagates failures.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    tokens: Arc<TokenStore>,
}

impl StravaService {
    pub fn new(client: StravaClient, tokens: Arc<TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// Authorization URL redirecting back to `{public_url}/callback/strava`.
    pub fn authorize_url(&self, public_url: &str) -> String {
        let redirect_uri = format!("{}/callback/strava", public_url);
        self.client.authorize_url(&redirect_uri)
    }

    /// Exchange the callback code and store the resulting tokens.
    pub async fn handle_callback(&self, code: &str) -> Result<TokenResponse, AppError> {
        let tokens = self.client.exchange_code(code).await?;

        self.tokens.store(
            Provider::Strava,
            StoredToken {
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                expires_at: Some(tokens.expires_at),
            },
        );

        tracing::info!("Strava tokens stored from OAuth callback");
        Ok(tokens)
    }

    /// The athlete's most recent activity with full detail.
    pub async fn latest_activity(&self) -> Option<Activity> {
        let access_token = self.tokens.access_token(Provider::Strava)?;

        let summaries = match self.client.list_activities(&access_token, 1, 1).await {
            Ok(summaries) => summaries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list Strava activities");
                return None;
            }
        };
        let latest = summaries.first()?;

        match self.client.get_activity(&access_token, latest.id).await {
            Ok(activity) => Some(activity),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    activity_id = latest.id,
                    "Failed to fetch activity detail"
                );
                None
            }
        }
    }

    /// Raw streams for an activity.
    pub async fn activity_streams(&self, activity_id: u64) -> Option<ActivityStreams> {
        let access_token = self.tokens.access_token(Provider::Strava)?;

        match self
            .client
            .get_activity_streams(&access_token, activity_id)
            .await
        {
            Ok(streams) => Some(streams),
            Err(e) => {
                tracing::warn!(error = %e, activity_id, "Failed to fetch activity streams");
                None
            }
        }
    }
}
