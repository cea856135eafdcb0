// SPDX-License-Identifier: MIT

//! Whoop API client for OAuth, recovery, and workout fetching.

use crate::error::AppError;
use crate::models::whoop::{Collection, Recovery, TokenResponse, Workout};
use crate::token_store::{Provider, StoredToken, TokenStore};
use serde::Deserialize;
use std::sync::Arc;

/// Whoop sport taxonomy ID for running.
const RUNNING_SPORT_ID: i64 = 0;

/// How many recent workouts to scan for the latest run.
const WORKOUT_SCAN_LIMIT: u32 = 50;

/// Whoop API client.
#[derive(Clone)]
pub struct WhoopClient {
    http: reqwest::Client,
    api_base: String,
    auth_base: String,
    client_id: String,
    client_secret: String,
}

impl WhoopClient {
    /// Create a client against the production Whoop endpoints.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            "https://api.prod.whoop.com/developer/v2",
            "https://api.prod.whoop.com/oauth",
            client_id,
            client_secret,
        )
    }

    /// Create a client with overridden endpoints. Tests point this at a stub
    /// server on localhost.
    pub fn with_base_urls(
        api_base: impl Into<String>,
        auth_base: impl Into<String>,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            auth_base: auth_base.into(),
            client_id,
            client_secret,
        }
    }

    /// Authorization URL the browser is sent to at the start of the OAuth
    /// flow. The scope contains a space, so it is percent-encoded along with
    /// the redirect URI.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/oauth2/auth?response_type=code&client_id={}&redirect_uri={}&scope={}&state=whoop_auth",
            self.auth_base,
            self.client_id,
            urlencoding::encode(redirect_uri),
            urlencoding::encode("read:recovery read:workout")
        )
    }

    /// Exchange an authorization code for tokens. Whoop requires the
    /// redirect URI to be repeated in the exchange.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AppError> {
        let url = format!("{}/oauth2/token", self.auth_base);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::ProviderApi(format!("Whoop token exchange failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Most recent recovery records.
    pub async fn latest_recoveries(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<Recovery>, AppError> {
        let url = format!("{}/recovery", self.api_base);
        let collection: Collection<Recovery> = self
            .get_collection(&url, access_token, limit)
            .await?;
        Ok(collection.into_records())
    }

    /// Most recent workouts across all sports.
    pub async fn recent_workouts(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<Workout>, AppError> {
        let url = format!("{}/workout", self.api_base);
        let collection: Collection<Workout> = self
            .get_collection(&url, access_token, limit)
            .await?;
        Ok(collection.into_records())
    }

    /// GET a collection endpoint with a `limit` parameter.
    async fn get_collection<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        limit: u32,
    ) -> Result<Collection<T>, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(&[("limit", limit.to_string())])
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
                "Whoop HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ProviderApi(format!("Whoop JSON parse error: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WhoopService - token resolution + degraded read paths
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Whoop service combining the API client with token resolution.
///
/// Read methods return `Option` with the same degradation rules as the
/// Strava side: missing token, empty data, and upstream failures all mean
/// "no data". Only the OAuth exchange propagates failures.
#[derive(Clone)]
pub struct WhoopService {
    client: WhoopClient,
    tokens: Arc<TokenStore>,
}

impl WhoopService {
    pub fn new(client: WhoopClient, tokens: Arc<TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// Authorization URL redirecting back to `{public_url}/callback/whoop`.
    pub fn authorize_url(&self, public_url: &str) -> String {
        let redirect_uri = format!("{}/callback/whoop", public_url);
        self.client.authorize_url(&redirect_uri)
    }

    /// Exchange the callback code and store the resulting tokens.
    pub async fn handle_callback(
        &self,
        code: &str,
        public_url: &str,
    ) -> Result<TokenResponse, AppError> {
        let redirect_uri = format!("{}/callback/whoop", public_url);
        let tokens = self.client.exchange_code(code, &redirect_uri).await?;

        // Whoop reports a relative expiry; anchor it to now for storage
        let expires_at = chrono::Utc::now().timestamp() + tokens.expires_in;
        self.tokens.store(
            Provider::Whoop,
            StoredToken {
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                expires_at: Some(expires_at),
            },
        );

        tracing::info!("Whoop tokens stored from OAuth callback");
        Ok(tokens)
    }

    /// Today's recovery percentage, rounded to a whole number.
    pub async fn current_recovery_score(&self) -> Option<u8> {
        let access_token = self.tokens.access_token(Provider::Whoop)?;

        let recoveries = match self.client.latest_recoveries(&access_token, 1).await {
            Ok(recoveries) => recoveries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch Whoop recovery");
                return None;
            }
        };

        recoveries.first().and_then(Recovery::score_percent)
    }

    /// The most recent running workout, scanning the last
    /// [`WORKOUT_SCAN_LIMIT`] workouts of any sport.
    pub async fn latest_running_workout(&self) -> Option<Workout> {
        let access_token = self.tokens.access_token(Provider::Whoop)?;

        let workouts = match self
            .client
            .recent_workouts(&access_token, WORKOUT_SCAN_LIMIT)
            .await
        {
            Ok(workouts) => workouts,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch Whoop workouts");
                return None;
            }
        };

        workouts
            .into_iter()
            .find(|workout| workout.sport_id == RUNNING_SPORT_ID)
    }
}
