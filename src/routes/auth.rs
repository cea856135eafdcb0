// SPDX-License-Identifier: MIT

//! Provider OAuth routes: browser redirect and token callback.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::token_store::Provider;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/{provider}", get(auth_start))
        .route("/callback/{provider}", get(auth_callback))
}

/// Start the OAuth flow: redirect the browser to the provider's authorize
/// URL.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Redirect> {
    let provider = Provider::from_path(&provider)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider: {}", provider)))?;

    let auth_url = match provider {
        Provider::Strava => state.strava.authorize_url(&state.config.public_url),
        Provider::Whoop => state.whoop.authorize_url(&state.config.public_url),
    };

    tracing::info!(provider = %provider, "Starting OAuth flow");
    Ok(Redirect::temporary(&auth_url))
}

/// Query parameters for the OAuth callback.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
}

/// Body returned after a successful token exchange.
#[derive(Serialize)]
pub struct CallbackResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// OAuth callback: exchange the code for tokens and store them.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<CallbackResponse>> {
    let provider = Provider::from_path(&provider)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider: {}", provider)))?;

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("Authorization code missing".to_string()))?;

    let response = match provider {
        Provider::Strava => {
            let tokens = state.strava.handle_callback(&code).await?;
            CallbackResponse {
                message: "Strava OAuth successful! Token cached for testing.".to_string(),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            }
        }
        Provider::Whoop => {
            let tokens = state
                .whoop
                .handle_callback(&code, &state.config.public_url)
                .await?;
            CallbackResponse {
                message: "Whoop OAuth successful! Token cached for testing.".to_string(),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            }
        }
    };

    Ok(Json(response))
}
