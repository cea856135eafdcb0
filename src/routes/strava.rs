// SPDX-License-Identifier: MIT

//! Strava report routes: latest activity and pace/speed analysis, each with
//! a JSON and a plain-text variant.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::strava::{Activity, PaceSpeedSeries};
use crate::routes::FormattedReport;
use crate::services::{pace, report};
use crate::AppState;

/// Plain-text routes return their errors as plain text too.
type TextResult = std::result::Result<String, (StatusCode, &'static str)>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/strava/latest-activity", get(latest_activity))
        .route(
            "/strava/latest-activity/pace-speed",
            get(latest_activity_pace_speed),
        )
        .route("/text/strava/latest-activity", get(latest_activity_text))
        .route(
            "/text/strava/latest-activity/pace-speed",
            get(latest_activity_pace_speed_text),
        )
}

/// Compact coaching report for the most recent activity.
async fn latest_activity(State(state): State<Arc<AppState>>) -> Result<Json<FormattedReport>> {
    let activity = state
        .strava
        .latest_activity()
        .await
        .ok_or_else(|| AppError::NotFound("No activities found".to_string()))?;

    Ok(Json(FormattedReport {
        formatted_text: report::format_activity_report(&activity),
    }))
}

/// Plain-text variant of the compact coaching report.
async fn latest_activity_text(State(state): State<Arc<AppState>>) -> TextResult {
    let activity = state
        .strava
        .latest_activity()
        .await
        .ok_or((StatusCode::NOT_FOUND, "No activities found"))?;

    Ok(report::format_activity_report(&activity))
}

/// Query parameters for the pace/speed endpoint.
#[derive(Deserialize)]
pub struct PaceSpeedParams {
    #[serde(default)]
    format: Option<String>,
}

/// Pace/speed response carrying the rendered report.
#[derive(Serialize)]
pub struct PaceSpeedFormatted {
    pub activity_id: u64,
    pub activity_name: String,
    pub activity_type: String,
    pub formatted_text: String,
}

/// Pace/speed response carrying the raw derived series.
#[derive(Serialize)]
pub struct PaceSpeedRaw {
    pub activity_id: u64,
    pub activity_name: String,
    pub activity_type: String,
    pub pace_speed_data: PaceSpeedSeries,
}

/// Pace/speed analysis of the most recent activity. `?format=formatted`
/// returns the rendered report, anything else the raw derived series.
async fn latest_activity_pace_speed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaceSpeedParams>,
) -> Result<Response> {
    let (activity, series) = latest_pace_speed(&state)
        .await
        .map_err(|msg| AppError::NotFound(msg.to_string()))?;

    if params.format.as_deref() == Some("formatted") {
        let formatted_text = report::format_pace_speed_report(&series, &activity);
        return Ok(Json(PaceSpeedFormatted {
            activity_id: activity.id,
            activity_name: activity.name,
            activity_type: activity.activity_type,
            formatted_text,
        })
        .into_response());
    }

    Ok(Json(PaceSpeedRaw {
        activity_id: activity.id,
        activity_name: activity.name,
        activity_type: activity.activity_type,
        pace_speed_data: series,
    })
    .into_response())
}

/// Plain-text variant of the pace/speed report.
async fn latest_activity_pace_speed_text(State(state): State<Arc<AppState>>) -> TextResult {
    let (activity, series) = latest_pace_speed(&state)
        .await
        .map_err(|msg| (StatusCode::NOT_FOUND, msg))?;

    Ok(report::format_pace_speed_report(&series, &activity))
}

/// Fetch the latest activity and derive its pace/speed series. The error
/// half names which stage came up empty; every case maps to 404.
async fn latest_pace_speed(
    state: &AppState,
) -> std::result::Result<(Activity, PaceSpeedSeries), &'static str> {
    let activity = match state.strava.latest_activity().await {
        Some(activity) => activity,
        None => return Err("No activities found"),
    };

    let streams = match state.strava.activity_streams(activity.id).await {
        Some(streams) => streams,
        None => return Err("Activity streams not found"),
    };

    match pace::derive_pace_speed(&streams) {
        Some(series) => Ok((activity, series)),
        None => Err("Pace/speed data not available for this activity"),
    }
}
