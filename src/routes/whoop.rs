// SPDX-License-Identifier: MIT

//! Whoop report routes: recovery score and latest running workout.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::routes::FormattedReport;
use crate::services::report;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/whoop/recovery", get(recovery))
        .route("/whoop/latest-running-workout", get(latest_running_workout))
}

/// Recovery response with the rendered line and the raw score.
#[derive(Serialize)]
pub struct RecoveryResponse {
    pub formatted_text: String,
    pub recovery_score: u8,
}

/// Today's recovery score with its readiness label.
async fn recovery(State(state): State<Arc<AppState>>) -> Result<Json<RecoveryResponse>> {
    let score = state
        .whoop
        .current_recovery_score()
        .await
        .ok_or_else(|| AppError::NotFound("No recovery data found".to_string()))?;

    Ok(Json(RecoveryResponse {
        formatted_text: report::format_recovery(score),
        recovery_score: score,
    }))
}

/// Heart-rate zone breakdown of the most recent running workout.
async fn latest_running_workout(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FormattedReport>> {
    let workout = state
        .whoop
        .latest_running_workout()
        .await
        .ok_or_else(|| AppError::NotFound("No running workouts found".to_string()))?;

    Ok(Json(FormattedReport {
        formatted_text: report::format_heart_rate_zones(&workout),
    }))
}
