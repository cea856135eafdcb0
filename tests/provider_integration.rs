// SPDX-License-Identifier: MIT

//! End-to-end tests against stub provider servers. Each test spins up an
//! in-process axum router playing the provider API, points every client base
//! URL at it, and drives the real routes through `oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

use stride_coach::token_store::Provider;

mod common;

async fn get_uri(app: axum::Router, uri: &str) -> axum::http::Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn json_body(response: axum::http::Response<axum::body::Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn activity_detail() -> serde_json::Value {
    json!({
        "id": 1001,
        "name": "Morning Run",
        "type": "Run",
        "start_date": "2024-03-15T07:30:00Z",
        "distance": 10000.0,
        "moving_time": 3000,
        "elapsed_time": 3100,
        "total_elevation_gain": 152.0,
        "average_speed": 3.0,
        "max_speed": 4.2,
        "splits_metric": [
            {
                "distance": 1000.0,
                "elapsed_time": 305,
                "moving_time": 300,
                "elevation_difference": 12.5,
                "split": 1,
                "average_speed": 3.33
            },
            {
                "distance": 1000.0,
                "elapsed_time": 295,
                "moving_time": 290,
                "elevation_difference": -3.0,
                "split": 2,
                "average_speed": 3.45
            }
        ]
    })
}

fn streams_detail() -> serde_json::Value {
    json!({
        "time": {
            "data": [0.0, 60.0, 120.0, 180.0],
            "series_type": "distance",
            "original_size": 4,
            "resolution": "high"
        },
        "distance": {
            "data": [0.0, 250.0, 500.0, 750.0],
            "series_type": "distance",
            "original_size": 4,
            "resolution": "high"
        },
        "velocity_smooth": {
            "data": [0.0, 2.5, 3.0, 2.5],
            "series_type": "distance",
            "original_size": 4,
            "resolution": "high"
        }
    })
}

fn strava_activity_stub() -> Router {
    Router::new()
        .route(
            "/athlete/activities",
            get(|| async { Json(json!([{"id": 1001}])) }),
        )
        .route(
            "/activities/1001",
            get(|| async { Json(activity_detail()) }),
        )
        .route(
            "/activities/1001/streams",
            get(|| async { Json(streams_detail()) }),
        )
}

#[tokio::test]
async fn test_latest_activity_end_to_end() {
    let stub_base = common::spawn_stub(strava_activity_stub()).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/strava/latest-activity").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["formatted_text"],
        "**Latest Run Analysis - 2024-03-15**\n\n\
         **Activity:** Morning Run\n\
         **Distance:** 10.00 km\n\
         **Duration:** 50 minutes\n\
         **Average Pace:** 5:00 min/km\n\
         **Elevation Gain:** 152m\n\
         **Average Speed:** 10.8 km/h\n\
         **Splits:**\n\
         Km 1: 5:00 min/km (+12.5m)\n\
         Km 2: 4:50 min/km (-3m)"
    );
}

#[tokio::test]
async fn test_text_latest_activity_end_to_end() {
    let stub_base = common::spawn_stub(strava_activity_stub()).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/text/strava/latest-activity").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("**Latest Run Analysis - 2024-03-15**"));
    assert!(text.ends_with("Km 2: 4:50 min/km (-3m)"));
}

#[tokio::test]
async fn test_pace_speed_raw_series() {
    let stub_base = common::spawn_stub(strava_activity_stub()).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/strava/latest-activity/pace-speed").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["activity_id"], 1001);
    assert_eq!(json["activity_name"], "Morning Run");
    assert_eq!(json["activity_type"], "Run");

    let series = &json["pace_speed_data"];
    let time = series["time_points"].as_array().unwrap();
    let distance = series["distance_points"].as_array().unwrap();
    let speed = series["speed_data"].as_array().unwrap();
    let pace = series["pace_data"].as_array().unwrap();

    assert_eq!(time.len(), 4);
    assert_eq!(distance.len(), 4);
    assert_eq!(speed.len(), 4);
    assert_eq!(pace.len(), 4);

    assert!((time[3].as_f64().unwrap() - 180.0).abs() < 1e-9);
    assert!((distance[3].as_f64().unwrap() - 0.75).abs() < 1e-9);
    assert!((speed[1].as_f64().unwrap() - 9.0).abs() < 1e-9);
    assert!((speed[2].as_f64().unwrap() - 10.8).abs() < 1e-9);
    // Stationary first sample carries the zero pace marker
    assert_eq!(pace[0].as_f64().unwrap(), 0.0);
    assert!((pace[1].as_f64().unwrap() - 60.0 / 9.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_pace_speed_formatted() {
    let stub_base = common::spawn_stub(strava_activity_stub()).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/strava/latest-activity/pace-speed?format=formatted").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["activity_id"], 1001);
    assert!(json.get("pace_speed_data").is_none());
    assert_eq!(
        json["formatted_text"],
        "**Pace & Speed Analysis - 2024-03-15**\n\n\
         **Activity:** Morning Run\n\n\
         **Summary:**\n\
         Total Distance: 0.75 km\n\
         Elapsed Time: 3 minutes\n\
         Average Speed: 7.2 km/h\n\
         Average Pace: 6:18 min/km\n\n\
         **Range:**\n\
         Speed: 9.0 - 10.8 km/h\n\
         Pace: 5:33 - 6:40 min/km\n\n\
         **Checkpoints:**\n\
         0:00 | 0.00 km | 0.0 km/h | 0:00 min/km\n\
         1:00 | 0.25 km | 9.0 km/h | 6:40 min/km\n\
         2:00 | 0.50 km | 10.8 km/h | 5:33 min/km\n\
         3:00 | 0.75 km | 9.0 km/h | 6:40 min/km\n\n\
         **Total Samples:** 4"
    );
}

#[tokio::test]
async fn test_pace_speed_without_velocity_stream_is_404() {
    let stub = Router::new()
        .route(
            "/athlete/activities",
            get(|| async { Json(json!([{"id": 1001}])) }),
        )
        .route(
            "/activities/1001",
            get(|| async { Json(activity_detail()) }),
        )
        .route(
            "/activities/1001/streams",
            get(|| async {
                Json(json!({
                    "time": {
                        "data": [0.0, 60.0],
                        "series_type": "distance",
                        "original_size": 2,
                        "resolution": "high"
                    },
                    "distance": {
                        "data": [0.0, 250.0],
                        "series_type": "distance",
                        "original_size": 2,
                        "resolution": "high"
                    }
                }))
            }),
        );
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/strava/latest-activity/pace-speed").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Pace/speed data not available for this activity");
}

#[tokio::test]
async fn test_pace_speed_streams_endpoint_missing_is_404() {
    // No streams route registered: the stub answers 404 and the read degrades
    let stub = Router::new()
        .route(
            "/athlete/activities",
            get(|| async { Json(json!([{"id": 1001}])) }),
        )
        .route(
            "/activities/1001",
            get(|| async { Json(activity_detail()) }),
        );
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/strava/latest-activity/pace-speed").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Activity streams not found");
}

#[tokio::test]
async fn test_upstream_failure_degrades_to_404() {
    let stub = Router::new().route(
        "/athlete/activities",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/strava/latest-activity").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "No activities found");
}

#[tokio::test]
async fn test_empty_activity_list_is_404() {
    let stub = Router::new().route("/athlete/activities", get(|| async { Json(json!([])) }));
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/strava/latest-activity").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "No activities found");
}

#[tokio::test]
async fn test_whoop_recovery_end_to_end() {
    let stub = Router::new().route(
        "/recovery",
        get(|| async {
            Json(json!({
                "records": [{"score": {"recovery_score": 85.0}}],
                "next_token": null
            }))
        }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/whoop/recovery").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["formatted_text"], "**Today's Recovery: 85% (Green)**");
    assert_eq!(json["recovery_score"], 85);
}

#[tokio::test]
async fn test_whoop_recovery_zero_score_is_data() {
    let stub = Router::new().route(
        "/recovery",
        get(|| async { Json(json!({"records": [{"score": {"recovery_score": 0.0}}]})) }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/whoop/recovery").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["formatted_text"], "**Today's Recovery: 0% (Red)**");
    assert_eq!(json["recovery_score"], 0);
}

#[tokio::test]
async fn test_whoop_workout_skips_other_sports() {
    let stub = Router::new().route(
        "/workout",
        get(|| async {
            Json(json!({
                "records": [
                    {
                        "sport_id": 45,
                        "start": "2024-03-16T09:00:00Z",
                        "distance_meter": 20000.0,
                        "zone_duration": {"zone_one_milli": 600000}
                    },
                    {
                        "sport_id": 0,
                        "start": "2024-03-15T07:30:00Z",
                        "distance_meter": 8450.0,
                        "zone_duration": {
                            "zone_zero_milli": 60000,
                            "zone_one_milli": 120000,
                            "zone_two_milli": 180000,
                            "zone_three_milli": 120000,
                            "zone_four_milli": 60000,
                            "zone_five_milli": 60000
                        }
                    }
                ]
            }))
        }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/whoop/latest-running-workout").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["formatted_text"],
        "**Latest Running Workout - 2024-03-15**\n\
         **Distance:** 8.45 km\n\n\
         **Heart Rate Zones:**\n\
         Zone 1: 2 min (20.0%)\n\
         Zone 2: 3 min (30.0%)\n\
         Zone 3: 2 min (20.0%)\n\
         Zone 4: 1 min (10.0%)\n\
         Zone 5: 1 min (10.0%)"
    );
}

#[tokio::test]
async fn test_whoop_no_running_workout_in_window_is_404() {
    let stub = Router::new().route(
        "/workout",
        get(|| async {
            Json(json!({
                "records": [
                    {"sport_id": 45, "start": "2024-03-16T09:00:00Z", "distance_meter": 20000.0},
                    {"sport_id": 1, "start": "2024-03-15T07:30:00Z", "distance_meter": 5000.0}
                ]
            }))
        }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, _state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/whoop/latest-running-workout").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "No running workouts found");
}

#[tokio::test]
async fn test_strava_callback_stores_and_overwrites_token() {
    let exchanges = Arc::new(AtomicUsize::new(0));
    let exchanges_stub = exchanges.clone();
    let stub = Router::new().route(
        "/token",
        post(move || {
            let exchanges = exchanges_stub.clone();
            async move {
                let n = exchanges.fetch_add(1, Ordering::SeqCst) + 1;
                Json(json!({
                    "access_token": format!("strava_access_{}", n),
                    "refresh_token": format!("strava_refresh_{}", n),
                    "expires_at": 1_900_000_000i64
                }))
            }
        }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app.clone(), "/callback/strava?code=abc123").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["message"],
        "Strava OAuth successful! Token cached for testing."
    );
    assert_eq!(json["access_token"], "strava_access_1");
    assert_eq!(json["refresh_token"], "strava_refresh_1");
    assert_eq!(
        state.tokens.access_token(Provider::Strava),
        Some("strava_access_1".to_string())
    );

    // A second exchange replaces the cached token
    let response = get_uri(app, "/callback/strava?code=def456").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        state.tokens.access_token(Provider::Strava),
        Some("strava_access_2".to_string())
    );
}

#[tokio::test]
async fn test_whoop_callback_stores_token() {
    let stub = Router::new().route(
        "/oauth2/token",
        post(|| async {
            Json(json!({
                "access_token": "whoop_access_1",
                "refresh_token": "whoop_refresh_1",
                "expires_in": 3600
            }))
        }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/callback/whoop?code=xyz789").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["message"],
        "Whoop OAuth successful! Token cached for testing."
    );
    assert_eq!(json["access_token"], "whoop_access_1");
    assert_eq!(
        state.tokens.access_token(Provider::Whoop),
        Some("whoop_access_1".to_string())
    );
    // The Strava slot is untouched by a Whoop exchange
    assert_eq!(
        state.tokens.access_token(Provider::Strava),
        Some("test_strava_token".to_string())
    );
}

#[tokio::test]
async fn test_exchange_failure_is_500_without_leaking_detail() {
    let stub = Router::new().route(
        "/token",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "secret upstream detail") }),
    );
    let stub_base = common::spawn_stub(stub).await;
    let (app, state) = common::create_stub_test_app(&stub_base);

    let response = get_uri(app, "/callback/strava?code=abc123").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Provider request failed");
    // Nothing was cached; the configured fallback still answers
    assert_eq!(
        state.tokens.access_token(Provider::Strava),
        Some("test_strava_token".to_string())
    );
}
