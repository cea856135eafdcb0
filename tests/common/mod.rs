// SPDX-License-Identifier: MIT

use std::sync::Arc;
use stride_coach::config::Config;
use stride_coach::routes::create_router;
use stride_coach::services::{StravaClient, StravaService, WhoopClient, WhoopService};
use stride_coach::token_store::TokenStore;
use stride_coach::AppState;

/// Create a test app against the production provider endpoints, with no
/// tokens anywhere. Read endpoints return 404 before any network call.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let tokens = Arc::new(TokenStore::from_config(&config));

    let strava = StravaService::new(
        StravaClient::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        ),
        tokens.clone(),
    );
    let whoop = WhoopService::new(
        WhoopClient::new(
            config.whoop_client_id.clone(),
            config.whoop_client_secret.clone(),
        ),
        tokens.clone(),
    );

    let state = Arc::new(AppState {
        config,
        tokens,
        strava,
        whoop,
    });

    (create_router(state.clone()), state)
}

/// Create a test app whose provider clients all point at a stub server, with
/// fallback access tokens configured so read paths fetch immediately.
#[allow(dead_code)]
pub fn create_stub_test_app(stub_base: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.strava_access_token = Some("test_strava_token".to_string());
    config.whoop_access_token = Some("test_whoop_token".to_string());

    let tokens = Arc::new(TokenStore::from_config(&config));

    let strava = StravaService::new(
        StravaClient::with_base_urls(
            stub_base,
            stub_base,
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        ),
        tokens.clone(),
    );
    let whoop = WhoopService::new(
        WhoopClient::with_base_urls(
            stub_base,
            stub_base,
            config.whoop_client_id.clone(),
            config.whoop_client_secret.clone(),
        ),
        tokens.clone(),
    );

    let state = Arc::new(AppState {
        config,
        tokens,
        strava,
        whoop,
    });

    (create_router(state.clone()), state)
}

/// Serve a stub upstream provider on an ephemeral port and return its base
/// URL. The server lives until the test runtime shuts down.
#[allow(dead_code)]
pub async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });

    format!("http://{}", addr)
}
