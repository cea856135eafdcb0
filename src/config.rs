// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! OAuth client credentials are required at startup. Fallback access tokens
//! are optional and only consulted when no OAuth callback has populated the
//! token store yet.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Server port
    pub port: u16,
    /// Externally reachable base URL, used to build OAuth redirect URIs
    pub public_url: String,

    // --- Strava OAuth ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Static fallback access token for running without the OAuth flow
    pub strava_access_token: Option<String>,

    // --- Whoop OAuth ---
    /// Whoop OAuth client ID (public)
    pub whoop_client_id: String,
    /// Whoop OAuth client secret
    pub whoop_client_secret: String,
    /// Static fallback access token for running without the OAuth flow
    pub whoop_access_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails fast if any OAuth client credential is missing; fallback tokens
    /// and server settings have sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            port,
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),

            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_access_token: env::var("STRAVA_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),

            whoop_client_id: env::var("WHOOP_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("WHOOP_CLIENT_ID"))?,
            whoop_client_secret: env::var("WHOOP_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("WHOOP_CLIENT_SECRET"))?,
            whoop_access_token: env::var("WHOOP_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
        })
    }

    /// Default config for testing only: localhost URLs, no fallback tokens.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            public_url: "http://localhost:8080".to_string(),
            strava_client_id: "test_strava_id".to_string(),
            strava_client_secret: "test_strava_secret".to_string(),
            strava_access_token: None,
            whoop_client_id: "test_whoop_id".to_string(),
            whoop_client_secret: "test_whoop_secret".to_string(),
            whoop_access_token: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so env mutations never race across parallel test threads.
    #[test]
    fn test_config_from_env() {
        env::remove_var("STRAVA_CLIENT_ID");
        env::set_var("STRAVA_CLIENT_SECRET", "test_secret");
        env::set_var("WHOOP_CLIENT_ID", "test_whoop");
        env::set_var("WHOOP_CLIENT_SECRET", "test_whoop_secret");
        env::remove_var("STRAVA_ACCESS_TOKEN");
        env::remove_var("WHOOP_ACCESS_TOKEN");
        env::remove_var("PORT");
        env::remove_var("PUBLIC_URL");

        // Missing credentials are reported by name
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("STRAVA_CLIENT_ID")));

        // With all credentials present, server settings fall back to defaults
        env::set_var("STRAVA_CLIENT_ID", "test_id");
        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.strava_client_id, "test_id");
        assert_eq!(config.whoop_client_id, "test_whoop");
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_url, "http://localhost:8080");
        assert!(config.strava_access_token.is_none());
        assert!(config.whoop_access_token.is_none());
    }
}
