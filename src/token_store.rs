// SPDX-License-Identifier: MIT

//! In-process OAuth token storage with static fallbacks.
//!
//! Tokens live in an explicit store created at startup and passed by
//! reference, not in ambient process-wide state. Resolution is layered: a
//! token stored by an OAuth callback wins over the fallback token captured
//! from configuration at startup.

use crate::config::Config;
use dashmap::DashMap;
use std::fmt;

/// Supported upstream providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Strava,
    Whoop,
}

impl Provider {
    /// Parse a provider from a URL path segment.
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "strava" => Some(Self::Strava),
            "whoop" => Some(Self::Whoop),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strava => "strava",
            Self::Whoop => "whoop",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokens captured from a provider OAuth callback.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp of access-token expiry, when the provider reports one.
    pub expires_at: Option<i64>,
}

/// Per-provider token storage shared across requests.
///
/// Holds at most one credential per provider; concurrent OAuth callbacks on
/// the same provider resolve last-write-wins. Tokens are never refreshed or
/// expired here; a stale token simply fails upstream on the next fetch.
pub struct TokenStore {
    tokens: DashMap<Provider, StoredToken>,
    strava_fallback: Option<String>,
    whoop_fallback: Option<String>,
}

impl TokenStore {
    /// Create an empty store with no fallback tokens.
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            strava_fallback: None,
            whoop_fallback: None,
        }
    }

    /// Create a store whose fallback layer comes from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            tokens: DashMap::new(),
            strava_fallback: config.strava_access_token.clone(),
            whoop_fallback: config.whoop_access_token.clone(),
        }
    }

    /// Store tokens for a provider, replacing any previous entry.
    pub fn store(&self, provider: Provider, token: StoredToken) {
        self.tokens.insert(provider, token);
    }

    /// Resolve a usable access token: stored entry first, then fallback.
    ///
    /// `None` means "no data available": callers surface it as not-found,
    /// never as an error.
    pub fn access_token(&self, provider: Provider) -> Option<String> {
        if let Some(entry) = self.tokens.get(&provider) {
            return Some(entry.access_token.clone());
        }

        match provider {
            Provider::Strava => self.strava_fallback.clone(),
            Provider::Whoop => self.whoop_fallback.clone(),
        }
    }

    /// Drop all stored tokens; fallbacks are untouched. Used by tests.
    pub fn clear(&self) {
        self.tokens.clear();
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
