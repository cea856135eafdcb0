// SPDX-License-Identifier: MIT

//! Stride-Coach: coaching-ready summaries of Strava runs and Whoop recovery.
//!
//! This crate provides the backend API for fetching activity, stream, and
//! recovery data from the provider APIs and rendering it into fixed-format
//! text blocks for downstream AI/human consumption.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod token_store;

use config::Config;
use services::{StravaService, WhoopService};
use std::sync::Arc;
use token_store::TokenStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tokens: Arc<TokenStore>,
    pub strava: StravaService,
    pub whoop: WhoopService,
}
