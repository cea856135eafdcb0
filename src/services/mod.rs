// SPDX-License-Identifier: MIT

//! Services module - provider clients and the processing/formatting core.

pub mod pace;
pub mod report;
pub mod strava;
pub mod whoop;

pub use strava::{StravaClient, StravaService};
pub use whoop::{WhoopClient, WhoopService};
