// SPDX-License-Identifier: MIT

//! Strava wire types: OAuth tokens, activities, and raw data streams.
//!
//! Everything here is decoded at the fetch boundary; unknown provider fields
//! are ignored, optional features (splits, individual streams) are `Option`.

use serde::{Deserialize, Serialize};

/// Response from the Strava OAuth token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp of access-token expiry
    pub expires_at: i64,
}

/// Summary activity from the list endpoint; only the ID is consumed before
/// the detailed fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
}

/// Detailed activity as returned by `GET /activities/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub name: String,
    /// Sport type ("Run", "Ride", ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Start date/time (RFC3339)
    pub start_date: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds
    pub elapsed_time: u64,
    /// Total elevation gain in meters
    pub total_elevation_gain: f64,
    /// Average speed in m/s
    pub average_speed: f64,
    /// Max speed in m/s
    pub max_speed: f64,
    /// Per-kilometer splits; absent on non-run activities
    #[serde(default)]
    pub splits_metric: Option<Vec<SplitMetric>>,
}

/// One per-kilometer split within an activity.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitMetric {
    /// Split distance in meters (roughly 1000)
    pub distance: f64,
    /// Elapsed time over the split in seconds
    pub elapsed_time: u64,
    /// Moving time over the split in seconds
    pub moving_time: u64,
    /// Elevation change over the split in meters; negative when descending
    pub elevation_difference: f64,
    /// 1-based split index
    pub split: u32,
    /// Average speed over the split in m/s
    pub average_speed: f64,
}

/// One raw data stream from `GET /activities/{id}/streams` with
/// `key_by_type=true`.
#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    pub data: Vec<f64>,
    pub series_type: String,
    pub original_size: u64,
    pub resolution: String,
}

/// The stream set consumed by the pace/speed processor. Streams the athlete's
/// device did not record are simply absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityStreams {
    #[serde(default)]
    pub time: Option<Stream>,
    #[serde(default)]
    pub distance: Option<Stream>,
    #[serde(default)]
    pub velocity_smooth: Option<Stream>,
    #[serde(default)]
    pub altitude: Option<Stream>,
    #[serde(default)]
    pub heartrate: Option<Stream>,
}

/// Pace/speed series derived from an activity's raw streams, aligned by
/// sample index. Serialized verbatim for the raw response variant.
#[derive(Debug, Clone, Serialize)]
pub struct PaceSpeedSeries {
    /// Elapsed seconds per sample
    pub time_points: Vec<f64>,
    /// Cumulative distance in kilometers per sample
    pub distance_points: Vec<f64>,
    /// Speed in km/h per sample
    pub speed_data: Vec<f64>,
    /// Pace in min/km per sample; 0 marks a stationary sample
    pub pace_data: Vec<f64>,
}

impl PaceSpeedSeries {
    /// Number of aligned samples in the series.
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }
}
