// SPDX-License-Identifier: MIT

//! Pace/speed stream processing.
//!
//! Turns raw activity streams (seconds, meters, meters/second) into an
//! aligned pace/speed series (seconds, kilometers, km/h, min/km), and
//! provides the checkpoint sampling and aggregate statistics the report
//! formatters render.

use crate::models::strava::{ActivityStreams, PaceSpeedSeries};
use crate::time_utils::format_min_sec;

/// Pace value marking a stationary sample. A zero-speed sample means "not
/// moving", not "infinitely fast", so this is excluded from pace aggregates.
pub const PACE_SENTINEL: f64 = 0.0;

/// Derive the aligned pace/speed series from an activity's raw streams.
///
/// Requires the time, distance, and velocity streams; `None` means pace/speed
/// is unsupported for this activity, not that something failed. Streams of
/// differing lengths cannot be aligned sample-by-sample and also yield `None`.
pub fn derive_pace_speed(streams: &ActivityStreams) -> Option<PaceSpeedSeries> {
    let time = streams.time.as_ref()?;
    let distance = streams.distance.as_ref()?;
    let velocity = streams.velocity_smooth.as_ref()?;

    if time.data.len() != distance.data.len() || time.data.len() != velocity.data.len() {
        tracing::warn!(
            time_len = time.data.len(),
            distance_len = distance.data.len(),
            velocity_len = velocity.data.len(),
            "Stream lengths differ, cannot align pace/speed samples"
        );
        return None;
    }

    let speed_data: Vec<f64> = velocity.data.iter().map(|v| v * 3.6).collect();
    let pace_data: Vec<f64> = speed_data
        .iter()
        .map(|&kmh| if kmh > 0.0 { 60.0 / kmh } else { PACE_SENTINEL })
        .collect();

    Some(PaceSpeedSeries {
        time_points: time.data.clone(),
        distance_points: distance.data.iter().map(|m| m / 1000.0).collect(),
        speed_data,
        pace_data,
    })
}

/// Pace in minutes per kilometer from a moving time and distance.
///
/// Non-positive distance yields the stationary sentinel rather than a
/// division blowup.
pub fn pace_min_per_km(moving_time_secs: f64, distance_meters: f64) -> f64 {
    if distance_meters <= 0.0 {
        return PACE_SENTINEL;
    }
    (moving_time_secs / 60.0) / (distance_meters / 1000.0)
}

/// Format a pace in minutes-per-km as `M:SS`.
///
/// Total seconds are rounded before splitting, so 5.999 min/km renders as
/// "6:00" and a ":60" seconds field can never appear.
pub fn format_pace(pace_min_per_km: f64) -> String {
    format_min_sec(pace_min_per_km * 60.0)
}

/// Indices of up to 10 evenly spaced checkpoint samples across a series.
///
/// Bucket width is `len / 10` by integer division (floored at 1); the first
/// index of each bucket is taken and anything past the end is dropped, so
/// short series yield fewer than 10 checkpoints and an index is never out of
/// range.
pub fn checkpoint_indices(len: usize) -> Vec<usize> {
    let step = (len / 10).max(1);
    (0..10).map(|i| i * step).filter(|&i| i < len).collect()
}

/// Aggregate statistics over a full pace/speed series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    /// Last cumulative distance sample, in kilometers
    pub total_distance_km: f64,
    /// Last time sample, in seconds
    pub elapsed_seconds: f64,
    /// Mean over every speed sample, stationary ones included
    pub avg_speed_kmh: f64,
    /// Minimum over moving samples only; a single stationary sample would
    /// otherwise pin this at zero for every activity
    pub min_speed_kmh: f64,
    /// Maximum over every speed sample
    pub max_speed_kmh: f64,
    /// Mean pace over moving samples, sentinel excluded
    pub avg_pace_min_km: f64,
    pub min_pace_min_km: f64,
    pub max_pace_min_km: f64,
}

/// Compute aggregate statistics for a series.
///
/// Pace aggregates skip sentinel samples; when every sample is stationary
/// (or the series is empty) the affected aggregates fall back to 0.
pub fn series_stats(series: &PaceSpeedSeries) -> SeriesStats {
    let n = series.speed_data.len();

    let avg_speed_kmh = if n > 0 {
        series.speed_data.iter().sum::<f64>() / n as f64
    } else {
        0.0
    };

    let max_speed_kmh = series
        .speed_data
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let max_speed_kmh = if max_speed_kmh.is_finite() {
        max_speed_kmh
    } else {
        0.0
    };

    let min_speed_kmh = series
        .speed_data
        .iter()
        .copied()
        .filter(|&s| s > 0.0)
        .fold(f64::INFINITY, f64::min);
    let min_speed_kmh = if min_speed_kmh.is_finite() {
        min_speed_kmh
    } else {
        0.0
    };

    let moving_paces: Vec<f64> = series
        .pace_data
        .iter()
        .copied()
        .filter(|&p| p > PACE_SENTINEL)
        .collect();

    let (avg_pace_min_km, min_pace_min_km, max_pace_min_km) = if moving_paces.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = moving_paces.iter().sum();
        let min = moving_paces.iter().copied().fold(f64::INFINITY, f64::min);
        let max = moving_paces
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        (sum / moving_paces.len() as f64, min, max)
    };

    SeriesStats {
        total_distance_km: series.distance_points.last().copied().unwrap_or(0.0),
        elapsed_seconds: series.time_points.last().copied().unwrap_or(0.0),
        avg_speed_kmh,
        min_speed_kmh,
        max_speed_kmh,
        avg_pace_min_km,
        min_pace_min_km,
        max_pace_min_km,
    }
}
