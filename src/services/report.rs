// SPDX-License-Identifier: MIT

//! Coaching-report text formatters.
//!
//! The output of these functions is fed verbatim to a downstream AI coach,
//! so every formatter renders a fixed structure with fixed precision.
//! Changing any of these strings changes the public API.

use crate::models::strava::{Activity, PaceSpeedSeries, SplitMetric};
use crate::models::whoop::Workout;
use crate::services::pace;
use crate::time_utils::{format_min_sec, format_report_date};

/// Compact coaching report for a single activity.
///
/// The Splits section is omitted entirely when the activity carries no
/// `splits_metric`; a present-but-empty splits list still renders the section
/// header with a "no splits" line.
pub fn format_activity_report(activity: &Activity) -> String {
    let date = format_report_date(&activity.start_date);
    let distance_km = activity.distance / 1000.0;
    let duration_min = (activity.moving_time as f64 / 60.0).round() as u64;
    let avg_pace = pace::format_pace(pace::pace_min_per_km(
        activity.moving_time as f64,
        activity.distance,
    ));

    let splits_section = match &activity.splits_metric {
        Some(splits) => format!("\n**Splits:**\n{}", format_splits(splits)),
        None => String::new(),
    };

    format!(
        "**Latest Run Analysis - {}**\n\n\
         **Activity:** {}\n\
         **Distance:** {:.2} km\n\
         **Duration:** {} minutes\n\
         **Average Pace:** {} min/km\n\
         **Elevation Gain:** {}m\n\
         **Average Speed:** {:.1} km/h{}",
        date,
        activity.name,
        distance_km,
        duration_min,
        avg_pace,
        activity.total_elevation_gain,
        activity.average_speed * 3.6,
        splits_section
    )
}

/// One line per split: `Km {n}: {pace} min/km ({elevation}m)`, elevation
/// prefixed with `+` only when climbing.
fn format_splits(splits: &[SplitMetric]) -> String {
    if splits.is_empty() {
        return "No splits data available".to_string();
    }

    splits
        .iter()
        .map(|split| {
            let split_pace = pace::format_pace(pace::pace_min_per_km(
                split.moving_time as f64,
                split.distance,
            ));
            let elevation = if split.elevation_difference > 0.0 {
                format!("+{}", split.elevation_difference)
            } else {
                format!("{}", split.elevation_difference)
            };
            format!("Km {}: {} min/km ({}m)", split.split, split_pace, elevation)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detailed pace/speed report: summary and range statistics, up to ten
/// checkpoint samples, and the total sample count.
pub fn format_pace_speed_report(series: &PaceSpeedSeries, activity: &Activity) -> String {
    let date = format_report_date(&activity.start_date);
    let stats = pace::series_stats(series);

    let checkpoints = pace::checkpoint_indices(series.len())
        .into_iter()
        .map(|i| {
            format!(
                "{} | {:.2} km | {:.1} km/h | {} min/km",
                format_min_sec(series.time_points[i]),
                series.distance_points[i],
                series.speed_data[i],
                pace::format_pace(series.pace_data[i]),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "**Pace & Speed Analysis - {}**\n\n\
         **Activity:** {}\n\n\
         **Summary:**\n\
         Total Distance: {:.2} km\n\
         Elapsed Time: {} minutes\n\
         Average Speed: {:.1} km/h\n\
         Average Pace: {} min/km\n\n\
         **Range:**\n\
         Speed: {:.1} - {:.1} km/h\n\
         Pace: {} - {} min/km\n\n\
         **Checkpoints:**\n{}\n\n\
         **Total Samples:** {}",
        date,
        activity.name,
        stats.total_distance_km,
        (stats.elapsed_seconds / 60.0).round() as u64,
        stats.avg_speed_kmh,
        pace::format_pace(stats.avg_pace_min_km),
        stats.min_speed_kmh,
        stats.max_speed_kmh,
        pace::format_pace(stats.min_pace_min_km),
        pace::format_pace(stats.max_pace_min_km),
        checkpoints,
        series.len()
    )
}

/// Recovery line with the three-tier readiness label.
pub fn format_recovery(score: u8) -> String {
    let status = if score >= 67 {
        "Green"
    } else if score >= 34 {
        "Yellow"
    } else {
        "Red"
    };
    format!("**Today's Recovery: {}% ({})**", score, status)
}

/// Heart-rate zone breakdown for a workout.
///
/// Zone 0 counts toward the total but is not listed; when the workout has no
/// zone data, or every zone is zero, a plain "no data" line is returned with
/// no division performed.
pub fn format_heart_rate_zones(workout: &Workout) -> String {
    let zones = match &workout.zone_duration {
        Some(zones) => zones,
        None => return "No heart rate zone data available".to_string(),
    };

    let total_milli = zones.total_milli();
    if total_milli == 0 {
        return "No heart rate zone data available".to_string();
    }

    let date = format_report_date(&workout.start);
    let distance_km = workout.distance_meter / 1000.0;

    let zone_lines = [
        ("Zone 1", zones.zone_one_milli),
        ("Zone 2", zones.zone_two_milli),
        ("Zone 3", zones.zone_three_milli),
        ("Zone 4", zones.zone_four_milli),
        ("Zone 5", zones.zone_five_milli),
    ]
    .iter()
    .map(|&(name, duration)| format_zone_line(name, duration, total_milli))
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        "**Latest Running Workout - {}**\n\
         **Distance:** {:.2} km\n\n\
         **Heart Rate Zones:**\n{}",
        date, distance_km, zone_lines
    )
}

fn format_zone_line(name: &str, duration_milli: u64, total_milli: u64) -> String {
    let minutes = (duration_milli as f64 / 60_000.0).round() as u64;
    let percentage = duration_milli as f64 / total_milli as f64 * 100.0;
    format!("{}: {} min ({:.1}%)", name, minutes, percentage)
}
