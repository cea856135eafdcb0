// SPDX-License-Identifier: MIT

//! Wire-format data models, typed per provider.

pub mod strava;
pub mod whoop;

pub use strava::{Activity, ActivityStreams, PaceSpeedSeries, SplitMetric, Stream};
pub use whoop::{Recovery, Workout, ZoneDurations};
