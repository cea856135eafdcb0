// SPDX-License-Identifier: MIT

//! Whoop wire types: OAuth tokens, recovery records, and workouts.

use serde::Deserialize;

/// Response from the Whoop OAuth token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

/// Collection envelope for list endpoints. The v2 API nests records under a
/// key (`records`, historically `data`); some replies are bare arrays.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Paged(PagedCollection<T>),
    Bare(Vec<T>),
}

/// Keyed form of the collection envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PagedCollection<T> {
    #[serde(alias = "data")]
    pub records: Vec<T>,
    #[serde(default)]
    pub next_token: Option<String>,
}

impl<T> Collection<T> {
    /// Unwrap the records regardless of envelope form.
    pub fn into_records(self) -> Vec<T> {
        match self {
            Collection::Paged(paged) => paged.records,
            Collection::Bare(records) => records,
        }
    }
}

/// One recovery record. The score nests under `score` in the v2 API; older
/// shapes carried it flat on the record.
#[derive(Debug, Clone, Deserialize)]
pub struct Recovery {
    #[serde(default)]
    pub score: Option<RecoveryScore>,
    #[serde(default)]
    pub recovery_score: Option<f64>,
}

/// Score block of a v2 recovery record.
#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryScore {
    #[serde(default)]
    pub recovery_score: Option<f64>,
}

impl Recovery {
    /// Recovery percentage rounded to a whole number, nested score winning
    /// over the flat field. Rounded once here so the displayed value and the
    /// Green/Yellow/Red label always agree.
    pub fn score_percent(&self) -> Option<u8> {
        let raw = self
            .score
            .as_ref()
            .and_then(|s| s.recovery_score)
            .or(self.recovery_score)?;
        Some(raw.round() as u8)
    }
}

/// One workout record from the v2 collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Workout {
    pub sport_id: i64,
    /// Start date/time (RFC3339)
    pub start: String,
    /// Distance covered in meters
    pub distance_meter: f64,
    /// Heart-rate zone breakdown; absent when the strap recorded none
    #[serde(default)]
    pub zone_duration: Option<ZoneDurations>,
}

/// Milliseconds spent in each heart-rate zone. Zones the API omits count
/// as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneDurations {
    #[serde(default)]
    pub zone_zero_milli: u64,
    #[serde(default)]
    pub zone_one_milli: u64,
    #[serde(default)]
    pub zone_two_milli: u64,
    #[serde(default)]
    pub zone_three_milli: u64,
    #[serde(default)]
    pub zone_four_milli: u64,
    #[serde(default)]
    pub zone_five_milli: u64,
}

impl ZoneDurations {
    /// Total time across all zones, zone 0 included.
    pub fn total_milli(&self) -> u64 {
        self.zone_zero_milli
            + self.zone_one_milli
            + self.zone_two_milli
            + self.zone_three_milli
            + self.zone_four_milli
            + self.zone_five_milli
    }
}
