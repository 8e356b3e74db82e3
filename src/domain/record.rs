//! Record types for the two tracked metrics.
//!
//! Records are immutable once built: every derived field is computed and
//! rounded by the factory before the record exists, so nothing downstream
//! ever re-rounds or recomputes. Identity is a generated [`RecordId`], never
//! a position in a collection.

use chrono::{DateTime, Timelike, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier attached to a record at creation time.
///
/// Update and delete operations address records by this id; positional index
/// is only the natural display order and goes stale on any removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Round to 2 decimal places, half away from zero.
///
/// Goes through `Decimal` rather than f64 arithmetic so that values sitting
/// exactly on an `.xx5` boundary round predictably: `round2(2.675) == 2.68`.
pub fn round2(x: f64) -> f64 {
    Decimal::from_f64(x)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Truncate a timestamp to minute precision, matching the granularity of the
/// operator's time entry.
pub fn truncate_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// One excavator productivity measurement.
///
/// `duration = meter_end - meter_start`; `productivity = trip_count *
/// bucket_capacity / duration`, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityRecord {
    pub id: RecordId,
    pub supervisor_name: String,
    pub supervisor_id: String,
    pub timestamp: DateTime<Utc>,
    pub excavator_id: String,
    pub trip_count: u32,
    pub meter_start: f64,
    pub meter_end: f64,
    pub duration: f64,
    pub bucket_capacity: f64,
    pub productivity: f64,
}

/// One loader/hauler match-factor measurement.
///
/// `match_factor = hauler_count * loader_cycle_time / hauler_cycle_time`,
/// rounded to 2 decimals. A value near 1.0 indicates a balanced fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFactorRecord {
    pub id: RecordId,
    pub supervisor_name: String,
    pub supervisor_id: String,
    pub timestamp: DateTime<Utc>,
    pub excavator_id: String,
    pub hauler_count: u32,
    pub loader_cycle_time: f64,
    pub hauler_cycle_time: f64,
    pub match_factor: f64,
}

/// Last-used supervisor identity, pre-filled into forms across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub supervisor_name: String,
    pub supervisor_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round2_basic() {
        assert_eq!(round2(13.004), 13.0);
        assert_eq!(round2(7.499), 7.5);
        assert_eq!(round2(1.0 / 3.0), 0.33);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(-2.675), -2.68);
        assert_eq!(round2(0.005), 0.01);
    }

    #[test]
    fn test_round2_agrees_with_decimal_midpoint_strategy() {
        use rust_decimal_macros::dec;
        let rounded = Decimal::from_f64(2.675)
            .unwrap()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(rounded, dec!(2.68));
    }

    #[test]
    fn test_truncate_to_minute_drops_seconds() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let truncated = truncate_to_minute(ts);
        assert_eq!(truncated.second(), 0);
        assert_eq!(truncated.minute(), 26);
        assert_eq!(truncated.hour(), 9);
    }

    #[test]
    fn test_record_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_productivity_record_serializes_camel_case() {
        let record = ProductivityRecord {
            id: RecordId::new(),
            supervisor_name: "Budi Santoso".to_string(),
            supervisor_id: "NRP1234".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap(),
            excavator_id: "EX2001".to_string(),
            trip_count: 10,
            meter_start: 100.0,
            meter_end: 105.0,
            duration: 5.0,
            bucket_capacity: 6.5,
            productivity: 13.0,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"supervisorName\""));
        assert!(json.contains("\"tripCount\":10"));
        assert!(json.contains("\"bucketCapacity\":6.5"));

        let back: ProductivityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
