//! Aggregation over record collections and match-factor status classification.

use crate::config::ValidationBands;
use crate::domain::record::{MatchFactorRecord, ProductivityRecord, round2};
use serde::Serialize;

/// Summary statistics over one numeric field of a collection.
///
/// An empty collection summarizes to all zeros rather than failing; the
/// average is division-by-zero-safe by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub count: usize,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

/// Three-tier status for an average match factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchFactorStatus {
    Critical,
    Warning,
    Optimal,
}

impl MatchFactorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFactorStatus::Critical => "Critical",
            MatchFactorStatus::Warning => "Warning",
            MatchFactorStatus::Optimal => "Optimal",
        }
    }
}

/// Combined per-excavator view over both collections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    pub excavator_id: String,
    pub productivity: FieldSummary,
    pub match_factor: FieldSummary,
    pub total_records: usize,
}

/// Count/avg/max/min over a stream of values. Average rounded to 2 decimals.
pub fn summarize(values: impl IntoIterator<Item = f64>) -> FieldSummary {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut max = f64::MIN;
    let mut min = f64::MAX;
    for v in values {
        count += 1;
        sum += v;
        max = max.max(v);
        min = min.min(v);
    }
    if count == 0 {
        return FieldSummary::default();
    }
    FieldSummary {
        count,
        avg: round2(sum / count as f64),
        max,
        min,
    }
}

/// Classify an average match factor against the nested bands.
///
/// Outside the warn band is Critical; inside warn but outside optimal is
/// Warning; inside optimal is Optimal. All bounds inclusive.
pub fn classify_match_factor(avg: f64, bands: &ValidationBands) -> MatchFactorStatus {
    if !bands.warn.contains(avg) {
        MatchFactorStatus::Critical
    } else if !bands.optimal.contains(avg) {
        MatchFactorStatus::Warning
    } else {
        MatchFactorStatus::Optimal
    }
}

/// Filter both collections by excavator id and summarize each.
pub fn per_equipment_summary(
    prod_records: &[ProductivityRecord],
    mf_records: &[MatchFactorRecord],
    excavator_id: &str,
) -> EquipmentSummary {
    let productivity = summarize(
        prod_records
            .iter()
            .filter(|r| r.excavator_id == excavator_id)
            .map(|r| r.productivity),
    );
    let match_factor = summarize(
        mf_records
            .iter()
            .filter(|r| r.excavator_id == excavator_id)
            .map(|r| r.match_factor),
    );
    EquipmentSummary {
        excavator_id: excavator_id.to_string(),
        total_records: productivity.count + match_factor.count,
        productivity,
        match_factor,
    }
}
