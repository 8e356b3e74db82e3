//! Field-level validation predicates.
//!
//! Every predicate is pure and total: it returns a boolean, never panics, and
//! treats empty or unparseable input as `false`, never as a default pass.
//! Which predicate applies to which form field is decided by the descriptor
//! tables in [`fields`], not by inspecting field names at call sites.

pub mod fields;

use crate::config::{ValidationBands, ValidationLimits};

/// Person names: non-empty; letters, spaces, hyphens and apostrophes only.
pub fn is_valid_name(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
}

/// Equipment and personnel ids: non-empty, alphanumeric only.
pub fn is_valid_identifier(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Whole-number counts: parses as an integer in `[1, limits.max_count]`.
pub fn is_valid_positive_int(s: &str, limits: &ValidationLimits) -> bool {
    match s.trim().parse::<u32>() {
        Ok(n) => n >= 1 && n <= limits.max_count,
        Err(_) => false,
    }
}

/// Capacities, cycle times and meter readings: parses as a number
/// `>= limits.min_decimal`. No upper bound.
pub fn is_valid_positive_decimal(s: &str, limits: &ValidationLimits) -> bool {
    match s.trim().parse::<f64>() {
        Ok(x) => x.is_finite() && x >= limits.min_decimal,
        Err(_) => false,
    }
}

/// Both parse as numbers and `end > start`.
pub fn is_valid_range(end: &str, start: &str) -> bool {
    match (end.trim().parse::<f64>(), start.trim().parse::<f64>()) {
        (Ok(e), Ok(s)) => e.is_finite() && s.is_finite() && e > s,
        _ => false,
    }
}

/// Inclusive membership in the warn band.
pub fn is_within_warn_band(x: f64, bands: &ValidationBands) -> bool {
    bands.warn.contains(x)
}

/// Inclusive membership in the optimal band.
pub fn is_within_optimal_band(x: f64, bands: &ValidationBands) -> bool {
    bands.optimal.contains(x)
}
