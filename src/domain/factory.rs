//! Derived-metric computation and record assembly.
//!
//! The factory is the only place where raw operator input becomes a record:
//! it runs every applicable field predicate, computes the derived values with
//! zero-denominator guards, applies the 2-decimal rounding policy as the final
//! step, and stamps a fresh [`RecordId`]. Nothing downstream recomputes or
//! re-rounds.

use crate::config::AppConfig;
use crate::domain::errors::ComputationError;
use crate::domain::record::{
    MatchFactorRecord, ProductivityRecord, RecordId, round2, truncate_to_minute,
};
use crate::domain::validation::fields::{
    FieldDescriptor, MATCH_FACTOR_FIELDS, METER_END, METER_START, PRODUCTIVITY_FIELDS,
};
use crate::domain::validation::{is_valid_range, is_within_warn_band};
use chrono::{DateTime, Utc};

/// Raw form fields for a productivity entry, exactly as the operator typed
/// them. Field names mirror the descriptor table keys.
#[derive(Debug, Clone, Default)]
pub struct ProductivityInput {
    pub supervisor_name: String,
    pub supervisor_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub excavator_id: String,
    pub trip_count: String,
    pub meter_start: String,
    pub meter_end: String,
    pub bucket_capacity: String,
}

impl ProductivityInput {
    fn field(&self, key: &str) -> &str {
        match key {
            "supervisorName" => &self.supervisor_name,
            "supervisorId" => &self.supervisor_id,
            "excavatorId" => &self.excavator_id,
            "tripCount" => &self.trip_count,
            "meterStart" => &self.meter_start,
            "meterEnd" => &self.meter_end,
            "bucketCapacity" => &self.bucket_capacity,
            _ => "",
        }
    }
}

/// Raw form fields for a match-factor entry.
#[derive(Debug, Clone, Default)]
pub struct MatchFactorInput {
    pub supervisor_name: String,
    pub supervisor_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub excavator_id: String,
    pub hauler_count: String,
    pub loader_cycle_time: String,
    pub hauler_cycle_time: String,
}

impl MatchFactorInput {
    fn field(&self, key: &str) -> &str {
        match key {
            "supervisorName" => &self.supervisor_name,
            "supervisorId" => &self.supervisor_id,
            "excavatorId" => &self.excavator_id,
            "haulerCount" => &self.hauler_count,
            "loaderCycleTime" => &self.loader_cycle_time,
            "haulerCycleTime" => &self.hauler_cycle_time,
            _ => "",
        }
    }
}

/// Outcome of input validation. Warnings never block record creation;
/// `is_valid` is strictly `errors.is_empty()`.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// `duration = meter_end - meter_start`.
pub fn compute_duration(end: f64, start: f64) -> f64 {
    end - start
}

/// `trips * capacity / duration`, rounded to 2 decimals.
pub fn compute_productivity(
    trips: u32,
    capacity: f64,
    duration: f64,
) -> Result<f64, ComputationError> {
    if duration == 0.0 {
        return Err(ComputationError::ZeroDuration);
    }
    Ok(round2(f64::from(trips) * capacity / duration))
}

/// `haulers * loader_ct / hauler_ct`, rounded to 2 decimals.
pub fn compute_match_factor(
    haulers: u32,
    loader_ct: f64,
    hauler_ct: f64,
) -> Result<f64, ComputationError> {
    if hauler_ct == 0.0 {
        return Err(ComputationError::ZeroCycleTime);
    }
    Ok(round2(f64::from(haulers) * loader_ct / hauler_ct))
}

/// Builds and validates records against one configuration.
#[derive(Debug, Clone)]
pub struct RecordFactory {
    config: AppConfig,
}

impl RecordFactory {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run every productivity field predicate and the meter range check.
    ///
    /// The required-field check runs first for each field and short-circuits
    /// that field's format check; the cross-field range check only runs once
    /// both meter fields passed individually.
    pub fn validate_productivity_inputs(&self, input: &ProductivityInput) -> ValidationReport {
        let check = self.check_fields(PRODUCTIVITY_FIELDS, |key| input.field(key));
        let mut report = ValidationReport {
            is_valid: false,
            errors: check.errors,
            warnings: Vec::new(),
        };

        let meters_ok = !check
            .failed_keys
            .iter()
            .any(|key| *key == METER_START || *key == METER_END);
        if meters_ok && !is_valid_range(&input.meter_end, &input.meter_start) {
            report
                .errors
                .push("Meter end must be greater than meter start".to_string());
        }

        report.is_valid = report.errors.is_empty();
        report
    }

    /// Run every match-factor field predicate, then, only when no errors
    /// exist, compute the prospective match factor and attach a non-blocking
    /// warning if it falls outside the warn band.
    pub fn validate_match_factor_inputs(&self, input: &MatchFactorInput) -> ValidationReport {
        let check = self.check_fields(MATCH_FACTOR_FIELDS, |key| input.field(key));
        let mut report = ValidationReport {
            is_valid: false,
            errors: check.errors,
            warnings: Vec::new(),
        };
        report.is_valid = report.errors.is_empty();

        if report.is_valid {
            let haulers = parse_count(&input.hauler_count);
            let loader_ct = parse_number(&input.loader_cycle_time);
            let hauler_ct = parse_number(&input.hauler_cycle_time);
            if let Ok(mf) = compute_match_factor(haulers, loader_ct, hauler_ct) {
                if !is_within_warn_band(mf, &self.config.bands) {
                    report.warnings.push(format!(
                        "Match factor {:.2} is outside the expected range [{}, {}]",
                        mf, self.config.bands.warn.low, self.config.bands.warn.high
                    ));
                }
            }
        }

        report
    }

    /// Assemble a full productivity record from validated input.
    ///
    /// Numeric fields are rounded to 2 decimals, counts truncated to whole
    /// numbers, and a missing timestamp defaults to now at minute precision.
    pub fn build_productivity_record(
        &self,
        input: &ProductivityInput,
    ) -> Result<ProductivityRecord, ComputationError> {
        let trip_count = parse_count(&input.trip_count);
        let meter_start = round2(parse_number(&input.meter_start));
        let meter_end = round2(parse_number(&input.meter_end));
        let bucket_capacity = round2(parse_number(&input.bucket_capacity));
        let duration = round2(compute_duration(meter_end, meter_start));
        let productivity = compute_productivity(trip_count, bucket_capacity, duration)?;

        Ok(ProductivityRecord {
            id: RecordId::new(),
            supervisor_name: input.supervisor_name.trim().to_string(),
            supervisor_id: input.supervisor_id.trim().to_string(),
            timestamp: input
                .timestamp
                .unwrap_or_else(|| truncate_to_minute(Utc::now())),
            excavator_id: input.excavator_id.trim().to_string(),
            trip_count,
            meter_start,
            meter_end,
            duration,
            bucket_capacity,
            productivity,
        })
    }

    /// Assemble a full match-factor record from validated input.
    pub fn build_match_factor_record(
        &self,
        input: &MatchFactorInput,
    ) -> Result<MatchFactorRecord, ComputationError> {
        let hauler_count = parse_count(&input.hauler_count);
        let loader_cycle_time = round2(parse_number(&input.loader_cycle_time));
        let hauler_cycle_time = round2(parse_number(&input.hauler_cycle_time));
        let match_factor = compute_match_factor(hauler_count, loader_cycle_time, hauler_cycle_time)?;

        Ok(MatchFactorRecord {
            id: RecordId::new(),
            supervisor_name: input.supervisor_name.trim().to_string(),
            supervisor_id: input.supervisor_id.trim().to_string(),
            timestamp: input
                .timestamp
                .unwrap_or_else(|| truncate_to_minute(Utc::now())),
            excavator_id: input.excavator_id.trim().to_string(),
            hauler_count,
            loader_cycle_time,
            hauler_cycle_time,
            match_factor,
        })
    }

    fn check_fields<'a>(
        &self,
        table: &[FieldDescriptor],
        field: impl Fn(&'static str) -> &'a str,
    ) -> FieldCheck {
        let mut check = FieldCheck::default();
        for desc in table {
            let raw = field(desc.key);
            if raw.trim().is_empty() {
                check.errors.push(desc.required_message());
                check.failed_keys.push(desc.key);
                continue;
            }
            if !desc.is_valid(raw, &self.config.limits) {
                check.errors.push(desc.failure_message(&self.config.limits));
                check.failed_keys.push(desc.key);
            }
        }
        check
    }
}

/// Per-field check results: one message per failed field, plus the failed
/// descriptor keys so cross-field checks gate on field identity, never on
/// message text.
#[derive(Debug, Default)]
struct FieldCheck {
    errors: Vec<String>,
    failed_keys: Vec<&'static str>,
}

/// Lenient numeric parse used only after validation has passed; unparseable
/// input degrades to 0 and is caught by the zero-denominator guards.
fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

/// Counts are truncated to whole numbers, never rounded up.
fn parse_count(s: &str) -> u32 {
    s.trim().parse::<f64>().map(|x| x.trunc() as u32).unwrap_or(0)
}
