//! Per-field validator descriptors for the two input forms.
//!
//! Each form field carries an explicit validator kind and a display label.
//! Dispatch goes through these tables only; no code inspects field names to
//! guess which predicate applies. Table consistency is verified once when the
//! configuration is built.

use crate::config::ValidationLimits;
use crate::domain::validation;
use anyhow::{Result, bail};

pub const METER_START: &str = "meterStart";
pub const METER_END: &str = "meterEnd";

/// Which predicate a field is validated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Identifier,
    PositiveInt,
    PositiveDecimal,
}

/// A single form field: its key in the input struct, the label used in error
/// messages, and the validator kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Run this field's predicate against a raw value.
    pub fn is_valid(&self, value: &str, limits: &ValidationLimits) -> bool {
        match self.kind {
            FieldKind::Name => validation::is_valid_name(value),
            FieldKind::Identifier => validation::is_valid_identifier(value),
            FieldKind::PositiveInt => validation::is_valid_positive_int(value, limits),
            FieldKind::PositiveDecimal => validation::is_valid_positive_decimal(value, limits),
        }
    }

    /// Human-readable message for a failed predicate.
    pub fn failure_message(&self, limits: &ValidationLimits) -> String {
        match self.kind {
            FieldKind::Name => format!(
                "{} may only contain letters, spaces, hyphens and apostrophes",
                self.label
            ),
            FieldKind::Identifier => format!("{} must be alphanumeric", self.label),
            FieldKind::PositiveInt => format!(
                "{} must be a whole number between 1 and {}",
                self.label, limits.max_count
            ),
            FieldKind::PositiveDecimal => format!(
                "{} must be a number of at least {}",
                self.label, limits.min_decimal
            ),
        }
    }

    pub fn required_message(&self) -> String {
        format!("{} is required", self.label)
    }
}

pub const PRODUCTIVITY_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        key: "supervisorName",
        label: "Supervisor name",
        kind: FieldKind::Name,
    },
    FieldDescriptor {
        key: "supervisorId",
        label: "Supervisor NRP",
        kind: FieldKind::Identifier,
    },
    FieldDescriptor {
        key: "excavatorId",
        label: "Excavator id",
        kind: FieldKind::Identifier,
    },
    FieldDescriptor {
        key: "tripCount",
        label: "Trip count",
        kind: FieldKind::PositiveInt,
    },
    FieldDescriptor {
        key: METER_START,
        label: "Meter start",
        kind: FieldKind::PositiveDecimal,
    },
    FieldDescriptor {
        key: METER_END,
        label: "Meter end",
        kind: FieldKind::PositiveDecimal,
    },
    FieldDescriptor {
        key: "bucketCapacity",
        label: "Bucket capacity",
        kind: FieldKind::PositiveDecimal,
    },
];

pub const MATCH_FACTOR_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        key: "supervisorName",
        label: "Supervisor name",
        kind: FieldKind::Name,
    },
    FieldDescriptor {
        key: "supervisorId",
        label: "Supervisor NRP",
        kind: FieldKind::Identifier,
    },
    FieldDescriptor {
        key: "excavatorId",
        label: "Excavator id",
        kind: FieldKind::Identifier,
    },
    FieldDescriptor {
        key: "haulerCount",
        label: "Hauler count",
        kind: FieldKind::PositiveInt,
    },
    FieldDescriptor {
        key: "loaderCycleTime",
        label: "Loader cycle time",
        kind: FieldKind::PositiveDecimal,
    },
    FieldDescriptor {
        key: "haulerCycleTime",
        label: "Hauler cycle time",
        kind: FieldKind::PositiveDecimal,
    },
];

/// Sanity-check the descriptor tables: unique keys, non-empty labels.
/// Called once from `AppConfig` construction.
pub fn verify_descriptor_tables() -> Result<()> {
    for table in [PRODUCTIVITY_FIELDS, MATCH_FACTOR_FIELDS] {
        for (i, field) in table.iter().enumerate() {
            if field.label.is_empty() {
                bail!("Field descriptor '{}' has an empty label", field.key);
            }
            if table[..i].iter().any(|f| f.key == field.key) {
                bail!("Duplicate field descriptor key '{}'", field.key);
            }
        }
    }
    Ok(())
}
