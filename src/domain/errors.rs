use thiserror::Error;

/// Errors raised at the derived-metric computation boundary.
///
/// Field validation failures are never errors; they are collected into a
/// [`ValidationReport`](crate::domain::factory::ValidationReport). These
/// variants cover the one case validation cannot rule out up front: a zero
/// denominator reaching the arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComputationError {
    #[error("Cannot compute productivity: duration is zero")]
    ZeroDuration,

    #[error("Cannot compute match factor: hauler cycle time is zero")]
    ZeroCycleTime,
}

/// Errors related to durable storage of the record collections.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Failed to serialize record collections: {reason}")]
    SerializeFailed { reason: String },
}

/// Errors raised when a backup snapshot cannot be restored.
///
/// On any of these the live store is left completely untouched.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Backup file is not valid JSON: {reason}")]
    NotJson { reason: String },

    #[error("Backup envelope is missing required key '{key}'")]
    MissingKey { key: &'static str },

    #[error("Backup key '{key}' is not a list of records")]
    NotAList { key: &'static str },

    #[error("Backup records could not be decoded: {reason}")]
    DecodeFailed { reason: String },
}
