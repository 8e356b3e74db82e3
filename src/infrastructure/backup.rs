//! Backup snapshot export and restore.
//!
//! A snapshot is a self-describing JSON envelope carrying both collections
//! and the export timestamp. Import validates the envelope shape before any
//! deserialization; on any failure the live store is untouched. A successful
//! restore replaces the store wholesale and persists immediately.

use crate::domain::errors::{RestoreError, StorageError};
use crate::domain::record::{MatchFactorRecord, ProductivityRecord};
use crate::infrastructure::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

const KEY_PRODUCTIVITY: &str = "productivityRecords";
const KEY_MATCH_FACTOR: &str = "matchFactorRecords";

/// Full-store export envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    pub productivity_records: Vec<ProductivityRecord>,
    pub match_factor_records: Vec<MatchFactorRecord>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::SerializeFailed {
            reason: e.to_string(),
        })
    }
}

/// Capture the current store contents.
pub fn export_snapshot(store: &RecordStore) -> Snapshot {
    Snapshot {
        exported_at: Some(Utc::now()),
        productivity_records: store.productivity().to_vec(),
        match_factor_records: store.match_factor().to_vec(),
    }
}

/// Filename for an export: `<prefix>-<YYYY-MM-DDTHH-mm-ss>.json`.
pub fn suggested_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.json", prefix, at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Parse and shape-check a raw backup file.
///
/// Both collection keys must be present and array-shaped before records are
/// decoded; anything else is a [`RestoreError`] and no state changes.
pub fn import_snapshot(raw: &str) -> Result<Snapshot, RestoreError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| RestoreError::NotJson {
            reason: e.to_string(),
        })?;

    let object = value.as_object().ok_or(RestoreError::MissingKey {
        key: KEY_PRODUCTIVITY,
    })?;

    for key in [KEY_PRODUCTIVITY, KEY_MATCH_FACTOR] {
        match object.get(key) {
            None => return Err(RestoreError::MissingKey { key }),
            Some(v) if !v.is_array() => return Err(RestoreError::NotAList { key }),
            Some(_) => {}
        }
    }

    serde_json::from_value(value).map_err(|e| RestoreError::DecodeFailed {
        reason: e.to_string(),
    })
}

/// Replace the entire store with the snapshot's contents and persist.
pub fn restore(store: &mut RecordStore, snapshot: Snapshot) -> Result<(), StorageError> {
    let prod_count = snapshot.productivity_records.len();
    let mf_count = snapshot.match_factor_records.len();
    store.replace_all(snapshot.productivity_records, snapshot.match_factor_records)?;
    info!(
        "Restored backup: {} productivity, {} match-factor records",
        prod_count, mf_count
    );
    Ok(())
}
