//! Durable record store.
//!
//! Two ordered collections (productivity, match factor) held in memory and
//! written to `records.json` after every mutation. Insertion order is display
//! order. Mutations address records by [`RecordId`]; an unknown id is a logged
//! no-op. A failed write leaves the in-memory collections exactly as they
//! were before the mutation.

use crate::domain::errors::StorageError;
use crate::domain::record::{MatchFactorRecord, ProductivityRecord, RecordId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const RECORDS_FILE: &str = "records.json";

/// On-disk shape of the two collections. Field names match the backup
/// envelope so the snapshot and the live file stay mutually readable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StoredCollections {
    productivity_records: Vec<ProductivityRecord>,
    match_factor_records: Vec<MatchFactorRecord>,
}

pub struct RecordStore {
    file_path: PathBuf,
    productivity: Vec<ProductivityRecord>,
    match_factor: Vec<MatchFactorRecord>,
}

impl RecordStore {
    /// Open the store under `data_dir`, loading any prior data.
    ///
    /// A missing file or one that fails to deserialize yields empty
    /// collections with a warning, never an error.
    pub fn open(data_dir: &Path) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        }
        let file_path = data_dir.join(RECORDS_FILE);

        let collections = if file_path.exists() {
            match fs::read_to_string(&file_path) {
                Ok(content) => match serde_json::from_str::<StoredCollections>(&content) {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("Record file at {:?} is corrupt ({}), starting empty", file_path, e);
                        StoredCollections::default()
                    }
                },
                Err(e) => {
                    warn!("Could not read {:?} ({}), starting empty", file_path, e);
                    StoredCollections::default()
                }
            }
        } else {
            StoredCollections::default()
        };

        info!(
            "Opened record store at {:?}: {} productivity, {} match-factor records",
            file_path,
            collections.productivity_records.len(),
            collections.match_factor_records.len()
        );

        Ok(Self {
            file_path,
            productivity: collections.productivity_records,
            match_factor: collections.match_factor_records,
        })
    }

    pub fn productivity(&self) -> &[ProductivityRecord] {
        &self.productivity
    }

    pub fn match_factor(&self) -> &[MatchFactorRecord] {
        &self.match_factor
    }

    pub fn append_productivity(&mut self, record: ProductivityRecord) -> Result<(), StorageError> {
        self.productivity.push(record);
        if let Err(e) = self.save() {
            self.productivity.pop();
            return Err(e);
        }
        Ok(())
    }

    pub fn append_match_factor(&mut self, record: MatchFactorRecord) -> Result<(), StorageError> {
        self.match_factor.push(record);
        if let Err(e) = self.save() {
            self.match_factor.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Replace the record with `id` in place, keeping its position and id.
    /// Returns false without touching storage when the id is unknown.
    pub fn update_productivity(
        &mut self,
        id: RecordId,
        mut record: ProductivityRecord,
    ) -> Result<bool, StorageError> {
        let Some(pos) = self.productivity.iter().position(|r| r.id == id) else {
            warn!("Update skipped: no productivity record with id {}", id);
            return Ok(false);
        };
        record.id = id;
        let previous = std::mem::replace(&mut self.productivity[pos], record);
        if let Err(e) = self.save() {
            self.productivity[pos] = previous;
            return Err(e);
        }
        Ok(true)
    }

    pub fn update_match_factor(
        &mut self,
        id: RecordId,
        mut record: MatchFactorRecord,
    ) -> Result<bool, StorageError> {
        let Some(pos) = self.match_factor.iter().position(|r| r.id == id) else {
            warn!("Update skipped: no match-factor record with id {}", id);
            return Ok(false);
        };
        record.id = id;
        let previous = std::mem::replace(&mut self.match_factor[pos], record);
        if let Err(e) = self.save() {
            self.match_factor[pos] = previous;
            return Err(e);
        }
        Ok(true)
    }

    /// Remove the record with `id`, shifting every later record down one
    /// position. Any held positional index past the removal point is stale
    /// afterwards; ids are unaffected.
    pub fn remove_productivity(&mut self, id: RecordId) -> Result<bool, StorageError> {
        let Some(pos) = self.productivity.iter().position(|r| r.id == id) else {
            warn!("Remove skipped: no productivity record with id {}", id);
            return Ok(false);
        };
        let removed = self.productivity.remove(pos);
        if let Err(e) = self.save() {
            self.productivity.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    pub fn remove_match_factor(&mut self, id: RecordId) -> Result<bool, StorageError> {
        let Some(pos) = self.match_factor.iter().position(|r| r.id == id) else {
            warn!("Remove skipped: no match-factor record with id {}", id);
            return Ok(false);
        };
        let removed = self.match_factor.remove(pos);
        if let Err(e) = self.save() {
            self.match_factor.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Wholesale replacement of both collections, persisted immediately.
    /// Used by backup restore; on a failed write the previous contents are
    /// restored in memory.
    pub fn replace_all(
        &mut self,
        productivity: Vec<ProductivityRecord>,
        match_factor: Vec<MatchFactorRecord>,
    ) -> Result<(), StorageError> {
        let prev_prod = std::mem::replace(&mut self.productivity, productivity);
        let prev_mf = std::mem::replace(&mut self.match_factor, match_factor);
        if let Err(e) = self.save() {
            self.productivity = prev_prod;
            self.match_factor = prev_mf;
            return Err(e);
        }
        Ok(())
    }

    /// Atomic write of both collections: temp file then rename.
    fn save(&self) -> Result<(), StorageError> {
        let collections = StoredCollections {
            productivity_records: self.productivity.clone(),
            match_factor_records: self.match_factor.clone(),
        };
        let content = serde_json::to_string_pretty(&collections).map_err(|e| {
            StorageError::SerializeFailed {
                reason: e.to_string(),
            }
        })?;

        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(|e| StorageError::WriteFailed {
            path: temp_path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::rename(&temp_path, &self.file_path).map_err(|e| StorageError::WriteFailed {
            path: self.file_path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
