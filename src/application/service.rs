//! Application service wiring validation, record building, storage,
//! statistics and backup behind one entry type.
//!
//! Constructed once at startup with an explicit [`AppConfig`]; there is no
//! ambient global state. Presentation layers (CLI, future UI) only ever talk
//! to this service.

use crate::config::AppConfig;
use crate::domain::errors::StorageError;
use crate::domain::factory::{
    MatchFactorInput, ProductivityInput, RecordFactory, ValidationReport,
};
use crate::domain::record::{MatchFactorRecord, ProductivityRecord, RecordId, UserSettings};
use crate::domain::statistics::{
    EquipmentSummary, FieldSummary, MatchFactorStatus, classify_match_factor,
    per_equipment_summary, summarize,
};
use crate::infrastructure::backup::{self, Snapshot};
use crate::infrastructure::settings::UserSettingsStore;
use crate::infrastructure::store::RecordStore;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Result of submitting one entry form.
#[derive(Debug)]
pub enum EntryOutcome<R> {
    /// Record created (or replaced) and persisted; warnings are advisory.
    Saved { record: R, warnings: Vec<String> },
    /// Validation errors; nothing was stored.
    Rejected(ValidationReport),
    /// Update target id no longer exists; nothing was stored.
    NotFound,
}

pub struct MetricsService {
    config: AppConfig,
    factory: RecordFactory,
    store: RecordStore,
    settings: UserSettingsStore,
}

impl MetricsService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = RecordStore::open(&config.data_dir).context("Failed to open record store")?;
        let settings = UserSettingsStore::new(&config.data_dir)?;
        let factory = RecordFactory::new(config.clone());
        Ok(Self {
            config,
            factory,
            store,
            settings,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn productivity_records(&self) -> &[ProductivityRecord] {
        self.store.productivity()
    }

    pub fn match_factor_records(&self) -> &[MatchFactorRecord] {
        self.store.match_factor()
    }

    /// Validate, build and append one productivity record. Remembers the
    /// supervisor identity for form pre-fill on success.
    pub fn add_productivity(
        &mut self,
        input: &ProductivityInput,
    ) -> Result<EntryOutcome<ProductivityRecord>> {
        let report = self.factory.validate_productivity_inputs(input);
        if !report.is_valid {
            return Ok(EntryOutcome::Rejected(report));
        }
        let record = self.factory.build_productivity_record(input)?;
        self.store.append_productivity(record.clone())?;
        self.remember_supervisor(&record.supervisor_name, &record.supervisor_id);
        info!(
            "Added productivity record for {}: {}",
            record.excavator_id, record.productivity
        );
        Ok(EntryOutcome::Saved {
            record,
            warnings: report.warnings,
        })
    }

    /// Validate, build and append one match-factor record.
    pub fn add_match_factor(
        &mut self,
        input: &MatchFactorInput,
    ) -> Result<EntryOutcome<MatchFactorRecord>> {
        let report = self.factory.validate_match_factor_inputs(input);
        if !report.is_valid {
            return Ok(EntryOutcome::Rejected(report));
        }
        let record = self.factory.build_match_factor_record(input)?;
        self.store.append_match_factor(record.clone())?;
        self.remember_supervisor(&record.supervisor_name, &record.supervisor_id);
        info!(
            "Added match-factor record for {}: {}",
            record.excavator_id, record.match_factor
        );
        Ok(EntryOutcome::Saved {
            record,
            warnings: report.warnings,
        })
    }

    /// Replace-on-edit: rebuild the record from fresh input and swap it in
    /// place, keeping its id and position.
    pub fn update_productivity(
        &mut self,
        id: RecordId,
        input: &ProductivityInput,
    ) -> Result<EntryOutcome<ProductivityRecord>> {
        let report = self.factory.validate_productivity_inputs(input);
        if !report.is_valid {
            return Ok(EntryOutcome::Rejected(report));
        }
        let record = self.factory.build_productivity_record(input)?;
        if !self.store.update_productivity(id, record.clone())? {
            return Ok(EntryOutcome::NotFound);
        }
        Ok(EntryOutcome::Saved {
            record,
            warnings: report.warnings,
        })
    }

    pub fn update_match_factor(
        &mut self,
        id: RecordId,
        input: &MatchFactorInput,
    ) -> Result<EntryOutcome<MatchFactorRecord>> {
        let report = self.factory.validate_match_factor_inputs(input);
        if !report.is_valid {
            return Ok(EntryOutcome::Rejected(report));
        }
        let record = self.factory.build_match_factor_record(input)?;
        if !self.store.update_match_factor(id, record.clone())? {
            return Ok(EntryOutcome::NotFound);
        }
        Ok(EntryOutcome::Saved {
            record,
            warnings: report.warnings,
        })
    }

    pub fn remove_productivity(&mut self, id: RecordId) -> Result<bool, StorageError> {
        self.store.remove_productivity(id)
    }

    pub fn remove_match_factor(&mut self, id: RecordId) -> Result<bool, StorageError> {
        self.store.remove_match_factor(id)
    }

    pub fn productivity_summary(&self) -> FieldSummary {
        summarize(self.store.productivity().iter().map(|r| r.productivity))
    }

    pub fn match_factor_summary(&self) -> FieldSummary {
        summarize(self.store.match_factor().iter().map(|r| r.match_factor))
    }

    /// Status classification of the fleet-wide average match factor, or
    /// `None` while no match-factor records exist (an empty fleet has no
    /// status, it is not critical).
    pub fn fleet_status(&self) -> Option<MatchFactorStatus> {
        let summary = self.match_factor_summary();
        (summary.count > 0).then(|| classify_match_factor(summary.avg, &self.config.bands))
    }

    pub fn equipment_summary(&self, excavator_id: &str) -> EquipmentSummary {
        per_equipment_summary(
            self.store.productivity(),
            self.store.match_factor(),
            excavator_id,
        )
    }

    /// Export the full store as a snapshot envelope plus suggested filename.
    pub fn export_backup(&self) -> Result<(String, String)> {
        let snapshot = backup::export_snapshot(&self.store);
        let filename = backup::suggested_filename(
            &self.config.backup_prefix,
            snapshot.exported_at.unwrap_or_else(chrono::Utc::now),
        );
        let json = snapshot.to_json()?;
        Ok((json, filename))
    }

    /// Parse a backup file and, if well-formed, replace the entire store
    /// with its contents. A malformed envelope leaves the store untouched.
    pub fn import_backup(&mut self, raw: &str) -> Result<(usize, usize)> {
        let snapshot: Snapshot = backup::import_snapshot(raw)?;
        let counts = (
            snapshot.productivity_records.len(),
            snapshot.match_factor_records.len(),
        );
        backup::restore(&mut self.store, snapshot)?;
        Ok(counts)
    }

    pub fn load_settings(&self) -> Option<UserSettings> {
        match self.settings.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Could not load user settings: {}", e);
                None
            }
        }
    }

    fn remember_supervisor(&self, name: &str, id: &str) {
        let settings = UserSettings {
            supervisor_name: name.to_string(),
            supervisor_id: id.to_string(),
        };
        if let Err(e) = self.settings.save(&settings) {
            warn!("Could not save user settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn service() -> MetricsService {
        let dir = std::env::temp_dir().join(format!("fleetmetrics-test-{}", uuid::Uuid::new_v4()));
        MetricsService::new(AppConfig::defaults_with_data_dir(dir)).unwrap()
    }

    fn prod_input(excavator: &str, trips: &str) -> ProductivityInput {
        ProductivityInput {
            supervisor_name: "Budi Santoso".to_string(),
            supervisor_id: "880123".to_string(),
            timestamp: None,
            excavator_id: excavator.to_string(),
            trip_count: trips.to_string(),
            meter_start: "100".to_string(),
            meter_end: "105".to_string(),
            bucket_capacity: "6.5".to_string(),
        }
    }

    fn mf_input(hauler_ct: &str) -> MatchFactorInput {
        MatchFactorInput {
            supervisor_name: "Budi Santoso".to_string(),
            supervisor_id: "880123".to_string(),
            timestamp: None,
            excavator_id: "EX1".to_string(),
            hauler_count: "5".to_string(),
            loader_cycle_time: "3".to_string(),
            hauler_cycle_time: hauler_ct.to_string(),
        }
    }

    #[test]
    fn test_add_productivity_stores_record() {
        let mut svc = service();
        let outcome = svc.add_productivity(&prod_input("EX1", "10")).unwrap();
        assert!(matches!(outcome, EntryOutcome::Saved { .. }));
        assert_eq!(svc.productivity_records().len(), 1);
        assert_eq!(svc.productivity_records()[0].productivity, 13.0);
    }

    #[test]
    fn test_add_invalid_input_rejected_and_not_stored() {
        let mut svc = service();
        let outcome = svc.add_productivity(&prod_input("EX1", "0")).unwrap();
        assert!(matches!(outcome, EntryOutcome::Rejected(_)));
        assert!(svc.productivity_records().is_empty());
    }

    #[test]
    fn test_add_remembers_supervisor() {
        let mut svc = service();
        svc.add_productivity(&prod_input("EX1", "10")).unwrap();
        let settings = svc.load_settings().unwrap();
        assert_eq!(settings.supervisor_name, "Budi Santoso");
        assert_eq!(settings.supervisor_id, "880123");
    }

    #[test]
    fn test_update_not_found() {
        let mut svc = service();
        let outcome = svc
            .update_productivity(RecordId::new(), &prod_input("EX1", "10"))
            .unwrap();
        assert!(matches!(outcome, EntryOutcome::NotFound));
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut svc = service();
        svc.add_productivity(&prod_input("EX1", "10")).unwrap();
        let id = svc.productivity_records()[0].id;

        let outcome = svc.update_productivity(id, &prod_input("EX1", "20")).unwrap();
        assert!(matches!(outcome, EntryOutcome::Saved { .. }));
        assert_eq!(svc.productivity_records().len(), 1);
        assert_eq!(svc.productivity_records()[0].trip_count, 20);
        assert_eq!(svc.productivity_records()[0].id, id);
    }

    #[test]
    fn test_fleet_status_critical_for_out_of_band_average() {
        let mut svc = service();
        // 5 * 3 / 2 = 7.5
        svc.add_match_factor(&mf_input("2")).unwrap();
        assert_eq!(svc.fleet_status(), Some(MatchFactorStatus::Critical));
    }

    #[test]
    fn test_fleet_status_none_without_records() {
        let svc = service();
        assert_eq!(svc.fleet_status(), None);
    }

    #[test]
    fn test_export_import_roundtrip_is_destructive() {
        let mut svc = service();
        svc.add_productivity(&prod_input("EX1", "10")).unwrap();
        svc.add_match_factor(&mf_input("15")).unwrap();
        let (json, _) = svc.export_backup().unwrap();

        // Mutate after export, then restore: only exported records remain.
        svc.add_productivity(&prod_input("EX2", "12")).unwrap();
        let (prods, mfs) = svc.import_backup(&json).unwrap();
        assert_eq!((prods, mfs), (1, 1));
        assert_eq!(svc.productivity_records().len(), 1);
        assert_eq!(svc.productivity_records()[0].excavator_id, "EX1");
    }

    #[test]
    fn test_import_malformed_leaves_store_untouched() {
        let mut svc = service();
        svc.add_productivity(&prod_input("EX1", "10")).unwrap();
        assert!(svc.import_backup("{\"wrong\": true}").is_err());
        assert_eq!(svc.productivity_records().len(), 1);
    }
}
