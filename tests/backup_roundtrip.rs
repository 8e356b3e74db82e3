//! Backup export/import through the public API: full-fidelity round-trip,
//! destructive restore, and rejection of malformed envelopes.

use fleetmetrics::application::service::MetricsService;
use fleetmetrics::config::AppConfig;
use fleetmetrics::domain::factory::{MatchFactorInput, ProductivityInput};
use std::path::PathBuf;

fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("fleetmetrics-it-{}", uuid::Uuid::new_v4()))
}

fn service() -> MetricsService {
    MetricsService::new(AppConfig::defaults_with_data_dir(temp_data_dir())).unwrap()
}

fn prod_input(excavator: &str) -> ProductivityInput {
    ProductivityInput {
        supervisor_name: "Siti Aminah".to_string(),
        supervisor_id: "910456".to_string(),
        timestamp: None,
        excavator_id: excavator.to_string(),
        trip_count: "8".to_string(),
        meter_start: "200".to_string(),
        meter_end: "204".to_string(),
        bucket_capacity: "5.2".to_string(),
    }
}

fn mf_input(excavator: &str) -> MatchFactorInput {
    MatchFactorInput {
        supervisor_name: "Siti Aminah".to_string(),
        supervisor_id: "910456".to_string(),
        timestamp: None,
        excavator_id: excavator.to_string(),
        hauler_count: "4".to_string(),
        loader_cycle_time: "2.5".to_string(),
        hauler_cycle_time: "10".to_string(),
    }
}

#[test]
fn test_roundtrip_preserves_every_record() {
    let mut svc = service();
    svc.add_productivity(&prod_input("EX1")).unwrap();
    svc.add_productivity(&prod_input("EX2")).unwrap();
    svc.add_match_factor(&mf_input("EX1")).unwrap();

    let before_prod = svc.productivity_records().to_vec();
    let before_mf = svc.match_factor_records().to_vec();

    let (json, filename) = svc.export_backup().unwrap();
    assert!(filename.starts_with("fleetmetrics-backup-"));
    assert!(filename.ends_with(".json"));

    let mut other = service();
    other.import_backup(&json).unwrap();

    assert_eq!(other.productivity_records(), before_prod.as_slice());
    assert_eq!(other.match_factor_records(), before_mf.as_slice());
}

#[test]
fn test_restore_replaces_wholesale() {
    let mut svc = service();
    svc.add_productivity(&prod_input("KEEP")).unwrap();
    let (json, _) = svc.export_backup().unwrap();

    // Records added after the export must not survive the restore.
    svc.add_productivity(&prod_input("DROP1")).unwrap();
    svc.add_match_factor(&mf_input("DROP2")).unwrap();

    svc.import_backup(&json).unwrap();
    assert_eq!(svc.productivity_records().len(), 1);
    assert_eq!(svc.productivity_records()[0].excavator_id, "KEEP");
    assert!(svc.match_factor_records().is_empty());
}

#[test]
fn test_malformed_backup_rejected_store_untouched() {
    let mut svc = service();
    svc.add_productivity(&prod_input("EX1")).unwrap();

    for raw in [
        "",
        "not json",
        "[]",
        "{}",
        r#"{"productivityRecords": []}"#,
        r#"{"productivityRecords": 5, "matchFactorRecords": []}"#,
    ] {
        assert!(svc.import_backup(raw).is_err(), "accepted: {raw:?}");
        assert_eq!(svc.productivity_records().len(), 1);
    }
}

#[test]
fn test_restored_store_persists_to_disk() {
    let dir = temp_data_dir();
    let mut source = service();
    source.add_match_factor(&mf_input("EX7")).unwrap();
    let (json, _) = source.export_backup().unwrap();

    {
        let mut svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir.clone())).unwrap();
        svc.import_backup(&json).unwrap();
    }

    let reopened = MetricsService::new(AppConfig::defaults_with_data_dir(dir)).unwrap();
    assert_eq!(reopened.match_factor_records().len(), 1);
    assert_eq!(reopened.match_factor_records()[0].excavator_id, "EX7");
}
