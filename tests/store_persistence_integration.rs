//! End-to-end persistence flow through the public service API: records added
//! in one session are visible in the next, and mutations survive reopening.

use fleetmetrics::application::service::{EntryOutcome, MetricsService};
use fleetmetrics::config::AppConfig;
use fleetmetrics::domain::factory::{MatchFactorInput, ProductivityInput};
use std::path::PathBuf;

fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("fleetmetrics-it-{}", uuid::Uuid::new_v4()))
}

fn prod_input(excavator: &str) -> ProductivityInput {
    ProductivityInput {
        supervisor_name: "Budi Santoso".to_string(),
        supervisor_id: "880123".to_string(),
        timestamp: None,
        excavator_id: excavator.to_string(),
        trip_count: "10".to_string(),
        meter_start: "100".to_string(),
        meter_end: "105".to_string(),
        bucket_capacity: "6.5".to_string(),
    }
}

fn mf_input(excavator: &str) -> MatchFactorInput {
    MatchFactorInput {
        supervisor_name: "Budi Santoso".to_string(),
        supervisor_id: "880123".to_string(),
        timestamp: None,
        excavator_id: excavator.to_string(),
        hauler_count: "5".to_string(),
        loader_cycle_time: "3".to_string(),
        hauler_cycle_time: "15".to_string(),
    }
}

#[test]
fn test_records_survive_reopening() {
    let dir = temp_data_dir();

    {
        let mut svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir.clone())).unwrap();
        svc.add_productivity(&prod_input("EX1")).unwrap();
        svc.add_match_factor(&mf_input("EX1")).unwrap();
    }

    let svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir)).unwrap();
    assert_eq!(svc.productivity_records().len(), 1);
    assert_eq!(svc.match_factor_records().len(), 1);
    assert_eq!(svc.productivity_records()[0].productivity, 13.0);
    assert_eq!(svc.match_factor_records()[0].match_factor, 1.0);
}

#[test]
fn test_removal_survives_reopening() {
    let dir = temp_data_dir();

    let b_id;
    {
        let mut svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir.clone())).unwrap();
        for name in ["EXA", "EXB", "EXC"] {
            svc.add_productivity(&prod_input(name)).unwrap();
        }
        b_id = svc.productivity_records()[1].id;
        assert!(svc.remove_productivity(b_id).unwrap());
    }

    let svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir)).unwrap();
    let excavators: Vec<&str> = svc
        .productivity_records()
        .iter()
        .map(|r| r.excavator_id.as_str())
        .collect();
    assert_eq!(excavators, vec!["EXA", "EXC"]);
    assert!(svc.productivity_records().iter().all(|r| r.id != b_id));
}

#[test]
fn test_update_survives_reopening_with_same_id() {
    let dir = temp_data_dir();

    let id;
    {
        let mut svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir.clone())).unwrap();
        svc.add_productivity(&prod_input("EX1")).unwrap();
        id = svc.productivity_records()[0].id;

        let mut edited = prod_input("EX1");
        edited.trip_count = "12".to_string();
        let outcome = svc.update_productivity(id, &edited).unwrap();
        assert!(matches!(outcome, EntryOutcome::Saved { .. }));
    }

    let svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir)).unwrap();
    assert_eq!(svc.productivity_records().len(), 1);
    assert_eq!(svc.productivity_records()[0].id, id);
    assert_eq!(svc.productivity_records()[0].trip_count, 12);
}

#[test]
fn test_supervisor_settings_carry_across_sessions() {
    let dir = temp_data_dir();

    {
        let mut svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir.clone())).unwrap();
        svc.add_productivity(&prod_input("EX1")).unwrap();
    }

    let svc = MetricsService::new(AppConfig::defaults_with_data_dir(dir)).unwrap();
    let settings = svc.load_settings().unwrap();
    assert_eq!(settings.supervisor_name, "Budi Santoso");
    assert_eq!(settings.supervisor_id, "880123");
}
