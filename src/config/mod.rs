//! Configuration module for fleetmetrics.
//!
//! All tunables live in a single read-only [`AppConfig`] built once at startup
//! and passed explicitly into the components that need it: classification
//! bands, field validation limits, and the data directory for persistence.

use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;

/// An inclusive numeric range used for match-factor classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if low > high {
            bail!("Invalid band: low {} > high {}", low, high);
        }
        Ok(Self { low, high })
    }

    /// Inclusive membership test.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.low && x <= self.high
    }

    fn encloses(&self, other: &Band) -> bool {
        self.low <= other.low && self.high >= other.high
    }
}

/// The nested warn/optimal bands for match-factor status.
///
/// Invariant: the warn band always encloses the optimal band, checked at
/// construction so classification can assume the nesting.
#[derive(Debug, Clone, Copy)]
pub struct ValidationBands {
    pub warn: Band,
    pub optimal: Band,
}

impl ValidationBands {
    pub fn new(warn: Band, optimal: Band) -> Result<Self> {
        if !warn.encloses(&optimal) {
            bail!(
                "Warn band [{}, {}] must enclose optimal band [{}, {}]",
                warn.low,
                warn.high,
                optimal.low,
                optimal.high
            );
        }
        Ok(Self { warn, optimal })
    }
}

/// Limits applied by the field validators.
#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    /// Inclusive upper bound for positive-integer fields (trip count, hauler count).
    pub max_count: u32,
    /// Inclusive lower bound for positive-decimal fields (capacities, cycle times, meters).
    pub min_decimal: f64,
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bands: ValidationBands,
    pub limits: ValidationLimits,
    /// Directory holding `records.json` and `settings.json`.
    pub data_dir: PathBuf,
    /// Prefix for exported backup filenames.
    pub backup_prefix: String,
}

impl AppConfig {
    /// Load configuration from environment variables with built-in defaults.
    ///
    /// Recognized variables: `FLEETMETRICS_DATA_DIR`, `MF_WARN_LOW`,
    /// `MF_WARN_HIGH`, `MF_OPTIMAL_LOW`, `MF_OPTIMAL_HIGH`, `MAX_COUNT`,
    /// `MIN_DECIMAL`.
    pub fn from_env() -> Result<Self> {
        let warn = Band::new(
            Self::parse_f64("MF_WARN_LOW", 0.1)?,
            Self::parse_f64("MF_WARN_HIGH", 2.0)?,
        )?;
        let optimal = Band::new(
            Self::parse_f64("MF_OPTIMAL_LOW", 0.5)?,
            Self::parse_f64("MF_OPTIMAL_HIGH", 1.5)?,
        )?;
        let bands = ValidationBands::new(warn, optimal)?;

        let limits = ValidationLimits {
            max_count: Self::parse_u32("MAX_COUNT", 9999)?,
            min_decimal: Self::parse_f64("MIN_DECIMAL", 0.1)?,
        };

        let data_dir = match env::var("FLEETMETRICS_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home = env::var("HOME").context("Could not find HOME directory")?;
                PathBuf::from(home).join(".fleetmetrics")
            }
        };

        let config = Self {
            bands,
            limits,
            data_dir,
            backup_prefix: "fleetmetrics-backup".to_string(),
        };

        // The field descriptor tables are fixed at compile time; verify they
        // cover every form field before anything runs against them.
        crate::domain::validation::fields::verify_descriptor_tables()?;

        Ok(config)
    }

    /// Defaults without touching the environment. Used by tests.
    pub fn defaults_with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            bands: ValidationBands {
                warn: Band { low: 0.1, high: 2.0 },
                optimal: Band { low: 0.5, high: 1.5 },
            },
            limits: ValidationLimits {
                max_count: 9999,
                min_decimal: 0.1,
            },
            data_dir,
            backup_prefix: "fleetmetrics-backup".to_string(),
        }
    }

    fn parse_f64(key: &str, default: f64) -> Result<f64> {
        match env::var(key) {
            Ok(v) => v
                .parse::<f64>()
                .with_context(|| format!("Failed to parse {} as f64", key)),
            Err(_) => Ok(default),
        }
    }

    fn parse_u32(key: &str, default: u32) -> Result<u32> {
        match env::var(key) {
            Ok(v) => v
                .parse::<u32>()
                .with_context(|| format!("Failed to parse {} as u32", key)),
            Err(_) => Ok(default),
        }
    }
}
