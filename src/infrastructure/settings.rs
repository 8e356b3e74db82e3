//! Persistence for the last-used supervisor identity.
//!
//! Kept in its own small file, independent of the record collections.
//! Last write wins; a missing file simply yields no settings.

use crate::domain::record::UserSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SETTINGS_FILE: &str = "settings.json";

pub struct UserSettingsStore {
    file_path: PathBuf,
}

impl UserSettingsStore {
    pub fn new(data_dir: &Path) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        }
        Ok(Self {
            file_path: data_dir.join(SETTINGS_FILE),
        })
    }

    pub fn load(&self) -> Result<Option<UserSettings>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.file_path).context("Failed to read settings file")?;
        let settings: UserSettings =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        Ok(Some(settings))
    }

    pub fn save(&self, settings: &UserSettings) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        // Atomic write: temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp settings file")?;
        fs::rename(&temp_path, &self.file_path).context("Failed to rename settings file")?;

        info!("Saved user settings to {:?}", self.file_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fleetmetrics-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_missing_returns_none() {
        let store = UserSettingsStore::new(&temp_dir()).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let store = UserSettingsStore::new(&temp_dir()).unwrap();
        store
            .save(&UserSettings {
                supervisor_name: "Budi Santoso".to_string(),
                supervisor_id: "880123".to_string(),
            })
            .unwrap();
        store
            .save(&UserSettings {
                supervisor_name: "Siti Aminah".to_string(),
                supervisor_id: "910456".to_string(),
            })
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.supervisor_name, "Siti Aminah");
        assert_eq!(loaded.supervisor_id, "910456");
    }
}
