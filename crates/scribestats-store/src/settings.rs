//! User settings, persisted alongside the history logs.

use std::fs;
use std::io::ErrorKind;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::history::HistoryStore;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Gates milestone notifications. On by default.
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_notifications() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
        }
    }
}

impl HistoryStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on read failure, [`StoreError::Json`] when
    /// the settings file is corrupt.
    pub fn settings(&self) -> Result<Settings, StoreError> {
        match fs::read_to_string(self.dir().join(SETTINGS_FILE)) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Settings::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on write failure.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        fs::write(
            self.dir().join(SETTINGS_FILE),
            serde_json::to_string_pretty(settings)?,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_default_on() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();
        assert!(store.settings().unwrap().notifications);
    }

    #[test]
    fn saved_settings_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        store
            .save_settings(&Settings {
                notifications: false,
            })
            .unwrap();
        assert!(!store.settings().unwrap().notifications);
    }

    #[test]
    fn missing_field_defaults_on_parse() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("settings.json"), "{}").unwrap();
        assert!(store.settings().unwrap().notifications);
    }
}
