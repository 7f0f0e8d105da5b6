use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::PoisonError, sync::RwLock};

use crate::analytics::{validate_offset, validate_window, AnalyticsConfig, Granularity};
use crate::error::AnalyticsError;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Persisted defaults for analysis runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSettings {
    pub granularity: Granularity,
    pub window_days: u32,
    /// `None` means "use the host's local offset"
    pub utc_offset_minutes: Option<i32>,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        let config = AnalyticsConfig::default();
        Self {
            granularity: config.granularity,
            window_days: config.window_days,
            utc_offset_minutes: None,
        }
    }
}

impl AnalyticsSettings {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        validate_window(self.window_days)?;
        if let Some(minutes) = self.utc_offset_minutes {
            validate_offset(minutes)?;
        }
        Ok(())
    }

    /// Resolve into a run config, filling the offset from `local_offset_minutes`.
    pub fn to_config(&self, local_offset_minutes: i32) -> AnalyticsConfig {
        AnalyticsConfig {
            granularity: self.granularity,
            window_days: self.window_days,
            utc_offset_minutes: self.utc_offset_minutes.unwrap_or(local_offset_minutes),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AnalyticsSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!(
                    "Ignoring unreadable settings at {}: {}",
                    path.display(),
                    err
                );
                AnalyticsSettings::default()
            })
        } else {
            AnalyticsSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> AnalyticsSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, settings: AnalyticsSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = settings;
        self.persist(&guard)?;
        log_info!("Saved analytics settings to {}", self.path.display());
        Ok(())
    }

    fn persist(&self, data: &AnalyticsSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("moodlens-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::new(scratch_path("missing")).unwrap();
        let settings = store.settings();
        assert_eq!(settings.granularity, Granularity::Day);
        assert_eq!(settings.window_days, 7);
        assert_eq!(settings.to_config(120).utc_offset_minutes, 120);
    }

    #[test]
    fn update_round_trips_through_disk() {
        let path = scratch_path("update");
        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update(AnalyticsSettings {
                granularity: Granularity::Week,
                window_days: 14,
                utc_offset_minutes: Some(-300),
            })
            .unwrap();

        let reloaded = SettingsStore::new(path.clone()).unwrap().settings();
        assert_eq!(reloaded.granularity, Granularity::Week);
        assert_eq!(reloaded.window_days, 14);
        assert_eq!(reloaded.to_config(60).utc_offset_minutes, -300);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_empty_window() {
        let store = SettingsStore::new(scratch_path("invalid")).unwrap();
        let bad = AnalyticsSettings {
            window_days: 0,
            ..AnalyticsSettings::default()
        };
        assert!(store.update(bad).is_err());
        assert_eq!(store.settings().window_days, 7);
    }

    #[test]
    fn rejects_oversized_window_and_offset() {
        let store = SettingsStore::new(scratch_path("bounds")).unwrap();
        let huge = AnalyticsSettings {
            window_days: 4_000_000_000,
            ..AnalyticsSettings::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(AnalyticsError::InvalidWindow(4_000_000_000))
        ));
        assert!(store.update(huge).is_err());

        let far = AnalyticsSettings {
            utc_offset_minutes: Some(100_000),
            ..AnalyticsSettings::default()
        };
        assert!(matches!(far.validate(), Err(AnalyticsError::InvalidOffset(100_000))));
        assert!(store.update(far).is_err());
        assert_eq!(store.settings(), AnalyticsSettings::default());
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let parsed: AnalyticsSettings = serde_json::from_str(r#"{ "granularity": "month" }"#).unwrap();
        assert_eq!(parsed.granularity, Granularity::Month);
        assert_eq!(parsed.window_days, 7);
    }
}
