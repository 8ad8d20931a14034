//! Settings persistence
//!
//! Settings are loaded once at startup and written back after every change.
//! Load failures fall back to defaults; save failures are logged and never
//! interrupt the caller.

use std::path::{Path, PathBuf};

use battery_hud_types::{AppSettings, Color};

use crate::error::ConfigError;

const APP_NAME: &str = "battery-hud";
const CONFIG_NAME: &str = "settings";

/// Owns the current settings and the file they persist to
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: AppSettings,
}

impl SettingsStore {
    /// Open the per-user settings file
    pub fn open_default() -> Result<Self, ConfigError> {
        let path = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
            .map_err(ConfigError::Path)?;
        Ok(Self::at(path))
    }

    /// Open a settings file at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                AppSettings::default()
            }
        };
        tracing::info!(path = ?path, "settings loaded");
        Self { path, settings }
    }

    /// Read settings from `path` (a missing file yields defaults)
    pub fn load(path: &Path) -> Result<AppSettings, ConfigError> {
        confy::load_path(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the current settings to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store_path(&self.path, self.settings).map_err(|source| ConfigError::Save {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Use `color` while charging
    pub fn set_charge_color(&mut self, color: Color) {
        self.settings.charge_color = color;
        self.settings.use_custom_charge_color = true;
        self.persist();
    }

    /// Use `color` while on battery
    pub fn set_discharge_color(&mut self, color: Color) {
        self.settings.discharge_color = color;
        self.settings.use_custom_discharge_color = true;
        self.persist();
    }

    /// Go back to the built-in palette (stored colors are kept)
    pub fn reset_colors(&mut self) {
        self.settings.use_custom_charge_color = false;
        self.settings.use_custom_discharge_color = false;
        self.persist();
    }

    pub fn toggle_show_on_unplug(&mut self) -> bool {
        self.settings.show_on_unplug = !self.settings.show_on_unplug;
        self.persist();
        self.settings.show_on_unplug
    }

    pub fn toggle_play_sound(&mut self) -> bool {
        self.settings.play_sound = !self.settings.play_sound;
        self.persist();
        self.settings.play_sound
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!(error = %e, "failed to save settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        (dir, path)
    }

    #[test]
    fn fresh_profile_has_defaults() {
        let (_dir, path) = temp_store();
        let store = SettingsStore::at(&path);
        assert_eq!(*store.settings(), AppSettings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, path) = temp_store();
        let mut store = SettingsStore::at(&path);
        store.set_charge_color([12, 34, 56, 255]);
        store.set_discharge_color([200, 100, 0, 255]);
        store.toggle_show_on_unplug();
        store.toggle_play_sound();
        store.save().unwrap();

        let loaded = SettingsStore::load(&path).unwrap();
        assert_eq!(loaded, *store.settings());
        assert_eq!(loaded.charge_color, [12, 34, 56, 255]);
        assert!(loaded.use_custom_charge_color);
        assert!(loaded.use_custom_discharge_color);
        assert!(loaded.show_on_unplug);
        assert!(loaded.play_sound);
    }

    #[test]
    fn every_change_is_persisted() {
        let (_dir, path) = temp_store();
        let mut store = SettingsStore::at(&path);
        assert!(store.toggle_play_sound());

        let reopened = SettingsStore::at(&path);
        assert!(reopened.settings().play_sound);
    }

    #[test]
    fn reset_keeps_colors_but_clears_overrides() {
        let (_dir, path) = temp_store();
        let mut store = SettingsStore::at(&path);
        store.set_charge_color([1, 2, 3, 255]);
        store.reset_colors();

        let loaded = SettingsStore::load(&path).unwrap();
        assert!(!loaded.use_custom_charge_color);
        assert!(!loaded.use_custom_discharge_color);
        assert_eq!(loaded.charge_color, [1, 2, 3, 255]);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let (_dir, path) = temp_store();
        std::fs::write(&path, "charge_color = \"not a color\"").unwrap();
        let store = SettingsStore::at(&path);
        assert_eq!(*store.settings(), AppSettings::default());
    }
}
