// Settings management and persistence.
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Extension settings.
///
/// Serialized as the camelCase JSON blob the host persists; fields missing
/// from a stored blob fall back to their defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Pause-time behavior: rewind competitors to the start instead of just
    /// pausing them.
    pub reset_to_beginning: bool,
    /// Keep audio widgets out of Tab navigation.
    pub prevent_keyboard_focus: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reset_to_beginning: false,
            prevent_keyboard_focus: false,
        }
    }
}

/// Persistence collaborator for [`Settings`].
///
/// `load` returns settings already merged over defaults; the extension saves
/// on every change.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// File-backed store keeping `settings.json` under a config directory.
pub struct FileSettingsStore {
    config_dir: PathBuf,
}

impl FileSettingsStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

impl SettingsStore for FileSettingsStore {
    /// Load settings from file, or return defaults if the file doesn't exist.
    fn load(&self) -> Result<Settings> {
        let path = self.settings_path();
        if !path.exists() {
            info!("no settings file found, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        info!(?path, "loaded settings");
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        let path = self.settings_path();
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&path, content)?;
        info!(?path, "saved settings");
        Ok(())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Default)]
pub struct MemorySettingsStore {
    saved: Mutex<Option<Settings>>,
    save_count: Mutex<usize>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            saved: Mutex::new(Some(settings)),
            save_count: Mutex::new(0),
        }
    }

    /// The most recently saved settings, if any.
    pub fn saved(&self) -> Option<Settings> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.saved.lock().unwrap() = Some(settings.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }
}
