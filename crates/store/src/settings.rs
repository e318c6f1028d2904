//! Sync settings management
//!
//! Settings are read from a JSON file. A missing file yields defaults, and so
//! does a file that cannot be parsed (with a warning).

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncSettings {
    /// Directory import settings
    pub import: ImportSettings,
    /// Directory export settings
    pub export: ExportSettings,
}

/// Import settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportSettings {
    /// Abort the run at the first file that fails
    pub fail_fast: bool,
    /// Ignore Office lock files (`~$Name.docx`)
    pub skip_lock_files: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            fail_fast: false,
            skip_lock_files: true,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportSettings {
    /// Replace files that already exist in the target directory
    pub overwrite: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

/// Settings manager for loading and saving sync settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: SyncSettings,
}

impl SettingsManager {
    /// Create a settings manager for the given file
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: SyncSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_sync(&mut self) -> Result<&SyncSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<SyncSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse settings file {}, using defaults: {}",
                        self.settings_path.display(),
                        e
                    );
                    self.current = SyncSettings::default();
                }
            }
        } else {
            self.current = SyncSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &SyncSettings {
        &self.current
    }

    /// Replace the current settings (not saved until `save_sync`)
    pub fn set(&mut self, settings: SyncSettings) {
        self.current = settings;
    }
}
