//! User settings persisted as a JSON file
//!
//! One small file under the platform data dir
//! (~/.local/share/centavo/settings.json on Linux). Loading a missing file
//! yields defaults; saving creates the parent directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text::digits_only;

/// Persisted user settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Digits of the only sender whose messages the pipeline accepts.
    /// Absent means every sender is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_sender_number: Option<String>,
}

impl Settings {
    /// Load settings from a file, returning defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Save settings, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Set the allowed sender, normalizing to digits. Blank clears it.
    pub fn set_sender(&mut self, sender: &str) {
        let digits = digits_only(sender);
        self.sms_sender_number = if digits.is_empty() {
            None
        } else {
            Some(digits)
        };
    }

    /// Clear the allowed sender
    pub fn clear_sender(&mut self) {
        self.sms_sender_number = None;
    }
}

/// Default settings file location
pub fn default_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|d| d.join("centavo").join("settings.json"))
        .ok_or_else(|| Error::Config("no data directory available on this platform".into()))
}
