//! Persistent defaults (output directory, preferred aspect, batch size).
//!
//! The settings file is `~/.config/dvd-mirror/settings.toml`. Command-line
//! flags always win over values found there.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dvd_mirror_core::{AspectRatio, MirrorError};

/// Canonical path to the settings file: `~/.config/dvd-mirror/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("dvd-mirror").join("settings.toml")
}

/// Contents of `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,
}

/// The `[defaults]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Directory backups are written into
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// `16:9` or `4:3`
    #[serde(default)]
    pub aspect: Option<String>,
    /// Logical blocks per read/write batch
    #[serde(default)]
    pub batch_blocks: Option<usize>,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, MirrorError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&contents)
            .map_err(|e| MirrorError::config(format!("{}: {e}", path.display())))
    }

    /// Load settings from the canonical settings file.
    pub fn load() -> Result<Self, MirrorError> {
        Self::load_from(&settings_path())
    }

    /// Parse and validate settings from TOML text.
    pub fn parse(contents: &str) -> Result<Self, MirrorError> {
        let settings: Self =
            toml::from_str(contents).map_err(|e| MirrorError::config(e.to_string()))?;
        settings.preferred_aspect()?;
        if settings.defaults.batch_blocks == Some(0) {
            return Err(MirrorError::config("batch_blocks must be at least 1"));
        }
        Ok(settings)
    }

    /// The configured preferred aspect, if any.
    pub fn preferred_aspect(&self) -> Result<Option<AspectRatio>, MirrorError> {
        self.defaults
            .aspect
            .as_deref()
            .map(|a| a.parse::<AspectRatio>())
            .transpose()
            .map_err(|e| MirrorError::config(e.to_string()))
    }
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
