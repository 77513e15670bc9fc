use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Client-side settings kept across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Preferences {
    pub(crate) dark_mode: bool,
}

/// Preferences bound to the file they were loaded from.
#[derive(Debug, Clone)]
pub(crate) struct PrefsStore {
    path: PathBuf,
    pub(crate) prefs: Preferences,
}

impl PrefsStore {
    /// Load from `path`. A missing file yields defaults.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let prefs = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("Invalid preferences file: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read preferences: {}", path.display()))
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            prefs,
        })
    }

    pub(crate) fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.prefs)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }

    /// Flip dark mode and persist it. Returns the new value.
    pub(crate) fn toggle_dark_mode(&mut self) -> Result<bool> {
        self.prefs.dark_mode = !self.prefs.dark_mode;
        self.save()?;
        Ok(self.prefs.dark_mode)
    }
}
