//! Persistence of the last applied overlay color.
//!
//! The color is stored as `filter_color = "#AARRGGBB"` in
//! `<state_dir>/lightly/state.toml`, so the overlay can show the previous value
//! straight away on the next start.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::Log;
use crate::overlay::OverlayColor;

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    filter_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_STATE_HOME/lightly/state.toml`, falling back to the local data
    /// directory on platforms without a state directory.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .context("Could not determine state directory")?;
        Ok(base.join("lightly").join("state.toml"))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored color, `None` when nothing usable has been saved yet.
    ///
    /// A corrupt file is not an error: it is reported and ignored.
    pub fn load(&self) -> Result<Option<OverlayColor>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state from {}", self.path.display()))?;

        let parsed = toml::from_str::<StateFile>(&content)
            .map_err(anyhow::Error::from)
            .and_then(|state| state.filter_color.parse::<OverlayColor>());

        match parsed {
            Ok(color) => Ok(Some(color)),
            Err(e) => {
                Log::log_warning(&format!(
                    "Ignoring malformed state file {}: {}",
                    self.path.display(),
                    e
                ));
                Ok(None)
            }
        }
    }

    pub fn save(&self, color: OverlayColor) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }

        let content = toml::to_string(&StateFile {
            filter_color: color.to_string(),
        })
        .context("Failed to serialize state")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write state to {}", self.path.display()))
    }
}
