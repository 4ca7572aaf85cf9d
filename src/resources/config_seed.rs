//! The tray's configuration directory and its seeded preferences.
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::directory::DirectoryResource;
use super::{Resource, ResourceChange, ResourceState};

/// File holding the tray application's preferences.
pub const TRAY_CONFIG_FILE: &str = "tray.json";

/// Preferences the tray starts with on a fresh install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayDefaults {
    /// Interface locale.
    pub language: String,
    /// Desktop notifications on device events.
    pub show_notifications: bool,
    /// Check for new releases at start-up.
    pub check_updates: bool,
    /// Seconds between device polls.
    pub poll_interval: u32,
}

impl Default for TrayDefaults {
    fn default() -> Self {
        Self {
            language: "pt_BR".to_string(),
            show_notifications: true,
            check_updates: true,
            poll_interval: 5,
        }
    }
}

/// The tray's per-user configuration directory, seeded with defaults.
///
/// An existing `tray.json` is never overwritten.
#[derive(Debug, Clone)]
pub struct ConfigSeed {
    /// `~/.config/turing-screen`.
    pub dir: PathBuf,
    defaults: TrayDefaults,
}

impl ConfigSeed {
    /// Seed for `dir` with the stock tray defaults.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            defaults: TrayDefaults::default(),
        }
    }

    fn file(&self) -> PathBuf {
        self.dir.join(TRAY_CONFIG_FILE)
    }

    fn directory(&self) -> DirectoryResource {
        DirectoryResource::new("configuration directory", self.dir.clone())
    }
}

impl Resource for ConfigSeed {
    fn description(&self) -> String {
        self.dir.display().to_string()
    }

    fn probe(&self) -> Result<ResourceState> {
        self.directory().probe()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let file = self.file();
        if file.exists() {
            return Ok(ResourceChange::Unchanged);
        }
        self.directory().apply()?;
        let mut json = serde_json::to_string_pretty(&self.defaults)?;
        json.push('\n');
        std::fs::write(&file, json).with_context(|| format!("writing {}", file.display()))?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        self.directory().remove()
    }
}
