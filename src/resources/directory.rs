//! Directory trees owned by the installer.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::remove_tree;
use super::{Resource, ResourceChange, ResourceState};

/// A directory tree owned by the installer (e.g. the runtime environment).
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    description: String,
    /// Root of the tree.
    pub path: PathBuf,
}

impl DirectoryResource {
    /// Track the tree at `path`, described as `description` in messages.
    #[must_use]
    pub fn new(description: impl Into<String>, path: PathBuf) -> Self {
        Self {
            description: description.into(),
            path,
        }
    }
}

impl Resource for DirectoryResource {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn probe(&self) -> Result<ResourceState> {
        Ok(if self.path.symlink_metadata().is_ok() {
            ResourceState::Present
        } else {
            ResourceState::Absent
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.path.is_dir() {
            return Ok(ResourceChange::Unchanged);
        }
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if self.probe()? == ResourceState::Absent {
            return Ok(ResourceChange::Unchanged);
        }
        remove_tree(&self.path)?;
        Ok(ResourceChange::Applied)
    }
}
