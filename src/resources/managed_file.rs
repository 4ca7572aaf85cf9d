//! Files written and deleted authoritatively by the installer.
use anyhow::{Context as _, Result, bail};
use std::path::PathBuf;
use std::sync::Arc;

use super::helpers::fs::{ensure_parent_dir, exists, remove_existing};
use super::{Resource, ResourceChange, ResourceState};
use crate::privilege::PrivilegedExecutor;

/// A file owned by the installer, written authoritatively on install.
///
/// User-level files are written directly; root-owned files go through the
/// [`PrivilegedExecutor`] given at construction.
#[derive(Debug, Clone)]
pub struct ManagedFile {
    description: String,
    /// Absolute destination path.
    pub path: PathBuf,
    content: Option<Vec<u8>>,
    privileged: Option<Arc<dyn PrivilegedExecutor>>,
}

impl ManagedFile {
    /// A file in a location the invoking user owns.
    #[must_use]
    pub fn user(description: impl Into<String>, path: PathBuf) -> Self {
        Self {
            description: description.into(),
            path,
            content: None,
            privileged: None,
        }
    }

    /// A root-owned file written through `privileged`.
    #[must_use]
    pub fn system(
        description: impl Into<String>,
        path: PathBuf,
        privileged: Arc<dyn PrivilegedExecutor>,
    ) -> Self {
        Self {
            privileged: Some(privileged),
            ..Self::user(description, path)
        }
    }

    /// Content written by [`Resource::apply`].
    #[must_use]
    pub fn with_content(mut self, content: Vec<u8>) -> Self {
        self.content = Some(content);
        self
    }
}

impl Resource for ManagedFile {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn probe(&self) -> Result<ResourceState> {
        Ok(if exists(&self.path) {
            ResourceState::Present
        } else {
            ResourceState::Absent
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        let Some(content) = &self.content else {
            bail!("no content to write for {}", self.description);
        };
        if let Some(privileged) = &self.privileged {
            privileged.install_file(content, &self.path)?;
        } else {
            ensure_parent_dir(&self.path)?;
            // Replace rather than truncate so a symlink at the path is not followed.
            remove_existing(&self.path)?;
            std::fs::write(&self.path, content)
                .with_context(|| format!("writing {}", self.path.display()))?;
        }
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if self.probe()? == ResourceState::Absent {
            return Ok(ResourceChange::Unchanged);
        }
        if let Some(privileged) = &self.privileged {
            privileged.remove_file(&self.path)?;
        } else {
            remove_existing(&self.path)?;
        }
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::RecordingPrivileged;

    #[test]
    fn apply_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autostart/tray.desktop");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale\n").unwrap();

        let file =
            ManagedFile::user("autostart entry", path.clone()).with_content(b"fresh\n".to_vec());
        assert_eq!(file.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");

        file.apply().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn apply_without_content_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = ManagedFile::user("icon", dir.path().join("x.svg"));
        assert!(file.apply().is_err());
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let file = ManagedFile::user("icon", dir.path().join("x.svg"));
        assert_eq!(file.probe().unwrap(), ResourceState::Absent);
        assert_eq!(file.remove().unwrap(), ResourceChange::Unchanged);
    }

    #[test]
    fn remove_deletes_present_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.svg");
        std::fs::write(&path, "<svg/>").unwrap();
        let file = ManagedFile::user("icon", path.clone());
        assert_eq!(file.remove().unwrap(), ResourceChange::Applied);
        assert!(!path.exists());
    }

    #[test]
    fn system_file_goes_through_privileged_executor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etc/udev/rules.d/99-x.rules");
        let sudo = Arc::new(RecordingPrivileged::new());
        let file = ManagedFile::system("device rule", path.clone(), sudo.clone())
            .with_content(b"rule\n".to_vec());

        file.apply().unwrap();
        file.remove().unwrap();

        let calls = sudo.calls();
        assert!(calls.contains(&format!("install {}", path.display())));
        assert!(calls.contains(&format!("remove {}", path.display())));
    }

    #[test]
    fn system_file_fails_when_elevation_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("99-x.rules");
        let sudo = Arc::new(RecordingPrivileged::denying());
        let file =
            ManagedFile::system("device rule", path.clone(), sudo).with_content(b"rule\n".to_vec());
        assert!(file.apply().is_err());
        assert!(!path.exists());
    }
}
