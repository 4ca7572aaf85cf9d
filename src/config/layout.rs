//! Concrete host paths for one run.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::settings;
use crate::exec::Executor;

/// Resolved locations of the checkout and every managed destination.
///
/// Built once at start-up from the invocation directory and the environment;
/// tests build it explicitly over temporary directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Root of the checkout being installed (absolute).
    pub root: PathBuf,
    /// The invoking user's home directory.
    pub home: PathBuf,
    /// `$XDG_CONFIG_HOME` (default `~/.config`).
    pub config_home: PathBuf,
    /// `$XDG_DATA_HOME` (default `~/.local/share`).
    pub data_home: PathBuf,
    /// Prefix for system-wide paths; `/` outside of tests.
    pub system_root: PathBuf,
    /// Login name of the invoking user.
    pub user: String,
}

impl Layout {
    /// Build a layout with XDG defaults derived from `home`.
    #[must_use]
    pub fn new(root: PathBuf, home: PathBuf, user: impl Into<String>) -> Self {
        Self {
            config_home: home.join(".config"),
            data_home: home.join(".local").join("share"),
            root,
            home,
            system_root: PathBuf::from("/"),
            user: user.into(),
        }
    }

    /// Resolve the layout for the checkout at `root` from the environment.
    ///
    /// The user name comes from `USER` or `LOGNAME`, falling back to
    /// `id -un` when both are unset or empty. It is left empty if that fails
    /// too; the prerequisite check refuses such a run.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is unset or `root` cannot be canonicalised.
    pub fn detect(root: &Path, executor: &dyn Executor) -> Result<Self> {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .context("HOME environment variable is not set")?;
        let root = dunce::canonicalize(root)
            .with_context(|| format!("resolving {}", root.display()))?;
        let user = resolve_user(
            [std::env::var("USER").ok(), std::env::var("LOGNAME").ok()],
            executor,
        );

        let mut layout = Self::new(root, home, user);
        if let Some(dir) = xdg_dir("XDG_CONFIG_HOME") {
            layout.config_home = dir;
        }
        if let Some(dir) = xdg_dir("XDG_DATA_HOME") {
            layout.data_home = dir;
        }
        Ok(layout)
    }

    /// Redirect system-wide paths below `system_root`.
    #[must_use]
    pub fn with_system_root(mut self, system_root: PathBuf) -> Self {
        self.system_root = system_root;
        self
    }

    /// Isolated runtime environment directory.
    #[must_use]
    pub fn venv_dir(&self) -> PathBuf {
        self.root.join(settings::VENV_DIR)
    }

    /// Interpreter inside the isolated runtime environment.
    #[must_use]
    pub fn venv_python(&self) -> PathBuf {
        self.venv_dir().join("bin").join(settings::RUNTIME_PROGRAM)
    }

    /// Project dependency manifest.
    #[must_use]
    pub fn requirements(&self) -> PathBuf {
        self.root.join(settings::REQUIREMENTS_FILE)
    }

    /// Directory holding user service units.
    #[must_use]
    pub fn user_units_dir(&self) -> PathBuf {
        self.config_home.join("systemd").join("user")
    }

    /// Directory holding application-menu entries.
    #[must_use]
    pub fn applications_dir(&self) -> PathBuf {
        self.data_home.join("applications")
    }

    /// Root of the user's `hicolor` icon theme.
    #[must_use]
    pub fn icon_theme_dir(&self) -> PathBuf {
        self.data_home.join("icons").join("hicolor")
    }

    /// Per-user configuration directory of the tray application.
    #[must_use]
    pub fn tray_config_dir(&self) -> PathBuf {
        self.config_home.join("turing-screen")
    }

    /// Resolve a path below the system root (`"etc/udev/..."`).
    #[must_use]
    pub fn system_path(&self, relative: &str) -> PathBuf {
        self.system_root.join(relative)
    }
}

/// First non-blank candidate, else the name reported by `id -un`.
fn resolve_user(candidates: [Option<String>; 2], executor: &dyn Executor) -> String {
    let non_blank = |name: String| {
        let name = name.trim().to_string();
        (!name.is_empty()).then_some(name)
    };
    candidates
        .into_iter()
        .flatten()
        .find_map(non_blank)
        .or_else(|| {
            executor
                .run("id", &["-un"])
                .ok()
                .and_then(|r| non_blank(r.stdout))
        })
        .unwrap_or_default()
}

fn xdg_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
}
