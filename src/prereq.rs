//! Host readiness checks run before any mutation.
//!
//! Install checks, in order: checkout anchors, non-root identity, runtime
//! version, free space. The first two also gate uninstall. Only the free
//! space check is soft; everything else is a [`SetupError::FatalPrerequisite`].
use std::path::PathBuf;

use crate::config::{Layout, settings};
use crate::error::SetupError;
use crate::exec::Executor;

/// GPU vendor reported by the PCI bus scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuVendor {
    /// Gets the NVML telemetry package.
    Nvidia,
    /// AMD or ATI.
    Amd,
    /// Intel integrated graphics.
    Intel,
    /// Any other display controller.
    Other,
}

impl GpuVendor {
    /// Classify one `lspci` line, if it describes a display controller.
    #[must_use]
    pub fn from_lspci_line(line: &str) -> Option<Self> {
        let lower = line.to_lowercase();
        if !["vga", "3d", "display"].iter().any(|k| lower.contains(k)) {
            return None;
        }
        Some(if lower.contains("nvidia") {
            Self::Nvidia
        } else if lower.contains("amd") || lower.contains("radeon") || lower.contains("ati ") {
            Self::Amd
        } else if lower.contains("intel") {
            Self::Intel
        } else {
            Self::Other
        })
    }
}

/// Pick the GPU from `lspci` output, preferring a discrete NVIDIA card.
#[must_use]
pub fn parse_gpu(lspci: &str) -> Option<GpuVendor> {
    let vendors: Vec<_> = lspci.lines().filter_map(GpuVendor::from_lspci_line).collect();
    if vendors.contains(&GpuVendor::Nvidia) {
        Some(GpuVendor::Nvidia)
    } else {
        vendors.first().copied()
    }
}

/// Extract `(major, minor)` from `Python 3.11.9`.
#[must_use]
pub fn parse_runtime_version(output: &str) -> Option<(u32, u32)> {
    let version = output.split_whitespace().nth(1)?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

/// Available bytes from POSIX `df -Pk <path>` output.
#[must_use]
pub fn parse_df_available(output: &str) -> Option<u64> {
    let line = output.lines().nth(1)?;
    let kib: u64 = line.split_whitespace().nth(3)?.parse().ok()?;
    kib.checked_mul(1024)
}

/// Outcome of a successful install check.
#[derive(Debug)]
pub struct Readiness {
    /// Resolved runtime interpreter.
    pub runtime: PathBuf,
    /// `(major, minor)` reported by the runtime.
    pub runtime_version: (u32, u32),
    /// Detected GPU, if any; selects optional telemetry packages.
    pub gpu: Option<GpuVendor>,
    /// Soft findings (low disk space).
    pub warnings: Vec<SetupError>,
}

/// Validates the host before anything is written.
#[derive(Debug)]
pub struct PrerequisiteChecker<'a> {
    layout: &'a Layout,
    executor: &'a dyn Executor,
    min_free_bytes: u64,
}

impl<'a> PrerequisiteChecker<'a> {
    /// Checker with the default free-space threshold.
    #[must_use]
    pub const fn new(layout: &'a Layout, executor: &'a dyn Executor) -> Self {
        Self {
            layout,
            executor,
            min_free_bytes: settings::MIN_FREE_BYTES,
        }
    }

    /// Override the free-space floor.
    #[must_use]
    pub const fn with_min_free_bytes(mut self, bytes: u64) -> Self {
        self.min_free_bytes = bytes;
        self
    }

    /// Full install check.
    ///
    /// # Errors
    ///
    /// Returns the first failed hard check.
    pub fn check_install(&self) -> Result<Readiness, SetupError> {
        self.check_checkout()?;
        self.check_identity()?;
        let (runtime, runtime_version) = self.check_runtime()?;
        let warnings = self.check_free_space().into_iter().collect();
        Ok(Readiness {
            runtime,
            runtime_version,
            gpu: self.detect_gpu(),
            warnings,
        })
    }

    /// Checks that also gate uninstall.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn check_uninstall(&self) -> Result<(), SetupError> {
        self.check_checkout()?;
        self.check_identity()
    }

    fn check_checkout(&self) -> Result<(), SetupError> {
        let root = &self.layout.root;
        let file = root.join(settings::ANCHOR_FILE);
        let dir = root.join(settings::ANCHOR_DIR);
        if file.is_file() && dir.is_dir() {
            return Ok(());
        }
        Err(SetupError::prerequisite(
            "checkout",
            format!(
                "{} is not a turing-smart-screen-python checkout ({} and {}/ not found)",
                root.display(),
                settings::ANCHOR_FILE,
                settings::ANCHOR_DIR
            ),
            "run turing-setup from the root of the turing-smart-screen-python directory",
        ))
    }

    fn check_identity(&self) -> Result<(), SetupError> {
        let uid = self
            .executor
            .run("id", &["-u"])
            .map_err(|e| {
                SetupError::prerequisite(
                    "identity",
                    format!("cannot determine user: {e:#}"),
                    "check that coreutils is installed",
                )
            })?
            .stdout;
        if uid.trim() == "0" {
            return Err(SetupError::prerequisite(
                "identity",
                "running as root",
                "run as your normal user; administrator rights are requested when needed",
            ));
        }
        if self.layout.user.is_empty() {
            return Err(SetupError::prerequisite(
                "identity",
                "cannot determine the invoking user name (USER, LOGNAME and `id -un` gave nothing)",
                "export USER=\"$(id -un)\" and run turing-setup again",
            ));
        }
        Ok(())
    }

    fn check_runtime(&self) -> Result<(PathBuf, (u32, u32)), SetupError> {
        let program = settings::RUNTIME_PROGRAM;
        let missing = |message: String| {
            SetupError::prerequisite("runtime", message, settings::RUNTIME_INSTALL_HINT)
        };
        let path = self
            .executor
            .locate(program)
            .ok_or_else(|| missing(format!("{program} not found on PATH")))?;
        let path_str = path.to_string_lossy();
        let output = self
            .executor
            .run(&path_str, &["--version"])
            .map_err(|e| missing(format!("{program} --version failed: {e:#}")))?;
        // Older interpreters print the version on stderr.
        let text = if output.stdout.trim().is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        let version = parse_runtime_version(text)
            .ok_or_else(|| missing(format!("unrecognised version output: {}", text.trim())))?;
        if version != settings::RUNTIME_VERSION {
            let (major, minor) = settings::RUNTIME_VERSION;
            return Err(missing(format!(
                "{program} reports {}.{}, expected {major}.{minor}",
                version.0, version.1
            )));
        }
        tracing::debug!("runtime: {} ({}.{})", path.display(), version.0, version.1);
        Ok((path, version))
    }

    fn check_free_space(&self) -> Option<SetupError> {
        let root = self.layout.root.to_string_lossy();
        let available = self
            .executor
            .run("df", &["-Pk", &root])
            .ok()
            .and_then(|r| parse_df_available(&r.stdout));
        let Some(available) = available else {
            tracing::debug!("free space at {root} could not be determined");
            return None;
        };
        (available < self.min_free_bytes).then(|| {
            SetupError::warning(
                "disk space",
                format!(
                    "only {} MB free at {root}; at least {} MB recommended",
                    available / (1024 * 1024),
                    self.min_free_bytes / (1024 * 1024)
                ),
                None,
            )
        })
    }

    fn detect_gpu(&self) -> Option<GpuVendor> {
        if !self.executor.which("lspci") {
            return None;
        }
        let output = self.executor.run_unchecked("lspci", &[]).ok()?;
        let gpu = parse_gpu(&output.stdout);
        tracing::debug!("gpu: {gpu:?}");
        gpu
    }
}
