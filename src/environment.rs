//! Isolated runtime environment for the display and tray processes.
//!
//! The environment is always rebuilt from scratch: any previous one is
//! deleted first, so the installed dependency set is exactly the declared one.
use std::path::PathBuf;

use crate::config::{Layout, settings};
use crate::error::SetupError;
use crate::exec::{Executor, shell_command};
use crate::prereq::GpuVendor;
use crate::resources::Resource as _;
use crate::resources::directory::DirectoryResource;

const RESOURCE: &str = "runtime environment";

/// Builds `<checkout>/venv` with the project's dependencies.
#[derive(Debug)]
pub struct EnvironmentBuilder<'a> {
    layout: &'a Layout,
    executor: &'a dyn Executor,
    runtime: PathBuf,
}

impl<'a> EnvironmentBuilder<'a> {
    /// `runtime` is the interpreter resolved by the prerequisite check.
    #[must_use]
    pub const fn new(layout: &'a Layout, executor: &'a dyn Executor, runtime: PathBuf) -> Self {
        Self {
            layout,
            executor,
            runtime,
        }
    }

    /// Recreate the environment and install dependencies.
    ///
    /// Returns the non-fatal problems encountered (missing manifest,
    /// optional packages that failed to install).
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::FatalMandatoryResource`] if the environment
    /// cannot be created, its tooling cannot be upgraded, or the declared
    /// manifest fails to install.
    pub fn build(&self, gpu: Option<GpuVendor>) -> Result<Vec<SetupError>, SetupError> {
        let venv = self.layout.venv_dir();
        let venv_str = venv.to_string_lossy().into_owned();
        let mut warnings = Vec::new();

        DirectoryResource::new(RESOURCE, venv.clone())
            .remove()
            .map_err(|e| {
                SetupError::mandatory(
                    RESOURCE,
                    format!("cannot remove previous environment: {e:#}"),
                    shell_command("rm", &["-rf", &venv_str]),
                )
            })?;

        let runtime = self.runtime.to_string_lossy().into_owned();
        tracing::info!("creating {venv_str}");
        self.step(&runtime, &["-m", "venv", &venv_str], true)?;

        let python = self.layout.venv_python();
        let python = python.to_string_lossy().into_owned();
        self.step(&python, &["-m", "pip", "install", "--upgrade", "pip"], true)?;

        let requirements = self.layout.requirements();
        if requirements.is_file() {
            let manifest = requirements.to_string_lossy().into_owned();
            tracing::info!("installing {}", settings::REQUIREMENTS_FILE);
            self.step(&python, &["-m", "pip", "install", "-r", &manifest], true)?;
        } else {
            warnings.push(SetupError::warning(
                RESOURCE,
                format!(
                    "{} not found; project dependencies not installed",
                    requirements.display()
                ),
                None,
            ));
        }

        tracing::info!("installing {}", settings::GUI_PACKAGE);
        let gui = ["-m", "pip", "install", settings::GUI_PACKAGE];
        if let Err(w) = self.step(&python, &gui, false) {
            warnings.push(w);
        }

        if gpu == Some(GpuVendor::Nvidia) {
            tracing::info!(
                "NVIDIA GPU detected, installing {}",
                settings::GPU_TELEMETRY_PACKAGE
            );
            if let Err(w) = self.step(
                &python,
                &["-m", "pip", "install", settings::GPU_TELEMETRY_PACKAGE],
                false,
            ) {
                warnings.push(w);
            }
        }

        Ok(warnings)
    }

    /// Run one build command from the checkout so relative manifest entries resolve.
    fn step(&self, program: &str, args: &[&str], mandatory: bool) -> Result<(), SetupError> {
        let root = &self.layout.root;
        self.executor.run_in(root, program, args).map(|_| ()).map_err(|e| {
            let remedy = shell_command(program, args);
            let message = format!("{e:#}");
            if mandatory {
                SetupError::mandatory(RESOURCE, message, remedy)
            } else {
                SetupError::warning(RESOURCE, message, remedy)
            }
        })
    }
}
