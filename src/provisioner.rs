//! Applies and retracts descriptors against the host.
//!
//! Install: elevate if needed, render, write authoritatively, reload, then
//! register the service. Uninstall: probe, stop and disable the service,
//! delete, reload. Reload and registration problems never abort; a failed
//! write or removal aborts only for mandatory resources.
use std::sync::Arc;

use crate::config::{Layout, settings};
use crate::error::{SetupError, TemplateError};
use crate::exec::{Executor, shell_command};
use crate::privilege::PrivilegedExecutor;
use crate::resources::config_seed::ConfigSeed;
use crate::resources::descriptor::{ResourceDescriptor, ResourceKind};
use crate::resources::directory::DirectoryResource;
use crate::resources::managed_file::ManagedFile;
use crate::resources::service::UserService;
use crate::resources::{Resource, ResourceChange, ResourceState};
use crate::template::Substitutions;

/// Result of provisioning one descriptor.
#[derive(Debug)]
pub struct Provisioned {
    /// What the primitive did.
    pub change: ResourceChange,
    /// Non-fatal problems (reloads, service registration).
    pub warnings: Vec<SetupError>,
}

impl Provisioned {
    const fn new(change: ResourceChange) -> Self {
        Self {
            change,
            warnings: Vec::new(),
        }
    }
}

/// Drives descriptors through the resource primitives.
#[derive(Debug)]
pub struct Provisioner<'a> {
    layout: &'a Layout,
    executor: &'a Arc<dyn Executor>,
    privileged: &'a Arc<dyn PrivilegedExecutor>,
}

impl<'a> Provisioner<'a> {
    /// Provisioner over `layout`; privileged writes go through `privileged`.
    #[must_use]
    pub const fn new(
        layout: &'a Layout,
        executor: &'a Arc<dyn Executor>,
        privileged: &'a Arc<dyn PrivilegedExecutor>,
    ) -> Self {
        Self {
            layout,
            executor,
            privileged,
        }
    }

    /// Bring `descriptor` to its installed state.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`SetupError`] for a mandatory resource that cannot be
    /// written (or any template that fails to render), and a
    /// [`SetupError::RecoverableResourceWarning`] for an optional one.
    pub fn install(
        &self,
        descriptor: &'static ResourceDescriptor,
        substitutions: &Substitutions,
    ) -> Result<Provisioned, SetupError> {
        match descriptor.kind {
            ResourceKind::RuntimeEnv => {
                return Ok(Provisioned::new(ResourceChange::Skipped {
                    reason: "built by the environment step".to_string(),
                }));
            }
            ResourceKind::ConfigDir => {
                let change = ConfigSeed::new(descriptor.destination_path(self.layout))
                    .apply()
                    .map_err(|e| failure(descriptor, format!("{e:#}"), None))?;
                return Ok(Provisioned::new(change));
            }
            _ => {}
        }

        if descriptor.requires_privilege {
            self.elevate(descriptor)?;
        }

        let rendered = descriptor
            .render(self.layout, substitutions)
            .map_err(|e| {
                let message = format!("{e:#}");
                if e.chain().any(|c| c.is::<TemplateError>()) {
                    SetupError::mandatory(descriptor.label(), message, None)
                } else {
                    failure(descriptor, message, None)
                }
            })?;

        let change = self
            .file(descriptor)
            .with_content(rendered.content)
            .apply()
            .map_err(|e| failure(descriptor, format!("{e:#}"), None))?;
        tracing::debug!("wrote {}", rendered.destination.display());

        let mut provisioned = Provisioned::new(change);
        self.reload(descriptor, &mut provisioned.warnings);

        if descriptor.kind == ResourceKind::ServiceUnit {
            let service = self.service();
            if let Err(e) = service.enable() {
                provisioned.warnings.push(SetupError::warning(
                    "service registration",
                    format!("{e:#}"),
                    service.enable_command(),
                ));
            }
        }
        Ok(provisioned)
    }

    /// Retract `descriptor`. Absent resources are a no-op success.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`SetupError`] when a mandatory resource cannot be
    /// removed, and a [`SetupError::RecoverableResourceWarning`] otherwise.
    pub fn uninstall(
        &self,
        descriptor: &'static ResourceDescriptor,
    ) -> Result<Provisioned, SetupError> {
        let path = descriptor.destination_path(self.layout);
        let path_arg = path.to_string_lossy();
        let remove_tree = |resource: &dyn Resource| {
            resource.remove().map(Provisioned::new).map_err(|e| {
                failure(
                    descriptor,
                    format!("{e:#}"),
                    shell_command("rm", &["-rf", &path_arg]),
                )
            })
        };
        match descriptor.kind {
            ResourceKind::RuntimeEnv => {
                return remove_tree(&DirectoryResource::new(descriptor.label(), path.clone()));
            }
            ResourceKind::ConfigDir => return remove_tree(&ConfigSeed::new(path.clone())),
            _ => {}
        }

        let file = self.file(descriptor);
        let service = (descriptor.kind == ResourceKind::ServiceUnit).then(|| self.service());
        let file_present = file
            .probe()
            .map_err(|e| failure(descriptor, format!("{e:#}"), None))?
            == ResourceState::Present;
        let registered = service.as_ref().is_some_and(UserService::is_registered);
        if !file_present && !registered {
            return Ok(Provisioned::new(ResourceChange::Unchanged));
        }

        if descriptor.requires_privilege {
            self.elevate(descriptor)?;
        }

        let mut provisioned = Provisioned::new(ResourceChange::Applied);
        if let Some(service) = &service {
            for (verb, result) in [("stop", service.stop()), ("disable", service.disable())] {
                if let Err(e) = result {
                    provisioned.warnings.push(SetupError::warning(
                        "service registration",
                        format!("{e:#}"),
                        shell_command("systemctl", &["--user", verb, &service.unit]),
                    ));
                }
            }
        }

        let remedy = if descriptor.requires_privilege {
            shell_command("sudo", &["rm", "-f", &path_arg])
        } else {
            shell_command("rm", &["-f", &path_arg])
        };
        file.remove()
            .map_err(|e| failure(descriptor, format!("{e:#}"), remedy))?;
        tracing::debug!("removed {}", path.display());

        self.reload(descriptor, &mut provisioned.warnings);
        Ok(provisioned)
    }

    fn file(&self, descriptor: &ResourceDescriptor) -> ManagedFile {
        let path = descriptor.destination_path(self.layout);
        if descriptor.requires_privilege {
            ManagedFile::system(descriptor.label(), path, Arc::clone(self.privileged))
        } else {
            ManagedFile::user(descriptor.label(), path)
        }
    }

    fn service(&self) -> UserService {
        UserService::new(settings::SERVICE_UNIT, Arc::clone(self.executor))
    }

    fn elevate(&self, descriptor: &ResourceDescriptor) -> Result<(), SetupError> {
        self.privileged.acquire().map_err(|e| {
            failure(
                descriptor,
                format!("administrator privileges unavailable: {e:#}"),
                Some("run `sudo -v` to check your sudo access, then run turing-setup again".to_string()),
            )
        })
    }

    fn reload(&self, descriptor: &ResourceDescriptor, warnings: &mut Vec<SetupError>) {
        let Some(action) = descriptor.reload else {
            return;
        };
        if let Err(e) = action.run(self.layout, &**self.executor, &**self.privileged) {
            warnings.push(SetupError::warning(
                action.label(),
                format!("{e:#}"),
                action.remedy(self.layout),
            ));
        }
    }
}

/// Classify a failure by the descriptor's mandatory flag.
fn failure(descriptor: &ResourceDescriptor, message: String, remedy: Option<String>) -> SetupError {
    if descriptor.mandatory {
        SetupError::mandatory(descriptor.label(), message, remedy)
    } else {
        SetupError::warning(descriptor.label(), message, remedy)
    }
}
