//! The fixed set of managed host resources.
//!
//! Descriptors are declared once at build time and never discovered at run
//! time. Install walks [`DESCRIPTORS`] front to back; uninstall walks it in
//! reverse.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::reload::ReloadAction;
use crate::config::{Layout, settings};
use crate::template::{Substitutions, render};

/// Kind of managed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// User service definition for the display process.
    ServiceUnit,
    /// System-wide USB device-permission rule.
    DeviceRule,
    /// Per-user session autostart entry for the tray.
    AutostartEntry,
    /// Per-user application-menu entry.
    MenuEntry,
    /// Per-user scalable icon.
    Icon,
    /// Isolated runtime environment inside the checkout.
    RuntimeEnv,
    /// Per-user configuration directory of the tray.
    ConfigDir,
}

impl ResourceKind {
    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ServiceUnit => "service unit",
            Self::DeviceRule => "device rule",
            Self::AutostartEntry => "autostart entry",
            Self::MenuEntry => "menu entry",
            Self::Icon => "icon",
            Self::RuntimeEnv => "runtime environment",
            Self::ConfigDir => "configuration directory",
        }
    }
}

/// Where a resource's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Template relative to the checkout, rendered with [`Substitutions`].
    Template(&'static str),
    /// File relative to the checkout, copied verbatim.
    Copy(&'static str),
    /// Content compiled into the binary.
    Embedded(&'static str),
    /// Built by a dedicated step rather than written from content.
    Generated,
}

/// Base directory a destination is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Relative to `$XDG_CONFIG_HOME`.
    ConfigHome(&'static str),
    /// Relative to `$XDG_DATA_HOME`.
    DataHome(&'static str),
    /// Relative to the system root.
    System(&'static str),
    /// Relative to the checkout.
    Checkout(&'static str),
}

/// Static declaration of one managed host resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Which resource this is.
    pub kind: ResourceKind,
    /// Where the content comes from.
    pub source: Source,
    /// Where the resource lands.
    pub destination: Destination,
    /// Written and removed through the privileged executor.
    pub requires_privilege: bool,
    /// A mandatory resource that cannot be provisioned aborts the run.
    pub mandatory: bool,
    /// Cache refresh to run after a change.
    pub reload: Option<ReloadAction>,
}

const DEVICE_RULE: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::DeviceRule,
    source: Source::Embedded(settings::DEVICE_RULE),
    destination: Destination::System("etc/udev/rules.d/99-turing-smart-screen.rules"),
    requires_privilege: true,
    mandatory: true,
    reload: Some(ReloadAction::DeviceRules),
};

const RUNTIME_ENV: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::RuntimeEnv,
    source: Source::Generated,
    destination: Destination::Checkout(settings::VENV_DIR),
    requires_privilege: false,
    mandatory: true,
    reload: None,
};

const SERVICE_UNIT: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ServiceUnit,
    source: Source::Template(settings::SERVICE_TEMPLATE),
    destination: Destination::ConfigHome("systemd/user/turing-screen.service"),
    requires_privilege: false,
    mandatory: true,
    reload: Some(ReloadAction::ServiceManager),
};

const MENU_ENTRY: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::MenuEntry,
    source: Source::Template(settings::DESKTOP_TEMPLATE),
    destination: Destination::DataHome("applications/turing-smart-screen.desktop"),
    requires_privilege: false,
    mandatory: false,
    reload: Some(ReloadAction::DesktopDatabase),
};

const AUTOSTART_ENTRY: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::AutostartEntry,
    source: Source::Template(settings::DESKTOP_TEMPLATE),
    destination: Destination::ConfigHome("autostart/turing-smart-screen-tray.desktop"),
    requires_privilege: false,
    mandatory: false,
    reload: None,
};

const ICON: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Icon,
    source: Source::Copy(settings::ICON_SOURCE),
    destination: Destination::DataHome("icons/hicolor/scalable/apps/turing-smart-screen.svg"),
    requires_privilege: false,
    mandatory: false,
    reload: Some(ReloadAction::IconCache),
};

const CONFIG_DIR: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ConfigDir,
    source: Source::Generated,
    destination: Destination::ConfigHome("turing-screen"),
    requires_privilege: false,
    mandatory: false,
    reload: None,
};

/// Every managed resource, in install order.
pub static DESCRIPTORS: [&ResourceDescriptor; 7] = [
    &DEVICE_RULE,
    &RUNTIME_ENV,
    &SERVICE_UNIT,
    &MENU_ENTRY,
    &AUTOSTART_ENTRY,
    &ICON,
    &CONFIG_DIR,
];

/// Look up the descriptor for `kind`.
#[must_use]
pub const fn descriptor(kind: ResourceKind) -> &'static ResourceDescriptor {
    match kind {
        ResourceKind::DeviceRule => &DEVICE_RULE,
        ResourceKind::RuntimeEnv => &RUNTIME_ENV,
        ResourceKind::ServiceUnit => &SERVICE_UNIT,
        ResourceKind::MenuEntry => &MENU_ENTRY,
        ResourceKind::AutostartEntry => &AUTOSTART_ENTRY,
        ResourceKind::Icon => &ICON,
        ResourceKind::ConfigDir => &CONFIG_DIR,
    }
}

/// A descriptor with its content rendered for this run.
#[derive(Debug, Clone)]
pub struct RenderedResource {
    /// Absolute path the content is written to.
    pub destination: PathBuf,
    /// Bytes to write, placeholders already substituted.
    pub content: Vec<u8>,
}

impl ResourceDescriptor {
    /// Human-readable name of the resource.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Absolute destination path for this run.
    #[must_use]
    pub fn destination_path(&self, layout: &Layout) -> PathBuf {
        match self.destination {
            Destination::ConfigHome(rel) => layout.config_home.join(rel),
            Destination::DataHome(rel) => layout.data_home.join(rel),
            Destination::System(rel) => layout.system_path(rel),
            Destination::Checkout(rel) => layout.root.join(rel),
        }
    }

    /// Produce the content to write. Nothing is written here.
    ///
    /// # Errors
    ///
    /// Returns an error if the source file is missing or unreadable, if a
    /// template fails to render (the [`TemplateError`](crate::error::TemplateError)
    /// stays in the error chain), or if the descriptor is generated.
    pub fn render(
        &self,
        layout: &Layout,
        substitutions: &Substitutions,
    ) -> Result<RenderedResource> {
        let content = match self.source {
            Source::Template(rel) => {
                let path = layout.root.join(rel);
                let template = std::fs::read_to_string(&path)
                    .with_context(|| format!("template not found: {}", path.display()))?;
                render(&template, substitutions)
                    .with_context(|| format!("rendering {}", path.display()))?
                    .into_bytes()
            }
            Source::Copy(rel) => {
                let path = layout.root.join(rel);
                std::fs::read(&path)
                    .with_context(|| format!("source not found: {}", path.display()))?
            }
            Source::Embedded(text) => text.as_bytes().to_vec(),
            Source::Generated => {
                anyhow::bail!("{} has no file content", self.label())
            }
        };
        Ok(RenderedResource {
            destination: self.destination_path(layout),
            content,
        })
    }
}
