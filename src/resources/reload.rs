//! Subsystem notifications issued after a managed resource changes.
use anyhow::{Result, bail};

use crate::config::Layout;
use crate::exec::{Executor, shell_command};
use crate::privilege::PrivilegedExecutor;

/// A subsystem that must be told a managed resource changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadAction {
    /// The user service manager's unit index.
    ServiceManager,
    /// The device-rule manager (privileged).
    DeviceRules,
    /// The user's `hicolor` icon cache.
    IconCache,
    /// The desktop-entry database.
    DesktopDatabase,
}

impl ReloadAction {
    /// Short name used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ServiceManager => "service manager reload",
            Self::DeviceRules => "device rule reload",
            Self::IconCache => "icon cache refresh",
            Self::DesktopDatabase => "desktop database refresh",
        }
    }

    /// Whether the commands run through the privileged executor.
    #[must_use]
    pub const fn requires_privilege(self) -> bool {
        matches!(self, Self::DeviceRules)
    }

    /// Commands issued for this reload, in order.
    #[must_use]
    pub fn commands(self, layout: &Layout) -> Vec<(&'static str, Vec<String>)> {
        let owned = |args: &[&str]| args.iter().map(ToString::to_string).collect::<Vec<_>>();
        match self {
            Self::ServiceManager => vec![("systemctl", owned(&["--user", "daemon-reload"]))],
            Self::DeviceRules => vec![
                ("udevadm", owned(&["control", "--reload-rules"])),
                ("udevadm", owned(&["trigger", "--subsystem-match=tty"])),
            ],
            Self::IconCache => vec![(
                "gtk-update-icon-cache",
                vec![
                    "-f".to_string(),
                    "-t".to_string(),
                    layout.icon_theme_dir().to_string_lossy().into_owned(),
                ],
            )],
            Self::DesktopDatabase => vec![(
                "update-desktop-database",
                vec![layout.applications_dir().to_string_lossy().into_owned()],
            )],
        }
    }

    /// The exact command line an operator can run to repeat this reload.
    #[must_use]
    pub fn remedy(self, layout: &Layout) -> Option<String> {
        let lines = self
            .commands(layout)
            .iter()
            .map(|(program, args)| {
                let mut words: Vec<&str> = Vec::with_capacity(args.len() + 2);
                if self.requires_privilege() {
                    words.push("sudo");
                }
                words.push(program);
                words.extend(args.iter().map(String::as_str));
                let (first, rest) = words.split_first()?;
                shell_command(first, rest)
            })
            .collect::<Option<Vec<_>>>()?;
        Some(lines.join(" && "))
    }

    /// Issue the reload.
    ///
    /// # Errors
    ///
    /// Returns an error if a required tool is missing or a command fails.
    pub fn run(
        self,
        layout: &Layout,
        executor: &dyn Executor,
        privileged: &dyn PrivilegedExecutor,
    ) -> Result<()> {
        for (program, args) in self.commands(layout) {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            if self.requires_privilege() {
                privileged.run(program, &args)?;
            } else {
                if !executor.which(program) {
                    bail!("{program} is not installed");
                }
                executor.run(program, &args)?;
            }
        }
        Ok(())
    }
}
