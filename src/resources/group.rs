//! Supplementary group membership.
use anyhow::Result;
use std::sync::Arc;

use super::{Resource, ResourceChange, ResourceState};
use crate::exec::{Executor, shell_command};
use crate::privilege::PrivilegedExecutor;

/// Membership of a user in a supplementary group (account database).
///
/// Used as the fallback route to the display's serial port when the device
/// rule does not apply. Never removed on uninstall: the group is shared with
/// other serial devices.
#[derive(Debug)]
pub struct GroupMembership {
    /// Account to add.
    pub user: String,
    /// Supplementary group name.
    pub group: String,
    executor: Arc<dyn Executor>,
    privileged: Arc<dyn PrivilegedExecutor>,
}

impl GroupMembership {
    /// Membership of `user` in `group`; only the change itself is privileged.
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        group: impl Into<String>,
        executor: Arc<dyn Executor>,
        privileged: Arc<dyn PrivilegedExecutor>,
    ) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
            executor,
            privileged,
        }
    }

    /// Exact command to add the membership by hand.
    #[must_use]
    pub fn add_command(&self) -> Option<String> {
        shell_command("sudo", &["usermod", "-aG", &self.group, &self.user])
    }

    /// Whether the group is effective in the current login session.
    ///
    /// Differs from [`Resource::probe`] right after `usermod`: the account
    /// database is updated but running sessions keep their old groups.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` cannot be run.
    pub fn active_in_session(&self) -> Result<bool> {
        let result = self.executor.run("id", &["-nG"])?;
        Ok(contains_group(&result.stdout, &self.group))
    }
}

fn contains_group(id_output: &str, group: &str) -> bool {
    id_output.split_whitespace().any(|g| g == group)
}

impl Resource for GroupMembership {
    fn description(&self) -> String {
        format!("{} group membership", self.group)
    }

    fn probe(&self) -> Result<ResourceState> {
        let result = self.executor.run("id", &["-nG", &self.user])?;
        Ok(if contains_group(&result.stdout, &self.group) {
            ResourceState::Present
        } else {
            ResourceState::Absent
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.probe()? == ResourceState::Present {
            return Ok(ResourceChange::Unchanged);
        }
        self.privileged
            .run("usermod", &["-aG", &self.group, &self.user])?;
        Ok(ResourceChange::Applied)
    }
}
