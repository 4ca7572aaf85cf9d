//! Idempotent resource primitives (probe + apply + remove pattern).
pub mod config_seed;
pub mod descriptor;
pub mod directory;
pub mod group;
pub mod helpers;
pub mod managed_file;
pub mod packages;
pub mod reload;
pub mod service;

use anyhow::Result;

/// Presence of a managed resource on the host.
///
/// Always derived from a fresh probe; never cached between runs.
///
/// # Examples
///
/// ```
/// use turing_setup::resources::ResourceState;
///
/// assert_ne!(ResourceState::Absent, ResourceState::Present);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist on the host.
    Absent,
    /// Resource exists (file present, service registered, member of group).
    Present,
}

/// Result of applying or removing a resource.
///
/// # Examples
///
/// ```
/// use turing_setup::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::Unchanged;
/// let skipped = ResourceChange::Skipped { reason: "source missing".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// assert_ne!(noop, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created, updated, or deleted.
    Applied,
    /// Resource was already in the desired state (no change made).
    Unchanged,
    /// Resource was deliberately left alone.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// A host resource that can be probed, applied, and removed.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Probe the host for the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if presence cannot be determined.
    fn probe(&self) -> Result<ResourceState>;

    /// Bring the resource to its desired state. Must be safe to re-run.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied.
    fn apply(&self) -> Result<ResourceChange>;

    /// Remove the resource, undoing a previous `apply()`.
    ///
    /// Default implementation returns an error; override in resources
    /// that support removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be removed, or if removal is not supported
    /// for this resource type.
    fn remove(&self) -> Result<ResourceChange> {
        anyhow::bail!(
            "operation 'remove' is not supported for resource '{}'",
            self.description()
        )
    }
}
