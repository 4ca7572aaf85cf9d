//! Turing Smart Screen host integration.
//!
//! Installs and removes everything the display needs on an openSUSE
//! desktop: the user service that drives the screen, the USB device rule,
//! menu and autostart entries, the icon, the system packages, an isolated
//! runtime environment, and the tray's configuration directory. Every step
//! is idempotent, and uninstall is its exact inverse.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** / **[`template`]**: fixed settings, resolved paths, placeholder rendering
//! - **[`resources`]**: `probe` / `apply` / `remove` primitives and the descriptor set
//! - **[`provisioner`]**, **[`environment`]**, **[`prereq`]**, **[`gate`]**: the engine
//! - **[`tasks`]**: named steps with the warning/fatal propagation policy
//! - **[`commands`]**: `install` / `uninstall` orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod exec;
pub mod gate;
pub mod logging;
pub mod prereq;
pub mod privilege;
pub mod prompt;
pub mod provisioner;
pub mod resources;
pub mod tasks;
pub mod template;
