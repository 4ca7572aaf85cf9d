//! Fixed installation settings and per-run path layout.
//!
//! There is no configuration file: the managed resource set is fixed at
//! build time. [`settings`] holds the constants; [`Layout`] resolves them
//! into concrete paths once per run.
pub mod layout;
pub mod settings;

pub use layout::Layout;
