//! Helpers shared by resource implementations.
pub mod fs;
