//! Command: print version information.

/// Version string stamped by the build script.
#[must_use]
pub fn version() -> &'static str {
    option_env!("TURING_SETUP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the turing-setup version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("turing-setup {}", version());
}
