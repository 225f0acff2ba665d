//! Command: print version information.

/// Version string embedded at build time, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("STOW_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the stow version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("stow {}", version());
}
