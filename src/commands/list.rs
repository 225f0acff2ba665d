//! Command: list available packages.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::engine;
use crate::logging::Logger;

/// Print every available package name to stdout, one per line.
///
/// # Errors
///
/// Returns an error if configuration loading fails or the container cannot be read.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let config = super::load_config(global, log)?;
    for name in engine::list_available_packages(&config, log)? {
        println!("{name}");
    }
    Ok(())
}
