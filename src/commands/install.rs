//! Install command implementation.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, PackageOpts};
use crate::engine::Verb;
use crate::logging::Logger;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any package fails.
pub fn run(global: &GlobalOpts, opts: &PackageOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = super::CommandRunner::new(global, log)?;
    runner.run(Verb::Install, &opts.packages)
}
