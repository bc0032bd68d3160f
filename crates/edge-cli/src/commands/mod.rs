//! Command implementations.

mod explain;
mod resolve;

pub use explain::execute as explain_execute;
pub use resolve::execute as resolve_execute;

use edge_preset::{OptionsDiscovery, PresetContext, Resolution};
use tracing::debug;

use crate::cli::SelectionArgs;
use crate::error::{CliError, Result};

/// Discover options under `--root`, apply the flags, and run the resolver.
pub fn resolve_selection(selection: &SelectionArgs) -> Result<Resolution> {
    if !selection.root.is_dir() {
        return Err(CliError::RootNotFound(selection.root.clone()));
    }

    let mut discovery = OptionsDiscovery::new(&selection.root);
    if let Some(config) = &selection.config {
        discovery = discovery.with_config_file(config);
    }

    let options = discovery.load_with(&selection.overrides()?)?;
    debug!(?options, "loaded preset options");

    let ctx = PresetContext::new(&selection.root);
    Ok(edge_preset::resolve(&ctx, &options)?)
}
