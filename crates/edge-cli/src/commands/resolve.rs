//! `edge resolve`: print or write the compiler configuration.

use std::fs;

use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};
use crate::ui;

use super::resolve_selection;

/// Execute the resolve command.
///
/// # Arguments
///
/// * `args` - Selection flags plus output options
///
/// # Errors
///
/// Returns an error if the project directory is missing, options cannot be
/// loaded, the target is malformed, or the output file cannot be written.
pub fn execute(args: ResolveArgs) -> Result<()> {
    let resolution = resolve_selection(&args.selection)?;
    let config = resolution.config.to_json()?;

    let mut rendered = if args.pretty {
        serde_json::to_string_pretty(&config)?
    } else {
        serde_json::to_string(&config)?
    };
    rendered.push('\n');

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            ui::success(&format!(
                "Wrote {} passes to {}",
                resolution.config.pass_names().count(),
                path.display()
            ));
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
