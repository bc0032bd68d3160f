//! Edge CLI - resolve build intent into a compiler configuration.
//!
//! Parses arguments, installs logging, and dispatches to the command
//! implementations.

use clap::Parser;
use edge_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(resolve_args),
        cli::Command::Explain(explain_args) => commands::explain_execute(explain_args),
    };

    result.map_err(error::cli_error_to_miette)
}
