//! Logging setup for the Edge CLI.
//!
//! Logs go to stderr so `edge resolve` output can be piped.
//!
//! Verbosity is picked in this order:
//! 1. `--verbose`: debug for the edge crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for the edge crates

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "edge_preset=debug,edge_cli=debug";
const QUIET_FILTER: &str = "edge_preset=error,edge_cli=error";
const DEFAULT_FILTER: &str = "edge_preset=info,edge_cli=info";

/// Build the filter for the given flags.
///
/// # Arguments
///
/// * `verbose` - Debug level for the edge crates (overrides `quiet`)
/// * `quiet` - Errors only
///
/// Without either flag `RUST_LOG` is honoured, falling back to info.
///
/// # Examples
///
/// ```rust
/// use edge_cli::logger::filter_for;
///
/// let filter = filter_for(true, false);
/// assert!(filter.to_string().contains("edge_preset=debug"));
/// ```
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber. Call once, before any logging.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging (overrides `quiet`)
/// * `quiet` - Only show error-level logs
/// * `no_color` - Disable ANSI colors in log lines
///
/// # Examples
///
/// ```rust,no_run
/// use edge_cli::logger::init_logger;
///
/// // Default logging (INFO level)
/// init_logger(false, false, false);
/// ```
///
/// ```rust,no_run
/// use edge_cli::logger::init_logger;
///
/// // Quiet mode without colors, for CI
/// init_logger(false, true, true);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_quiet() {
        let filter = filter_for(true, true).to_string();
        assert!(filter.contains("edge_preset=debug"), "{filter}");
    }

    #[test]
    fn quiet_filter_only_shows_errors() {
        let filter = filter_for(false, true).to_string();
        assert!(filter.contains("edge_cli=error"), "{filter}");
    }
}
