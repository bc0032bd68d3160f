//! Error handling for the Edge CLI.
//!
//! Commands return [`CliError`]; `main` turns it into a [`miette::Report`]
//! so the user gets a rendered diagnostic with a hint where one is known.

use std::path::PathBuf;

use edge_preset::PresetError;
use miette::Report;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Errors from option discovery or resolution
    #[error(transparent)]
    Preset(#[from] PresetError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Project directory does not exist
    #[error("Project directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Failed to write the configuration
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Preset(PresetError::InvalidTarget { target, reason }) => miette::miette!(
            "Invalid target {}: {}\n\nHint: Use a target name such as node, browser or library, \
             or an object of engine versions like {{\"chrome\": 60}}",
            target,
            reason
        ),
        CliError::Preset(PresetError::Config(message)) => miette::miette!(
            "Configuration error: {}\n\nHint: Check edge.toml, the \"edge\" field of package.json \
             and EDGE_* variables",
            message
        ),
        CliError::Preset(PresetError::Browserslist(message)) => miette::miette!(
            "Browserslist error: {}\n\nHint: Check .browserslistrc or the \"browserslist\" field \
             of package.json",
            message
        ),
        CliError::RootNotFound(path) => miette::miette!(
            "Project directory not found: {}\n\nHint: Pass an existing directory to --root",
            path.display()
        ),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_target_report_carries_a_hint() {
        let err = CliError::from(PresetError::InvalidTarget {
            target: "netscape".to_string(),
            reason: "not a supported target environment".to_string(),
        });
        let report = cli_error_to_miette(err);
        let rendered = format!("{report}");
        assert!(rendered.contains("netscape"));
        assert!(rendered.contains("Hint:"));
    }

    #[test]
    fn preset_errors_display_transparently() {
        let err = CliError::from(PresetError::Config("bad key".to_string()));
        assert_eq!(err.to_string(), PresetError::Config("bad key".to_string()).to_string());
    }
}
