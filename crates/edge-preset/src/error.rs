//! Error types for option loading and collaborator failures.
//!
//! The resolver itself never rejects an input; every variant here comes from
//! option discovery or from one of the collaborators it consults.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PresetError>;

#[derive(Debug, Error)]
pub enum PresetError {
    /// Options could not be parsed or layered
    #[error("invalid preset options: {0}")]
    Config(String),

    /// The env preset could not normalize the target constraints
    #[error("invalid target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// A browserslist query or config file could not be used
    #[error("browserslist error: {0}")]
    Browserslist(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PresetError {
    pub(crate) fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }
}
