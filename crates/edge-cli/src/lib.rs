//! Edge CLI - command-line front end for `edge-preset`.
//!
//! - [`cli`] - Argument definitions
//! - [`commands`] - `resolve` and `explain`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - Tracing subscriber setup
//! - [`ui`] - Colored status messages

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
