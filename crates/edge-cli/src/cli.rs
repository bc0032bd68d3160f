//! Command-line interface definition.
//!
//! - `edge resolve` - Print the compiler configuration as JSON
//! - `edge explain` - Print a readable summary of every resolved setting

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use edge_preset::PresetOptions;
use serde_json::{Map, Value};

use crate::error::{CliError, Result};

/// Edge - build intent in, transform pipeline out
#[derive(Parser, Debug)]
#[command(
    name = "edge",
    version,
    about = "Resolve build intent into a JavaScript transform pipeline",
    long_about = "Edge turns a target (node, browser, library, ...) and a build environment\n\
                  into the ordered list of presets and plugins a JavaScript compiler should run."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved compiler configuration
    ///
    /// Options are read from edge.toml, the "edge" field of package.json and
    /// EDGE_* variables; flags given here override them.
    Resolve(ResolveArgs),

    /// Explain how each setting was resolved
    Explain(ExplainArgs),
}

/// Flags selecting what to build, shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Project directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Options file to use instead of <root>/edge.toml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target name (node, node8, test, browser, library, es2015, modern, ...)
    /// or a JSON object of engine constraints
    #[arg(short, long)]
    pub target: Option<String>,

    /// Build environment; "auto" reads BABEL_ENV and NODE_ENV
    #[arg(short, long)]
    pub env: Option<String>,

    /// Module format (auto, commonjs, amd, umd, systemjs, esm, false)
    #[arg(long)]
    pub modules: Option<String>,

    /// Dynamic import strategy (auto, rollup-nodejs, rollup-webpack, webpack, off)
    #[arg(long)]
    pub imports: Option<String>,

    /// Add a minify preset
    #[arg(long)]
    pub compression: bool,

    /// Keep comments in the output
    #[arg(long)]
    pub comments: bool,

    /// Disable source maps
    #[arg(long)]
    pub no_source_maps: bool,

    /// Log every resolver decision at info level
    #[arg(long)]
    pub debug: bool,
}

impl SelectionArgs {
    /// Options set on the command line, to be layered over discovered ones.
    pub fn overrides(&self) -> Result<PresetOptions> {
        let mut map = Map::new();

        if let Some(target) = &self.target {
            map.insert("target".into(), parse_target(target)?);
        }
        if let Some(env) = &self.env {
            map.insert("env".into(), Value::String(env.clone()));
        }
        if let Some(modules) = &self.modules {
            map.insert("modules".into(), parse_mode(modules));
        }
        if let Some(imports) = &self.imports {
            map.insert("imports".into(), parse_mode(imports));
        }
        if self.compression {
            map.insert("compression".into(), Value::Bool(true));
        }
        if self.comments {
            map.insert("comments".into(), Value::Bool(true));
        }
        if self.no_source_maps {
            map.insert("sourceMaps".into(), Value::Bool(false));
        }
        if self.debug {
            map.insert("debug".into(), Value::Bool(true));
        }

        PresetOptions::from_value(Value::Object(map))
            .map_err(|e| CliError::InvalidArgument(e.to_string()))
    }
}

fn parse_target(raw: &str) -> Result<Value> {
    if raw.trim_start().starts_with('{') {
        return serde_json::from_str(raw)
            .map_err(|e| CliError::InvalidArgument(format!("--target: {e}")));
    }
    Ok(Value::String(raw.to_string()))
}

fn parse_mode(raw: &str) -> Value {
    match raw {
        "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    /// Write the configuration to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use edge_preset::{ImportsMode, ModuleFormat, Target};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve_flags() {
        let cli = Cli::parse_from([
            "edge",
            "resolve",
            "--target",
            "browser",
            "--modules",
            "false",
            "--compression",
            "--pretty",
        ]);
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert!(args.pretty);

        let overrides = args.selection.overrides().unwrap();
        assert_eq!(overrides.target, Some(Target::named("browser")));
        assert_eq!(overrides.modules, Some(ModuleFormat::Preserve));
        assert_eq!(overrides.compression, Some(true));
        assert_eq!(overrides.source_maps, None);
    }

    #[test]
    fn object_targets_are_json() {
        let args = SelectionArgs {
            target: Some(r#"{"browsers": "ie 11"}"#.to_string()),
            imports: Some("webpack".to_string()),
            ..Default::default()
        };
        let overrides = args.overrides().unwrap();
        assert!(matches!(overrides.target, Some(Target::Custom(_))));
        assert_eq!(overrides.imports, Some(ImportsMode::Webpack));
    }

    #[test]
    fn bad_values_are_invalid_arguments() {
        let args = SelectionArgs {
            modules: Some("es6-please".to_string()),
            ..Default::default()
        };
        assert!(matches!(args.overrides(), Err(CliError::InvalidArgument(_))));

        let args = SelectionArgs {
            target: Some("{not json".to_string()),
            ..Default::default()
        };
        assert!(matches!(args.overrides(), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["edge", "-v", "-q", "explain"]);
        assert!(result.is_err());
    }
}
