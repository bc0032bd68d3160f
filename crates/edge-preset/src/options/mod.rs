//! Caller-facing option records.
//!
//! [`PresetOptions`] is the sparse record callers hand in; every field is
//! optional. [`PresetSettings`] is the same record with the defaults filled in,
//! still carrying `auto` values that the resolver settles later.

mod helpers;
mod types;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use types::{ImportsMode, ModuleFormat, RewriteAsync, Target};

use helpers::{
    default_jsx_pragma, default_optimize_modules, nullable_rewrite_async, nullable_source_folder,
    DEFAULT_SOURCE_FOLDER,
};

/// Environment name that triggers ambient lookup.
pub const AUTO_ENV: &str = "auto";

/// Partial preset options.
///
/// Keys are camelCase in JSON and TOML; the snake_case aliases exist so
/// `EDGE_*` environment variables map onto the same fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PresetOptions {
    /// Log every decision at info level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,

    /// Build mode; `"auto"` reads `BABEL_ENV`/`NODE_ENV`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<ModuleFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<ImportsMode>,

    #[serde(default, alias = "use_built_ins", skip_serializing_if = "Option::is_none")]
    pub use_built_ins: Option<bool>,

    #[serde(default, alias = "jsx_pragma", skip_serializing_if = "Option::is_none")]
    pub jsx_pragma: Option<String>,

    /// `null` switches the rewrite off, like `false`
    #[serde(
        default,
        alias = "rewrite_async",
        deserialize_with = "nullable_rewrite_async",
        skip_serializing_if = "Option::is_none"
    )]
    pub rewrite_async: Option<RewriteAsync>,

    #[serde(default, alias = "loose_mode", skip_serializing_if = "Option::is_none")]
    pub loose_mode: Option<bool>,

    #[serde(default, alias = "spec_mode", skip_serializing_if = "Option::is_none")]
    pub spec_mode: Option<bool>,

    /// Packages whose path imports get cherry-picked
    #[serde(default, alias = "optimize_modules", skip_serializing_if = "Option::is_none")]
    pub optimize_modules: Option<Vec<String>>,

    /// Folder aliased as `~`; `Some(None)` switches the alias off
    #[serde(
        default,
        alias = "source_folder",
        deserialize_with = "nullable_source_folder",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_folder: Option<Option<PathBuf>>,

    #[serde(default, alias = "source_maps", skip_serializing_if = "Option::is_none")]
    pub source_maps: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minified: Option<bool>,
}

impl PresetOptions {
    /// Create from a JSON value (e.g. the `edge` field of a `package.json`)
    ///
    /// # Example
    ///
    /// ```
    /// use edge_preset::{PresetOptions, Target};
    /// use serde_json::json;
    ///
    /// let options = PresetOptions::from_value(json!({
    ///     "target": "browser",
    ///     "compression": true
    /// }))
    /// .unwrap();
    /// assert_eq!(options.target, Some(Target::named("browser")));
    /// assert_eq!(options.compression, Some(true));
    /// ```
    pub fn from_value(value: Value) -> crate::Result<Self> {
        serde_json::from_value(value).map_err(|e| crate::PresetError::Config(e.to_string()))
    }

    pub fn with_target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Overlay these options onto the fixed default record.
    pub fn to_settings(&self) -> PresetSettings {
        let defaults = PresetSettings::default();

        PresetSettings {
            debug: self.debug.unwrap_or(defaults.debug),
            target: self.target.clone(),
            env: self.env.clone().unwrap_or(defaults.env),
            modules: self.modules.unwrap_or(defaults.modules),
            imports: self.imports.unwrap_or(defaults.imports),
            use_built_ins: self.use_built_ins.unwrap_or(defaults.use_built_ins),
            jsx_pragma: self.jsx_pragma.clone().unwrap_or(defaults.jsx_pragma),
            rewrite_async: self.rewrite_async.unwrap_or(defaults.rewrite_async),
            loose_mode: self.loose_mode.unwrap_or(defaults.loose_mode),
            spec_mode: self.spec_mode.unwrap_or(defaults.spec_mode),
            optimize_modules: self
                .optimize_modules
                .clone()
                .unwrap_or(defaults.optimize_modules),
            source_folder: self.source_folder.clone().unwrap_or(defaults.source_folder),
            source_maps: self.source_maps.unwrap_or(defaults.source_maps),
            compression: self.compression.unwrap_or(defaults.compression),
            comments: self.comments.unwrap_or(defaults.comments),
            minified: self.minified.unwrap_or(defaults.minified),
        }
    }
}

/// Full option record: caller options laid over the defaults.
///
/// `target` stays `None` when the caller did not supply one, because the
/// resolver picks `"test"` over the default in a test environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSettings {
    pub debug: bool,
    pub target: Option<Target>,
    pub env: String,
    pub modules: ModuleFormat,
    pub imports: ImportsMode,
    pub use_built_ins: bool,
    pub jsx_pragma: String,
    pub rewrite_async: RewriteAsync,
    pub loose_mode: bool,
    pub spec_mode: bool,
    pub optimize_modules: Vec<String>,
    pub source_folder: Option<PathBuf>,
    pub source_maps: bool,
    pub compression: bool,
    pub comments: bool,
    pub minified: bool,
}

impl Default for PresetSettings {
    fn default() -> Self {
        Self {
            debug: false,
            target: None,
            env: AUTO_ENV.to_string(),
            modules: ModuleFormat::Auto,
            imports: ImportsMode::Auto,
            use_built_ins: true,
            jsx_pragma: default_jsx_pragma(),
            rewrite_async: RewriteAsync::Promises,
            // Loose output is smaller and faster; strict compliance is opt-in.
            loose_mode: true,
            spec_mode: false,
            optimize_modules: default_optimize_modules(),
            source_folder: Some(PathBuf::from(DEFAULT_SOURCE_FOLDER)),
            source_maps: true,
            compression: false,
            comments: false,
            minified: false,
        }
    }
}
