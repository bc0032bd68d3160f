//! File-based option discovery
//!
//! Options can live in `edge.toml`, in the `edge` field of `package.json`,
//! or in `EDGE_*` environment variables. Later sources override earlier ones;
//! explicit overrides (usually CLI flags) win over everything.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;
use tracing::debug;

use crate::error::{PresetError, Result};
use crate::options::PresetOptions;

/// Dedicated options file.
pub const CONFIG_FILE: &str = "edge.toml";
/// Field of `package.json` holding options.
pub const PACKAGE_FIELD: &str = "edge";
/// Prefix of environment variables mapped onto options.
pub const ENV_PREFIX: &str = "EDGE_";

const ENV_KEYS: [&str; 16] = [
    "debug",
    "target",
    "env",
    "modules",
    "imports",
    "use_built_ins",
    "jsx_pragma",
    "rewrite_async",
    "loose_mode",
    "spec_mode",
    "optimize_modules",
    "source_folder",
    "source_maps",
    "compression",
    "comments",
    "minified",
];

/// Layered option loading for a project directory.
///
/// # Example
///
/// ```no_run
/// use edge_preset::OptionsDiscovery;
///
/// let options = OptionsDiscovery::new(".").load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct OptionsDiscovery {
    root: PathBuf,
    config_file: Option<PathBuf>,
    read_env: bool,
}

impl OptionsDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config_file: None,
            read_env: true,
        }
    }

    /// Use `path` instead of `<root>/edge.toml`. A `.json` file is read as JSON.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skip `EDGE_*` variables.
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Options file in effect, if it exists.
    pub fn find(&self) -> Option<PathBuf> {
        let path = self
            .config_file
            .clone()
            .unwrap_or_else(|| self.root.join(CONFIG_FILE));
        path.is_file().then_some(path)
    }

    fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::new();

        if let Some(explicit) = &self.config_file {
            if !explicit.is_file() {
                return Err(PresetError::Config(format!(
                    "options file not found: {}",
                    explicit.display()
                )));
            }
        }

        if let Some(path) = self.find() {
            debug!(path = %path.display(), "loading preset options");
            figment = if path.extension().is_some_and(|ext| ext == "json") {
                figment.merge(Json::file(path))
            } else {
                figment.merge(Toml::file(path))
            };
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.is_file() {
            figment = figment.merge(Figment::from(Json::file(pkg_path)).focus(PACKAGE_FIELD));
        }

        if self.read_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS));
        }

        Ok(figment)
    }

    /// Load the layered options.
    pub fn load(&self) -> Result<PresetOptions> {
        self.load_with(&PresetOptions::default())
    }

    /// Load the layered options with `overrides` on top.
    ///
    /// Only the fields set in `overrides` win; unset fields fall through to
    /// the discovered sources.
    ///
    /// # Arguments
    ///
    /// * `overrides` - Options from the caller, typically CLI flags
    ///
    /// # Errors
    ///
    /// [`PresetError::Config`] when a source is malformed, has unknown keys,
    /// or an explicit options file is missing.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use edge_preset::{OptionsDiscovery, PresetOptions};
    ///
    /// let overrides = PresetOptions::default().with_target("browser");
    /// let options = OptionsDiscovery::new(".").load_with(&overrides).unwrap();
    /// assert_eq!(options.target.unwrap().name(), Some("browser"));
    /// ```
    pub fn load_with(&self, overrides: &PresetOptions) -> Result<PresetOptions> {
        self.figment()?
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|e| PresetError::Config(e.to_string()))
    }
}

/// Discover options for a project directory (convenience function)
pub fn discover_options(root: impl AsRef<Path>) -> Result<PresetOptions> {
    OptionsDiscovery::new(root).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ModuleFormat, Target};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn no_sources_yield_empty_options() {
        let dir = TempDir::new().unwrap();
        let options = OptionsDiscovery::new(dir.path())
            .without_env()
            .load()
            .unwrap();
        assert_eq!(options, PresetOptions::default());
    }

    #[test]
    fn reads_toml_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
target = "library"
modules = false
jsxPragma = "h"
"#,
        )
        .unwrap();

        let options = OptionsDiscovery::new(dir.path())
            .without_env()
            .load()
            .unwrap();
        assert_eq!(options.target, Some(Target::named("library")));
        assert_eq!(options.modules, Some(ModuleFormat::Preserve));
        assert_eq!(options.jsx_pragma.as_deref(), Some("h"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = OptionsDiscovery::new(dir.path())
            .with_config_file(dir.path().join("nope.toml"))
            .without_env()
            .load();
        assert!(matches!(result, Err(PresetError::Config(_))));
    }
}
