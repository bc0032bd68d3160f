use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Runtime the compiled output has to run on.
///
/// Named targets are matched against a fixed vocabulary (see
/// [`TargetClass`](crate::TargetClass)); objects are handed to the env preset
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// Symbolic name such as `"node"`, `"browser"` or `"modern"`
    Named(String),
    /// Explicit engine constraints, e.g. `{"browsers": "ie 11"}`
    Custom(Map<String, Value>),
}

impl Target {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The symbolic name, if this is a named target.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Custom(_) => None,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::Named("nodejs".to_string())
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Custom(map) => write!(f, "{}", Value::Object(map.clone())),
        }
    }
}

/// Module system the env preset rewrites `import`/`export` into.
///
/// Serialised as the env preset expects it: a module system name, or `false`
/// to keep ES module syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ModeRepr", into = "ModeRepr")]
pub enum ModuleFormat {
    /// Pick based on the target
    #[default]
    Auto,
    CommonJs,
    Amd,
    Umd,
    SystemJs,
    /// Keep ES module syntax untouched
    Preserve,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::CommonJs => "commonjs",
            Self::Amd => "amd",
            Self::Umd => "umd",
            Self::SystemJs => "systemjs",
            Self::Preserve => "esm",
        }
    }

    /// Value handed to the env preset's `modules` option.
    pub fn to_value(self) -> Value {
        match self {
            Self::Preserve => Value::Bool(false),
            other => Value::String(other.as_str().to_string()),
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape shared by the mode enums: a name, or a boolean switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ModeRepr {
    Flag(bool),
    Name(String),
}

impl TryFrom<ModeRepr> for ModuleFormat {
    type Error = String;

    fn try_from(repr: ModeRepr) -> Result<Self, Self::Error> {
        match repr {
            ModeRepr::Flag(false) => Ok(Self::Preserve),
            ModeRepr::Flag(true) => {
                Err("`modules: true` is ambiguous, name a module format".to_string())
            }
            ModeRepr::Name(name) => match name.as_str() {
                "auto" => Ok(Self::Auto),
                "commonjs" | "cjs" => Ok(Self::CommonJs),
                "amd" => Ok(Self::Amd),
                "umd" => Ok(Self::Umd),
                "systemjs" => Ok(Self::SystemJs),
                "esm" | "false" => Ok(Self::Preserve),
                other => Err(format!("unknown module format `{other}`")),
            },
        }
    }
}

impl From<ModuleFormat> for ModeRepr {
    fn from(format: ModuleFormat) -> Self {
        match format {
            ModuleFormat::Preserve => ModeRepr::Flag(false),
            other => ModeRepr::Name(other.as_str().to_string()),
        }
    }
}

/// Strategy for rewriting dynamic `import()` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ModeRepr", into = "ModeRepr")]
pub enum ImportsMode {
    /// Pick based on the target
    #[default]
    Auto,
    /// Deferred `require()` for bundles that end up running in Node
    RollupNodejs,
    /// `require.ensure()` so a later Webpack pass can split chunks
    RollupWebpack,
    /// Universal imports with chunk names taken from magic comments
    Webpack,
    /// Leave `import()` alone
    Off,
}

impl ImportsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::RollupNodejs => "rollup-nodejs",
            Self::RollupWebpack => "rollup-webpack",
            Self::Webpack => "webpack",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for ImportsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<ModeRepr> for ImportsMode {
    type Error = String;

    fn try_from(repr: ModeRepr) -> Result<Self, Self::Error> {
        match repr {
            ModeRepr::Flag(false) => Ok(Self::Off),
            ModeRepr::Flag(true) => Ok(Self::Auto),
            ModeRepr::Name(name) => match name.as_str() {
                "auto" => Ok(Self::Auto),
                "rollup-nodejs" | "bundler-nodejs" => Ok(Self::RollupNodejs),
                "rollup-webpack" | "bundler-webpack" => Ok(Self::RollupWebpack),
                "webpack" => Ok(Self::Webpack),
                "off" | "none" | "false" => Ok(Self::Off),
                other => Err(format!("unknown imports mode `{other}`")),
            },
        }
    }
}

impl From<ImportsMode> for ModeRepr {
    fn from(mode: ImportsMode) -> Self {
        match mode {
            ImportsMode::Off => ModeRepr::Flag(false),
            other => ModeRepr::Name(other.as_str().to_string()),
        }
    }
}

/// How `async`/`await` is lowered when the target lacks native support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ModeRepr", into = "ModeRepr")]
pub enum RewriteAsync {
    /// Compile-time rewrite to plain promise chains
    #[default]
    Promises,
    /// Keep `async` functions as written
    Off,
}

impl RewriteAsync {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Promises => "promises",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for RewriteAsync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<ModeRepr> for RewriteAsync {
    type Error = String;

    fn try_from(repr: ModeRepr) -> Result<Self, Self::Error> {
        match repr {
            ModeRepr::Flag(false) => Ok(Self::Off),
            ModeRepr::Flag(true) => Ok(Self::Promises),
            ModeRepr::Name(name) => match name.as_str() {
                "promises" => Ok(Self::Promises),
                "off" | "none" | "false" => Ok(Self::Off),
                other => Err(format!("unknown async rewrite mode `{other}`")),
            },
        }
    }
}

impl From<RewriteAsync> for ModeRepr {
    fn from(mode: RewriteAsync) -> Self {
        match mode {
            RewriteAsync::Off => ModeRepr::Flag(false),
            RewriteAsync::Promises => ModeRepr::Name("promises".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn modules_false_means_preserve() {
        let format: ModuleFormat = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(format, ModuleFormat::Preserve);
        assert_eq!(serde_json::to_value(format).unwrap(), json!(false));
    }

    #[test]
    fn modules_true_is_rejected() {
        assert!(serde_json::from_value::<ModuleFormat>(json!(true)).is_err());
    }

    #[test]
    fn imports_accepts_bundler_aliases() {
        let mode: ImportsMode = serde_json::from_value(json!("bundler-webpack")).unwrap();
        assert_eq!(mode, ImportsMode::RollupWebpack);
        assert_eq!(serde_json::to_value(mode).unwrap(), json!("rollup-webpack"));
    }

    #[test]
    fn rewrite_async_false_disables() {
        let mode: RewriteAsync = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(mode, RewriteAsync::Off);
    }

    #[test]
    fn target_object_stays_custom() {
        let target: Target = serde_json::from_value(json!({ "browsers": "ie 11" })).unwrap();
        assert!(matches!(target, Target::Custom(_)));
        assert_eq!(target.name(), None);
    }
}
