//! Target classification and the constraints handed to the env preset.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::browserslist::BrowserslistResolver;
use crate::error::Result;
use crate::options::Target;

/// Node version for plain Node targets (first 6.x LTS).
pub const NODE_LTS: &str = "6.9.0";
/// Node version for the `node8` target.
pub const NODE_8: &str = "8.0.0";
/// Marker the env preset reads as "whatever runs the compiler".
pub const NODE_CURRENT: &str = "current";

/// Passes the env preset must never add; async and generators are handled by
/// the promise rewrite instead.
pub const ALWAYS_EXCLUDED: [&str; 2] = ["transform-regenerator", "transform-async-to-generator"];

/// Syntax every ES2015-capable engine handles natively.
pub const ES2015_EXCLUDES: [&str; 23] = [
    "transform-es2015-template-literals",
    "transform-es2015-literals",
    "transform-es2015-function-name",
    "transform-es2015-arrow-functions",
    "transform-es2015-block-scoped-functions",
    "transform-es2015-classes",
    "transform-es2015-object-super",
    "transform-es2015-shorthand-properties",
    "transform-es2015-duplicate-keys",
    "transform-es2015-computed-properties",
    "transform-es2015-for-of",
    "transform-es2015-sticky-regex",
    "transform-es2015-unicode-regex",
    "check-es2015-constants",
    "transform-es2015-spread",
    "transform-es2015-parameters",
    "transform-es2015-destructuring",
    "transform-es2015-block-scoping",
    "transform-es2015-typeof-symbol",
    "transform-es2015-modules-commonjs",
    "transform-es2015-modules-systemjs",
    "transform-es2015-modules-amd",
    "transform-es2015-modules-umd",
];

const MODERN_BROWSERS: [&str; 6] = [
    "Safari >= 10.1",
    "iOS >= 10.3",
    "Edge >= 15",
    "Chrome >= 59",
    "ChromeAndroid >= 59",
    "Firefox >= 53",
];

/// Broad category a target falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetClass {
    /// `node`, `node8`, `nodejs`, `script`, `binary`
    DistBinary,
    /// `current`, `test`
    CurrentRuntime,
    /// `browser`, `web`
    BrowserList,
    /// `library`, `es2015`, `modern`
    Library,
    /// Structured constraint object
    Custom,
}

impl TargetClass {
    /// Classify a target; unknown names fall into no class.
    pub fn classify(target: &Target) -> Option<Self> {
        match target {
            Target::Custom(_) => Some(Self::Custom),
            Target::Named(name) => match name.as_str() {
                "node" | "node8" | "nodejs" | "script" | "binary" => Some(Self::DistBinary),
                "current" | "test" => Some(Self::CurrentRuntime),
                "browser" | "web" => Some(Self::BrowserList),
                "library" | "es2015" | "modern" => Some(Self::Library),
                _ => None,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DistBinary => "dist-binary",
            Self::CurrentRuntime => "current-runtime",
            Self::BrowserList => "browser-list",
            Self::Library => "library",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint object for the env preset's `targets` option.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvTargets {
    /// No constraints: the env preset applies every transform (ES5 output)
    Unconstrained,
    /// A Node version, or [`NODE_CURRENT`]
    Node(String),
    /// Browserslist queries
    Browsers(Vec<String>),
    /// Engines released from mid 2017 on
    Modern,
    /// Caller-supplied object, passed through verbatim
    Custom(Map<String, Value>),
}

impl EnvTargets {
    /// JSON form for the env preset; `None` means the key is left out.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::Unconstrained => None,
            Self::Node(version) => Some(json!({ "node": version })),
            Self::Browsers(queries) => Some(json!({ "browsers": queries })),
            Self::Modern => Some(json!({
                "node": "8.2.0",
                "electron": "1.6",
                "browsers": MODERN_BROWSERS,
            })),
            Self::Custom(map) => Some(Value::Object(map.clone())),
        }
    }
}

impl fmt::Display for EnvTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_value() {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("unconstrained"),
        }
    }
}

/// Derive the env preset constraints for a classified target.
///
/// Browser targets ask `browserslist` for the `production` or `development`
/// section of the project's config.
pub fn env_targets(
    target: &Target,
    class: Option<TargetClass>,
    is_production: bool,
    browserslist: &dyn BrowserslistResolver,
) -> Result<EnvTargets> {
    let targets = match (class, target) {
        // Only `node8` opts into the newer LTS; the other aliases stay on 6.9.
        (Some(TargetClass::DistBinary), target) if target.is_named("node8") => {
            EnvTargets::Node(NODE_8.to_string())
        }
        (Some(TargetClass::DistBinary), _) => EnvTargets::Node(NODE_LTS.to_string()),
        (Some(TargetClass::CurrentRuntime), _) => EnvTargets::Node(NODE_CURRENT.to_string()),
        (Some(TargetClass::BrowserList), _) => {
            let env = if is_production { "production" } else { "development" };
            EnvTargets::Browsers(browserslist.queries(env)?)
        }
        (Some(TargetClass::Library), target) if target.is_named("modern") => EnvTargets::Modern,
        (Some(TargetClass::Library), _) => EnvTargets::Unconstrained,
        (_, Target::Custom(map)) => EnvTargets::Custom(map.clone()),
        (_, Target::Named(_)) => EnvTargets::Custom(Map::new()),
    };

    Ok(targets)
}

/// Exclusion list for the env preset.
pub fn excludes(target: &Target) -> Vec<&'static str> {
    let mut excludes = ALWAYS_EXCLUDED.to_vec();
    if target.is_named("es2015") {
        excludes.extend(ES2015_EXCLUDES);
    }
    excludes
}
