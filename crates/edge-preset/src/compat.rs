//! Env preset collaborator: target normalization and plugin requirements.
//!
//! The env preset decides which syntax transforms a set of engines needs.
//! The resolver only asks it two things, captured by [`EnvPreset`]:
//! normalize the constraint object, and tell whether a named transform is
//! required for the normalized engines. [`BuiltinEnvPreset`] answers from a
//! small compat table; browser queries are resolved through lightningcss'
//! browserslist support.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use lightningcss::targets::Browsers;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{PresetError, Result};
use crate::target::{EnvTargets, NODE_CURRENT};

/// Node version assumed for `node: "current"` unless configured otherwise.
pub const DEFAULT_CURRENT_NODE: EngineVersion = EngineVersion::new(22, 0, 0);

/// Plugin whose requirement gates the async rewrite.
pub const ASYNC_TO_GENERATOR: &str = "transform-async-to-generator";

/// Custom target key asking for output every minifier can handle.
pub const UGLIFY_KEY: &str = "uglify";

/// Runtime the env preset knows compat data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Engine {
    Node,
    Electron,
    Chrome,
    Edge,
    Firefox,
    Safari,
    Ios,
    Opera,
    Android,
    Ie,
    Samsung,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Electron => "electron",
            Self::Chrome => "chrome",
            Self::Edge => "edge",
            Self::Firefox => "firefox",
            Self::Safari => "safari",
            Self::Ios => "ios",
            Self::Opera => "opera",
            Self::Android => "android",
            Self::Ie => "ie",
            Self::Samsung => "samsung",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "node" => Self::Node,
            "electron" => Self::Electron,
            "chrome" => Self::Chrome,
            "edge" => Self::Edge,
            "firefox" => Self::Firefox,
            "safari" => Self::Safari,
            "ios" | "ios_saf" => Self::Ios,
            "opera" => Self::Opera,
            "android" => Self::Android,
            "ie" => Self::Ie,
            "samsung" => Self::Samsung,
            _ => return None,
        })
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `major.minor.patch`; missing components are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Decode lightningcss' packed `major << 16 | minor << 8 | patch` form.
    fn from_packed(packed: u32) -> Self {
        Self::new((packed >> 16) & 0xff, (packed >> 8) & 0xff, packed & 0xff)
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.to_string().parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for EngineVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = [0u32; 3];
        let mut count = 0;
        for (slot, part) in parts.iter_mut().zip(s.trim().split('.')) {
            *slot = part
                .parse()
                .map_err(|_| format!("`{s}` is not a valid version"))?;
            count += 1;
        }
        if count == 0 || s.trim().split('.').count() > 3 {
            return Err(format!("`{s}` is not a valid version"));
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Lowest targeted version per engine. Empty means "no constraints".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTargets(BTreeMap<Engine, EngineVersion>);

impl NormalizedTargets {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, engine: Engine) -> Option<EngineVersion> {
        self.0.get(&engine).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Engine, EngineVersion)> + '_ {
        self.0.iter().map(|(engine, version)| (*engine, *version))
    }

    pub fn insert(&mut self, engine: Engine, version: EngineVersion) {
        self.0.insert(engine, version);
    }

    fn extend_browsers(&mut self, browsers: Browsers) {
        let pairs = [
            (Engine::Android, browsers.android),
            (Engine::Chrome, browsers.chrome),
            (Engine::Edge, browsers.edge),
            (Engine::Firefox, browsers.firefox),
            (Engine::Ie, browsers.ie),
            (Engine::Ios, browsers.ios_saf),
            (Engine::Opera, browsers.opera),
            (Engine::Safari, browsers.safari),
            (Engine::Samsung, browsers.samsung),
        ];
        for (engine, packed) in pairs {
            if let Some(packed) = packed {
                self.insert(engine, EngineVersion::from_packed(packed));
            }
        }
    }
}

impl fmt::Display for NormalizedTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(engine, version)| format!("{engine} {version}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// The environment-aware preset, as far as the resolver needs it.
pub trait EnvPreset {
    /// Turn a constraint object into per-engine minimum versions.
    fn normalize_targets(&self, targets: &EnvTargets) -> Result<NormalizedTargets>;

    /// Whether `plugin` has to run for code to work on every targeted engine.
    fn is_plugin_required(&self, targets: &NormalizedTargets, plugin: &str) -> bool;
}

/// Built-in env preset backed by a static compat table.
#[derive(Debug, Clone)]
pub struct BuiltinEnvPreset {
    current_node: EngineVersion,
    compat: HashMap<&'static str, BTreeMap<Engine, EngineVersion>>,
}

impl Default for BuiltinEnvPreset {
    fn default() -> Self {
        Self {
            current_node: DEFAULT_CURRENT_NODE,
            compat: builtin_compat(),
        }
    }
}

impl BuiltinEnvPreset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node version substituted for `node: "current"`.
    pub fn with_current_node(mut self, version: EngineVersion) -> Self {
        self.current_node = version;
        self
    }

    fn node_version(&self, raw: &Value) -> Result<EngineVersion> {
        match raw {
            Value::Bool(true) => Ok(self.current_node),
            Value::String(s) if s == NODE_CURRENT => Ok(self.current_node),
            other => EngineVersion::from_json(other)
                .ok_or_else(|| PresetError::invalid_target(other.to_string(), "invalid node version")),
        }
    }

    fn normalize_custom(&self, map: &Map<String, Value>) -> Result<NormalizedTargets> {
        let mut normalized = NormalizedTargets::default();

        // Output has to go through a minifier without ES2015 support, so
        // nothing may be assumed about the engines.
        if map.get(UGLIFY_KEY).is_some_and(is_truthy) {
            debug!("uglify target, every transform is required");
            return Ok(normalized);
        }

        // Browser queries first so explicit engine keys override them.
        if let Some(browsers) = map.get("browsers") {
            let queries = browser_queries(browsers)?;
            add_browser_queries(&mut normalized, &queries)?;
        }

        for (key, value) in map {
            if key == "browsers" || key == UGLIFY_KEY {
                continue;
            }
            let engine = Engine::from_key(key).ok_or_else(|| {
                PresetError::invalid_target(key.clone(), "not a supported target environment")
            })?;
            let version = if engine == Engine::Node {
                self.node_version(value)?
            } else {
                EngineVersion::from_json(value).ok_or_else(|| {
                    PresetError::invalid_target(format!("{key}: {value}"), "invalid version")
                })?
            };
            normalized.insert(engine, version);
        }

        Ok(normalized)
    }
}

impl EnvPreset for BuiltinEnvPreset {
    fn normalize_targets(&self, targets: &EnvTargets) -> Result<NormalizedTargets> {
        let normalized = match targets {
            EnvTargets::Unconstrained => NormalizedTargets::default(),
            EnvTargets::Node(version) => {
                let mut normalized = NormalizedTargets::default();
                normalized.insert(Engine::Node, self.node_version(&Value::String(version.clone()))?);
                normalized
            }
            EnvTargets::Browsers(queries) => {
                let mut normalized = NormalizedTargets::default();
                add_browser_queries(&mut normalized, queries)?;
                normalized
            }
            EnvTargets::Modern | EnvTargets::Custom(_) => match targets.to_value() {
                Some(Value::Object(map)) => self.normalize_custom(&map)?,
                _ => NormalizedTargets::default(),
            },
        };

        trace!(%normalized, "normalized targets");
        Ok(normalized)
    }

    fn is_plugin_required(&self, targets: &NormalizedTargets, plugin: &str) -> bool {
        if targets.is_empty() {
            return true;
        }

        let Some(support) = self.compat.get(plugin) else {
            debug!(plugin, "no compat data, assuming the plugin is required");
            return true;
        };

        targets.iter().any(|(engine, version)| match support.get(&engine) {
            Some(first_supported) => version < *first_supported,
            None => true,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn browser_queries(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(query) => Ok(vec![query.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| PresetError::invalid_target(item.to_string(), "expected a browser query"))
            })
            .collect(),
        other => Err(PresetError::invalid_target(
            other.to_string(),
            "browsers must be a query string or a list of queries",
        )),
    }
}

fn add_browser_queries(normalized: &mut NormalizedTargets, queries: &[String]) -> Result<()> {
    if queries.is_empty() {
        return Ok(());
    }
    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
        .map_err(|e| PresetError::Browserslist(e.to_string()))?;
    if let Some(browsers) = browsers {
        normalized.extend_browsers(browsers);
    }
    Ok(())
}

fn builtin_compat() -> HashMap<&'static str, BTreeMap<Engine, EngineVersion>> {
    use Engine::*;

    let table: [(&str, &[(Engine, EngineVersion)]); 4] = [
        (
            ASYNC_TO_GENERATOR,
            &[
                (Chrome, EngineVersion::new(55, 0, 0)),
                (Edge, EngineVersion::new(15, 0, 0)),
                (Firefox, EngineVersion::new(52, 0, 0)),
                (Safari, EngineVersion::new(10, 1, 0)),
                (Node, EngineVersion::new(7, 6, 0)),
                (Ios, EngineVersion::new(10, 3, 0)),
                (Samsung, EngineVersion::new(6, 0, 0)),
                (Opera, EngineVersion::new(42, 0, 0)),
                (Android, EngineVersion::new(55, 0, 0)),
                (Electron, EngineVersion::new(1, 6, 0)),
            ],
        ),
        (
            "transform-regenerator",
            &[
                (Chrome, EngineVersion::new(50, 0, 0)),
                (Edge, EngineVersion::new(13, 0, 0)),
                (Firefox, EngineVersion::new(53, 0, 0)),
                (Safari, EngineVersion::new(10, 0, 0)),
                (Node, EngineVersion::new(6, 0, 0)),
                (Ios, EngineVersion::new(10, 0, 0)),
                (Samsung, EngineVersion::new(5, 0, 0)),
                (Opera, EngineVersion::new(37, 0, 0)),
                (Android, EngineVersion::new(50, 0, 0)),
                (Electron, EngineVersion::new(1, 1, 0)),
            ],
        ),
        (
            "transform-es2015-arrow-functions",
            &[
                (Chrome, EngineVersion::new(47, 0, 0)),
                (Edge, EngineVersion::new(13, 0, 0)),
                (Firefox, EngineVersion::new(45, 0, 0)),
                (Safari, EngineVersion::new(10, 0, 0)),
                (Node, EngineVersion::new(6, 0, 0)),
                (Ios, EngineVersion::new(10, 0, 0)),
                (Samsung, EngineVersion::new(5, 0, 0)),
                (Opera, EngineVersion::new(34, 0, 0)),
                (Android, EngineVersion::new(47, 0, 0)),
                (Electron, EngineVersion::new(0, 36, 0)),
            ],
        ),
        (
            "transform-es2015-classes",
            &[
                (Chrome, EngineVersion::new(46, 0, 0)),
                (Edge, EngineVersion::new(13, 0, 0)),
                (Firefox, EngineVersion::new(45, 0, 0)),
                (Safari, EngineVersion::new(10, 0, 0)),
                (Node, EngineVersion::new(5, 0, 0)),
                (Ios, EngineVersion::new(10, 0, 0)),
                (Samsung, EngineVersion::new(5, 0, 0)),
                (Opera, EngineVersion::new(33, 0, 0)),
                (Android, EngineVersion::new(46, 0, 0)),
                (Electron, EngineVersion::new(0, 36, 0)),
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(plugin, engines)| (plugin, engines.iter().copied().collect()))
        .collect()
}
