//! Pass descriptors and the fixed pipeline tables.
//!
//! The pipeline is two static, ordered tables of [`PipelineEntry`]. Each entry
//! pairs a predicate over the resolved options with a pass and an options
//! builder; assembly is a single filter-map over the table, so the order of
//! the output is the order of the table.

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::options::{ImportsMode, ModuleFormat, RewriteAsync};
use crate::resolve::ResolvedOptions;

/// Identifier of a preset or plugin understood by the downstream compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassId {
    MinifyPreset,
    EnvPreset,
    FlowPreset,
    SyntaxDynamicImport,
    DynamicImportNode,
    DynamicImportWebpack,
    UniversalImport,
    Es3MemberExpressionLiterals,
    Es3PropertyLiterals,
    Lodash,
    ModuleResolver,
    FastAsync,
    ClassProperties,
    ObjectRestSpread,
    SyntaxJsx,
    ReactJsx,
    ReactJsxSource,
    ReactJsxSelf,
    RemovePropTypes,
    ReactIntl,
    ReactInlineElements,
    ReactConstantElements,
    TransformRuntime,
}

impl PassId {
    /// Package name the downstream compiler loads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinifyPreset => "babel-preset-minify",
            Self::EnvPreset => "babel-preset-env",
            Self::FlowPreset => "babel-preset-flow",
            Self::SyntaxDynamicImport => "babel-plugin-syntax-dynamic-import",
            Self::DynamicImportNode => "babel-plugin-dynamic-import-node",
            Self::DynamicImportWebpack => "babel-plugin-dynamic-import-webpack",
            Self::UniversalImport => "babel-plugin-universal-import",
            Self::Es3MemberExpressionLiterals => {
                "babel-plugin-transform-es3-member-expression-literals"
            }
            Self::Es3PropertyLiterals => "babel-plugin-transform-es3-property-literals",
            Self::Lodash => "babel-plugin-lodash",
            Self::ModuleResolver => "babel-plugin-module-resolver",
            Self::FastAsync => "babel-plugin-fast-async",
            Self::ClassProperties => "babel-plugin-transform-class-properties",
            Self::ObjectRestSpread => "babel-plugin-transform-object-rest-spread",
            Self::SyntaxJsx => "babel-plugin-syntax-jsx",
            Self::ReactJsx => "babel-plugin-transform-react-jsx",
            Self::ReactJsxSource => "babel-plugin-transform-react-jsx-source",
            Self::ReactJsxSelf => "babel-plugin-transform-react-jsx-self",
            Self::RemovePropTypes => "babel-plugin-transform-react-remove-prop-types",
            Self::ReactIntl => "babel-plugin-react-intl",
            Self::ReactInlineElements => "babel-plugin-transform-react-inline-elements",
            Self::ReactConstantElements => "babel-plugin-transform-react-constant-elements",
            Self::TransformRuntime => "babel-plugin-transform-runtime",
        }
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pass and its options.
///
/// Serialises as a bare name without options and as `[name, options]` with
/// them, matching the compiler's config format.
#[derive(Debug, Clone, PartialEq)]
pub struct PassDescriptor {
    pub id: PassId,
    pub options: Option<Value>,
}

impl PassDescriptor {
    pub fn new(id: PassId) -> Self {
        Self { id, options: None }
    }

    pub fn with_options(id: PassId, options: Value) -> Self {
        Self {
            id,
            options: Some(options),
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.as_str()
    }
}

impl Serialize for PassDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.options {
            None => serializer.serialize_str(self.name()),
            Some(options) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(self.name())?;
                seq.serialize_element(options)?;
                seq.end()
            }
        }
    }
}

/// Final configuration handed to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetConfig {
    pub comments: bool,
    /// Always on; output whitespace is never significant here
    pub compact: bool,
    pub minified: bool,
    pub source_maps: bool,
    pub presets: Vec<PassDescriptor>,
    pub plugins: Vec<PassDescriptor>,
}

impl PresetConfig {
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Names of all presets and plugins, presets first.
    pub fn pass_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets
            .iter()
            .chain(self.plugins.iter())
            .map(PassDescriptor::name)
    }

    pub fn has_plugin(&self, id: PassId) -> bool {
        self.plugins.iter().any(|p| p.id == id)
    }

    pub fn plugin(&self, id: PassId) -> Option<&PassDescriptor> {
        self.plugins.iter().find(|p| p.id == id)
    }

    pub fn preset(&self, id: PassId) -> Option<&PassDescriptor> {
        self.presets.iter().find(|p| p.id == id)
    }
}

/// One row of a pipeline table.
pub struct PipelineEntry {
    pub id: PassId,
    pub when: fn(&ResolvedOptions) -> bool,
    pub options: fn(&ResolvedOptions) -> Option<Value>,
}

impl PipelineEntry {
    fn descriptor(&self, options: &ResolvedOptions) -> Option<PassDescriptor> {
        (self.when)(options).then(|| PassDescriptor {
            id: self.id,
            options: (self.options)(options),
        })
    }
}

fn always(_: &ResolvedOptions) -> bool {
    true
}

fn no_options(_: &ResolvedOptions) -> Option<Value> {
    None
}

const fn entry(
    id: PassId,
    when: fn(&ResolvedOptions) -> bool,
    options: fn(&ResolvedOptions) -> Option<Value>,
) -> PipelineEntry {
    PipelineEntry { id, when, options }
}

const fn plain(id: PassId) -> PipelineEntry {
    entry(id, always, no_options)
}

fn full_compression(o: &ResolvedOptions) -> bool {
    o.compression && o.aggressive_compression()
}

fn basic_compression(o: &ResolvedOptions) -> bool {
    o.compression && !o.aggressive_compression()
}

fn development(o: &ResolvedOptions) -> bool {
    !o.is_production
}

fn production(o: &ResolvedOptions) -> bool {
    o.is_production
}

fn imports_rollup_nodejs(o: &ResolvedOptions) -> bool {
    o.imports == ImportsMode::RollupNodejs
}

fn imports_rollup_webpack(o: &ResolvedOptions) -> bool {
    o.imports == ImportsMode::RollupWebpack
}

fn imports_webpack(o: &ResolvedOptions) -> bool {
    o.imports == ImportsMode::Webpack
}

fn has_source_alias(o: &ResolvedOptions) -> bool {
    o.source_alias.is_some()
}

fn rewrites_async(o: &ResolvedOptions) -> bool {
    o.rewrite_async == RewriteAsync::Promises
}

// Basic compression keeps runtime-observable behaviour intact.
fn basic_minify_options(_: &ResolvedOptions) -> Option<Value> {
    Some(json!({
        "booleans": false,
        "infinity": false,
        "mangle": false,
        "flipComparisons": false,
        "replace": false,
        "simplify": false,
    }))
}

fn env_preset_options(o: &ResolvedOptions) -> Option<Value> {
    let mut options = json!({
        "modules": o.modules.to_value(),
        "useBuiltIns": o.use_built_ins,
        "loose": o.loose_mode,
        "spec": o.spec_mode,
        "exclude": o.excludes(),
    });
    if let Some(targets) = o.env_targets.to_value() {
        options["targets"] = targets;
    }
    Some(options)
}

fn lodash_options(o: &ResolvedOptions) -> Option<Value> {
    Some(json!({ "id": o.optimize_modules }))
}

fn module_resolver_options(o: &ResolvedOptions) -> Option<Value> {
    o.source_alias
        .as_ref()
        .map(|path| json!({ "alias": { "~": path.to_string_lossy() } }))
}

fn fast_async_options(_: &ResolvedOptions) -> Option<Value> {
    Some(json!({ "useRuntimeModule": true }))
}

fn built_ins_options(o: &ResolvedOptions) -> Option<Value> {
    Some(json!({ "useBuiltIns": o.use_built_ins }))
}

fn react_jsx_options(o: &ResolvedOptions) -> Option<Value> {
    Some(json!({ "useBuiltIns": o.use_built_ins, "pragma": o.jsx_pragma }))
}

fn remove_prop_types_options(_: &ResolvedOptions) -> Option<Value> {
    Some(json!({ "mode": "remove", "removeImport": true }))
}

// Helpers without polyfills; ES module helper imports only when ESM survives.
fn runtime_options(o: &ResolvedOptions) -> Option<Value> {
    Some(json!({
        "helpers": true,
        "regenerator": false,
        "polyfill": false,
        "useBuiltIns": o.use_built_ins,
        "useESModules": o.modules == ModuleFormat::Preserve,
    }))
}

/// Preset table, in execution order.
pub static PRESETS: &[PipelineEntry] = &[
    entry(PassId::MinifyPreset, full_compression, no_options),
    entry(PassId::MinifyPreset, basic_compression, basic_minify_options),
    entry(PassId::EnvPreset, always, env_preset_options),
    plain(PassId::FlowPreset),
];

/// Plugin table, in execution order.
pub static PLUGINS: &[PipelineEntry] = &[
    plain(PassId::SyntaxDynamicImport),
    entry(PassId::DynamicImportNode, imports_rollup_nodejs, no_options),
    entry(PassId::DynamicImportWebpack, imports_rollup_webpack, no_options),
    entry(PassId::UniversalImport, imports_webpack, no_options),
    plain(PassId::Es3MemberExpressionLiterals),
    plain(PassId::Es3PropertyLiterals),
    entry(PassId::Lodash, always, lodash_options),
    entry(PassId::ModuleResolver, has_source_alias, module_resolver_options),
    entry(PassId::FastAsync, rewrites_async, fast_async_options),
    plain(PassId::ClassProperties),
    entry(PassId::ObjectRestSpread, always, built_ins_options),
    plain(PassId::SyntaxJsx),
    entry(PassId::ReactJsx, always, react_jsx_options),
    entry(PassId::ReactJsxSource, development, no_options),
    entry(PassId::ReactJsxSelf, development, no_options),
    entry(PassId::RemovePropTypes, production, remove_prop_types_options),
    entry(PassId::ReactIntl, production, no_options),
    entry(PassId::ReactInlineElements, production, no_options),
    entry(PassId::ReactConstantElements, production, no_options),
    entry(PassId::TransformRuntime, always, runtime_options),
];

/// Run a table against the resolved options.
pub fn assemble(table: &[PipelineEntry], options: &ResolvedOptions) -> Vec<PassDescriptor> {
    table
        .iter()
        .filter_map(|entry| entry.descriptor(options))
        .collect()
}

/// Build the final compiler configuration.
pub fn build_config(options: &ResolvedOptions) -> PresetConfig {
    PresetConfig {
        comments: options.comments,
        compact: true,
        minified: options.minified,
        source_maps: options.source_maps,
        presets: assemble(PRESETS, options),
        plugins: assemble(PLUGINS, options),
    }
}
