//! The configuration resolver.
//!
//! [`resolve`] settles every `auto` option from the target, the build
//! environment and the collaborators in [`PresetContext`], then runs the
//! pipeline tables. Each step is a small total function from already settled
//! values to the next one; nothing is mutated in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::browserslist::{BrowserslistConfig, BrowserslistResolver};
use crate::compat::{BuiltinEnvPreset, EnvPreset, NormalizedTargets, ASYNC_TO_GENERATOR};
use crate::env::{self, EnvSource, ProcessEnv};
use crate::error::Result;
use crate::options::{ImportsMode, ModuleFormat, PresetOptions, RewriteAsync, Target};
use crate::pipeline::{self, PresetConfig};
use crate::root::{self, AppRoot, ProjectRoot};
use crate::target::{self, EnvTargets, TargetClass, ALWAYS_EXCLUDED};

/// Logs at info level when the `debug` option is on, at debug level otherwise.
macro_rules! hint {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

/// Ambient signals and collaborators consulted during resolution.
pub struct PresetContext {
    env: Box<dyn EnvSource>,
    env_preset: Box<dyn EnvPreset>,
    browserslist: Box<dyn BrowserslistResolver>,
    project_root: Box<dyn ProjectRoot>,
}

impl PresetContext {
    /// Context for a project directory, reading the process environment.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        let dir = project_dir.as_ref();
        Self {
            env: Box::new(ProcessEnv),
            env_preset: Box::new(BuiltinEnvPreset::default()),
            browserslist: Box::new(BrowserslistConfig::new(dir)),
            project_root: Box::new(AppRoot::new(dir)),
        }
    }

    /// Context that sees only `vars`, never the process environment.
    pub fn hermetic(project_dir: impl AsRef<Path>, vars: HashMap<String, String>) -> Self {
        let dir = project_dir.as_ref();
        Self {
            env: Box::new(vars.clone()),
            env_preset: Box::new(BuiltinEnvPreset::default()),
            browserslist: Box::new(BrowserslistConfig::new(dir).with_env_source(vars.clone())),
            project_root: Box::new(AppRoot::new(dir).with_env_source(vars)),
        }
    }

    pub fn with_env_source(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn with_env_preset(mut self, preset: impl EnvPreset + 'static) -> Self {
        self.env_preset = Box::new(preset);
        self
    }

    pub fn with_browserslist(mut self, resolver: impl BrowserslistResolver + 'static) -> Self {
        self.browserslist = Box::new(resolver);
        self
    }

    pub fn with_project_root(mut self, root: impl ProjectRoot + 'static) -> Self {
        self.project_root = Box::new(root);
        self
    }
}

/// Every option settled to a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub debug: bool,
    pub env: String,
    pub is_production: bool,
    pub target: Target,
    pub target_class: Option<TargetClass>,
    pub env_targets: EnvTargets,
    pub normalized_targets: NormalizedTargets,
    /// Passes excluded on top of [`ALWAYS_EXCLUDED`]
    pub additional_excludes: Vec<&'static str>,
    pub modules: ModuleFormat,
    pub imports: ImportsMode,
    pub use_built_ins: bool,
    pub jsx_pragma: String,
    pub rewrite_async: RewriteAsync,
    pub loose_mode: bool,
    pub spec_mode: bool,
    pub optimize_modules: Vec<String>,
    pub source_folder: Option<PathBuf>,
    /// Absolute path the `~` alias points to
    pub source_alias: Option<PathBuf>,
    pub source_maps: bool,
    pub compression: bool,
    pub comments: bool,
    pub minified: bool,
}

impl ResolvedOptions {
    /// Full compression is reserved for production builds of Node binaries.
    pub fn aggressive_compression(&self) -> bool {
        self.is_production && self.target_class == Some(TargetClass::DistBinary)
    }

    /// Complete exclusion list for the env preset.
    pub fn excludes(&self) -> Vec<&'static str> {
        ALWAYS_EXCLUDED
            .iter()
            .chain(self.additional_excludes.iter())
            .copied()
            .collect()
    }

    /// `SPEC`, `LOOSE` or `DEFAULT`.
    pub fn compliance(&self) -> &'static str {
        if self.spec_mode {
            "SPEC"
        } else if self.loose_mode {
            "LOOSE"
        } else {
            "DEFAULT"
        }
    }
}

/// Result of a resolver run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub options: ResolvedOptions,
    pub config: PresetConfig,
}

/// Resolve partial options into a compiler configuration.
///
/// # Example
///
/// ```
/// use edge_preset::{resolve, PassId, PresetContext, PresetOptions};
/// use std::collections::HashMap;
///
/// let ctx = PresetContext::hermetic(".", HashMap::new());
/// let options = PresetOptions::default().with_target("node8").with_env("production");
///
/// let resolution = resolve(&ctx, &options).unwrap();
/// assert!(resolution.options.is_production);
/// assert!(!resolution.config.has_plugin(PassId::FastAsync));
/// ```
pub fn resolve(ctx: &PresetContext, options: &PresetOptions) -> Result<Resolution> {
    let settings = options.to_settings();
    let verbose = settings.debug;

    let env = env::resolve_env(&settings.env, ctx.env.as_ref());
    let is_production = env::is_production(&env);
    hint!(verbose, env = %env, is_production, "environment");

    let target = select_target(settings.target.as_ref(), &env);
    let target_class = TargetClass::classify(&target);
    let env_targets = target::env_targets(
        &target,
        target_class,
        is_production,
        ctx.browserslist.as_ref(),
    )?;
    let additional_excludes = additional_excludes(&target);
    if target.is_named("es2015") {
        hint!(verbose, "environment targets: ES2015 capable");
    } else {
        hint!(verbose, targets = %env_targets, "environment targets");
    }

    let modules = resolve_modules(settings.modules, target_class);
    let imports = resolve_imports(settings.imports, target_class);
    let comments = keep_comments(settings.comments, imports);

    let normalized_targets = ctx.env_preset.normalize_targets(&env_targets)?;
    let rewrite_async = gate_async(
        settings.rewrite_async,
        ctx.env_preset.as_ref(),
        &normalized_targets,
    );

    let source_alias = match &settings.source_folder {
        Some(folder) => Some(root::alias_target(&ctx.project_root.root()?, folder)),
        None => None,
    };

    let resolved = ResolvedOptions {
        debug: settings.debug,
        env,
        is_production,
        target,
        target_class,
        env_targets,
        normalized_targets,
        additional_excludes,
        modules,
        imports,
        use_built_ins: settings.use_built_ins,
        jsx_pragma: settings.jsx_pragma,
        rewrite_async,
        loose_mode: settings.loose_mode,
        spec_mode: settings.spec_mode,
        optimize_modules: settings.optimize_modules,
        source_folder: settings.source_folder,
        source_alias,
        source_maps: settings.source_maps,
        compression: settings.compression,
        comments,
        minified: settings.minified,
    };

    hint!(
        verbose,
        modules = %resolved.modules,
        compliance = resolved.compliance(),
        rewrite_async = %resolved.rewrite_async,
        imports = %resolved.imports,
        "module settings"
    );

    let config = pipeline::build_config(&resolved);
    debug!(passes = ?config.pass_names().collect::<Vec<_>>(), "pipeline assembled");

    Ok(Resolution {
        options: resolved,
        config,
    })
}

/// Supplied target, `"test"` in a test environment, else the default.
pub fn select_target(supplied: Option<&Target>, env: &str) -> Target {
    match supplied {
        Some(target) => target.clone(),
        None if env == "test" => Target::named("test"),
        None => Target::default(),
    }
}

pub fn additional_excludes(target: &Target) -> Vec<&'static str> {
    target::excludes(target)
        .into_iter()
        .skip(ALWAYS_EXCLUDED.len())
        .collect()
}

/// Settle `modules: "auto"` from the target class.
pub fn resolve_modules(configured: ModuleFormat, class: Option<TargetClass>) -> ModuleFormat {
    if configured != ModuleFormat::Auto {
        return configured;
    }

    match class {
        Some(TargetClass::CurrentRuntime | TargetClass::DistBinary) => ModuleFormat::CommonJs,
        // Libraries and browser bundles keep ESM for tree shaking downstream.
        Some(TargetClass::Library | TargetClass::BrowserList) => ModuleFormat::Preserve,
        _ => ModuleFormat::CommonJs,
    }
}

/// Settle `imports: "auto"` from the target class.
pub fn resolve_imports(configured: ImportsMode, class: Option<TargetClass>) -> ImportsMode {
    if configured != ImportsMode::Auto {
        return configured;
    }

    match class {
        Some(TargetClass::CurrentRuntime | TargetClass::DistBinary) => ImportsMode::RollupNodejs,
        Some(TargetClass::Library | TargetClass::Custom) => ImportsMode::RollupWebpack,
        Some(TargetClass::BrowserList) => ImportsMode::Webpack,
        None => ImportsMode::Off,
    }
}

/// Universal imports read chunk names from magic comments, so they must survive.
pub fn keep_comments(configured: bool, imports: ImportsMode) -> bool {
    configured || imports == ImportsMode::Webpack
}

/// Drop the async rewrite when every targeted engine runs `async` natively.
pub fn gate_async(
    configured: RewriteAsync,
    preset: &dyn EnvPreset,
    targets: &NormalizedTargets,
) -> RewriteAsync {
    if preset.is_plugin_required(targets, ASYNC_TO_GENERATOR) {
        configured
    } else {
        RewriteAsync::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browserslist::StaticQueries;
    use crate::root::FixedRoot;

    fn ctx() -> PresetContext {
        PresetContext::hermetic("/work/app", HashMap::new())
            .with_project_root(FixedRoot(PathBuf::from("/work/app")))
            .with_browserslist(StaticQueries::new(["ie 11"]))
    }

    #[test]
    fn default_target_is_nodejs() {
        assert_eq!(select_target(None, "development"), Target::named("nodejs"));
    }

    #[test]
    fn test_env_defaults_to_test_target() {
        assert_eq!(select_target(None, "test"), Target::named("test"));
        assert_eq!(
            select_target(Some(&Target::named("browser")), "test"),
            Target::named("browser")
        );
    }

    #[test]
    fn explicit_modules_are_kept() {
        assert_eq!(
            resolve_modules(ModuleFormat::Amd, Some(TargetClass::Library)),
            ModuleFormat::Amd
        );
    }

    #[test]
    fn unclassified_targets_fall_back() {
        assert_eq!(resolve_modules(ModuleFormat::Auto, None), ModuleFormat::CommonJs);
        assert_eq!(resolve_imports(ImportsMode::Auto, None), ImportsMode::Off);
    }

    #[test]
    fn custom_targets_use_rollup_webpack() {
        assert_eq!(
            resolve_imports(ImportsMode::Auto, Some(TargetClass::Custom)),
            ImportsMode::RollupWebpack
        );
        assert_eq!(
            resolve_modules(ModuleFormat::Auto, Some(TargetClass::Custom)),
            ModuleFormat::CommonJs
        );
    }

    #[test]
    fn webpack_keeps_comments() {
        assert!(keep_comments(false, ImportsMode::Webpack));
        assert!(!keep_comments(false, ImportsMode::RollupWebpack));
        assert!(keep_comments(true, ImportsMode::Off));
    }

    #[test]
    fn compliance_labels() {
        let mut options = PresetOptions::default();
        let resolved = resolve(&ctx(), &options).unwrap().options;
        assert_eq!(resolved.compliance(), "LOOSE");

        options.spec_mode = Some(true);
        let resolved = resolve(&ctx(), &options).unwrap().options;
        assert_eq!(resolved.compliance(), "SPEC");

        options.spec_mode = Some(false);
        options.loose_mode = Some(false);
        let resolved = resolve(&ctx(), &options).unwrap().options;
        assert_eq!(resolved.compliance(), "DEFAULT");
    }

    #[test]
    fn source_alias_is_resolved_against_the_root() {
        let resolved = resolve(&ctx(), &PresetOptions::default()).unwrap().options;
        assert_eq!(resolved.source_alias, Some(PathBuf::from("/work/app/src")));
    }

    #[test]
    fn no_auto_values_survive() {
        for target in ["node", "test", "browser", "library", "modern", "es2015", "deno"] {
            let options = PresetOptions::default().with_target(target);
            let resolved = resolve(&ctx(), &options).unwrap().options;
            assert_ne!(resolved.modules, ModuleFormat::Auto, "{target}");
            assert_ne!(resolved.imports, ImportsMode::Auto, "{target}");
            assert_ne!(resolved.env, "auto", "{target}");
        }
    }
}
