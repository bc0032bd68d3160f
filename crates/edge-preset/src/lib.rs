//! Edge preset - resolves build intent into a JavaScript transform pipeline.
//!
//! A caller states *what* it is building (a Node binary, a library, a browser
//! bundle) and for which environment. The resolver turns that into an ordered
//! list of presets and plugins, with options, for a downstream compiler.
//!
//! # Architecture
//!
//! - [`options`] - Partial options as supplied by the caller
//! - [`env`] - Build environment detection
//! - [`target`] - Target classification and environment targets
//! - [`browserslist`] - Browser query lookup
//! - [`compat`] - Engine versions and plugin requirement checks
//! - [`root`] - Project root lookup for the source alias
//! - [`pipeline`] - Pass descriptors and the ordered pipeline tables
//! - [`resolve`](mod@resolve) - The resolver tying everything together
//! - [`discovery`] - Loading options from `edge.toml`, `package.json` and env
//!
//! # Example
//!
//! ```
//! use edge_preset::{resolve, PresetContext, PresetOptions, Target};
//! use std::collections::HashMap;
//!
//! let ctx = PresetContext::hermetic(".", HashMap::new());
//! let options = PresetOptions::default().with_target(Target::named("library"));
//!
//! let resolution = resolve(&ctx, &options).unwrap();
//! let config = resolution.config.to_json().unwrap();
//! assert_eq!(config["compact"], true);
//! ```

pub mod browserslist;
pub mod compat;
pub mod discovery;
pub mod env;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod resolve;
pub mod root;
pub mod target;

pub use browserslist::{BrowserslistConfig, BrowserslistResolver, StaticQueries};
pub use compat::{BuiltinEnvPreset, Engine, EngineVersion, EnvPreset, NormalizedTargets};
pub use discovery::{discover_options, OptionsDiscovery};
pub use env::{EnvSource, ProcessEnv};
pub use error::{PresetError, Result};
pub use options::{ImportsMode, ModuleFormat, PresetOptions, PresetSettings, RewriteAsync, Target};
pub use pipeline::{PassDescriptor, PassId, PresetConfig};
pub use resolve::{resolve, PresetContext, Resolution, ResolvedOptions};
pub use root::{AppRoot, FixedRoot, ProjectRoot};
pub use target::{EnvTargets, TargetClass};
