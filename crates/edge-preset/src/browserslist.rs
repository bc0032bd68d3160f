//! Browserslist configuration lookup.
//!
//! Browser targets are described by the project's browserslist config rather
//! than by preset options. [`BrowserslistConfig`] finds that config the same
//! way browserslist does and returns the queries for a build environment.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::{PresetError, Result};
use crate::root::absolute;

/// Queries used when a project has no browserslist config.
pub const DEFAULT_QUERIES: [&str; 1] = ["defaults"];

/// Inline queries, taking priority over any config file.
pub const BROWSERSLIST: &str = "BROWSERSLIST";
/// Overrides the environment name used to pick a config section.
pub const BROWSERSLIST_ENV: &str = "BROWSERSLIST_ENV";

const DEFAULT_SECTION: &str = "defaults";
const CONFIG_FILES: [&str; 2] = [".browserslistrc", "browserslist"];

/// Returns the browser queries that apply to a build environment.
pub trait BrowserslistResolver {
    /// Queries for `env`, usually `"production"` or `"development"`.
    ///
    /// # Errors
    ///
    /// [`PresetError::Read`] or [`PresetError::Browserslist`] when a config
    /// exists but cannot be used.
    fn queries(&self, env: &str) -> Result<Vec<String>>;
}

/// Fixed queries, optionally per environment.
#[derive(Debug, Clone, Default)]
pub struct StaticQueries {
    defaults: Vec<String>,
    sections: BTreeMap<String, Vec<String>>,
}

impl StaticQueries {
    pub fn new<I, S>(queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            defaults: queries.into_iter().map(Into::into).collect(),
            sections: BTreeMap::new(),
        }
    }

    pub fn with_env<I, S>(mut self, env: impl Into<String>, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections
            .insert(env.into(), queries.into_iter().map(Into::into).collect());
        self
    }
}

impl BrowserslistResolver for StaticQueries {
    fn queries(&self, env: &str) -> Result<Vec<String>> {
        Ok(self
            .sections
            .get(env)
            .unwrap_or(&self.defaults)
            .clone())
    }
}

/// Reads browserslist configuration from a project directory.
///
/// Lookup order:
/// 1. `BROWSERSLIST` environment variable
/// 2. `.browserslistrc` or `browserslist` file, or the `browserslist` field
///    of `package.json`, in the project root or the closest parent that has one
/// 3. [`DEFAULT_QUERIES`]
#[derive(Debug, Clone)]
pub struct BrowserslistConfig<E = ProcessEnv> {
    root: PathBuf,
    env: E,
}

impl BrowserslistConfig<ProcessEnv> {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            env: ProcessEnv,
        }
    }
}

impl<E: EnvSource> BrowserslistConfig<E> {
    pub fn with_env_source<F: EnvSource>(self, env: F) -> BrowserslistConfig<F> {
        BrowserslistConfig {
            root: self.root,
            env,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All sections of the closest config, `None` if there is no config.
    ///
    /// Starts in the project root and walks up through its parents; in each
    /// directory a config file wins over the `package.json` field.
    pub fn load_sections(&self) -> Result<Option<BTreeMap<String, Vec<String>>>> {
        let start = absolute(&std::env::current_dir()?, &self.root);
        for dir in start.ancestors() {
            if let Some(sections) = sections_in(dir)? {
                return Ok(Some(sections));
            }
        }
        Ok(None)
    }
}

fn sections_in(dir: &Path) -> Result<Option<BTreeMap<String, Vec<String>>>> {
    for name in CONFIG_FILES {
        let path = dir.join(name);
        if path.is_file() {
            debug!(path = %path.display(), "reading browserslist config");
            let content = fs::read_to_string(&path).map_err(|source| PresetError::Read {
                path: path.clone(),
                source,
            })?;
            return Ok(Some(parse_config(&content)));
        }
    }

    let pkg_path = dir.join("package.json");
    if pkg_path.is_file() {
        let content = fs::read_to_string(&pkg_path).map_err(|source| PresetError::Read {
            path: pkg_path.clone(),
            source,
        })?;
        let parsed: Value = serde_json::from_str(&content)?;
        if let Some(field) = parsed.get("browserslist").filter(|v| !v.is_null()) {
            debug!(path = %pkg_path.display(), "reading browserslist field");
            return parse_package_field(field).map(Some);
        }
    }

    Ok(None)
}

impl<E: EnvSource> BrowserslistResolver for BrowserslistConfig<E> {
    fn queries(&self, env: &str) -> Result<Vec<String>> {
        if let Some(inline) = self.env.non_empty(BROWSERSLIST) {
            return Ok(split_queries(&inline));
        }

        let env = self
            .env
            .non_empty(BROWSERSLIST_ENV)
            .unwrap_or_else(|| env.to_string());

        let queries = self
            .load_sections()?
            .and_then(|mut sections| {
                sections
                    .remove(&env)
                    .or_else(|| sections.remove(DEFAULT_SECTION))
            })
            .filter(|queries| !queries.is_empty())
            .unwrap_or_else(|| DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect());

        debug!(env = %env, ?queries, "browserslist queries");
        Ok(queries)
    }
}

/// Parse a `.browserslistrc` file into sections.
///
/// Queries before the first `[section]` header belong to `defaults`; a header
/// may name several environments separated by spaces.
pub fn parse_config(content: &str) -> BTreeMap<String, Vec<String>> {
    let mut sections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current = vec![DEFAULT_SECTION.to_string()];

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = header.split_whitespace().map(str::to_string).collect();
            for name in &current {
                sections.entry(name.clone()).or_default();
            }
            continue;
        }

        for name in &current {
            sections
                .entry(name.clone())
                .or_default()
                .extend(split_queries(line));
        }
    }

    sections
}

fn parse_package_field(field: &Value) -> Result<BTreeMap<String, Vec<String>>> {
    let mut sections = BTreeMap::new();
    match field {
        Value::Object(map) => {
            for (env, queries) in map {
                sections.insert(env.clone(), queries_from_value(queries)?);
            }
        }
        other => {
            sections.insert(DEFAULT_SECTION.to_string(), queries_from_value(other)?);
        }
    }
    Ok(sections)
}

fn queries_from_value(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(queries) => Ok(split_queries(queries)),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    PresetError::Browserslist(format!("expected a query string, got {item}"))
                })
            })
            .collect(),
        other => Err(PresetError::Browserslist(format!(
            "expected a query string or list, got {other}"
        ))),
    }
}

fn split_queries(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}
