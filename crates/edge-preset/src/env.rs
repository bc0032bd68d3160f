//! Ambient environment lookup.
//!
//! The resolver never touches `std::env` directly; it asks an [`EnvSource`].
//! [`ProcessEnv`] is the real thing, a `HashMap` stands in for it in tests.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::options::AUTO_ENV;

/// Variable with the highest priority when the environment is `"auto"`.
pub const BABEL_ENV: &str = "BABEL_ENV";
/// Node-style environment variable, consulted after [`BABEL_ENV`].
pub const NODE_ENV: &str = "NODE_ENV";
/// Environment used when nothing else is set.
pub const FALLBACK_ENV: &str = "development";

static PRODUCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bproduction\b").expect("production pattern is valid"));

/// Source of ambient environment variables.
pub trait EnvSource {
    /// Value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key`, treating empty strings as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// Reads the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Settle the configured environment name.
///
/// Anything other than `"auto"` (or an empty string) is taken as is.
/// Otherwise the first of `BABEL_ENV`, `NODE_ENV` and `"development"` wins.
pub fn resolve_env(configured: &str, source: &dyn EnvSource) -> String {
    if !configured.is_empty() && configured != AUTO_ENV {
        return configured.to_string();
    }

    source
        .non_empty(BABEL_ENV)
        .or_else(|| source.non_empty(NODE_ENV))
        .unwrap_or_else(|| FALLBACK_ENV.to_string())
}

/// Whether the environment name contains `production` as a whole word.
pub fn is_production(env: &str) -> bool {
    PRODUCTION.is_match(env)
}
