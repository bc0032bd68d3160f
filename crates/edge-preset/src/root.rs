//! Project root lookup for the `~` source alias.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::trace;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::Result;

/// Overrides root discovery when set.
pub const APP_ROOT_PATH: &str = "APP_ROOT_PATH";

/// Locates the root directory of the project being compiled.
pub trait ProjectRoot {
    fn root(&self) -> Result<PathBuf>;
}

/// A root that is known up front.
#[derive(Debug, Clone)]
pub struct FixedRoot(pub PathBuf);

impl ProjectRoot for FixedRoot {
    fn root(&self) -> Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Finds the closest directory with a `package.json`, starting from `start`
/// and walking up. Falls back to `start` itself.
#[derive(Debug, Clone)]
pub struct AppRoot<E = ProcessEnv> {
    start: PathBuf,
    env: E,
}

impl AppRoot<ProcessEnv> {
    pub fn new(start: impl AsRef<Path>) -> Self {
        Self {
            start: start.as_ref().to_path_buf(),
            env: ProcessEnv,
        }
    }
}

impl<E: EnvSource> AppRoot<E> {
    pub fn with_env_source<F: EnvSource>(self, env: F) -> AppRoot<F> {
        AppRoot {
            start: self.start,
            env,
        }
    }
}

impl<E: EnvSource> ProjectRoot for AppRoot<E> {
    fn root(&self) -> Result<PathBuf> {
        if let Some(explicit) = self.env.non_empty(APP_ROOT_PATH) {
            return Ok(absolute(&self.start, Path::new(&explicit)));
        }

        let start = absolute(&std::env::current_dir()?, &self.start);
        let found = start
            .ancestors()
            .find(|dir| dir.join("package.json").is_file())
            .map(Path::to_path_buf);

        trace!(start = %start.display(), found = ?found, "project root lookup");
        Ok(found.unwrap_or(start))
    }
}

/// `base` joined with `path` and cleaned; absolute paths replace `base`.
pub fn absolute(base: &Path, path: &Path) -> PathBuf {
    base.join(path).clean()
}

/// Target of the `~` alias.
pub fn alias_target(root: &Path, source_folder: &Path) -> PathBuf {
    absolute(root, source_folder)
}
