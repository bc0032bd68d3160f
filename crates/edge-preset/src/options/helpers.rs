use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use super::types::RewriteAsync;

pub(crate) const DEFAULT_SOURCE_FOLDER: &str = "src";

pub(crate) fn default_optimize_modules() -> Vec<String> {
    ["lodash", "async", "rambda", "recompose"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_jsx_pragma() -> String {
    "React.createElement".to_string()
}

/// Distinguishes a missing `sourceFolder` (use the default) from one that was
/// explicitly switched off with `null` or `false`.
pub(crate) fn nullable_source_folder<'de, D>(
    deserializer: D,
) -> Result<Option<Option<PathBuf>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Flag(bool),
        Path(PathBuf),
    }

    Ok(Some(match Option::<Repr>::deserialize(deserializer)? {
        None | Some(Repr::Flag(false)) => None,
        Some(Repr::Flag(true)) => Some(PathBuf::from(DEFAULT_SOURCE_FOLDER)),
        Some(Repr::Path(path)) => Some(path),
    }))
}

/// An explicit `null` switches the async rewrite off; a missing key keeps
/// the default.
pub(crate) fn nullable_rewrite_async<'de, D>(
    deserializer: D,
) -> Result<Option<RewriteAsync>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(
        Option::<RewriteAsync>::deserialize(deserializer)?.unwrap_or(RewriteAsync::Off),
    ))
}
