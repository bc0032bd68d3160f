//! Browserslist lookup against real project files.

use edge_preset::browserslist::{BROWSERSLIST, BROWSERSLIST_ENV};
use edge_preset::{
    resolve, BrowserslistConfig, BrowserslistResolver, FixedRoot, PassId, PresetContext,
    PresetOptions,
};
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn browserslistrc_sections_follow_the_build_env() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".browserslistrc"),
        "# shared\n[production]\nlast 2 chrome versions\n\n[development]\nlast 1 firefox version\n",
    )
    .unwrap();

    let config = BrowserslistConfig::new(dir.path()).with_env_source(HashMap::new());
    assert_eq!(
        config.queries("production").unwrap(),
        vec!["last 2 chrome versions"]
    );
    assert_eq!(
        config.queries("development").unwrap(),
        vec!["last 1 firefox version"]
    );
}

#[test]
fn package_json_field_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "app", "browserslist": ["> 1%", "not dead"] }"#,
    )
    .unwrap();

    let config = BrowserslistConfig::new(dir.path()).with_env_source(HashMap::new());
    assert_eq!(config.queries("production").unwrap(), vec!["> 1%", "not dead"]);
}

#[test]
fn inline_queries_win() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".browserslistrc"), "ie 11\n").unwrap();

    let config = BrowserslistConfig::new(dir.path())
        .with_env_source(vars(&[(BROWSERSLIST, "chrome 70, firefox 60")]));
    assert_eq!(
        config.queries("production").unwrap(),
        vec!["chrome 70", "firefox 60"]
    );
}

#[test]
fn browserslist_env_picks_the_section() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".browserslistrc"),
        "[production]\nchrome 70\n[legacy]\nie 11\n",
    )
    .unwrap();

    let config = BrowserslistConfig::new(dir.path())
        .with_env_source(vars(&[(BROWSERSLIST_ENV, "legacy")]));
    assert_eq!(config.queries("production").unwrap(), vec!["ie 11"]);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = BrowserslistConfig::new(dir.path()).with_env_source(HashMap::new());
    assert_eq!(config.queries("production").unwrap(), vec!["defaults"]);
}

#[test]
fn browser_target_reads_project_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".browserslistrc"),
        "[production]\nchrome 70\n[development]\nie 11\n",
    )
    .unwrap();

    let ctx = PresetContext::hermetic(dir.path(), HashMap::new())
        .with_project_root(FixedRoot(dir.path().to_path_buf()));

    let production = PresetOptions::default().with_target("browser").with_env("production");
    let resolution = resolve(&ctx, &production).unwrap();
    let env = resolution
        .config
        .preset(PassId::EnvPreset)
        .and_then(|p| p.options.clone())
        .unwrap();
    assert_eq!(env["targets"], json!({ "browsers": ["chrome 70"] }));
    assert!(!resolution.config.has_plugin(PassId::FastAsync));

    let development = PresetOptions::default().with_target("browser").with_env("development");
    let resolution = resolve(&ctx, &development).unwrap();
    assert!(resolution.config.has_plugin(PassId::FastAsync));
}

#[test]
fn config_in_a_parent_directory_is_found() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".browserslistrc"),
        "[production]\nchrome 70\n",
    )
    .unwrap();
    let nested = dir.path().join("packages/app");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("package.json"), r#"{ "name": "app" }"#).unwrap();

    let config = BrowserslistConfig::new(&nested).with_env_source(HashMap::new());
    assert_eq!(config.queries("production").unwrap(), vec!["chrome 70"]);
}

#[test]
fn closest_config_wins() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".browserslistrc"), "ie 11\n").unwrap();
    let nested = dir.path().join("app");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("package.json"),
        r#"{ "name": "app", "browserslist": "firefox 60" }"#,
    )
    .unwrap();

    let config = BrowserslistConfig::new(&nested).with_env_source(HashMap::new());
    assert_eq!(config.queries("production").unwrap(), vec!["firefox 60"]);
}
