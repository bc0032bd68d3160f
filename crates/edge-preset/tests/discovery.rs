//! Tests for option discovery across edge.toml, package.json and `EDGE_*` variables

use edge_preset::discovery::CONFIG_FILE;
use edge_preset::{ImportsMode, OptionsDiscovery, PresetError, PresetOptions, Target};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_package_json(dir: &TempDir, edge: &str) {
    fs::write(
        dir.path().join("package.json"),
        format!(r#"{{ "name": "app", "browserslist": ["ie 11"], "edge": {edge} }}"#),
    )
    .unwrap();
}

#[test]
fn reads_package_json_field() {
    let dir = TempDir::new().unwrap();
    write_package_json(&dir, r#"{ "target": "browser", "imports": "bundler-webpack" }"#);

    let options = OptionsDiscovery::new(dir.path())
        .without_env()
        .load()
        .unwrap();
    assert_eq!(options.target, Some(Target::named("browser")));
    assert_eq!(options.imports, Some(ImportsMode::RollupWebpack));
}

#[test]
fn package_json_overrides_edge_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        "target = \"library\"\ncompression = true\n",
    )
    .unwrap();
    write_package_json(&dir, r#"{ "target": "node8" }"#);

    let options = OptionsDiscovery::new(dir.path())
        .without_env()
        .load()
        .unwrap();
    assert_eq!(options.target, Some(Target::named("node8")));
    assert_eq!(options.compression, Some(true));
}

#[test]
fn overrides_win_over_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "target = \"library\"\n").unwrap();

    let overrides = PresetOptions::default().with_target("web");
    let options = OptionsDiscovery::new(dir.path())
        .without_env()
        .load_with(&overrides)
        .unwrap();
    assert_eq!(options.target, Some(Target::named("web")));
}

#[test]
fn custom_targets_load_from_toml_tables() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        "sourceFolder = \"lib\"\n\n[target]\nnode = \"8.9\"\n",
    )
    .unwrap();

    let options = OptionsDiscovery::new(dir.path())
        .without_env()
        .load()
        .unwrap();
    assert!(matches!(options.target, Some(Target::Custom(_))));
    assert_eq!(options.source_folder, Some(Some(PathBuf::from("lib"))));
}

#[test]
fn explicit_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edge.json");
    fs::write(&path, r#"{ "minified": true }"#).unwrap();

    let discovery = OptionsDiscovery::new(dir.path()).with_config_file(&path);
    assert_eq!(discovery.find(), Some(path));
    let options = discovery.without_env().load().unwrap();
    assert_eq!(options.minified, Some(true));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "targt = \"node\"\n").unwrap();

    let result = OptionsDiscovery::new(dir.path()).without_env().load();
    assert!(matches!(result, Err(PresetError::Config(_))));
}

#[test]
#[serial]
fn env_variables_override_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "target = \"library\"\n").unwrap();

    unsafe {
        std::env::set_var("EDGE_TARGET", "browser");
        std::env::set_var("EDGE_SOURCE_MAPS", "false");
    }
    let result = OptionsDiscovery::new(dir.path()).load();
    unsafe {
        std::env::remove_var("EDGE_TARGET");
        std::env::remove_var("EDGE_SOURCE_MAPS");
    }

    let options = result.unwrap();
    assert_eq!(options.target, Some(Target::named("browser")));
    assert_eq!(options.source_maps, Some(false));
}
