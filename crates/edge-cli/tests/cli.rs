//! End-to-end tests for the `edge` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const AMBIENT_VARS: [&str; 8] = [
    "BABEL_ENV",
    "NODE_ENV",
    "BROWSERSLIST",
    "BROWSERSLIST_ENV",
    "APP_ROOT_PATH",
    "EDGE_TARGET",
    "EDGE_ENV",
    "RUST_LOG",
];

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), r#"{ "name": "app" }"#).unwrap();
    dir
}

fn edge(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("edge").unwrap();
    for var in AMBIENT_VARS {
        cmd.env_remove(var);
    }
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

fn resolve_json(dir: &TempDir, args: &[&str]) -> Value {
    let output = edge(dir).arg("resolve").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn resolve_prints_default_config() {
    let dir = project();
    let config = resolve_json(&dir, &[]);

    assert_eq!(config["compact"], true);
    assert_eq!(config["sourceMaps"], true);
    assert_eq!(config["presets"][0][0], "babel-preset-env");
    assert_eq!(config["presets"][0][1]["modules"], "commonjs");
    assert_eq!(config["presets"][1], "babel-preset-flow");
}

#[test]
fn flags_override_discovered_options() {
    let dir = project();
    fs::write(dir.path().join("edge.toml"), "target = \"library\"\n").unwrap();

    let config = resolve_json(&dir, &[]);
    assert_eq!(config["presets"][0][1]["modules"], false);

    let config = resolve_json(&dir, &["--target", "node", "--no-source-maps"]);
    assert_eq!(config["presets"][0][1]["modules"], "commonjs");
    assert_eq!(config["sourceMaps"], false);
}

#[test]
fn env_flag_selects_production_passes() {
    let dir = project();
    let config = resolve_json(&dir, &["--env", "production", "--compression"]);

    assert_eq!(config["presets"][0], "babel-preset-minify");
    let plugins: Vec<String> = config["plugins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| match p {
            Value::String(name) => name.clone(),
            Value::Array(pair) => pair[0].as_str().unwrap().to_string(),
            other => panic!("unexpected descriptor {other}"),
        })
        .collect();
    assert!(plugins.contains(&"babel-plugin-react-intl".to_string()));
    assert!(!plugins.contains(&"babel-plugin-transform-react-jsx-source".to_string()));
}

#[test]
fn node_env_is_read_when_env_is_auto() {
    let dir = project();
    let output = edge(&dir)
        .args(["explain"])
        .env("NODE_ENV", "production")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("env: production"), "{stdout}");
    assert!(stdout.contains("production: true"), "{stdout}");
}

#[test]
fn output_flag_writes_a_file() {
    let dir = project();
    let out = dir.path().join("babel.json");

    edge(&dir)
        .args(["resolve", "--pretty", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let written: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["compact"], true);
}

#[test]
fn explain_lists_settings_and_passes() {
    let dir = project();
    edge(&dir)
        .args(["explain", "--target", "browser"])
        .assert()
        .success()
        .stdout(predicate::str::contains("browser-list"))
        .stdout(predicate::str::contains("compliance: LOOSE"))
        .stdout(predicate::str::contains("imports: webpack"))
        .stdout(predicate::str::contains("babel-plugin-universal-import"));
}

#[test]
fn invalid_target_object_fails_with_hint() {
    let dir = project();
    edge(&dir)
        .args(["resolve", "--target", r#"{"netscape": 4}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("netscape"));
}

#[test]
fn unknown_module_format_is_rejected() {
    let dir = project();
    edge(&dir)
        .args(["resolve", "--modules", "es6-please"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn missing_root_is_reported() {
    let dir = project();
    edge(&dir)
        .args(["resolve", "--root", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project directory not found"));
}
