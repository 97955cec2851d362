//! Integration tests for the `scriptbind` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shapes/scriptbind.toml")
}

fn scriptbind(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scriptbind"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run scriptbind")
}

#[test]
fn test_generate_writes_artifacts() {
    let out = tempfile::tempdir().unwrap();
    let output = scriptbind(&[
        "generate",
        "--config",
        fixture_config().to_str().unwrap(),
        "--out-dir",
        out.path().to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    for target in ["area_factory.rs", "area_adapter.rs", "Area_Builtins.d.ts", "Area_Builtins.mjs"] {
        assert!(out.path().join(target).exists(), "missing {target}");
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("done: 4 artifact(s), 0 error(s)"), "{stdout}");
}

#[test]
fn test_check_writes_nothing() {
    let output = scriptbind(&["check", "--config", fixture_config().to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("done: 4 artifact(s)"));
}

#[test]
fn test_check_fails_on_missing_interface() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/lib.rs"), "pub struct Nothing;\n").unwrap();
    let config = dir.path().join("scriptbind.toml");
    std::fs::write(&config, "[crate]\nname = \"app\"\n[[interface]]\npath = \"app::Missing\"\n").unwrap();

    let output = scriptbind(&["check", "--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: app::Missing:"));
}

#[test]
fn test_inspect_prints_json() {
    let output = scriptbind(&["inspect", "shapes::Area", "--config", fixture_config().to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["scriptLocation"], "area.js");
    assert_eq!(json["methods"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_config_is_an_error() {
    let output = scriptbind(&["check", "--config", "does/not/exist.toml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load configuration"));
}
