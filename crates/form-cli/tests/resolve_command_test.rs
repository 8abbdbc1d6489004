use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::NamedTempFile;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_formcheck") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("formcheck{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_formcheck is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn testdata_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

fn temp_file(extension: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("formcheck-")
        .suffix(extension)
        .tempfile()
        .expect("temporary file should be created");
    file.write_all(content.as_bytes())
        .expect("temporary file should be writable");
    file
}

fn run_resolve(input: &Path, schema: &Path, extra: &[&str]) -> Output {
    let mut command = Command::new(cargo_bin());
    command.args([
        "resolve",
        input.to_string_lossy().as_ref(),
        "-s",
        schema.to_string_lossy().as_ref(),
    ]);
    command.args(extra);
    command.output().expect("formcheck resolve should execute")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout should be JSON ({e}): {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

#[test]
fn test_resolve_empty_login_reports_both_fields() {
    let values = temp_file(".json", r#"{"username": "", "password": ""}"#);
    let output = run_resolve(values.path(), &testdata_path("login.yaml"), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output),
        json!({
            "values": {},
            "errors": {
                "username": {"message": "username field is required", "type": "validation"},
                "password": {"message": "password field is required", "type": "validation"}
            }
        })
    );
}

#[test]
fn test_resolve_valid_login() {
    let values = temp_file(
        ".json",
        r#"{"username": "alice", "password": "secret1", "remember": true}"#,
    );
    let output = run_resolve(values.path(), &testdata_path("login.yaml"), &[]);

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "values": {"username": "alice", "password": "secret1"},
            "errors": {}
        })
    );
}

#[test]
fn test_resolve_raw_keeps_input() {
    let values = temp_file(
        ".json",
        r#"{"username": "alice", "password": "secret1", "remember": true}"#,
    );
    let output = run_resolve(values.path(), &testdata_path("login.yaml"), &["--raw"]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["values"]["remember"], "true");
}

#[test]
fn test_resolve_all_criteria_mode() {
    let values = temp_file(".json", r#"{"username": "alice", "password": "abc"}"#);
    let output = run_resolve(
        values.path(),
        &testdata_path("login.yaml"),
        &["--criteria-mode", "all"],
    );

    assert_eq!(output.status.code(), Some(1));
    let password = &stdout_json(&output)["errors"]["password"];
    assert_eq!(password["message"], "password must be at least 6 characters");
    assert_eq!(password["types"]["too_small"][0], "password must be at least 6 characters");
    assert_eq!(password["types"]["invalid_string"][0], "password needs a digit");
}

#[test]
fn test_resolve_with_config_file() {
    let values = temp_file(".json", r#"{"username": "alice", "password": "abc"}"#);
    let config = temp_file(".yaml", "criteria_mode: all\n");

    let output = Command::new(cargo_bin())
        .args([
            "--config",
            config.path().to_string_lossy().as_ref(),
            "resolve",
            values.path().to_string_lossy().as_ref(),
            "--schema",
            testdata_path("login.yaml").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("formcheck should execute");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["errors"]["password"]["types"].is_object());
}

#[test]
fn test_resolve_json_schema_with_refinement() {
    let values = temp_file(
        ".json",
        r#"{"email": " bob@example.com ", "password": "pw", "confirm": "other"}"#,
    );
    let output = run_resolve(values.path(), &testdata_path("signup.json"), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output)["errors"],
        json!({"confirm": {"message": "passwords do not match", "type": "validation"}})
    );
}

#[test]
fn test_resolve_strict_schema_rejects_unknown_keys() {
    let values = temp_file(
        ".json",
        r#"{"email": "bob@example.com", "password": "pw", "confirm": "pw", "admin": "yes"}"#,
    );
    let output = run_resolve(values.path(), &testdata_path("signup.json"), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output)["errors"]["root"]["message"],
        "Unrecognized key(s) in object: 'admin'"
    );
}

#[test]
fn test_resolve_array_paths() {
    let values = temp_file(
        ".json",
        r#"{"email": "bob@example.com", "password": "pw", "confirm": "pw", "tags": ["a", "", "c", "d"]}"#,
    );
    let output = run_resolve(values.path(), &testdata_path("signup.json"), &[]);

    assert_eq!(output.status.code(), Some(1));
    let errors = &stdout_json(&output)["errors"];
    assert_eq!(errors["tags"]["message"], "at most three tags");
    assert_eq!(
        errors["tags[1]"]["message"],
        "String must contain at least 1 character(s)"
    );
}

#[test]
fn test_resolve_bad_schema_is_a_fault() {
    let values = temp_file(".json", r#"{"code": "x"}"#);
    let schema = temp_file(
        ".yaml",
        "type: object\nfields:\n  code:\n    type: string\n    checks:\n      - pattern: \"([\"\n",
    );
    let output = run_resolve(values.path(), schema.path(), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("schema fault"));
}

#[test]
fn test_resolve_bad_schema_faults_for_empty_values() {
    let values = temp_file(".json", "{}");
    let schema = temp_file(
        ".json",
        r#"{"type": "object", "fields": {"code": {"type": "string", "checks": [{"pattern": "(["}]}}}"#,
    );
    let output = run_resolve(values.path(), schema.path(), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid pattern"));
}

#[test]
fn test_resolve_non_object_values() {
    let values = temp_file(".json", r#"["alice"]"#);
    let output = run_resolve(values.path(), &testdata_path("login.yaml"), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("must be a JSON object"));
}

#[test]
fn test_resolve_missing_schema_file() {
    let values = temp_file(".json", r#"{}"#);
    let output = run_resolve(values.path(), &repo_root().join("does-not-exist.yaml"), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load schema"));
}
