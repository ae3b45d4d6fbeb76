//! Integration tests for the devsh CLI.
//!
//! These exercise the full pipeline through the binary: declaration parsing,
//! catalog resolution, assembly, and activation, including exit-code
//! mapping.

#![allow(clippy::print_stdout)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn devsh() -> Command {
    Command::cargo_bin("devsh").expect("devsh binary builds")
}

fn write_declaration(dir: &Path, contents: &str) -> String {
    let path = dir.join("devsh.toml");
    fs::write(&path, contents).expect("write declaration");
    path.to_string_lossy().to_string()
}

fn write_catalog(dir: &Path, contents: &str) -> String {
    let path = dir.join("catalog.toml");
    fs::write(&path, contents).expect("write catalog");
    path.to_string_lossy().to_string()
}

const TWO_TOOL_CATALOG: &str = r#"
[[tools]]
name = "a"
version = "1.0.0"
path = "/p/a"

[[tools]]
name = "b"
version = "2.1.0"
path = "/p/b"
"#;

#[test]
fn run_command_succeeds_with_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(dir.path(), r#"tools = ["a", "b"]"#);
    let catalog = write_catalog(dir.path(), TWO_TOOL_CATALOG);

    devsh()
        .args(["run", "--catalog", &catalog, "--command", "echo hi", &decl])
        .assert()
        .success()
        .stdout(predicate::str::contains("hi"));
}

#[test]
fn run_propagates_child_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(dir.path(), r#"tools = []"#);
    let catalog = write_catalog(dir.path(), "");

    devsh()
        .args(["run", "--catalog", &catalog, "--command", "exit 7", &decl])
        .assert()
        .code(7);
}

#[test]
fn run_command_sees_declared_variables() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(
        dir.path(),
        r#"
tools = []

[variables]
DEVSH_TEST_VAR = "activated"
"#,
    );
    let catalog = write_catalog(dir.path(), "");

    devsh()
        .args([
            "run",
            "--catalog",
            &catalog,
            "--command",
            "printf '%s' \"$DEVSH_TEST_VAR\"",
            &decl,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("activated"));
}

#[test]
fn duplicate_tool_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(dir.path(), r#"tools = ["a", "a"]"#);
    let catalog = write_catalog(dir.path(), TWO_TOOL_CATALOG);

    devsh()
        .args(["run", "--catalog", &catalog, "--command", "echo hi", &decl])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate"));
}

#[test]
fn malformed_declaration_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(dir.path(), "tools = [");
    let catalog = write_catalog(dir.path(), "");

    devsh()
        .args(["run", "--catalog", &catalog, "--command", "echo hi", &decl])
        .assert()
        .code(2);
}

#[test]
fn unknown_tool_exits_3_without_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(dir.path(), r#"tools = ["c"]"#);
    let catalog = write_catalog(dir.path(), TWO_TOOL_CATALOG);
    let marker = dir.path().join("spawned");

    devsh()
        .args([
            "run",
            "--catalog",
            &catalog,
            "--command",
            &format!("touch {}", marker.display()),
            &decl,
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown tool"));

    assert!(!marker.exists(), "no session may be spawned on failure");
}

#[test]
fn version_unavailable_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(dir.path(), r#"tools = ["a@^9.0"]"#);
    let catalog = write_catalog(dir.path(), TWO_TOOL_CATALOG);

    devsh()
        .args(["run", "--catalog", &catalog, "--command", "echo hi", &decl])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no version"));
}

#[test]
fn print_hermetic_composes_search_path_in_declaration_order() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(
        dir.path(),
        r#"
tools = ["b", "a"]

[variables]
X = "1"
"#,
    );
    let catalog = write_catalog(dir.path(), TWO_TOOL_CATALOG);

    devsh()
        .args(["print", "--catalog", &catalog, "--hermetic", &decl])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "export PATH=\"/p/b/bin:/p/a/bin\"",
        ))
        .stdout(predicate::str::contains("export X=\"1\""));
}

#[test]
fn print_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(
        dir.path(),
        r#"
tools = ["a"]

[variables]
X = "1"
"#,
    );
    let catalog = write_catalog(dir.path(), TWO_TOOL_CATALOG);

    let output = devsh()
        .args([
            "print",
            "--catalog",
            &catalog,
            "--hermetic",
            "--output",
            "json",
            &decl,
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(parsed["PATH"], "/p/a/bin");
    assert_eq!(parsed["X"], "1");
}

#[test]
fn print_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(
        dir.path(),
        r#"
tools = ["a", "b"]

[variables]
ZETA = "z"
ALPHA = "a"
"#,
    );
    let catalog = write_catalog(dir.path(), TWO_TOOL_CATALOG);

    let run = || {
        devsh()
            .args(["print", "--catalog", &catalog, "--hermetic", &decl])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn check_valid_declaration() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(
        dir.path(),
        r#"
tools = ["rustc", "cargo", "rustfmt"]

[variables]
RUST_SRC_PATH = "/opt/rust/library"
"#,
    );

    devsh()
        .args(["check", &decl])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 tools, 1 variables"))
        .stdout(predicate::str::contains("tool rustc"));
}

#[test]
fn check_declared_path_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(
        dir.path(),
        r#"
[variables]
PATH = "/usr/bin"
"#,
    );

    devsh()
        .args(["check", &decl])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PATH"));
}

#[test]
fn missing_declaration_file_exits_3() {
    devsh()
        .args(["check", "/absent/devsh.toml"])
        .assert()
        .code(3);
}

#[test]
fn json_error_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write_declaration(dir.path(), r#"tools = ["a", "a"]"#);

    let output = devsh()
        .args(["--json", "check", &decl])
        .assert()
        .code(2)
        .get_output()
        .stderr
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON on stderr");
    assert_eq!(parsed["error"]["code"], "declaration");
}
