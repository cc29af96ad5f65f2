//! Integration tests for the hexscrew CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a hexscrew command isolated from the user's config
fn hexscrew(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hexscrew").unwrap();
    cmd.env("HEXSCREW_CONFIG", tmp.path().join("config.yaml"))
        .env_remove("HEXSCREW_TABLE")
        .env_remove("HEXSCREW_MACRO_DIR")
        .env_remove("HEXSCREW_DEFAULT_LENGTH")
        .env_remove("RUST_LOG");
    cmd
}

/// Custom table with a single M4 row
const SMALL_TABLE: &str = r#"standard: ISO 4014
edition: "1979"
thread: partial
head: hex
sizes:
  - designation: M4
    d: 4.0
    thread_pitch: 0.7
    b:
      b1: 14.0
    washer_face: { min: 0.15, max: 0.4 }
    ds: { min: 3.82, max: 4.0 }
    k_nom: 2.8
    k_grade_a: { min: 2.68, max: 2.92 }
    s: { min: 6.78, max: 7.0 }
    product_grade: A
"#;

// ============================================================================
// General
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sizes"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("install-status"));
}

#[test]
fn test_version() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hexscrew"));
}

// ============================================================================
// Sizes
// ============================================================================

#[test]
fn test_sizes_list_is_numeric_order() {
    let tmp = TempDir::new().unwrap();
    let output = hexscrew(&tmp)
        .args(["sizes", "list", "-f", "csv"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let sizes: Vec<&str> = stdout
        .lines()
        .skip(1)
        .filter_map(|l| l.split(',').next())
        .collect();
    assert_eq!(
        sizes,
        vec!["M3", "M4", "M5", "M6", "M8", "M10", "M12", "M14", "M16", "M20", "M24", "M30", "M36"]
    );
    assert!(stdout.starts_with("size,s_max,k_nom,ds_max,grade,note"));
}

#[test]
fn test_sizes_list_count_and_deprecated_filter() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["sizes", "list", "--count"])
        .assert()
        .success()
        .stdout("13\n");

    hexscrew(&tmp)
        .args(["sizes", "list", "--count", "--no-deprecated"])
        .assert()
        .success()
        .stdout("12\n");

    hexscrew(&tmp)
        .args(["sizes", "list", "--count", "--include-deprecated"])
        .assert()
        .success()
        .stdout("13\n");

    hexscrew(&tmp)
        .args(["sizes", "list", "--include-deprecated", "--no-deprecated"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_sizes_list_markdown_all_columns() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["sizes", "list", "--all-columns", "-f", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| SIZE"))
        .stdout(predicate::str::contains("KB MAX"))
        .stdout(predicate::str::contains("M36"));
}

#[test]
fn test_sizes_list_json() {
    let tmp = TempDir::new().unwrap();
    let output = hexscrew(&tmp)
        .args(["sizes", "list", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let sizes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sizes = sizes.as_array().unwrap();
    assert_eq!(sizes.len(), 13);
    assert_eq!(sizes[0]["designation"], "M3");
}

#[test]
fn test_sizes_show() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["sizes", "show", "m8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M8"))
        .stdout(predicate::str::contains("12.73..13"))
        .stdout(predicate::str::contains("ISO 4014-1979"));
}

#[test]
fn test_sizes_show_yaml() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["sizes", "show", "M14", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("designation: M14"))
        .stdout(predicate::str::contains("deprecation: avoid"));
}

#[test]
fn test_sizes_show_unknown_size() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["sizes", "show", "M7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown screw size"));
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn test_build_yaml_shape() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["build", "--size", "M8", "--length", "40"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("op: fuse"))
        .stdout(predicate::str::contains("op: extrusion"))
        .stdout(predicate::str::contains("op: cylinder"))
        .stdout(predicate::str::contains("height: 45.3"));
}

#[test]
fn test_build_summary_json() {
    let tmp = TempDir::new().unwrap();
    let output = hexscrew(&tmp)
        .args(["build", "--size", "M8", "--length", "40", "--summary", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["designation"], "M8");
    assert_eq!(summary["across_flats"], 13.0);
    assert_eq!(summary["thread_length"], 22.0);
    let overall = summary["overall_length"].as_f64().unwrap();
    assert!((overall - 45.3).abs() < 1e-9);
}

#[test]
fn test_build_default_length() {
    let tmp = TempDir::new().unwrap();
    let output = hexscrew(&tmp)
        .args(["build", "--size", "M4", "--summary", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["length"], 15.0);
}

#[test]
fn test_build_length_from_environment() {
    let tmp = TempDir::new().unwrap();
    let output = hexscrew(&tmp)
        .env("HEXSCREW_DEFAULT_LENGTH", "2 cm")
        .args(["build", "--size", "M4", "--summary", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["length"], 20.0);
}

#[test]
fn test_build_rejects_non_positive_length() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["build", "--size", "M8", "--length", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn test_build_rejects_unknown_unit() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["build", "--size", "M8", "--length", "40 ft"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown length unit"));
}

#[test]
fn test_build_deprecated_size_warns() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["build", "--size", "M14"])
        .assert()
        .success()
        .stderr(predicate::str::contains("non-preferred"));

    hexscrew(&tmp)
        .args(["-q", "build", "--size", "M14"])
        .assert()
        .success()
        .stderr(predicate::str::contains("non-preferred").not());
}

#[test]
fn test_build_writes_output_file() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("m6.json");
    hexscrew(&tmp)
        .args(["build", "--size", "M6", "-f", "json", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Built"));

    let shape: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(shape["op"], "fuse");
    assert_eq!(shape["shapes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_build_rejects_table_format() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["build", "--size", "M6", "-f", "csv"])
        .assert()
        .failure();
}

// ============================================================================
// Custom tables
// ============================================================================

#[test]
fn test_custom_table_replaces_builtin() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("small.yaml");
    fs::write(&table, SMALL_TABLE).unwrap();

    hexscrew(&tmp)
        .arg("--table")
        .arg(&table)
        .args(["sizes", "list", "--count"])
        .assert()
        .success()
        .stdout("1\n");

    hexscrew(&tmp)
        .env("HEXSCREW_TABLE", &table)
        .args(["build", "--size", "M8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown screw size"));
}

#[test]
fn test_broken_table_reports_yaml_error() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("broken.yaml");
    fs::write(&table, "standard: ISO 4014\nsizes: [unclosed\n").unwrap();

    hexscrew(&tmp)
        .arg("--table")
        .arg(&table)
        .args(["sizes", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid size table"));
}

// ============================================================================
// Install
// ============================================================================

#[test]
fn test_install_status_uninstall_cycle() {
    let tmp = TempDir::new().unwrap();
    let macro_dir = tmp.path().join("Macro");

    hexscrew(&tmp)
        .args(["install-status", "--dir"])
        .arg(&macro_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not installed"));

    hexscrew(&tmp)
        .args(["install", "--dir"])
        .arg(&macro_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed"));
    assert!(macro_dir.join("hexscrew/iso4014.yaml").is_file());
    assert!(macro_dir.join("hexscrew/manifest.yaml").is_file());

    hexscrew(&tmp)
        .args(["install", "--dir"])
        .arg(&macro_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already installed"));

    hexscrew(&tmp)
        .args(["install-status", "-f", "json", "--dir"])
        .arg(&macro_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"clean\": true"));

    hexscrew(&tmp)
        .args(["uninstall", "--yes", "--dir"])
        .arg(&macro_dir)
        .assert()
        .success();
    assert!(!macro_dir.join("hexscrew").exists());
}

#[test]
fn test_status_reports_modified_file() {
    let tmp = TempDir::new().unwrap();
    let macro_dir = tmp.path().join("Macro");

    hexscrew(&tmp)
        .args(["install", "--dir"])
        .arg(&macro_dir)
        .assert()
        .success();
    fs::write(macro_dir.join("hexscrew/iso4014.yaml"), "edited").unwrap();

    hexscrew(&tmp)
        .args(["install-status", "--dir"])
        .arg(&macro_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("modified"));

    hexscrew(&tmp)
        .args(["install", "--force", "--yes", "--dir"])
        .arg(&macro_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("will be replaced"));
}

#[test]
fn test_install_uses_configured_macro_dir() {
    let tmp = TempDir::new().unwrap();
    let macro_dir = tmp.path().join("FromEnv");

    hexscrew(&tmp)
        .env("HEXSCREW_MACRO_DIR", &macro_dir)
        .arg("install")
        .assert()
        .success();
    assert!(macro_dir.join("hexscrew/manifest.yaml").is_file());
}

#[test]
fn test_uninstall_without_installation_fails() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["uninstall", "--yes", "--dir"])
        .arg(tmp.path().join("Empty"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_set_show_unset() {
    let tmp = TempDir::new().unwrap();

    hexscrew(&tmp)
        .args(["config", "set", "default_length", "25 mm"])
        .assert()
        .success();
    let written = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
    assert!(written.contains("default_length"));
    assert!(written.contains("25 mm"));

    hexscrew(&tmp)
        .args(["config", "show", "default_length"])
        .assert()
        .success()
        .stdout("25 mm\n");

    let output = hexscrew(&tmp)
        .args(["build", "--size", "M5", "--summary", "-f", "json"])
        .output()
        .unwrap();
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["length"], 25.0);

    hexscrew(&tmp)
        .args(["config", "unset", "default_length"])
        .assert()
        .success();
    hexscrew(&tmp)
        .args(["config", "show", "default_length"])
        .assert()
        .failure();
}

#[test]
fn test_config_rejects_unknown_key_and_bad_value() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["config", "set", "author", "me"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    hexscrew(&tmp)
        .args(["config", "set", "default_format", "xml"])
        .assert()
        .failure();
}

#[test]
fn test_config_path_and_keys() {
    let tmp = TempDir::new().unwrap();
    hexscrew(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));

    hexscrew(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("macro_dir"))
        .stdout(predicate::str::contains("default_length"));
}

#[test]
fn test_config_default_format() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.yaml"), "default_format: json\n").unwrap();

    hexscrew(&tmp)
        .args(["sizes", "show", "M3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"designation\": \"M3\""));
}

#[test]
fn test_config_numeric_default_length_keeps_other_keys() {
    let tmp = TempDir::new().unwrap();
    let macro_dir = tmp.path().join("Macro");
    fs::write(
        tmp.path().join("config.yaml"),
        format!("default_length: 20\nmacro_dir: '{}'\n", macro_dir.display()),
    )
    .unwrap();

    let output = hexscrew(&tmp)
        .args(["build", "--size", "M4", "--summary", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["length"], 20.0);

    hexscrew(&tmp).arg("install").assert().success();
    assert!(macro_dir.join("hexscrew/manifest.yaml").is_file());

    hexscrew(&tmp)
        .args(["config", "set", "default_format", "json"])
        .assert()
        .success();
    let written = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
    assert!(written.contains("default_length: 20"));
    assert!(written.contains("default_format: json"));
}
