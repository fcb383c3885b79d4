use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `trellis` command isolated from the user's config and environment.
fn trellis(home: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("trellis");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("TRELLIS_SCENARIO")
        .env_remove("TRELLIS_BLUEPRINTS_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn vue_starter_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../trellis-adapters/blueprints/vue-starter")
}

#[test]
fn no_arguments_prints_help_and_fails() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn version_goes_to_stdout_and_succeeds() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["list", "--bogus"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn list_names_the_builtin_blueprint() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vue-starter"));
}

#[test]
fn list_json_is_parseable() {
    let tmp = TempDir::new().unwrap();
    let out = trellis(tmp.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed[0]["name"], "vue-starter");
}

#[test]
fn scenario_run_writes_the_project() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["new", "app", "--scenario", "minimal", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next steps:"))
        .stdout(predicate::str::contains("cd app"));

    let root = tmp.path().join("app");
    assert!(root.join("src/main.js").is_file());
    assert!(!root.join("src/vuex").exists());
    let pkg: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
    assert_eq!(pkg["name"], "test-minimal");
}

#[test]
fn scenario_can_come_from_the_environment() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["new", "app"])
        .env("TRELLIS_SCENARIO", "full")
        .assert()
        .success();
    assert!(tmp.path().join("app/src/modules/auth/index.js").is_file());
}

#[test]
fn existing_project_is_refused_without_force() {
    let tmp = TempDir::new().unwrap();
    let args = ["new", "app", "--scenario", "minimal", "--skip-install"];
    trellis(tmp.path()).args(args).assert().success();
    trellis(tmp.path())
        .args(args)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
    trellis(tmp.path())
        .args(args)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["new", "app", "--scenario", "full", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ src/main.js (unfiltered)"))
        .stdout(predicate::str::contains("- test/unit/karma.conf.js (excluded by"))
        .stdout(predicate::str::contains("files would be written"));
    assert!(!tmp.path().join("app").exists());
}

#[test]
fn defaults_only_run_names_the_project_after_the_directory() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["new", "shop", "--yes", "--skip-install"])
        .assert()
        .success();
    let pkg: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(tmp.path().join("shop/package.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(pkg["name"], "shop");
}

#[test]
fn unknown_blueprint_exits_with_not_found() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["new", "app", "--blueprint", "react", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("vue-starter"));
}

#[test]
fn unknown_scenario_exits_with_not_found() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["new", "app", "--scenario", "nope"])
        .assert()
        .code(3);
    assert!(!tmp.path().join("app").exists());
}

#[test]
fn from_directory_uses_an_on_disk_blueprint() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["new", "app", "--scenario", "minimal", "--skip-install", "--from"])
        .arg(vue_starter_dir())
        .assert()
        .success();
    assert!(tmp.path().join("app/index.html").is_file());
}

#[test]
fn check_accepts_the_shipped_blueprint() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .arg("check")
        .arg(vue_starter_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("vue-starter"))
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn check_reports_dead_filters() {
    let tmp = TempDir::new().unwrap();
    let bp = tmp.path().join("bp");
    std::fs::create_dir_all(bp.join("template")).unwrap();
    std::fs::write(bp.join("template/README.md"), "hello\n").unwrap();
    std::fs::write(
        bp.join("blueprint.toml"),
        r#"
[blueprint]
name = "probe"

[[prompts]]
name = "docs"
type = "confirm"
message = "Docs?"

[filters]
"docs/**/*" = "docs"
"#,
    )
    .unwrap();

    trellis(tmp.path())
        .args(["check", "bp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("matches no template file"));
}

#[test]
fn check_rejects_an_invalid_manifest() {
    let tmp = TempDir::new().unwrap();
    let bp = tmp.path().join("broken");
    std::fs::create_dir_all(bp.join("template")).unwrap();
    std::fs::write(bp.join("template/a.txt"), "a").unwrap();
    std::fs::write(bp.join("blueprint.toml"), "[blueprint\nname = ").unwrap();

    trellis(tmp.path())
        .args(["check", "broken"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid blueprint"));
}

#[test]
fn config_get_reads_defaults_and_environment() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["config", "get", "defaults.blueprint"])
        .assert()
        .success()
        .stdout(predicate::str::diff("vue-starter\n"));
    trellis(tmp.path())
        .args(["config", "get", "defaults.package_manager"])
        .env("TRELLIS__DEFAULTS__PACKAGE_MANAGER", "yarn")
        .assert()
        .success()
        .stdout(predicate::str::diff("yarn\n"));
}

#[test]
fn local_config_file_is_honoured() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".trellis.toml"),
        "[defaults]\nskip_install = true\n",
    )
    .unwrap();
    trellis(tmp.path())
        .args(["config", "get", "defaults.skip_install"])
        .assert()
        .success()
        .stdout(predicate::str::diff("true\n"));
}

#[test]
fn missing_config_file_exits_with_configuration_error() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["--config", "missing.toml", "list"])
        .assert()
        .code(4);
}

#[test]
fn init_local_writes_once() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["init", "--local"])
        .assert()
        .success();
    let written = std::fs::read_to_string(tmp.path().join(".trellis.toml")).unwrap();
    assert!(written.contains("blueprint = \"vue-starter\""));

    trellis(tmp.path())
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn completions_are_generated() {
    let tmp = TempDir::new().unwrap();
    trellis(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trellis"));
}
