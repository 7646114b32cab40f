//! End-to-end tests for the `course-repo` CLI.
//!
//! These tests invoke the actual binary and validate its behavior from a
//! user's perspective. Anything touching the network or the GitHub CLI is
//! gated behind the `integration-tests` feature.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Environment variables that would leak real settings into the tests.
const SETTINGS_ENV: &[&str] = &[
    "STUDENT_ID",
    "FIRST_NAME",
    "LAST_NAME",
    "GITHUB_USERNAME",
    "PROVIDER_GITHUB",
    "REPO_PREFIX",
    "REPO_DIR_PREFIX",
    "TASK",
    "BASE_NAME",
    "BASE_SUFFIX",
    "PDF_BASE",
    "DEBUG",
    "CI",
    "GITHUB_TOKEN",
];

fn scrubbed_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("course-repo");
    for key in SETTINGS_ENV {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    cargo_bin_cmd!("course-repo")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("provision"))
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("course-repo")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("course-repo"));
}

#[test]
fn test_provision_fails_fast_on_missing_settings() {
    let temp = assert_fs::TempDir::new().unwrap();

    scrubbed_cmd()
        .current_dir(temp.path())
        .arg("provision")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required setting"))
        .stderr(predicate::str::contains("STUDENT_ID"));
}

#[test]
fn test_provision_reports_first_missing_setting_with_partial_flags() {
    let temp = assert_fs::TempDir::new().unwrap();

    scrubbed_cmd()
        .current_dir(temp.path())
        .args(["provision", "--student-id", "hp42pfui", "-t", "H01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FIRST_NAME"));
}

#[test]
fn test_provision_reads_properties_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    // Partial properties: resolution must get past the file-provided keys
    // and fail on the first key nothing provides.
    std::fs::write(
        temp.path().join("settings.properties"),
        "STUDENT_ID=hp42pfui\nFIRST_NAME=Harry\nLAST_NAME=Potter\n",
    )
    .unwrap();

    scrubbed_cmd()
        .current_dir(temp.path())
        .arg("provision")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_USERNAME"));
}

#[test]
fn test_setup_requires_template_url() {
    cargo_bin_cmd!("course-repo")
        .arg("setup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TEMPLATE_URL"));
}

#[test]
fn test_completions_bash() {
    cargo_bin_cmd!("course-repo")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("course-repo"));
}

#[test]
fn test_check_reports_git() {
    // No status assertion: whether the run passes depends on gh being
    // installed and logged in on the host.
    cargo_bin_cmd!("course-repo")
        .args(["check", "--color", "never"])
        .assert()
        .stdout(predicate::str::contains("git installation"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_check_succeeds_with_full_environment() {
    cargo_bin_cmd!("course-repo")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub CLI login"));
}
