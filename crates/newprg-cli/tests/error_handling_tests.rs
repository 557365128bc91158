//! Error messages and exit codes of the newprg binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn newprg(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("newprg");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn bad_purpose_lists_valid_keywords() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["new", "x", "-n", "h,help,,,,,,"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid purpose"))
        .stderr(predicate::str::contains("flag, acc, int, float, string, file"));
    assert!(!temp.path().join("X").exists());
}

#[test]
fn short_descriptor_is_malformed() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["options", "-n", "v,verbose,verbosity,acc,,,"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected 8 fields, found 7"));
}

#[test]
fn duplicate_short_name_is_rejected() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args([
            "options",
            "-n",
            "v,verbose,verbosity,acc,,,,",
            "-n",
            "v,vision,,flag,,,,",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("used more than once"));
}

#[test]
fn built_in_help_option_is_reserved() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["new", "greeter", "-n", "h,hello,greet,flag,,,,", "-n", "q,quiet,,flag,,,,"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("option short name 'h' is reserved"));
    assert!(!temp.path().join("Greeter").exists());
}

#[test]
fn shared_placeholder_variable_is_rejected() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["options", "-n", "a,alpha,,flag,,,,", "-n", "q,quiet,,flag,,,,"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("option variable name 'FIXME' is used more than once"));
}

#[test]
fn existing_project_is_refused() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path()).args(["new", "demo"]).assert().success();
    fs::write(temp.path().join("Demo/demo.c"), "edited").unwrap();

    newprg(temp.path())
        .args(["new", "demo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(temp.path().join("Demo/demo.c")).unwrap(),
        "edited"
    );
}

#[test]
fn invalid_project_name() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["new", ".hidden"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid project name"));
}

#[test]
fn path_like_dependency_is_rejected() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["new", "x", "-d", "../secret.c"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("plain file name"));
}

#[test]
fn options_without_descriptors() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .arg("options")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no option descriptors"));
}

#[test]
fn missing_explicit_config_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["-c", "absent.toml", "config", "list"])
        .assert()
        .code(4);
}

#[test]
fn unknown_config_key() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn missing_options_file_names_it() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["options", "-f", "nope.opts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.opts"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    newprg(temp.path())
        .args(["new", "x", "--lang", "rust"])
        .assert()
        .code(2);
}
