// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! End-to-end tests of the policygen binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn policygen() -> Command {
    let mut cmd = Command::cargo_bin("policygen").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("POLICYGEN_STANDARD")
        .env_remove("POLICYGEN_PLATFORM");
    cmd
}

fn write_config(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn generates_shell_script() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "disable_root_login: false\n");
    let output = temp.path().join("harden.sh");

    policygen()
        .arg("--compliance-standard")
        .arg("CIS-Linux-v8")
        .arg("--config-file")
        .arg(&config)
        .arg("--output-file")
        .arg(&output)
        .arg("--platform")
        .arg("shell")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let script = std::fs::read_to_string(&output).unwrap();
    assert!(script.starts_with("#!/bin/sh\n"));
    assert!(script.contains("printf 'PermitRootLogin %s\\n' yes"));
    assert!(script.contains("# fingerprint: blake3:"));
}

#[test]
fn dry_run_prints_to_stdout() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "ssh:\n  ssh_max_auth_tries: 3\n");

    policygen()
        .args(["-c", "cis-linux-v8", "-p", "ansible", "--dry-run", "-f"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("MaxAuthTries 3"));

    assert_eq!(entries(temp.path()), vec!["cfg.yaml"]);
}

#[test]
fn environment_supplies_standard_and_platform() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "");

    policygen()
        .env("POLICYGEN_STANDARD", "CIS-Windows-11")
        .env("POLICYGEN_PLATFORM", "powershell")
        .args(["--dry-run", "-f"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#Requires -RunAsAdministrator"));
}

#[test]
fn unknown_key_warns_but_succeeds() {
    let temp = TempDir::new().unwrap();
    let typo = write_config(temp.path(), "typo.yaml", "disalbe_root_login: true\n");
    let empty = write_config(temp.path(), "empty.yaml", "");

    let with_typo = policygen()
        .args(["-c", "CIS-Linux-v8", "-p", "shell", "--dry-run", "-f"])
        .arg(&typo)
        .assert()
        .success()
        .stderr(predicate::str::contains("disalbe_root_login"))
        .stderr(predicate::str::contains("disable_root_login"))
        .get_output()
        .stdout
        .clone();

    let defaults = policygen()
        .args(["-c", "CIS-Linux-v8", "-p", "shell", "--dry-run", "-f"])
        .arg(&empty)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(with_typo, defaults);
}

#[test]
fn type_errors_are_all_reported() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "cfg.yaml",
        "disable_root_login: \"yes\"\nssh_max_auth_tries: 99\n",
    );
    let output = temp.path().join("harden.sh");

    policygen()
        .args(["-c", "CIS-Linux-v8", "-p", "shell", "-f"])
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("policygen::config_type"))
        .stderr(predicate::str::contains("disable_root_login"))
        .stderr(predicate::str::contains("ssh_max_auth_tries"));

    assert!(!output.exists());
}

#[test]
fn malformed_yaml_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "disable_root_login: [oops\n");

    policygen()
        .args(["-c", "CIS-Linux-v8", "-p", "shell", "--dry-run", "-f"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("policygen::config_parse"));
}

#[test]
fn unknown_standard_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "");

    policygen()
        .args(["-c", "CIS-Solaris-1", "-p", "shell", "--dry-run", "-f"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("policygen::unknown_standard"))
        .stderr(predicate::str::contains("policygen standards"));
}

#[test]
fn platform_without_rules_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "");
    let output = temp.path().join("harden.sh");

    policygen()
        .args(["-c", "CIS-Windows-11", "-p", "shell", "-f"])
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("policygen::empty_document"));

    assert_eq!(entries(temp.path()), vec!["cfg.yaml"]);
}

#[test]
fn missing_output_directory_leaves_nothing() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "");

    policygen()
        .args(["-c", "CIS-Linux-v8", "-p", "shell", "-f"])
        .arg(&config)
        .arg("-o")
        .arg(temp.path().join("missing").join("harden.sh"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("policygen::write_error"));

    assert_eq!(entries(temp.path()), vec!["cfg.yaml"]);
}

#[test]
fn file_in_place_of_directory_leaves_nothing() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "");
    let blocker = write_config(temp.path(), "scripts", "not a directory");

    policygen()
        .args(["-c", "CIS-Linux-v8", "-p", "shell", "-f"])
        .arg(&config)
        .arg("-o")
        .arg(blocker.join("harden.sh"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("policygen::write_error"));

    assert_eq!(entries(temp.path()), vec!["cfg.yaml", "scripts"]);
}

#[test]
fn missing_config_file_fails() {
    let temp = TempDir::new().unwrap();

    policygen()
        .args(["-c", "CIS-Linux-v8", "-p", "shell", "--dry-run", "-f"])
        .arg(temp.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("policygen::file_read_error"));
}

#[test]
fn generate_requires_flags() {
    policygen().assert().failure();
}

#[test]
fn check_validates_without_writing() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cfg.yaml", "password_history: 10\nfoo: 1\n");

    policygen()
        .args(["check", "-c", "CIS-Windows-11", "-f"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("1 override(s) valid"))
        .stderr(predicate::str::contains("foo"));

    assert_eq!(entries(temp.path()), vec!["cfg.yaml"]);
}

#[test]
fn lists_standards() {
    policygen()
        .arg("standards")
        .assert()
        .success()
        .stdout(predicate::str::contains("CIS-Linux-v8"))
        .stdout(predicate::str::contains("CIS-Windows-11"));
}

#[test]
fn lists_rules_as_json() {
    let output = policygen()
        .args(["rules", "-c", "CIS-Linux-v8", "-p", "ansible", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let keys: Vec<_> = parsed["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["key"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(keys.first().map(String::as_str), Some("disable_cramfs"));
    assert!(!keys.iter().any(|k| k == "grub_config_permissions"));
}
