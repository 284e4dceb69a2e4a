//! Integration tests for the domain-blacklist binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run domain-blacklist with the given arguments
fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_domain-blacklist"))
        .args(args)
        .output()
        .expect("Failed to execute domain-blacklist")
}

fn write_config(dir: &Path, sources: &[String], whitelist: &[&str]) -> String {
    let mut yaml = String::from("sources:\n");
    for source in sources {
        yaml.push_str(&format!("  - \"{}\"\n", source));
    }
    yaml.push_str("whitelist:\n");
    for entry in whitelist {
        yaml.push_str(&format!("  - \"{}\"\n", entry));
    }
    yaml.push_str("whitelist_files: []\n");
    yaml.push_str(&format!("output: \"{}\"\n", dir.join("blacklist.txt").display()));

    let path = dir.join("config.yaml");
    std::fs::write(&path, yaml).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_version_command() {
    let output = run_cli(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("domain-blacklist"));
}

#[test]
fn test_help_command() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("build"));
    assert!(stdout.contains("classify"));
}

#[test]
fn test_build_writes_sorted_rule_file() {
    let dir = TempDir::new().unwrap();
    let rules_a = dir.path().join("a.txt");
    let rules_b = dir.path().join("b.txt");
    std::fs::write(&rules_a, "example.com\n# comment\nzz.example.org\n").unwrap();
    std::fs::write(&rules_b, "*.tracker.net\nexample.com\nallowed.com\n").unwrap();

    let config = write_config(
        dir.path(),
        &[
            format!("file:{}", rules_a.display()),
            format!("file:{}", rules_b.display()),
            format!("file:{}", dir.path().join("missing.txt").display()),
        ],
        &["allowed.com"],
    );

    let output = run_cli(&["--config", &config, "build"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let written = std::fs::read_to_string(dir.path().join("blacklist.txt")).unwrap();
    assert_eq!(written, "*.tracker.net\nexample.com\nzz.example.org\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[SKIP]"));
    assert!(stdout.contains("Final: 3"));
}

#[test]
fn test_build_dry_run_does_not_write() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("a.txt");
    std::fs::write(&rules, "example.com\n").unwrap();
    let config = write_config(dir.path(), &[format!("file:{}", rules.display())], &[]);

    let output = run_cli(&["--config", &config, "build", "--dry-run"]);
    assert!(output.status.success());
    assert!(!dir.path().join("blacklist.txt").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("[DRY-RUN] 1 rules"));
}

#[test]
fn test_build_output_override() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("a.txt");
    std::fs::write(&rules, "example.com\n").unwrap();
    let config = write_config(dir.path(), &[format!("file:{}", rules.display())], &[]);
    let custom = dir.path().join("custom.txt");

    let output = run_cli(&[
        "--config",
        &config,
        "build",
        "--output",
        &custom.to_string_lossy(),
    ]);
    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(&custom).unwrap(), "example.com\n");
    assert!(!dir.path().join("blacklist.txt").exists());
}

#[test]
fn test_build_missing_config_fails() {
    let output = run_cli(&["--config", "/nonexistent/config.yaml", "build"]);
    assert!(!output.status.success());
}

#[test]
fn test_classify_command_untrusted() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("list.txt");
    std::fs::write(&list, "# hosts\n0.0.0.0 ads.example.com\n||track.example.net^\n").unwrap();

    let output = run_cli(&["classify", &list.to_string_lossy(), "--untrusted"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hosts_entry\tads.example.com"));
    assert!(stdout.contains("ublock_rule\ttrack.example.net"));
    assert!(stdout.contains("2 names extracted"));
}

#[test]
fn test_classify_command_trusted_skips_hosts_lines() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("list.txt");
    std::fs::write(&list, "1.2.3.4 ads.example.com\n*.ads.net\n").unwrap();

    let output = run_cli(&["classify", &list.to_string_lossy()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("trusted_literal\t*.ads.net"));
    assert!(!stdout.contains("ads.example.com"));
}

#[test]
fn test_init_and_sources() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conf/config.yaml");
    let config_str = config.to_string_lossy().to_string();

    let output = run_cli(&["--config", &config_str, "init"]);
    assert!(output.status.success());
    assert!(config.exists());

    // Second init without --force must refuse
    let output = run_cli(&["--config", &config_str, "init"]);
    assert!(!output.status.success());

    let output = run_cli(&["--config", &config_str, "sources"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/etc/domain-blacklist/domain-blacklist.txt"));
    assert!(stdout.contains("trusted"));
}
