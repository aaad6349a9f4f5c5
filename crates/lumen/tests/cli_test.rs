//! Integration tests for the `lumen` CLI binary.
//!
//! Every test runs against a throwaway inventory file and an isolated
//! config directory, so nothing touches the user's real configuration.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const INVENTORY: &str = r#"
[[devices]]
id = "of:1"
type = "ROADM"

[[devices.ports]]
number = 1
type = "OCH"
name = "line-1"
target_power_range = { lower = -10.0, upper = 5.0 }
target_power = -3.0
current_power = -5.5
signals = [
    { grid = "DWDM", channel_spacing = "CHL_50GHZ", spacing_multiplier = -4 },
    { grid = "DWDM", channel_spacing = "CHL_50GHZ", spacing_multiplier = 4 },
]

[[devices.ports]]
number = 2
type = "OMS"

[[devices]]
id = "fs:1"
type = "FIBER_SWITCH"

[[devices.ports]]
number = 1
type = "FIBER"

[[devices.protection]]
identifier = { device_id = "fs:1", port = 0 }
paths = [
    { id = "primary", output = { device_id = "fs:1", port = 1 }, attributes = { inputPortStatus = "ACTIVE" } },
    { id = "secondary", output = { device_id = "fs:1", port = 2 }, attributes = { inputPortStatus = "STANDBY" } },
]

[[devices]]
id = "of:down"
type = "ROADM"
available = false
"#;

// ── Helpers ─────────────────────────────────────────────────────────

/// Temp dir holding an inventory file; doubles as the isolated HOME.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("inventory.toml"), INVENTORY).unwrap();
        Self { dir }
    }

    fn inventory(&self) -> PathBuf {
        self.dir.path().join("inventory.toml")
    }

    /// A `lumen` command with env isolation and no inventory selected.
    fn bare(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("lumen");
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("NO_COLOR", "1")
            .env_remove("LUMEN_PROFILE")
            .env_remove("LUMEN_INVENTORY")
            .env_remove("LUMEN_OUTPUT")
            .env_remove("LUMEN_DEFAULTS__OUTPUT")
            .env_remove("LUMEN_DEFAULTS__COLOR")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write `config.toml` where the isolated XDG config dir expects it.
    fn write_config(&self, contents: &str) {
        let dir = self.dir.path().join("config").join("lumen");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), contents).unwrap();
    }

    /// A `lumen` command pointed at the sandbox inventory.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = self.bare();
        cmd.arg("--inventory").arg(self.inventory());
        cmd
    }
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let sandbox = Sandbox::new();
    let output = sandbox.bare().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = String::from_utf8_lossy(&output.stderr);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    Sandbox::new()
        .bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ports")
                .and(predicate::str::contains("protection"))
                .and(predicate::str::contains("serve")),
        );
}

#[test]
fn test_version_flag() {
    Sandbox::new()
        .bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lumen"));
}

#[test]
fn test_completions_zsh() {
    Sandbox::new()
        .bare()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_ports_without_inventory_fails() {
    Sandbox::new()
        .bare()
        .args(["ports", "of:1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("inventory"));
}

#[test]
fn test_unknown_profile_fails() {
    Sandbox::new()
        .cmd()
        .args(["--profile", "lab", "ports", "of:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lab"));
}

#[test]
fn test_config_show_without_file() {
    Sandbox::new().bare().args(["config", "show"]).assert().success();
}

// ── Port view ───────────────────────────────────────────────────────

#[test]
fn test_ports_json() {
    let output = Sandbox::new()
        .cmd()
        .args(["--output", "json", "ports", "of:1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["name"], "line-1");
    assert_eq!(rows[0]["targetPower"], "-3.0");
    assert_eq!(rows[0]["currentPower"], "-5.5");
    assert_eq!(rows[1]["id"], 2);
    assert_eq!(rows[1]["targetPower"], "N/A");
}

#[test]
fn test_ports_plain_lists_ids() {
    Sandbox::new()
        .cmd()
        .args(["--output", "plain", "ports", "of:1"])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[test]
fn test_config_default_output_applies() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[defaults]\noutput = \"plain\"\n");
    sandbox
        .cmd()
        .args(["ports", "of:1"])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[test]
fn test_env_default_output_applies_and_flag_wins() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env("LUMEN_DEFAULTS__OUTPUT", "plain")
        .args(["ports", "of:1"])
        .assert()
        .success()
        .stdout("1\n2\n");

    sandbox
        .cmd()
        .env("LUMEN_DEFAULTS__OUTPUT", "plain")
        .args(["--output", "json-compact", "ports", "of:1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[{"));
}

#[test]
fn test_invalid_config_default_output_fails() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[defaults]\noutput = \"xml\"\n");
    sandbox
        .cmd()
        .args(["ports", "of:1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("defaults.output"));
}

#[test]
fn test_ports_of_unavailable_device() {
    Sandbox::new()
        .cmd()
        .args(["ports", "of:down"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items found"));
}

#[test]
fn test_items_unknown_device_not_found() {
    Sandbox::new()
        .cmd()
        .args(["items", "of:nope"])
        .assert()
        .code(4);
}

#[test]
fn test_protection_list() {
    Sandbox::new()
        .cmd()
        .args(["--output", "plain", "protection", "list", "fs:1"])
        .assert()
        .success()
        .stdout("AUTOMATIC\nFORCE PRIMARY\nFORCE SECONDARY\nMANUAL PRIMARY\nMANUAL SECONDARY\n");
}

// ── Commands ────────────────────────────────────────────────────────

#[test]
fn test_power_set_in_range() {
    Sandbox::new()
        .cmd()
        .args(["power", "set", "of:1", "1", "-2.5"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok:"));
}

#[test]
fn test_power_set_out_of_range_is_rejected() {
    Sandbox::new()
        .cmd()
        .args(["power", "set", "of:1", "1", "-20"])
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("rejected:")
                .and(predicate::str::contains("Target power range")),
        );
}

#[test]
fn test_frequency_set_rejects_malformed_input() {
    Sandbox::new()
        .cmd()
        .args(["frequency", "set", "of:1", "1", "abc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("abc"));
}

#[test]
fn test_protection_force_requires_yes_without_terminal() {
    Sandbox::new()
        .cmd()
        .args(["protection", "set", "fs:1", "FORCE", "--index", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_protection_set_on_roadm_is_rejected() {
    Sandbox::new()
        .cmd()
        .args(["protection", "set", "of:1", "AUTOMATIC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Apply failed: invalid device type."));
}

// ── Serve loop ──────────────────────────────────────────────────────

#[test]
fn test_serve_answers_each_request_line() {
    let input = concat!(
        r#"{"event":"showPortItemsRequest","payload":{"devId":"fs:1"}}"#,
        "\n\n",
        "not json\n",
        r#"{"event":"setOpsModeRequest","payload":{"devId":"of:1","operation":"AUTOMATIC","index":-1}}"#,
        "\n",
    );
    let output = Sandbox::new()
        .cmd()
        .arg("serve")
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "showPortItemsResponse");
    assert_eq!(lines[0]["payload"]["showFlowIcon"], false);
    assert_eq!(lines[0]["payload"]["opsOperations"].as_array().unwrap().len(), 5);
    assert_eq!(lines[1]["event"], "setOpsModeResponse");
    assert_eq!(lines[1]["payload"]["valid"], false);
}
