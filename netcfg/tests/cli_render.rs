use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn netcfg() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("netcfg"));
    cmd.env("NO_COLOR", "1").env("CLICOLOR", "0").env_remove("RUST_LOG");
    cmd
}

#[test]
fn render_cisco_text_prints_sections_and_plans() {
    netcfg()
        .arg("render")
        .arg(fixture("fixtures/canonical-branch.json"))
        .arg("--vendor")
        .arg("cisco")
        .assert()
        .success()
        .stdout(predicate::str::contains("render vendor=cisco"))
        .stdout(predicate::str::contains("[vlan]\nvlan 10\n name USERS"))
        .stdout(predicate::str::contains("ip route 172.16.0.0 255.240.0.0 10.10.0.254"))
        .stdout(predicate::str::contains("[verify]\nshow vlan brief"))
        .stdout(predicate::str::contains("[rollback]"))
        .stdout(predicate::str::contains("preflight\n- none"));
}

#[test]
fn render_mikrotik_section_filter() {
    netcfg()
        .arg("render")
        .arg(fixture("fixtures/canonical-branch.json"))
        .arg("--vendor")
        .arg("mikrotik")
        .arg("--section")
        .arg("routing")
        .arg("--no-preflight")
        .assert()
        .success()
        .stdout(predicate::eq(
            "render vendor=mikrotik\n[routing]\n\
             /ip route add dst-address=0.0.0.0/0 gateway=198.51.100.9\n\
             /ip route add dst-address=172.16.0.0/12 gateway=10.10.0.254\n",
        ));
}

#[test]
fn render_fortigate_json_has_result_and_preflight() {
    let output = netcfg()
        .arg("render")
        .arg(fixture("fixtures/canonical-branch.json"))
        .arg("--vendor")
        .arg("fortigate")
        .arg("--format")
        .arg("json")
        .output()
        .expect("run");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["result"]["vendor"], "fortigate");
    assert_eq!(report["preflight"], Value::Array(Vec::new()));
    let sections = report["result"]["sections"].as_array().expect("sections");
    assert_eq!(sections.len(), 6);
    let rollback = report["result"]["rollbackCommands"].as_array().expect("rollback");
    let verify = report["result"]["verifyCommands"].as_array().expect("verify");
    assert!(verify.iter().all(|v| !rollback.contains(v)));
    assert_eq!(
        rollback[0].as_str().map(|r| r.starts_with("config firewall local-in-policy")),
        Some(true)
    );
}

#[test]
fn render_reports_preflight_findings() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("prod.json");
    fs::write(
        &input,
        r#"{"hostname": "core-01",
            "services": {"ssh": {"enabled": true, "version": 1, "allowPassword": true}},
            "metadata": {"environment": "prod"}}"#,
    )
    .expect("write");

    netcfg()
        .arg("render")
        .arg(&input)
        .arg("--vendor")
        .arg("cisco")
        .assert()
        .success()
        .stdout(predicate::str::contains("- [medium] ssh-v2: Cisco requires SSH v2."))
        .stdout(predicate::str::contains("- [medium] prod-ssh-password"))
        .stdout(predicate::str::contains("remediation: Set SSH version to 2."));
}

#[test]
fn render_generic_vendor_fails() {
    netcfg()
        .arg("render")
        .arg(fixture("fixtures/canonical-branch.json"))
        .arg("--vendor")
        .arg("generic")
        .assert()
        .failure()
        .stderr(predicate::str::contains("vendor 'generic' has no renderer"));
}

#[test]
fn render_invalid_intent_names_the_field() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("bad.json");
    fs::write(&input, r#"{"vlans": [{"id": 5000}]}"#).expect("write");

    netcfg()
        .arg("render")
        .arg(&input)
        .arg("--vendor")
        .arg("mikrotik")
        .arg("--no-preflight")
        .assert()
        .failure()
        .stderr(predicate::str::contains("render failed"))
        .stderr(predicate::str::contains("vlans[0].id"));
}

#[test]
fn render_rejects_unknown_section() {
    netcfg()
        .arg("render")
        .arg(fixture("fixtures/canonical-branch.json"))
        .arg("--vendor")
        .arg("cisco")
        .arg("--section")
        .arg("qos")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section 'qos'"));
}
