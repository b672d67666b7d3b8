use std::path::PathBuf;

use netcfg_model::normalized::{PolicyAction, SnmpVersion, TextOrNumber};
use netcfg_model::{load_file, CanonicalConfig, NormalizedConfig, PathExpr, Vendor};
use serde_json::json;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn loads_cisco_fixture() {
    let cfg: NormalizedConfig =
        load_file(&fixture("fixtures/cisco-edge.json")).expect("cisco fixture should load");
    assert_eq!(cfg.vendor(), Vendor::Cisco);
    assert_eq!(cfg.device.hostname, "edge-rtr-01");
    assert_eq!(cfg.interfaces.len(), 3);
    assert_eq!(cfg.mgmt.snmp.version, Some(SnmpVersion::V3));
    assert_eq!(cfg.security.acls[0].entries.len(), 2);
}

#[test]
fn loads_fortigate_fixture() {
    let cfg: NormalizedConfig =
        load_file(&fixture("fixtures/fortigate-fw.json")).expect("fortigate fixture should load");
    assert_eq!(cfg.vendor(), Vendor::Fortigate);
    let temp_any = &cfg.security.firewall_policies[1];
    assert_eq!(temp_any.id, TextOrNumber::Number(3));
    assert_eq!(temp_any.action, PolicyAction::Accept);
    assert!(!temp_any.log);
    assert_eq!(cfg.mgmt.ntp.servers[0].address, "ntp1.fortiguard.com");
}

#[test]
fn paths_resolve_against_serialized_fixture() {
    let cfg: NormalizedConfig =
        load_file(&fixture("fixtures/cisco-edge.json")).expect("cisco fixture should load");
    let view = serde_json::to_value(&cfg).expect("serialize");

    let cases = [
        ("$.device.hostname", Some(json!("edge-rtr-01"))),
        ("$.mgmt.ssh.version", Some(json!(2))),
        ("$.mgmt.ntp.servers.length", Some(json!(2))),
        ("$.interfaces[0].ips[0].address", Some(json!("203.0.113.2"))),
        ("$.security.acls[0].entries[1].action", Some(json!("deny"))),
        ("$.device.domain", None),
    ];
    for (path, expected) in cases {
        let expr = PathExpr::parse(path).expect("parse");
        let got = expr.resolve(&view).map(|v| v.into_owned());
        assert_eq!(got, expected, "path {path}");
    }
}

#[test]
fn loads_canonical_fixture() {
    let cfg: CanonicalConfig =
        load_file(&fixture("fixtures/canonical-branch.json")).expect("canonical fixture should load");
    assert_eq!(cfg.hostname.as_deref(), Some("branch-sw-01"));
    assert_eq!(cfg.vlans.len(), 2);
    assert!(cfg.ssh_enabled());
    assert!(!cfg.interfaces[2].is_enabled());
}
