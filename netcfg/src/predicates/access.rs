//! Access-layer hygiene: VLAN 1 usage and ACL termination.

use netcfg_model::NormalizedConfig;
use serde_json::Value;

use super::{BuiltinPredicate, PredicateOutcome};

inventory::submit! {
    BuiltinPredicate {
        name: "noVlan1Traffic",
        description: "No interface carries VLAN 1 untagged",
        check: no_vlan1_traffic,
    }
}

inventory::submit! {
    BuiltinPredicate {
        name: "aclHasExplicitDeny",
        description: "Every ACL ends with a deny or drop entry",
        check: acl_has_explicit_deny,
    }
}

fn no_vlan1_traffic(config: &NormalizedConfig) -> PredicateOutcome {
    let offenders: Vec<&str> = config
        .interfaces
        .iter()
        .filter(|iface| iface.uses_vlan1())
        .map(|iface| iface.name.as_str())
        .collect();
    if offenders.is_empty() {
        return PredicateOutcome::pass();
    }
    PredicateOutcome::fail("Interface uses VLAN 1")
        .at_path("$.interfaces")
        .with_value(Value::from(offenders))
}

/// An ACL with no entries counts as missing its deny.
fn acl_has_explicit_deny(config: &NormalizedConfig) -> PredicateOutcome {
    let missing: Vec<&str> = config
        .security
        .acls
        .iter()
        .filter(|acl| !acl.entries.last().is_some_and(|last| last.action.is_terminal_deny()))
        .map(|acl| acl.name.as_str())
        .collect();
    if missing.is_empty() {
        return PredicateOutcome::pass();
    }
    PredicateOutcome::fail("ACL missing explicit deny")
        .at_path("$.security.acls")
        .with_value(Value::from(missing))
}
