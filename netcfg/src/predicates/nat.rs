//! Pairwise NAT rule overlap.
//!
//! Overlap is approximate: two rules of the same kind overlap only when the
//! fields that select traffic are equal. Subnet containment and port ranges
//! are not considered, so a pass does not prove the rules are disjoint.

use netcfg_model::normalized::{NatRule, NatType};
use netcfg_model::NormalizedConfig;

use super::{BuiltinPredicate, PredicateOutcome};

inventory::submit! {
    BuiltinPredicate {
        name: "nat_no_overlap",
        description: "No two NAT rules select the same traffic",
        check: nat_no_overlap,
    }
}

fn nat_no_overlap(config: &NormalizedConfig) -> PredicateOutcome {
    let rules = &config.security.nat_rules;
    let mut violations = Vec::new();
    for (i, a) in rules.iter().enumerate() {
        for b in &rules[i + 1..] {
            if overlaps(a, b) {
                violations.push(format!("NAT rules {} and {} may overlap", a.id, b.id));
            }
        }
    }
    PredicateOutcome::from_violations(violations)
}

fn overlaps(a: &NatRule, b: &NatRule) -> bool {
    if a.kind != b.kind {
        return false;
    }
    match a.kind {
        NatType::Dnat => a.dst_addr == b.dst_addr && a.dst_port == b.dst_port,
        NatType::Snat => a.src_addr == b.src_addr && a.translated_addr == b.translated_addr,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use netcfg_model::Vendor;
    use serde_json::json;

    use super::*;

    fn cfg(rules: serde_json::Value) -> NormalizedConfig {
        let mut cfg = NormalizedConfig::for_vendor(Vendor::Mikrotik, "mt");
        cfg.security.nat_rules = serde_json::from_value(rules).expect("nat rules");
        cfg
    }

    #[test]
    fn equal_dnat_targets_overlap() {
        let out = nat_no_overlap(&cfg(json!([
            { "id": 1, "type": "dnat", "dstAddr": "203.0.113.5", "dstPort": 443 },
            { "id": 2, "type": "dnat", "dstAddr": "203.0.113.5", "dstPort": 443 },
            { "id": 3, "type": "dnat", "dstAddr": "203.0.113.5", "dstPort": 80 }
        ])));
        assert!(!out.passed);
        assert_eq!(out.message.as_deref(), Some("NAT rules 1 and 2 may overlap"));
    }

    #[test]
    fn snat_compares_source_and_translation() {
        let out = nat_no_overlap(&cfg(json!([
            { "id": "a", "type": "snat", "srcAddr": "10.0.0.0/24", "translatedAddr": "198.51.100.1" },
            { "id": "b", "type": "snat", "srcAddr": "10.0.0.0/24", "translatedAddr": "198.51.100.1" },
            { "id": "c", "type": "snat", "srcAddr": "10.0.0.0/24", "translatedAddr": "198.51.100.2" }
        ])));
        assert_eq!(out.value, Some(json!(["NAT rules a and b may overlap"])));
    }

    #[test]
    fn different_kinds_and_masquerade_never_overlap() {
        let out = nat_no_overlap(&cfg(json!([
            { "id": 1, "type": "masquerade", "interface": "ether1" },
            { "id": 2, "type": "masquerade", "interface": "ether1" },
            { "id": 3, "type": "snat", "srcAddr": "10.0.0.0/8" },
            { "id": 4, "type": "dnat", "srcAddr": "10.0.0.0/8" }
        ])));
        assert!(out.passed);
    }

    #[test]
    fn containment_is_not_detected() {
        let out = nat_no_overlap(&cfg(json!([
            { "id": 1, "type": "snat", "srcAddr": "10.0.0.0/8", "translatedAddr": "198.51.100.1" },
            { "id": 2, "type": "snat", "srcAddr": "10.1.0.0/16", "translatedAddr": "198.51.100.1" }
        ])));
        assert!(out.passed);
    }
}
