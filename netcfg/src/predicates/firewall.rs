//! FortiGate policy checks. Other vendors always pass.

use netcfg_model::normalized::{FirewallPolicy, PolicyAction, StringOrList};
use netcfg_model::{NormalizedConfig, Vendor};

use super::{BuiltinPredicate, PredicateOutcome};

const POLICIES_PATH: &str = "$.security.firewallPolicies";

inventory::submit! {
    BuiltinPredicate {
        name: "fortigate_any_any_has_logging",
        description: "FortiGate any/any policies log traffic",
        check: any_any_has_logging,
    }
}

inventory::submit! {
    BuiltinPredicate {
        name: "fortigate_accept_all_restricted",
        description: "FortiGate accept policies are not any/any/any",
        check: accept_all_restricted,
    }
}

fn any_any_has_logging(config: &NormalizedConfig) -> PredicateOutcome {
    fortigate_violations(config, |policy| {
        (is_any_any(policy) && !policy.log).then(|| format!("Policy {}: any-any without logging", policy.id))
    })
}

fn accept_all_restricted(config: &NormalizedConfig) -> PredicateOutcome {
    fortigate_violations(config, |policy| {
        (policy.action == PolicyAction::Accept && is_any_any(policy))
            .then(|| format!("Policy {}: accept policy is overly permissive", policy.id))
    })
}

fn fortigate_violations(
    config: &NormalizedConfig,
    violation: impl Fn(&FirewallPolicy) -> Option<String>,
) -> PredicateOutcome {
    if config.vendor() != Vendor::Fortigate {
        return PredicateOutcome::pass();
    }
    let violations: Vec<String> = config.security.firewall_policies.iter().filter_map(violation).collect();
    let outcome = PredicateOutcome::from_violations(violations);
    if outcome.passed {
        outcome
    } else {
        outcome.at_path(POLICIES_PATH)
    }
}

/// Any source, any destination and any service. A list counts as "any" when
/// one of its members does.
fn is_any_any(policy: &FirewallPolicy) -> bool {
    is_any_address(&policy.src_addr) && is_any_address(&policy.dst_addr) && is_any_service(&policy.service)
}

fn is_any_address(addr: &StringOrList) -> bool {
    addr.any(|a| {
        let a = a.trim();
        a.eq_ignore_ascii_case("any") || a.eq_ignore_ascii_case("all") || a == "0.0.0.0/0"
    })
}

fn is_any_service(service: &StringOrList) -> bool {
    service.any(|s| {
        let s = s.trim();
        s.eq_ignore_ascii_case("any") || s.eq_ignore_ascii_case("all")
    })
}
