//! Named programmatic compliance checks.
//!
//! A [`Predicate`] inspects a whole [`NormalizedConfig`] and reports a
//! [`PredicateOutcome`]. Custom-mode lint rules refer to predicates by name
//! through a [`PredicateRegistry`] owned by each engine.
//!
//! Built-in predicates are declared next to their implementation with
//! `inventory::submit!` and collected by [`PredicateRegistry::with_builtins`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use netcfg_model::NormalizedConfig;
use serde::Serialize;
use serde_json::Value;

mod access;
mod firewall;
mod mgmt;
mod nat;
mod vpn;

/// Result of running one predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredicateOutcome {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PredicateOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            ..Self::default()
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Pass when `passed`, otherwise fail with `message`.
    pub fn verdict(passed: bool, message: impl Into<String>) -> Self {
        if passed {
            Self::pass()
        } else {
            Self::fail(message)
        }
    }

    /// Fail with every violation joined into the message and listed in
    /// `value`; pass when there are none.
    pub fn from_violations(violations: Vec<String>) -> Self {
        if violations.is_empty() {
            return Self::pass();
        }
        Self {
            passed: false,
            message: Some(violations.join("; ")),
            path: None,
            value: Some(Value::from(violations)),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// A named compliance check. Implemented for plain functions and closures.
pub trait Predicate: Send + Sync {
    fn check(&self, config: &NormalizedConfig) -> PredicateOutcome;
}

impl<F> Predicate for F
where
    F: Fn(&NormalizedConfig) -> PredicateOutcome + Send + Sync,
{
    fn check(&self, config: &NormalizedConfig) -> PredicateOutcome {
        self(config)
    }
}

/// Link-time registration record for a built-in predicate.
pub struct BuiltinPredicate {
    pub name: &'static str,
    pub description: &'static str,
    pub check: fn(&NormalizedConfig) -> PredicateOutcome,
}

inventory::collect!(BuiltinPredicate);

/// Every built-in predicate, sorted by name.
pub fn builtins() -> Vec<&'static BuiltinPredicate> {
    let mut all: Vec<_> = inventory::iter::<BuiltinPredicate>.into_iter().collect();
    all.sort_by_key(|p| p.name);
    all
}

/// Name-keyed predicate store.
///
/// Populated at setup and read-only during evaluation. Registering an
/// existing name replaces the previous predicate.
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    entries: BTreeMap<String, Arc<dyn Predicate>>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in builtins() {
            registry.register(builtin.name, builtin.check);
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, predicate: impl Predicate + 'static) {
        self.entries.insert(name.into(), Arc::new(predicate));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Predicate> {
        self.entries.get(name).map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use netcfg_model::Vendor;

    use super::*;

    const BUILTIN_NAMES: [&str; 11] = [
        "aclHasExplicitDeny",
        "cisco_enable_encrypted",
        "fortigate_accept_all_restricted",
        "fortigate_any_any_has_logging",
        "multipleNtpServers",
        "nat_no_overlap",
        "noVlan1Traffic",
        "snmpV3Only",
        "snmp_community_not_default",
        "sshEnabled",
        "vpn_strong_crypto",
    ];

    #[test]
    fn builtins_are_collected() {
        let registry = PredicateRegistry::with_builtins();
        for name in BUILTIN_NAMES {
            assert!(registry.contains(name), "missing builtin {name}");
        }
        assert_eq!(registry.len(), BUILTIN_NAMES.len());
    }

    #[test]
    fn builtin_listing_is_sorted() {
        let names: Vec<_> = builtins().into_iter().map(|p| p.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(builtins().iter().all(|p| !p.description.is_empty()));
    }

    #[test]
    fn registering_replaces_silently() {
        let mut registry = PredicateRegistry::new();
        registry.register("check", |_: &NormalizedConfig| PredicateOutcome::fail("first"));
        registry.register("check", |_: &NormalizedConfig| PredicateOutcome::pass());
        assert_eq!(registry.len(), 1);
        let cfg = NormalizedConfig::for_vendor(Vendor::Cisco, "r1");
        let outcome = registry.get("check").expect("registered").check(&cfg);
        assert!(outcome.passed);
    }

    #[test]
    fn violations_join_into_message() {
        let outcome = PredicateOutcome::from_violations(vec!["a".into(), "b".into()]);
        assert!(!outcome.passed);
        assert_eq!(outcome.message.as_deref(), Some("a; b"));
        assert_eq!(outcome.value, Some(serde_json::json!(["a", "b"])));
        assert!(PredicateOutcome::from_violations(Vec::new()).passed);
    }
}
