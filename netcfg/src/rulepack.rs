//! Rule pack documents and where they come from.
//!
//! A pack is a TOML or JSON document listing rules. The `baseline` pack is
//! compiled in; callers can replace it with an explicit file or point at a
//! directory holding `<pack-id>.toml` overrides.

use std::collections::HashSet;
use std::path::Path;

use netcfg_model::{load_file, load_str, DocumentFormat, LoadError, Vendor};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::lint::LintRule;

pub const BASELINE_PACK_ID: &str = "baseline";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePack {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Applied to rules that declare no scope of their own.
    #[serde(default)]
    pub vendor_scope: Vec<Vendor>,
    #[serde(default)]
    pub rules: Vec<LintRule>,
}

#[derive(Debug, Error)]
pub enum RulePackError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("rule pack {path} has no id")]
    EmptyId { path: String },
    #[error("rule pack {path} defines rule {id} more than once")]
    DuplicateRule { path: String, id: String },
    #[error("unknown rule pack '{id}' (only 'baseline' is built in)")]
    UnknownPack { id: String },
}

impl RulePack {
    /// Check pack invariants and push the pack scope down to unscoped rules.
    fn finish(mut self, label: &str) -> Result<Self, RulePackError> {
        if self.id.trim().is_empty() {
            return Err(RulePackError::EmptyId {
                path: label.to_string(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.rules.iter().find(|r| !seen.insert(r.id.clone())) {
            return Err(RulePackError::DuplicateRule {
                path: label.to_string(),
                id: dup.id.clone(),
            });
        }
        if !self.vendor_scope.is_empty() {
            for rule in self.rules.iter_mut().filter(|r| r.vendor_scope.is_empty()) {
                rule.vendor_scope = self.vendor_scope.clone();
            }
        }
        if self.name.trim().is_empty() {
            self.name = self.id.clone();
        }
        Ok(self)
    }
}

/// Load a pack from a `.toml` or `.json` file.
pub fn load_rule_pack(path: &Path) -> Result<RulePack, RulePackError> {
    let pack: RulePack = load_file(path)?;
    pack.finish(&path.display().to_string())
}

pub fn parse_rule_pack(raw: &str, format: DocumentFormat, label: &str) -> Result<RulePack, RulePackError> {
    let pack: RulePack = load_str(raw, format, label)?;
    pack.finish(label)
}

/// The pack shipped with the binary.
pub fn embedded_rule_pack() -> Result<RulePack, RulePackError> {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/rulepacks/baseline.toml"));
    parse_rule_pack(embedded, DocumentFormat::Toml, "embedded baseline pack")
}

/// Pick the rule pack for a run and report where it came from.
///
/// An explicit `rules` file must load. Otherwise `rules_dir/<pack_id>.toml`
/// is tried, falling back to the embedded pack with a warning when that
/// file is missing or broken. Only the baseline pack is embedded.
///
/// # Returns
///
/// The pack and its source: `embedded` or `file:<path>`
pub fn resolve_rule_pack(
    rules: Option<&Path>,
    rules_dir: Option<&Path>,
    pack_id: &str,
) -> Result<(RulePack, String), RulePackError> {
    if let Some(path) = rules {
        let pack = load_rule_pack(path)?;
        return Ok((pack, format!("file:{}", path.display())));
    }
    if let Some(dir) = rules_dir {
        let chosen = dir.join(format!("{pack_id}.toml"));
        match load_rule_pack(&chosen) {
            Ok(pack) => return Ok((pack, format!("file:{}", chosen.display()))),
            Err(err) => warn!(
                path = %chosen.display(),
                error = %err,
                "failed to load rule pack; using embedded baseline"
            ),
        }
    } else if pack_id != BASELINE_PACK_ID {
        return Err(RulePackError::UnknownPack {
            id: pack_id.to_string(),
        });
    }
    Ok((embedded_rule_pack()?, "embedded".to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::lint::RuleCheck;

    #[test]
    fn embedded_pack_parses() {
        let pack = embedded_rule_pack().expect("embedded pack");
        assert_eq!(pack.id, BASELINE_PACK_ID);
        assert_eq!(pack.rules.len(), 11);
        assert!(pack.rules.iter().all(|r| r.enabled));
        let ssh_v2 = pack.rules.iter().find(|r| r.id == "MGT-SSH-002").expect("ssh v2 rule");
        assert!(matches!(ssh_v2.check, RuleCheck::Match { .. }));
        assert!(!ssh_v2.applies_to(Vendor::Fortigate));
    }

    #[test]
    fn embedded_predicates_are_all_builtin() {
        let registry = crate::predicates::PredicateRegistry::with_builtins();
        for rule in embedded_rule_pack().expect("embedded pack").rules {
            if let RuleCheck::Predicate { name } = &rule.check {
                assert!(registry.contains(name), "{} uses unknown predicate {name}", rule.id);
            }
        }
    }

    #[test]
    fn pack_scope_is_inherited() {
        let raw = r#"
            id = "forti"
            vendorScope = ["fortigate"]

            [[rules]]
            id = "A"
            type = "custom"
            predicateName = "sshEnabled"

            [[rules]]
            id = "B"
            vendorScope = ["cisco"]
            type = "custom"
            predicateName = "sshEnabled"
        "#;
        let pack = parse_rule_pack(raw, DocumentFormat::Toml, "inline").expect("pack");
        assert_eq!(pack.name, "forti");
        assert_eq!(pack.rules[0].vendor_scope, vec![Vendor::Fortigate]);
        assert_eq!(pack.rules[1].vendor_scope, vec![Vendor::Cisco]);
    }

    #[test]
    fn duplicate_rule_ids_are_rejected() {
        let raw = r#"{ "id": "dup", "rules": [ { "id": "X" }, { "id": "X" } ] }"#;
        let err = parse_rule_pack(raw, DocumentFormat::Json, "dup.json").unwrap_err();
        assert!(matches!(err, RulePackError::DuplicateRule { ref id, .. } if id == "X"));
    }

    #[test]
    fn malformed_rule_names_rule_id() {
        let raw = r#"{ "id": "bad", "rules": [ { "id": "R9", "type": "match", "path": "$.x", "condition": { "operator": "near" } } ] }"#;
        let err = parse_rule_pack(raw, DocumentFormat::Json, "bad.json").unwrap_err();
        assert!(err.to_string().contains("R9"), "{err}");
    }

    #[test]
    fn explicit_file_wins_and_must_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("site.toml");
        fs::write(&path, "id = \"site\"\n").expect("write");
        let (pack, source) = resolve_rule_pack(Some(&path), None, BASELINE_PACK_ID).expect("resolve");
        assert_eq!(pack.id, "site");
        assert!(source.starts_with("file:"));

        let missing = dir.path().join("missing.toml");
        assert!(resolve_rule_pack(Some(&missing), None, BASELINE_PACK_ID).is_err());
    }

    #[test]
    fn rules_dir_falls_back_to_embedded() {
        let dir = tempdir().expect("tempdir");
        let (pack, source) = resolve_rule_pack(None, Some(dir.path()), "site").expect("resolve");
        assert_eq!(pack.id, BASELINE_PACK_ID);
        assert_eq!(source, "embedded");

        fs::write(dir.path().join("site.toml"), "id = \"site\"\n").expect("write");
        let (pack, source) = resolve_rule_pack(None, Some(dir.path()), "site").expect("resolve");
        assert_eq!(pack.id, "site");
        assert!(source.ends_with("site.toml"));
    }

    #[test]
    fn unknown_pack_without_source_is_an_error() {
        let err = resolve_rule_pack(None, None, "pci").unwrap_err();
        assert!(matches!(err, RulePackError::UnknownPack { .. }));
    }
}
