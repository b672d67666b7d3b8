//! Lint rule model and the ingestion boundary that produces it.
//!
//! Rules arrive in two document shapes. The current one puts the mode in a
//! top-level `type` (`match` with `path` + `condition`, or `custom` with
//! `predicateName`). The legacy one nests everything under `match`
//! (`{type: jsonpath|custom, path, operator, value, predicate}`), names the
//! rule with `name` instead of `title`, and spells operators in snake_case.
//! [`RawLintRule`] accepts both; [`LintRule::try_from`] resolves the mode once
//! so the evaluator only ever sees a [`RuleCheck`].

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use netcfg_model::Vendor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::finding::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Exists,
    NotExists,
    NotEmpty,
    Empty,
    Matches,
    GreaterThan,
}

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::Exists,
        Operator::NotExists,
        Operator::NotEmpty,
        Operator::Empty,
        Operator::Matches,
        Operator::GreaterThan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::Exists => "exists",
            Operator::NotExists => "notExists",
            Operator::NotEmpty => "notEmpty",
            Operator::Empty => "empty",
            Operator::Matches => "matches",
            Operator::GreaterThan => "greaterThan",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    /// Accepts camelCase and snake_case spellings (`notEquals`, `not_equals`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub operator: Operator,
    /// `None` when the document omitted the value.
    pub expected: Option<Value>,
}

/// How a rule reaches its verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleCheck {
    Match { path: String, condition: Condition },
    Predicate { name: String },
    /// Neither mode configured; always skipped.
    Unconfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Device,
    ConfigVersion,
    ChangeSet,
}

impl TargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Device => "device",
            TargetType::ConfigVersion => "config_version",
            TargetType::ChangeSet => "change_set",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawLintRule")]
pub struct LintRule {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
    /// Empty means every vendor.
    pub vendor_scope: Vec<Vendor>,
    pub enabled: bool,
    pub check: RuleCheck,
    pub remediation: Option<String>,
    /// Carried for callers; the engine never waives.
    pub waivable: bool,
}

impl LintRule {
    fn new(id: impl Into<String>, check: RuleCheck) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            description: None,
            severity: Severity::default(),
            vendor_scope: Vec::new(),
            enabled: true,
            check,
            remediation: None,
            waivable: true,
        }
    }

    /// A path-match rule.
    pub fn matching(
        id: impl Into<String>,
        path: impl Into<String>,
        operator: Operator,
        expected: Option<Value>,
    ) -> Self {
        Self::new(
            id,
            RuleCheck::Match {
                path: path.into(),
                condition: Condition { operator, expected },
            },
        )
    }

    /// A rule backed by a named predicate.
    pub fn predicate(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, RuleCheck::Predicate { name: name.into() })
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn for_vendors(mut self, vendors: impl IntoIterator<Item = Vendor>) -> Self {
        self.vendor_scope = vendors.into_iter().collect();
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn applies_to(&self, vendor: Vendor) -> bool {
        self.vendor_scope.is_empty() || self.vendor_scope.contains(&vendor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule has no id")]
    MissingId,
    #[error("rule {id}: both match and predicate modes are configured")]
    AmbiguousMode { id: String },
    #[error("rule {id}: unknown rule type '{kind}' (expected match or custom)")]
    UnknownMode { id: String, kind: String },
    #[error("rule {id}: {mode} rule is missing '{field}'")]
    MissingField {
        id: String,
        mode: &'static str,
        field: &'static str,
    },
    #[error("rule {id}: unknown operator '{operator}'")]
    UnknownOperator { id: String, operator: String },
    #[error("rule {id}: operator matches needs a string pattern")]
    PatternNotString { id: String },
}

/// Wire shape of a rule, as found in rule pack documents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLintRule {
    pub id: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub vendor_scope: Vec<Vendor>,
    pub enabled: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub path: Option<String>,
    pub condition: Option<RawCondition>,
    #[serde(alias = "customPredicate")]
    pub predicate_name: Option<String>,
    #[serde(rename = "match")]
    pub legacy: Option<RawMatch>,
    pub remediation: Option<String>,
    pub waivable: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCondition {
    #[serde(alias = "op")]
    pub operator: Option<String>,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub path: Option<String>,
    pub operator: Option<String>,
    pub value: Option<Value>,
    pub predicate: Option<String>,
}

#[derive(Clone, Copy)]
enum Mode {
    Match,
    Custom,
    None,
}

impl TryFrom<RawLintRule> for LintRule {
    type Error = RuleError;

    fn try_from(raw: RawLintRule) -> Result<Self, Self::Error> {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return Err(RuleError::MissingId);
        }

        let legacy = raw.legacy.unwrap_or_default();
        let condition = raw.condition.unwrap_or_default();
        let path = non_blank(raw.path).or_else(|| non_blank(legacy.path.clone()));
        let predicate = non_blank(raw.predicate_name).or_else(|| non_blank(legacy.predicate.clone()));

        let mode = match raw.kind.as_deref().or(legacy.kind.as_deref()) {
            Some(kind) => match kind.trim().to_ascii_lowercase().as_str() {
                "match" | "jsonpath" => Mode::Match,
                "custom" | "predicate" => Mode::Custom,
                // Regex rules need raw device text, which lint input never carries.
                "regex" => Mode::None,
                _ => {
                    return Err(RuleError::UnknownMode {
                        id,
                        kind: kind.to_string(),
                    })
                }
            },
            None => match (&path, &predicate) {
                (Some(_), Some(_)) => return Err(RuleError::AmbiguousMode { id }),
                (Some(_), None) => Mode::Match,
                (None, Some(_)) => Mode::Custom,
                (None, None) => Mode::None,
            },
        };

        let check = match mode {
            Mode::Match => {
                if predicate.is_some() {
                    return Err(RuleError::AmbiguousMode { id });
                }
                let Some(path) = path else {
                    return Err(RuleError::MissingField {
                        id,
                        mode: "match",
                        field: "path",
                    });
                };
                let Some(op_raw) = condition.operator.or(legacy.operator) else {
                    return Err(RuleError::MissingField {
                        id,
                        mode: "match",
                        field: "operator",
                    });
                };
                let operator = op_raw
                    .parse::<Operator>()
                    .map_err(|operator| RuleError::UnknownOperator {
                        id: id.clone(),
                        operator,
                    })?;
                let expected = condition.value.or(legacy.value);
                if operator == Operator::Matches && !matches!(expected, Some(Value::String(_))) {
                    return Err(RuleError::PatternNotString { id });
                }
                RuleCheck::Match {
                    path,
                    condition: Condition { operator, expected },
                }
            }
            Mode::Custom => {
                let Some(name) = predicate else {
                    return Err(RuleError::MissingField {
                        id,
                        mode: "custom",
                        field: "predicateName",
                    });
                };
                RuleCheck::Predicate { name }
            }
            Mode::None => RuleCheck::Unconfigured,
        };

        let title = non_blank(raw.title)
            .or_else(|| non_blank(raw.name))
            .unwrap_or_else(|| id.clone());

        Ok(LintRule {
            id,
            title,
            description: non_blank(raw.description),
            severity: raw.severity.unwrap_or_default(),
            vendor_scope: raw.vendor_scope,
            enabled: raw.enabled.unwrap_or(true),
            check,
            remediation: non_blank(raw.remediation),
            waivable: raw.waivable.unwrap_or(true),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
