use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    #[default]
    Low,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Critical and high findings fail a lint run.
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Severity::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown severity '{raw}'"))
    }
}

/// A recorded rule failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintFinding {
    pub id: String,
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(default)]
    pub waived: bool,
}

impl LintFinding {
    pub fn new(
        rule_id: impl Into<String>,
        rule_name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: new_finding_id(),
            rule_id: rule_id.into(),
            rule_name: rule_name.into(),
            severity,
            message: message.into(),
            path: None,
            value: None,
            remediation: None,
            waived: false,
        }
    }

    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

pub fn new_finding_id() -> String {
    format!("finding-{}", Uuid::new_v4())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    pub waived: usize,
    pub total: usize,
    pub passed: bool,
}

impl LintSummary {
    /// Tally findings by severity. Waived findings only count toward
    /// `waived`; `passed` holds when no unwaived critical or high remain.
    ///
    /// # Arguments
    ///
    /// * `findings` - Findings from one evaluation pass
    /// * `total_rules` - Number of rules supplied to the pass
    pub fn from_findings(findings: &[LintFinding], total_rules: usize) -> Self {
        let mut summary = LintSummary {
            total: total_rules,
            ..LintSummary::default()
        };
        for finding in findings {
            if finding.waived {
                summary.waived += 1;
                continue;
            }
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary.passed = summary.critical == 0 && summary.high == 0;
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity, waived: bool) -> LintFinding {
        let mut f = LintFinding::new("R1", "rule", severity, "msg");
        f.waived = waived;
        f
    }

    #[test]
    fn finding_ids_are_prefixed_and_unique() {
        let a = new_finding_id();
        let b = new_finding_id();
        assert!(a.starts_with("finding-"));
        assert_ne!(a, b);
    }

    #[test]
    fn passed_only_fails_on_unwaived_critical_or_high() {
        for severity in Severity::ALL {
            let summary = LintSummary::from_findings(&[finding(severity, false)], 1);
            assert_eq!(summary.passed, !severity.is_blocking(), "{severity}");
            assert_eq!(summary.count(severity), 1);

            let waived = LintSummary::from_findings(&[finding(severity, true)], 1);
            assert!(waived.passed, "waived {severity}");
            assert_eq!(waived.waived, 1);
            assert_eq!(waived.count(severity), 0);
        }
    }

    #[test]
    fn mixed_findings_tally_per_severity() {
        let findings = vec![
            finding(Severity::Medium, false),
            finding(Severity::Medium, false),
            finding(Severity::Info, false),
            finding(Severity::High, true),
        ];
        let summary = LintSummary::from_findings(&findings, 9);
        assert_eq!(summary.medium, 2);
        assert_eq!(summary.info, 1);
        assert_eq!(summary.waived, 1);
        assert_eq!(summary.total, 9);
        assert!(summary.passed);
    }

    #[test]
    fn severity_parses_and_serializes_lowercase() {
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert!("urgent".parse::<Severity>().is_err());
        assert_eq!(
            serde_json::to_string(&Severity::Critical).expect("serialize"),
            "\"critical\""
        );
    }
}
