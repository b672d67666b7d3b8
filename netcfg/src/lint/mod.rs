//! Rule evaluation over a normalized device config.
//!
//! [`LintEngine::evaluate`] walks the supplied rules in order. Each rule is
//! judged on its own: disabled rules, rules scoped to other vendors and rules
//! with no configured check are skipped, and a rule whose evaluation fails
//! (bad path, bad regex, panicking predicate) is logged and skipped too. The
//! run itself never fails.

use std::cell::OnceCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use netcfg_model::{NormalizedConfig, PathError, PathExpr};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::predicates::{Predicate, PredicateRegistry};

pub mod finding;
pub mod operator;
pub mod rule;

pub use finding::{new_finding_id, LintFinding, LintSummary, Severity};
pub use rule::{Condition, LintRule, Operator, RawLintRule, RuleCheck, RuleError, TargetType};

/// Why a single rule could not reach a verdict.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),
    #[error("operator matches needs a string pattern")]
    PatternNotString,
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("config could not be viewed as a document: {0}")]
    ConfigView(String),
    #[error("predicate '{name}' panicked")]
    PredicatePanicked { name: String },
}

/// What is being linted.
#[derive(Debug, Clone)]
pub struct LintContext<'a> {
    pub config: &'a NormalizedConfig,
    pub target_id: String,
    pub target_type: TargetType,
}

impl<'a> LintContext<'a> {
    pub fn new(config: &'a NormalizedConfig, target_id: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            config,
            target_id: target_id.into(),
            target_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    pub findings: Vec<LintFinding>,
    pub summary: LintSummary,
    /// Rules that reached a verdict.
    pub rules_evaluated: usize,
    pub rules_passed: usize,
    pub rules_failed: usize,
    pub rules_skipped: usize,
    pub duration_ms: u64,
}

enum Verdict {
    Pass,
    Fail(LintFinding),
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct LintEngine {
    registry: PredicateRegistry,
}

impl LintEngine {
    pub fn new(registry: PredicateRegistry) -> Self {
        Self { registry }
    }

    /// An engine backed by every built-in predicate.
    pub fn with_builtins() -> Self {
        Self::new(PredicateRegistry::with_builtins())
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    /// Add or replace a named predicate.
    pub fn register_predicate(&mut self, name: impl Into<String>, predicate: impl Predicate + 'static) {
        self.registry.register(name, predicate);
    }

    /// Evaluate `rules` against the context's config.
    ///
    /// The computation is synchronous; the async signature lets callers
    /// treat evaluation like any other service call.
    pub async fn evaluate(&self, rules: &[LintRule], ctx: &LintContext<'_>) -> LintResult {
        self.evaluate_sync(rules, ctx)
    }

    pub fn evaluate_sync(&self, rules: &[LintRule], ctx: &LintContext<'_>) -> LintResult {
        let started = Instant::now();
        let view = OnceCell::new();
        let mut findings = Vec::new();
        let (mut passed, mut failed, mut skipped) = (0, 0, 0);

        for rule in rules {
            match self.judge(rule, ctx, &view) {
                Verdict::Pass => passed += 1,
                Verdict::Fail(finding) => {
                    failed += 1;
                    findings.push(finding);
                }
                Verdict::Skip => skipped += 1,
            }
        }

        let summary = LintSummary::from_findings(&findings, rules.len());
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            target_id = %ctx.target_id,
            target_type = ctx.target_type.as_str(),
            rules = rules.len(),
            passed,
            failed,
            skipped,
            "lint evaluation finished"
        );

        LintResult {
            findings,
            summary,
            rules_evaluated: passed + failed,
            rules_passed: passed,
            rules_failed: failed,
            rules_skipped: skipped,
            duration_ms,
        }
    }

    fn judge(&self, rule: &LintRule, ctx: &LintContext<'_>, view: &OnceCell<Result<Value, String>>) -> Verdict {
        if !rule.enabled || !rule.applies_to(ctx.config.vendor()) {
            return Verdict::Skip;
        }
        let outcome = match &rule.check {
            RuleCheck::Unconfigured => return Verdict::Skip,
            RuleCheck::Match { path, condition } => self.check_match(rule, path, condition, ctx, view),
            RuleCheck::Predicate { name } => self.check_predicate(rule, name, ctx),
        };
        match outcome {
            Ok(None) => Verdict::Pass,
            Ok(Some(finding)) => Verdict::Fail(finding),
            Err(err) => {
                error!(rule_id = %rule.id, error = %err, "rule evaluation failed; skipping");
                Verdict::Skip
            }
        }
    }

    fn check_match(
        &self,
        rule: &LintRule,
        path: &str,
        condition: &Condition,
        ctx: &LintContext<'_>,
        view: &OnceCell<Result<Value, String>>,
    ) -> Result<Option<LintFinding>, EvalError> {
        let expr = PathExpr::parse(path)?;
        let root = view
            .get_or_init(|| serde_json::to_value(ctx.config).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| EvalError::ConfigView(e.clone()))?;
        let actual = expr.resolve(root);
        let outcome = operator::apply(path, actual.as_deref(), condition)?;
        if outcome.passed {
            return Ok(None);
        }
        let mut finding = failure(rule, Some(outcome.message)).at_path(path);
        if let Some(value) = actual {
            finding = finding.with_value(value.into_owned());
        }
        Ok(Some(finding))
    }

    fn check_predicate(
        &self,
        rule: &LintRule,
        name: &str,
        ctx: &LintContext<'_>,
    ) -> Result<Option<LintFinding>, EvalError> {
        let Some(predicate) = self.registry.get(name) else {
            warn!(rule_id = %rule.id, predicate = name, "unknown predicate; treating rule as passed");
            return Ok(None);
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| predicate.check(ctx.config)))
            .map_err(|_| EvalError::PredicatePanicked { name: name.to_string() })?;
        if outcome.passed {
            return Ok(None);
        }
        let mut finding = failure(rule, outcome.message);
        if let Some(path) = outcome.path {
            finding = finding.at_path(path);
        }
        if let Some(value) = outcome.value {
            finding = finding.with_value(value);
        }
        Ok(Some(finding))
    }
}

/// A finding for `rule`. The message falls back from the check's own
/// message to the rule description, then to its title.
fn failure(rule: &LintRule, message: Option<String>) -> LintFinding {
    let message = message
        .filter(|m| !m.is_empty())
        .or_else(|| rule.description.clone())
        .unwrap_or_else(|| rule.title.clone());
    let finding = LintFinding::new(&rule.id, &rule.title, rule.severity, message);
    match &rule.remediation {
        Some(remediation) => finding.with_remediation(remediation),
        None => finding,
    }
}
