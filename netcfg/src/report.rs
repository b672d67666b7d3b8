use colored::{ColoredString, Colorize};

use crate::lint::{LintFinding, LintResult, Severity};
use crate::predicates::BuiltinPredicate;
use crate::render::RenderResult;

/// What was linted and with which rules, for the report header.
#[derive(Debug, Clone)]
pub struct LintHeader<'a> {
    pub target_id: &'a str,
    pub target_type: &'a str,
    pub vendor: &'a str,
    pub pack_id: &'a str,
    pub rules_source: &'a str,
}

fn severity_tag(severity: Severity) -> ColoredString {
    let tag = format!("[{severity}]");
    match severity {
        Severity::Critical => tag.red().bold(),
        Severity::High => tag.red(),
        Severity::Medium => tag.yellow(),
        Severity::Low => tag.cyan(),
        Severity::Info => tag.normal(),
    }
}

fn heading(title: &str) -> String {
    title.bold().to_string()
}

/// Render one lint finding line, plus its remediation when `verbose`.
pub fn render_finding(finding: &LintFinding, verbose: bool) -> String {
    let mut line = format!(
        "- {} {}: {}",
        severity_tag(finding.severity),
        finding.rule_id,
        finding.message
    );
    if verbose {
        if let Some(path) = &finding.path {
            line.push_str(&format!("\n  path: {path}"));
        }
        if let Some(remediation) = &finding.remediation {
            line.push_str(&format!("\n  remediation: {remediation}"));
        }
    }
    line
}

/// Render a lint run for terminal output.
pub fn render_lint_text(header: &LintHeader<'_>, result: &LintResult, verbose: bool) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "lint target={} type={} vendor={} pack={}",
        header.target_id, header.target_type, header.vendor, header.pack_id
    ));
    if verbose {
        out.push(format!("Using rules: {}", header.rules_source));
    }
    let s = &result.summary;
    let verdict = if s.passed {
        "passed=true".green()
    } else {
        "passed=false".red()
    };
    out.push(format!(
        "result {verdict} critical={} high={} medium={} low={} info={} waived={}",
        s.critical, s.high, s.medium, s.low, s.info, s.waived
    ));
    out.push(format!(
        "rules evaluated={} passed={} failed={} skipped={}",
        result.rules_evaluated, result.rules_passed, result.rules_failed, result.rules_skipped
    ));
    out.push(heading("findings"));
    if result.findings.is_empty() {
        out.push("- none".to_string());
    }
    for finding in &result.findings {
        out.push(render_finding(finding, verbose));
    }
    out.join("\n")
}

/// Render rendered sections, optionally restricted to one section name,
/// followed by the verify and rollback plans.
pub fn render_commands_text(result: &RenderResult, section: Option<&str>) -> String {
    let mut out = Vec::new();
    out.push(format!("render vendor={}", result.vendor));
    for s in &result.sections {
        if section.is_some_and(|wanted| wanted != s.name) {
            continue;
        }
        out.push(heading(&format!("[{}]", s.name)).cyan().to_string());
        out.extend(s.commands.iter().cloned());
    }
    if section.is_none() {
        out.push(heading("[verify]").green().to_string());
        out.extend(result.verify_commands.iter().cloned());
        out.push(heading("[rollback]").yellow().to_string());
        out.extend(result.rollback_commands.iter().cloned());
    }
    out.join("\n")
}

/// Render pre-flight findings for a render run.
pub fn render_preflight(findings: &[LintFinding]) -> String {
    let mut out = vec![heading("preflight")];
    if findings.is_empty() {
        out.push("- none".to_string());
    }
    out.extend(findings.iter().map(|f| render_finding(f, true)));
    out.join("\n")
}

pub fn render_predicates(builtins: &[&BuiltinPredicate]) -> String {
    let width = builtins.iter().map(|p| p.name.len()).max().unwrap_or(0);
    builtins
        .iter()
        .map(|p| format!("{:<width$}  {}", p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n")
}
