use anyhow::{bail, Context, Result};
use netcfg::lint::{LintContext, LintEngine, TargetType};
use netcfg::report::{render_lint_text, LintHeader};
use netcfg::rulepack::resolve_rule_pack;
use netcfg_model::{load_file, NormalizedConfig};
use serde::Serialize;

use crate::cli::{LintArgs, OutputFormat};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LintReport<'a> {
    target_id: &'a str,
    target_type: TargetType,
    pack: &'a str,
    rules_source: &'a str,
    #[serde(flatten)]
    result: &'a netcfg::lint::LintResult,
}

pub fn run_lint(args: LintArgs) -> Result<()> {
    let config: NormalizedConfig = load_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let (pack, source) = resolve_rule_pack(args.rules.as_deref(), args.rules_dir.as_deref(), &args.pack)
        .with_context(|| "failed to load rule pack")?;

    let target_id = args
        .target_id
        .clone()
        .unwrap_or_else(|| config.device.hostname.clone());
    let target_type = TargetType::from(args.target_type);
    let engine = LintEngine::with_builtins();
    let ctx = LintContext::new(&config, target_id.clone(), target_type);
    let result = engine.evaluate_sync(&pack.rules, &ctx);

    match args.format {
        OutputFormat::Text => {
            let header = LintHeader {
                target_id: &target_id,
                target_type: target_type.as_str(),
                vendor: config.vendor().as_str(),
                pack_id: &pack.id,
                rules_source: &source,
            };
            println!("{}", render_lint_text(&header, &result, args.verbose));
        }
        OutputFormat::Json => {
            let report = LintReport {
                target_id: &target_id,
                target_type,
                pack: &pack.id,
                rules_source: &source,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    let summary = &result.summary;
    if !summary.passed {
        bail!(
            "lint failed: {} critical, {} high findings",
            summary.critical,
            summary.high
        );
    }
    if args.strict && !result.findings.is_empty() {
        bail!("lint failed in strict mode: {} findings", result.findings.len());
    }
    Ok(())
}
