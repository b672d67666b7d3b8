use anyhow::{bail, Context, Result};
use netcfg::lint::LintFinding;
use netcfg::render::{lint_config, render_config, RenderResult, Section};
use netcfg::report::{render_commands_text, render_preflight};
use netcfg_model::{load_file, CanonicalConfig, Vendor};
use serde::Serialize;

use crate::cli::{OutputFormat, RenderArgs};

#[derive(Serialize)]
struct RenderReport<'a> {
    result: &'a RenderResult,
    preflight: &'a [LintFinding],
}

pub fn run_render(args: RenderArgs) -> Result<()> {
    if let Some(section) = args.section.as_deref() {
        if !Section::ALL.iter().any(|s| s.as_str() == section) {
            bail!("unknown section '{section}'");
        }
    }
    let config: CanonicalConfig = load_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let vendor = Vendor::from(args.vendor);

    let preflight = if args.no_preflight {
        Vec::new()
    } else {
        lint_config(&config, vendor).with_context(|| "pre-flight failed")?
    };
    let result = render_config(&config, vendor).with_context(|| "render failed")?;

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_commands_text(&result, args.section.as_deref()));
            if !args.no_preflight {
                println!();
                println!("{}", render_preflight(&preflight));
            }
        }
        OutputFormat::Json => {
            let report = RenderReport {
                result: &result,
                preflight: &preflight,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
