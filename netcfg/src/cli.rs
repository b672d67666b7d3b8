use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use netcfg::generate::Action;
use netcfg::lint::TargetType;
use netcfg::rulepack::BASELINE_PACK_ID;
use netcfg_model::Vendor;

#[derive(Parser, Debug)]
#[command(name = "netcfg")]
#[command(about = "Lint network device configs and render vendor CLI from intent")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Evaluate a normalized config against a rule pack.
    Lint(LintArgs),
    /// Render a canonical intent model into vendor CLI.
    Render(RenderArgs),
    /// Generate a single-intent CLI snippet.
    Generate(GenerateArgs),
    /// List built-in predicates.
    Predicates,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum VendorArg {
    Cisco,
    Mikrotik,
    Fortigate,
    Generic,
}

impl From<VendorArg> for Vendor {
    fn from(arg: VendorArg) -> Self {
        match arg {
            VendorArg::Cisco => Vendor::Cisco,
            VendorArg::Mikrotik => Vendor::Mikrotik,
            VendorArg::Fortigate => Vendor::Fortigate,
            VendorArg::Generic => Vendor::Generic,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum TargetTypeArg {
    Device,
    ConfigVersion,
    ChangeSet,
}

impl From<TargetTypeArg> for TargetType {
    fn from(arg: TargetTypeArg) -> Self {
        match arg {
            TargetTypeArg::Device => TargetType::Device,
            TargetTypeArg::ConfigVersion => TargetType::ConfigVersion,
            TargetTypeArg::ChangeSet => TargetType::ChangeSet,
        }
    }
}

#[derive(Parser, Debug)]
pub struct LintArgs {
    /// Normalized config (.json or .toml).
    pub file: PathBuf,
    /// Rule pack file. Replaces the embedded baseline pack.
    #[arg(long, conflicts_with = "rules_dir")]
    pub rules: Option<PathBuf>,
    /// Directory holding <pack>.toml rule packs.
    #[arg(long, conflicts_with = "rules")]
    pub rules_dir: Option<PathBuf>,
    /// Rule pack id to look up in --rules-dir.
    #[arg(long, default_value = BASELINE_PACK_ID)]
    pub pack: String,
    /// Target id recorded in the report. Defaults to the device hostname.
    #[arg(long)]
    pub target_id: Option<String>,
    #[arg(long, value_enum, default_value_t = TargetTypeArg::Device)]
    pub target_type: TargetTypeArg,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Fail on any finding, not only critical and high.
    #[arg(long)]
    pub strict: bool,
    /// Show rule source, finding paths and remediation.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Canonical intent model (.json or .toml).
    pub file: PathBuf,
    #[arg(long, value_enum)]
    pub vendor: VendorArg,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Only print this section (base, vlan, interfaces, routing, services, firewall).
    #[arg(long)]
    pub section: Option<String>,
    /// Skip the vendor pre-flight checks.
    #[arg(long)]
    pub no_preflight: bool,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[arg(long, value_enum)]
    pub vendor: VendorArg,
    /// Template action, e.g. wan_uplink or secure_baseline.
    #[arg(long, value_parser = parse_action)]
    pub action: Action,
    /// Parameter document (.json or .toml object).
    #[arg(long)]
    pub params: Option<PathBuf>,
    /// Parameter override as key=value. Values parse as JSON when possible.
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub param: Vec<String>,
}

fn parse_action(raw: &str) -> Result<Action, String> {
    raw.parse::<Action>().map_err(|err| err.to_string())
}
