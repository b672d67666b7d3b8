use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod generate_cmd;
mod lint_cmd;
mod predicates_cmd;
mod render_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::Lint(args) => lint_cmd::run_lint(args),
        Command::Render(args) => render_cmd::run_render(args),
        Command::Generate(args) => generate_cmd::run_generate(args),
        Command::Predicates => predicates_cmd::run_predicates(),
    }
}

/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
