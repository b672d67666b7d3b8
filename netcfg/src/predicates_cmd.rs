use anyhow::Result;
use netcfg::predicates::builtins;
use netcfg::report::render_predicates;

pub fn run_predicates() -> Result<()> {
    println!("{}", render_predicates(&builtins()));
    Ok(())
}
