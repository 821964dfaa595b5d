use anyhow::Result;
use clap::Parser;
use sas_heuristics::h_max;
use sas_planners::{init_logging, load_task};
use sas_task::build_strips_plus;
use std::path::PathBuf;

/// Prints h^max of the initial state of a SAS⁺ task.
#[derive(Parser, Debug)]
#[command(name = "hmax", author, version, about, long_about = None)]
struct Opt {
    /// Path to a file containing the SAS⁺ representation of the task.
    #[arg(long, short)]
    input: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let opt = Opt::parse();
    let task = load_task(&opt.input)?;
    let strips = build_strips_plus(&task);
    let source = strips.state_facts(&task.initial);
    println!("{}", h_max(&strips, &source));
    Ok(())
}
