use anyhow::Result;
use clap::{Parser, ValueEnum};
use sas_heuristics::{h_lm_cut, h_max};
use sas_planners::{init_logging, load_task};
use sas_search::{search, SuccessorTree};
use sas_task::{build_strips_plus, Cost, State};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Heuristic {
    Hmax,
    Lmcut,
}

/// Finds an optimal plan for a SAS⁺ task with A*, driven by h^max or h^LM-cut.
#[derive(Parser, Debug)]
#[command(name = "planner", author, version, about, long_about = None)]
struct Opt {
    /// Path to a file containing the SAS⁺ representation of the task.
    #[arg(long, short)]
    input: PathBuf,
    /// The admissible heuristic to search with.
    #[arg(long, value_enum)]
    heuristic: Heuristic,
}

fn main() -> Result<()> {
    init_logging();
    let opt = Opt::parse();
    let task = load_task(&opt.input)?;
    let strips = build_strips_plus(&task);
    let tree = SuccessorTree::build(&task);

    let h = |state: &State| -> Cost {
        let source = strips.state_facts(state);
        match opt.heuristic {
            Heuristic::Hmax => h_max(&strips, &source),
            Heuristic::Lmcut => h_lm_cut(&strips, &source),
        }
    };

    let (plan, _stats) = search(&task, &tree, h);
    match plan {
        Some(plan) => {
            for op in &plan.actions {
                println!("{}", task.operators[op.0].name);
            }
            println!("Plan cost: {}", plan.cost);
        }
        None => println!("Plan cost: -1"),
    }
    Ok(())
}
