//! Typed containers for SAS⁺ planning tasks and their delete-free STRIPS⁺
//! projection, plus the textual SAS⁺ parser.
//!
//! This crate owns the task model and relaxation, plus the file-parsing half
//! of the shared I/O boundary; it has no dependency on the heuristics or
//! search crates.

mod ids;
mod parser;
mod state;
mod strips;
mod task;

pub use ids::{Cost, Fact, FactId, OpId, VarId};
pub use parser::{parse_sas_task, InputFormatError};
pub use state::State;
pub use strips::{build_strips_plus, StripsOperator, StripsTask};
pub use task::{SasEffect, SasOperator, SasTask};
