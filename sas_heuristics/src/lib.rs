//! The γ-fixpoint engine and the two admissible heuristics built on top of
//! it, h^max and h^LM-cut.

mod fixpoint;
pub(crate) mod hmax;
mod lmcut;

pub use fixpoint::{gamma_fixpoint, FixpointInput, FixpointMode};
pub use hmax::h_max;
pub use lmcut::h_lm_cut;
