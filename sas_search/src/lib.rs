//! The decision-tree successor generator and the A* search built on top of
//! it.

mod astar;
mod successors;

pub use astar::{search, Plan, SearchStats};
pub use successors::SuccessorTree;
