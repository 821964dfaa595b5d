use crate::ids::{Fact, VarId};
use crate::state::State;

/// A single effect of an operator: `(var, from, to)`.
///
/// `from = None` is the sentinel ∅, "unconditional" — the effect applies
/// regardless of `var`'s current value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SasEffect {
    pub var: VarId,
    pub from: Option<u32>,
    pub to: u32,
}

/// An operator in the SAS⁺ representation: a name, a non-negative cost, a set
/// of prevail conditions, and a set of effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SasOperator {
    pub name: String,
    pub cost: u32,
    pub prevail: Vec<Fact>,
    pub effects: Vec<SasEffect>,
}

/// A SAS⁺ task `(V, D, s₀, G, O)`.
///
/// `domains[v]` is `|D(v)|`; values of variable `v` range over `0..domains[v]`.
#[derive(Clone, Debug)]
pub struct SasTask {
    pub domains: Vec<u32>,
    pub initial: State,
    pub goal: Vec<Fact>,
    pub operators: Vec<SasOperator>,
}

impl SasTask {
    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn domain_size(&self, var: VarId) -> u32 {
        self.domains[var.0 as usize]
    }

    /// `true` iff `state` satisfies every goal fact — the A* goal test.
    pub fn is_goal(&self, state: &State) -> bool {
        self.goal.iter().all(|f| state[f.var] == f.val)
    }
}
