use crate::ids::{Fact, FactId, OpId};
use crate::state::State;
use crate::task::SasTask;
use std::collections::{HashMap, HashSet};

/// A STRIPS⁺ operator: precondition facts, add facts, and a cost. Delete
/// effects are dropped — the relaxation is monotone.
#[derive(Clone, Debug)]
pub struct StripsOperator {
    pub pre: Vec<FactId>,
    pub add: Vec<FactId>,
    pub cost: u32,
}

/// The delete-relaxed STRIPS⁺ projection of a SAS⁺ task: `(F, A, s₀ᶠ, Gᶠ, P)`.
///
/// Built once by [`build_strips_plus`] and read-only afterwards.
#[derive(Clone, Debug)]
pub struct StripsTask {
    facts: Vec<Fact>,
    fact_index: HashMap<Fact, FactId>,
    pub ops: Vec<StripsOperator>,
    pub init: Vec<FactId>,
    pub goal: Vec<FactId>,
    /// `pre_to_ops[p]` is the list of operator indices whose `pre` contains fact `p`,
    /// in ascending operator-index order.
    pub pre_to_ops: Vec<Vec<OpId>>,
}

impl StripsTask {
    pub fn num_facts(&self) -> usize {
        self.facts.len()
    }

    pub fn fact(&self, id: FactId) -> Fact {
        self.facts[id.0]
    }

    pub fn fact_id(&self, fact: Fact) -> Option<FactId> {
        self.fact_index.get(&fact).copied()
    }

    /// The STRIPS⁺ fact set implied by a concrete SAS⁺ state: `{(v, state[v]) : v ∈ V}`,
    /// restricted to facts that belong to `F`.
    ///
    /// A fact absent from `F` is neither mentioned by `s₀`/`G` nor by any
    /// operator; the relaxation is indifferent to it, so it is simply
    /// omitted here rather than interned on the fly.
    pub fn state_facts(&self, state: &State) -> Vec<FactId> {
        state
            .values()
            .iter()
            .enumerate()
            .filter_map(|(v, &val)| self.fact_id(Fact::new(v as u32, val)))
            .collect()
    }
}

struct FactInterner {
    facts: Vec<Fact>,
    index: HashMap<Fact, FactId>,
}

impl FactInterner {
    fn new() -> Self {
        FactInterner {
            facts: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn intern(&mut self, fact: Fact) -> FactId {
        if let Some(&id) = self.index.get(&fact) {
            id
        } else {
            let id = FactId(self.facts.len());
            self.facts.push(fact);
            self.index.insert(fact, id);
            id
        }
    }
}

/// The FDR→STRIPS⁺ relaxation.
///
/// Operators keep their input order and indices; `pre`/`add` are built as
/// sets (deduplicated), but the operator list itself is not deduplicated
/// even when two operators collapse to an identical `(pre, add, cost)`
/// triple.
pub fn build_strips_plus(task: &SasTask) -> StripsTask {
    let mut interner = FactInterner::new();

    let init: Vec<FactId> = task
        .initial
        .values()
        .iter()
        .enumerate()
        .map(|(v, &val)| interner.intern(Fact::new(v as u32, val)))
        .collect();

    let goal: Vec<FactId> = task.goal.iter().map(|&f| interner.intern(f)).collect();

    let mut ops = Vec::with_capacity(task.operators.len());
    for op in &task.operators {
        let mut pre = Vec::new();
        let mut seen_pre = HashSet::new();
        for &f in &op.prevail {
            let id = interner.intern(f);
            if seen_pre.insert(id) {
                pre.push(id);
            }
        }
        for eff in &op.effects {
            if let Some(from) = eff.from {
                let id = interner.intern(Fact::new(eff.var.0, from));
                if seen_pre.insert(id) {
                    pre.push(id);
                }
            }
        }

        let mut add = Vec::new();
        let mut seen_add = HashSet::new();
        for eff in &op.effects {
            let id = interner.intern(Fact::new(eff.var.0, eff.to));
            if seen_add.insert(id) {
                add.push(id);
            }
        }

        ops.push(StripsOperator { pre, add, cost: op.cost });
    }

    let mut pre_to_ops = vec![Vec::new(); interner.facts.len()];
    for (i, op) in ops.iter().enumerate() {
        for &p in &op.pre {
            pre_to_ops[p.0].push(OpId(i));
        }
    }

    debug_assert!(
        (0..pre_to_ops.len()).all(|p| {
            let expected: HashSet<OpId> = ops
                .iter()
                .enumerate()
                .filter(|(_, op)| op.pre.contains(&FactId(p)))
                .map(|(i, _)| OpId(i))
                .collect();
            pre_to_ops[p].iter().copied().collect::<HashSet<_>>() == expected
        }),
        "pre_to_ops[p] must exactly equal {{i : p in A[i].pre}} for every fact p"
    );

    StripsTask {
        facts: interner.facts,
        fact_index: interner.index,
        ops,
        init,
        goal,
        pre_to_ops,
    }
}
