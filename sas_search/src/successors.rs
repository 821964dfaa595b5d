use sas_task::{OpId, SasOperator, SasTask, State, VarId};
use std::collections::HashSet;

/// A decision tree over state variables, pruning operator applicability by
/// concrete value.
enum Node {
    /// `children` has length `|D(var)|+1`; the last entry is the don't-care
    /// child (operators that place no requirement on `var`).
    Selector { var: VarId, children: Vec<Node> },
    Generator(Vec<OpId>),
}

/// Built once from a `SasTask` and immutable thereafter.
pub struct SuccessorTree {
    root: Node,
}

fn mentions_var(var: VarId, op: &SasOperator) -> bool {
    op.prevail.iter().any(|f| f.var == var) || op.effects.iter().any(|eff| eff.var == var && eff.from.is_some())
}

fn any_candidate_mentions_var(var: VarId, operators: &[SasOperator], candidates: &[OpId]) -> bool {
    candidates.iter().any(|&id| mentions_var(var, &operators[id.0]))
}

/// The operators in `candidates` that require `var = value`, either via a
/// prevail condition or a conditional effect's `from` value. An operator's
/// first mention of `var` (prevail takes priority over effects) decides its
/// fate, matching the SAS⁺ invariant that an operator mentions a given
/// variable through at most one prevail condition or effect precondition.
fn candidates_for_value(var: VarId, value: u32, operators: &[SasOperator], candidates: &[OpId]) -> Vec<OpId> {
    let mut matched = Vec::new();
    for &id in candidates {
        let op = &operators[id.0];
        if let Some(f) = op.prevail.iter().find(|f| f.var == var) {
            if f.val == value {
                matched.push(id);
            }
            continue;
        }
        if let Some(eff) = op.effects.iter().find(|eff| eff.var == var) {
            if eff.from == Some(value) {
                matched.push(id);
            }
        }
    }
    matched
}

fn build_node(var: usize, domains: &[u32], operators: &[SasOperator], candidates: Vec<OpId>) -> Node {
    if var == domains.len() {
        return Node::Generator(candidates);
    }
    let var_id = VarId(var as u32);
    if !any_candidate_mentions_var(var_id, operators, &candidates) {
        return build_node(var + 1, domains, operators, candidates);
    }

    let mut claimed = HashSet::new();
    let mut children = Vec::with_capacity(domains[var] as usize + 1);
    for value in 0..domains[var] {
        let value_candidates = candidates_for_value(var_id, value, operators, &candidates);
        claimed.extend(value_candidates.iter().copied());
        children.push(build_node(var + 1, domains, operators, value_candidates));
    }
    let dont_care: Vec<OpId> = candidates.into_iter().filter(|id| !claimed.contains(id)).collect();
    children.push(build_node(var + 1, domains, operators, dont_care));
    Node::Selector { var: var_id, children }
}

fn applicable_rec(node: &Node, state: &State, out: &mut Vec<OpId>) {
    match node {
        Node::Generator(ops) => out.extend(ops.iter().copied()),
        Node::Selector { var, children } => {
            let value = state[*var] as usize;
            applicable_rec(&children[value], state, out);
            applicable_rec(children.last().expect("selector always has a don't-care child"), state, out);
        }
    }
}

impl SuccessorTree {
    /// Builds the tree once from `task.domains`, in ascending variable order.
    /// Domain sizes come from the task's declared domains, not from the facts
    /// actually mentioned by operators.
    pub fn build(task: &SasTask) -> Self {
        let candidates: Vec<OpId> = (0..task.operators.len()).map(OpId).collect();
        let root = build_node(0, &task.domains, &task.operators, candidates);
        SuccessorTree { root }
    }

    /// The operator indices applicable in `state`, each appearing exactly
    /// once: the tree's recursive partitioning keeps every operator's
    /// candidate set disjoint across siblings.
    pub fn applicable(&self, state: &State) -> Vec<OpId> {
        let mut out = Vec::new();
        applicable_rec(&self.root, state, &mut out);
        out
    }

    /// Applicable operators together with their cost and successor state, for
    /// direct use as an A* `expand` step.
    pub fn expand(&self, task: &SasTask, state: &State) -> Vec<(OpId, u32, State)> {
        self.applicable(state)
            .into_iter()
            .map(|id| {
                let op = &task.operators[id.0];
                let mut next = state.clone();
                for eff in &op.effects {
                    next = next.with(eff.var, eff.to);
                }
                (id, op.cost, next)
            })
            .collect()
    }
}
