use sas_task::{Cost, FactId, OpId};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// The two termination modes of the γ-fixpoint.
pub enum FixpointMode<'a> {
    /// Stop as soon as every fact in `goal` is finished — used by h^max.
    Partial { goal: &'a [FactId] },
    /// Run to full completion, or until no unfinished fact has finite σ —
    /// used by h^LM-cut, which needs σ at every fact to compute the
    /// precondition chooser.
    Full,
}

/// The inputs to one γ-fixpoint propagation: a dense fact space `0..num_facts`,
/// an operator list given as three parallel slices (`op_pre`, `op_add`,
/// `op_cost`), the reverse index `pre_to_ops`, and the source fact set.
///
/// Costs are kept separate from `pre`/`add` so that h^LM-cut can re-run the
/// fixpoint many times against the same `pre`/`add` structure while only
/// cloning and mutating the (small) cost vector between iterations.
pub struct FixpointInput<'a> {
    pub num_facts: usize,
    pub op_pre: &'a [Vec<FactId>],
    pub op_add: &'a [Vec<FactId>],
    pub op_cost: &'a [Cost],
    pub pre_to_ops: &'a [Vec<OpId>],
    pub source: &'a [FactId],
}

/// Computes σ: F → ℕ∪{∞}, the cheapest cost to achieve each fact in the delete
/// relaxation starting from `input.source`: σ(p) = 0 if p ∈ source, else the
/// min over operators achieving p of cost(o) + max σ over o's preconditions.
///
/// Implemented as a Dijkstra-like propagation: a fact is "closed" the moment
/// it is popped as the cheapest unfinished fact,
/// and an operator "fires" the moment its last open precondition closes, at
/// which point the firing cost uses that precondition's σ — which, by the
/// monotone expansion order, is the maximum σ over all of the operator's
/// preconditions.
pub fn gamma_fixpoint(input: &FixpointInput, mode: FixpointMode) -> Vec<Cost> {
    let mut sigma = vec![Cost::Infinite; input.num_facts];
    let mut finished = vec![false; input.num_facts];
    let mut counter: Vec<usize> = input.op_pre.iter().map(|pre| pre.len()).collect();
    let mut heap: BinaryHeap<Reverse<(Cost, FactId)>> = BinaryHeap::new();

    let mut goal_remaining = match &mode {
        FixpointMode::Partial { goal } => goal.len(),
        FixpointMode::Full => 0,
    };
    let mut is_goal = vec![false; input.num_facts];
    if let FixpointMode::Partial { goal } = &mode {
        for &p in *goal {
            is_goal[p.0] = true;
        }
    }

    let mut relax = |sigma: &mut Vec<Cost>, heap: &mut BinaryHeap<Reverse<(Cost, FactId)>>, p: FactId, candidate: Cost| {
        if candidate < sigma[p.0] {
            sigma[p.0] = candidate;
            heap.push(Reverse((candidate, p)));
        }
    };

    for &p in input.source {
        relax(&mut sigma, &mut heap, p, Cost::ZERO);
    }
    for (i, pre) in input.op_pre.iter().enumerate() {
        if pre.is_empty() {
            for &q in &input.op_add[i] {
                relax(&mut sigma, &mut heap, q, input.op_cost[i]);
            }
        }
    }

    let mut num_finished = 0usize;
    if goal_remaining == 0 {
        if let FixpointMode::Partial { .. } = mode {
            return sigma;
        }
    }

    while let Some(Reverse((cost, p))) = heap.pop() {
        if finished[p.0] {
            continue;
        }
        finished[p.0] = true;
        num_finished += 1;
        if is_goal[p.0] {
            goal_remaining -= 1;
        }

        for &op_id in &input.pre_to_ops[p.0] {
            counter[op_id.0] -= 1;
            if counter[op_id.0] == 0 {
                let firing_cost = input.op_cost[op_id.0] + cost;
                for &q in &input.op_add[op_id.0] {
                    relax(&mut sigma, &mut heap, q, firing_cost);
                }
            }
        }

        match mode {
            FixpointMode::Partial { .. } => {
                if goal_remaining == 0 {
                    break;
                }
            }
            FixpointMode::Full => {
                if num_finished == input.num_facts {
                    break;
                }
            }
        }
    }

    sigma
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_step_chain_matches_expected_sigma() {
        // x in {0,1,2}, s0=[0], G={(x,2)},
        // a: cost 3, (x,0)->(x,1); b: cost 4, (x,1)->(x,2).
        let facts = [FactId(0), FactId(1), FactId(2)]; // (x,0) (x,1) (x,2)
        let op_pre = vec![vec![FactId(0)], vec![FactId(1)]];
        let op_add = vec![vec![FactId(1)], vec![FactId(2)]];
        let op_cost = vec![Cost::Finite(3), Cost::Finite(4)];
        let mut pre_to_ops = vec![Vec::new(); 3];
        pre_to_ops[0].push(OpId(0));
        pre_to_ops[1].push(OpId(1));
        let source = [facts[0]];
        let input = FixpointInput {
            num_facts: 3,
            op_pre: &op_pre,
            op_add: &op_add,
            op_cost: &op_cost,
            pre_to_ops: &pre_to_ops,
            source: &source,
        };
        let sigma = gamma_fixpoint(&input, FixpointMode::Full);
        assert_eq!(sigma[0], Cost::ZERO);
        assert_eq!(sigma[1], Cost::Finite(3));
        assert_eq!(sigma[2], Cost::Finite(7));
    }

    #[test]
    fn unreachable_goal_is_infinite() {
        // no operators at all, so a fact outside the source set stays unreachable.
        let op_pre: Vec<Vec<FactId>> = vec![];
        let op_add: Vec<Vec<FactId>> = vec![];
        let op_cost: Vec<Cost> = vec![];
        let pre_to_ops = vec![Vec::new(), Vec::new()];
        let source = [FactId(0)];
        let goal = [FactId(1)];
        let input = FixpointInput {
            num_facts: 2,
            op_pre: &op_pre,
            op_add: &op_add,
            op_cost: &op_cost,
            pre_to_ops: &pre_to_ops,
            source: &source,
        };
        let sigma = gamma_fixpoint(&input, FixpointMode::Partial { goal: &goal });
        assert_eq!(sigma[1], Cost::Infinite);
    }

    #[test]
    fn fixpoint_law_holds_for_every_operator() {
        // For every operator o with all pre finite: σ(p) ≤ cost(o) + max σ(q∈pre(o)).
        let op_pre = vec![vec![FactId(0)], vec![FactId(0), FactId(1)]];
        let op_add = vec![vec![FactId(1)], vec![FactId(2)]];
        let op_cost = vec![Cost::Finite(2), Cost::Finite(10)];
        let mut pre_to_ops = vec![Vec::new(); 3];
        pre_to_ops[0].push(OpId(0));
        pre_to_ops[0].push(OpId(1));
        pre_to_ops[1].push(OpId(1));
        let source = [FactId(0)];
        let input = FixpointInput {
            num_facts: 3,
            op_pre: &op_pre,
            op_add: &op_add,
            op_cost: &op_cost,
            pre_to_ops: &pre_to_ops,
            source: &source,
        };
        let sigma = gamma_fixpoint(&input, FixpointMode::Full);
        for (i, pre) in op_pre.iter().enumerate() {
            if pre.iter().all(|p| sigma[p.0].is_finite()) {
                let max_pre = pre.iter().map(|p| sigma[p.0]).max().unwrap_or(Cost::ZERO);
                for &q in &op_add[i] {
                    assert!(sigma[q.0] <= op_cost[i] + max_pre);
                }
            }
        }
    }
}
