use crate::fixpoint::{gamma_fixpoint, FixpointInput, FixpointMode};
use sas_task::{Cost, FactId, StripsTask};

/// h^max(s) = max over p∈Gᶠ of σ(p), where σ is the partial γ-fixpoint from
/// S = sᶠ. Returns `Cost::Infinite` if any goal fact is unreachable.
pub fn h_max(task: &StripsTask, source: &[FactId]) -> Cost {
    let op_cost: Vec<Cost> = task.ops.iter().map(|o| Cost::Finite(o.cost)).collect();
    let op_pre: Vec<Vec<FactId>> = task.ops.iter().map(|o| o.pre.clone()).collect();
    let op_add: Vec<Vec<FactId>> = task.ops.iter().map(|o| o.add.clone()).collect();

    let input = FixpointInput {
        num_facts: task.num_facts(),
        op_pre: &op_pre,
        op_add: &op_add,
        op_cost: &op_cost,
        pre_to_ops: &task.pre_to_ops,
        source,
    };
    let sigma = gamma_fixpoint(&input, FixpointMode::Partial { goal: &task.goal });

    task.goal.iter().map(|&p| sigma[p.0]).max().unwrap_or(Cost::ZERO)
}
