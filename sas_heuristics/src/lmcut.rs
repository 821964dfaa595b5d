use crate::fixpoint::{gamma_fixpoint, FixpointInput, FixpointMode};
use sas_task::{Cost, Fact, FactId, OpId, StripsTask};
use std::collections::HashSet;

/// h^LM-cut(s), computed by iterated landmark extraction over the
/// justification graph of the augmented task.
///
/// The augmented task introduces two sentinel facts ⊥ (source) and ⊤ (goal)
/// and two zero-cost sentinel operators (`init-op`: ⊥ → sᶠ, `goal-op`: Gᶠ →
/// ⊤). Operator costs are mutated across iterations of *this call only* — a
/// fresh copy of the real operators' costs is taken on entry and the original
/// `StripsTask` is never touched.
pub fn h_lm_cut(task: &StripsTask, source: &[FactId]) -> Cost {
    let n = task.num_facts();
    let bottom = FactId(n);
    let top = FactId(n + 1);

    // pre/add are immutable for the duration of the call; only cost changes.
    let mut op_pre: Vec<Vec<FactId>> = task.ops.iter().map(|o| o.pre.clone()).collect();
    let mut op_add: Vec<Vec<FactId>> = task.ops.iter().map(|o| o.add.clone()).collect();
    let mut op_cost: Vec<Cost> = task.ops.iter().map(|o| Cost::Finite(o.cost)).collect();

    let init_op = OpId(op_pre.len());
    op_pre.push(vec![bottom]);
    op_add.push(source.to_vec());
    op_cost.push(Cost::ZERO);

    let goal_op = OpId(op_pre.len());
    op_pre.push(task.goal.clone());
    op_add.push(vec![top]);
    op_cost.push(Cost::ZERO);

    let mut pre_to_ops: Vec<Vec<OpId>> = task.pre_to_ops.clone();
    pre_to_ops.push(vec![init_op]); // ⊥'s reverse index: only init-op has it as a precondition.
    pre_to_ops.push(vec![]); // ⊤'s reverse index: nothing has ⊤ as a precondition.
    for &p in &task.goal {
        pre_to_ops[p.0].push(goal_op);
    }

    let tie_key = |p: FactId| -> (u8, u32, u32) {
        if p == bottom {
            (0, 0, 0)
        } else if p == top {
            (2, 0, 0)
        } else {
            let f: Fact = task.fact(p);
            (1, f.var.0, f.val)
        }
    };

    let mut h_lm_cut = Cost::ZERO;
    let source_bottom = [bottom];

    loop {
        let input = FixpointInput {
            num_facts: n + 2,
            op_pre: &op_pre,
            op_add: &op_add,
            op_cost: &op_cost,
            pre_to_ops: &pre_to_ops,
            source: &source_bottom,
        };
        let sigma = gamma_fixpoint(&input, FixpointMode::Full);
        let h_star = sigma[top.0];
        if !h_star.is_finite() {
            return Cost::Infinite;
        }
        if h_star == Cost::ZERO {
            break;
        }

        let pcf: Vec<Option<FactId>> = op_pre
            .iter()
            .map(|pre| {
                pre.iter()
                    .filter(|&&p| sigma[p.0].is_finite())
                    .copied()
                    .max_by_key(|&p| (sigma[p.0], tie_key(p)))
            })
            .collect();

        // forward[p] = (q, cost, op); rev[q] = (p, cost, op)
        let mut forward: Vec<Vec<(FactId, Cost, OpId)>> = vec![Vec::new(); n + 2];
        let mut rev: Vec<Vec<(FactId, Cost, OpId)>> = vec![Vec::new(); n + 2];
        for (i, chosen) in pcf.iter().enumerate() {
            if let Some(p) = chosen {
                for &q in &op_add[i] {
                    forward[p.0].push((q, op_cost[i], OpId(i)));
                    rev[q.0].push((*p, op_cost[i], OpId(i)));
                }
            }
        }

        let mut v_goal = HashSet::new();
        v_goal.insert(top);
        let mut stack = vec![top];
        while let Some(v) = stack.pop() {
            for &(pred, cost, _) in &rev[v.0] {
                if cost == Cost::ZERO && v_goal.insert(pred) {
                    stack.push(pred);
                }
            }
        }

        // A set, not a list: an operator can reach V_goal via more than one of
        // its add facts (a multi-effect operator, or two facts each closed
        // over a separate zero-cost chain), and must still only cross the cut
        // once — otherwise the decrement loop below would subtract `m` from
        // the same operator's cost more than once per iteration.
        let mut landmark = HashSet::new();
        let mut u_init = HashSet::new();
        u_init.insert(bottom);
        let mut stack = vec![bottom];
        while let Some(v) = stack.pop() {
            for &(neighbor, _cost, op) in &forward[v.0] {
                if v_goal.contains(&neighbor) {
                    landmark.insert(op);
                } else if u_init.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        // h_star > 0 (checked above) means at least one operator must cross
        // the cut from U_init to V_goal; an empty landmark here would mean
        // the goal-zone fixpoint grew without any operator justifying it.
        debug_assert!(!landmark.is_empty(), "h* > 0 but no operator landmark crosses the cut");
        let m = landmark
            .iter()
            .map(|&op| op_cost[op.0])
            .min()
            .and_then(Cost::finite)
            .expect("a non-empty action landmark with at least one finite-cost operator");
        tracing::trace!(h_so_far = %h_lm_cut, landmark_size = landmark.len(), min_landmark_cost = m, "lm-cut iteration");
        if m == 0 {
            // A genuine fixed point: the cheapest operator crossing the cut
            // already costs 0, so decrementing would change nothing and the
            // next iteration would recompute the same cut forever.
            break;
        }
        h_lm_cut = h_lm_cut + Cost::Finite(m);
        for &op in &landmark {
            let remaining = op_cost[op.0].finite().unwrap();
            debug_assert!(remaining >= m, "lm-cut decremented {:?} below zero: {remaining} - {m}", op);
            op_cost[op.0] = Cost::Finite(remaining - m);
        }
    }

    h_lm_cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use sas_task::{build_strips_plus, SasEffect, SasOperator, SasTask, State, VarId};

    fn op(name: &str, cost: u32, from: u32, to: u32) -> SasOperator {
        SasOperator {
            name: name.to_string(),
            cost,
            prevail: vec![],
            effects: vec![SasEffect {
                var: VarId(0),
                from: Some(from),
                to,
            }],
        }
    }

    #[test]
    fn one_step_scenario() {
        // a single operator a: cost 5, (x,0)->(x,1), goal (x,1): h^LM-cut = 5.
        let task = SasTask {
            domains: vec![2],
            initial: State::new(vec![0]),
            goal: vec![Fact::new(0, 1)],
            operators: vec![op("a", 5, 0, 1)],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::Finite(5));
    }

    #[test]
    fn two_step_chain() {
        // x in {0,1,2}, s0=[0], G={(x,2)}, a: cost 3 (x,0)->(x,1),
        // b: cost 4 (x,1)->(x,2): h^LM-cut = 7.
        let task = SasTask {
            domains: vec![3],
            initial: State::new(vec![0]),
            goal: vec![Fact::new(0, 2)],
            operators: vec![op("a", 3, 0, 1), op("b", 4, 1, 2)],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::Finite(7));
    }

    #[test]
    fn disjunctive_landmark_picks_the_cheaper_cut() {
        // two achievers for the same goal fact, h^LM-cut takes the
        // min-cost one.
        let task = SasTask {
            domains: vec![2],
            initial: State::new(vec![0]),
            goal: vec![Fact::new(0, 1)],
            operators: vec![op("cheap", 2, 0, 1), op("dear", 9, 0, 1)],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::Finite(2));
    }

    #[test]
    fn unreachable_goal_is_infinite() {
        // no operators at all, so the goal fact is never reachable.
        let task = SasTask {
            domains: vec![2],
            initial: State::new(vec![0]),
            goal: vec![Fact::new(0, 1)],
            operators: vec![],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::Infinite);
    }

    #[test]
    fn zero_at_goal() {
        let task = SasTask {
            domains: vec![2],
            initial: State::new(vec![1]),
            goal: vec![Fact::new(0, 1)],
            operators: vec![op("a", 5, 0, 1)],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::ZERO);
    }

    #[test]
    fn admissibility_against_h_max_on_the_two_step_chain() {
        use crate::hmax::h_max;
        let task = SasTask {
            domains: vec![3],
            initial: State::new(vec![0]),
            goal: vec![Fact::new(0, 2)],
            operators: vec![op("a", 3, 0, 1), op("b", 4, 1, 2)],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert!(h_max(&strips, &source) <= h_lm_cut(&strips, &source));
    }

    #[test]
    fn trivial_empty_task() {
        // V=∅, G=∅, O=∅: the empty task is trivially solved.
        let task = SasTask {
            domains: vec![],
            initial: State::new(vec![]),
            goal: vec![],
            operators: vec![],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::ZERO);
    }

    #[test]
    fn zero_cost_operator_terminates_immediately() {
        // goal reachable only through a zero-cost operator, so
        // h*=sigma(top)=0 on the very first fixpoint and the loop
        // terminates at step 1 without ever building a landmark.
        let task = SasTask {
            domains: vec![2],
            initial: State::new(vec![0]),
            goal: vec![Fact::new(0, 1)],
            operators: vec![op("free", 0, 0, 1)],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::ZERO);
    }

    #[test]
    fn multi_effect_operator_reaching_v_goal_twice_is_not_double_counted() {
        // `enable` (e=0->e=1) feeds `both`, a single operator with two
        // unconditional effects (x=1 and y=1). A zero-cost `link` (x=1->y=1)
        // puts both of `both`'s add facts in V_goal in the first iteration,
        // so the justification graph has two edges out of `both`'s chosen
        // precondition that both cross the cut. `both`'s operator index must
        // be counted once, not once per crossing edge: counting it twice
        // would decrement its cost by `m` twice in the same iteration and
        // underflow it on the following iteration.
        let task = SasTask {
            domains: vec![2, 2, 2], // e, x, y
            initial: State::new(vec![0, 0, 0]),
            goal: vec![Fact::new(2, 1)], // (y, 1)
            operators: vec![
                SasOperator {
                    name: "enable".to_string(),
                    cost: 2,
                    prevail: vec![],
                    effects: vec![SasEffect {
                        var: VarId(0),
                        from: Some(0),
                        to: 1,
                    }],
                },
                SasOperator {
                    name: "both".to_string(),
                    cost: 5,
                    prevail: vec![Fact::new(0, 1)],
                    effects: vec![
                        SasEffect {
                            var: VarId(1),
                            from: None,
                            to: 1,
                        },
                        SasEffect {
                            var: VarId(2),
                            from: None,
                            to: 1,
                        },
                    ],
                },
                SasOperator {
                    name: "link".to_string(),
                    cost: 0,
                    prevail: vec![Fact::new(1, 1)],
                    effects: vec![SasEffect {
                        var: VarId(2),
                        from: None,
                        to: 1,
                    }],
                },
            ],
        };
        let strips = build_strips_plus(&task);
        let source = strips.state_facts(&task.initial);
        assert_eq!(h_lm_cut(&strips, &source), Cost::Finite(7));
    }
}
