use crate::successors::SuccessorTree;
use env_param::EnvParam;
use sas_task::{Cost, OpId, SasTask, State};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

static OPEN_CAPACITY_HINT: EnvParam<usize> = EnvParam::new("ARIES_SAS_OPEN_CAPACITY_HINT", "1024");
static PRINT_STATS: EnvParam<bool> = EnvParam::new("ARIES_SAS_PRINT_STATS", "false");

/// A small record of one `search` call, logged once at `debug!` on return.
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    pub expanded: u64,
    pub generated: u64,
    /// Always zero given the consistency of `h_max`/`h_lm_cut`; kept for a
    /// future heuristic that might not be consistent.
    pub reopened: u64,
    pub peak_open_size: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded={} generated={} reopened={} peak_open={}",
            self.expanded, self.generated, self.reopened, self.peak_open_size
        )
    }
}

/// A found plan: the operators to apply in order, and their total cost.
pub struct Plan {
    pub actions: Vec<OpId>,
    pub cost: u32,
}

/// Canonical A* over the concrete SAS⁺ state space.
///
/// `h` must be admissible and consistent — both `h_max` and `h_lm_cut` are —
/// so a state is only relaxed again if its g-value actually improves; the
/// consistency assumption means that never happens once a state is first
/// expanded, but the gate is checked regardless. Returns `None` if `task`
/// has no plan.
pub fn search(task: &SasTask, tree: &SuccessorTree, mut h: impl FnMut(&State) -> Cost) -> (Option<Plan>, SearchStats) {
    let mut stats = SearchStats::default();
    let mut g: HashMap<State, Cost> = HashMap::new();
    let mut parent: HashMap<State, (State, OpId, u32)> = HashMap::new();
    // Priority key (f, Reverse(g), seq): ascending f; among equal f, prefer
    // larger g (smaller Reverse(g)) as the suggested secondary key; `seq` is
    // the final, purely-for-determinism tiebreak (see DESIGN.md).
    let mut open: BinaryHeap<Reverse<(Cost, Reverse<Cost>, u64, State)>> = BinaryHeap::with_capacity(OPEN_CAPACITY_HINT.get());
    let mut seq: u64 = 0;

    g.insert(task.initial.clone(), Cost::ZERO);
    let h0 = h(&task.initial);
    open.push(Reverse((h0, Reverse(Cost::ZERO), seq, task.initial.clone())));
    seq += 1;

    while let Some(Reverse((_f, Reverse(g_s), _seq, s))) = open.pop() {
        stats.peak_open_size = stats.peak_open_size.max(open.len() + 1);
        // Stale entries (superseded by a cheaper path found later) are simply
        // skipped rather than removed from the heap on insertion.
        if g.get(&s).copied() != Some(g_s) {
            continue;
        }
        if task.is_goal(&s) {
            let plan = reconstruct(&parent, &s, g_s);
            log_stats(&stats);
            return (Some(plan), stats);
        }
        stats.expanded += 1;

        for (op_id, cost, succ) in tree.expand(task, &s) {
            let candidate = g_s + Cost::Finite(cost);
            let current = g.get(&succ).copied().unwrap_or(Cost::Infinite);
            if candidate < current {
                if current.is_finite() {
                    stats.reopened += 1;
                }
                g.insert(succ.clone(), candidate);
                parent.insert(succ.clone(), (s.clone(), op_id, cost));
                stats.generated += 1;
                let f_succ = candidate + h(&succ);
                open.push(Reverse((f_succ, Reverse(candidate), seq, succ)));
                seq += 1;
            }
        }
    }

    log_stats(&stats);
    (None, stats)
}

fn reconstruct(parent: &HashMap<State, (State, OpId, u32)>, goal: &State, total_cost: Cost) -> Plan {
    let mut actions = Vec::new();
    let mut current = goal.clone();
    while let Some((prev, op, _cost)) = parent.get(&current) {
        actions.push(*op);
        current = prev.clone();
    }
    actions.reverse();
    Plan {
        actions,
        cost: total_cost.finite().expect("a goal state reached by search always has a finite g-value"),
    }
}

fn log_stats(stats: &SearchStats) {
    tracing::debug!(%stats, "a* search finished");
    if PRINT_STATS.get() {
        eprintln!("{stats}");
    }
}
