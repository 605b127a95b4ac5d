use crate::{flow::solver::SolveStatus, network::flow_arc::ArcIdx};

/// Outcome of one solve. `flows` is indexed like the network's arcs and is
/// all zeros unless the status is optimal.
#[derive(Debug, Clone)]
pub struct FlowSolution {
    status: SolveStatus,
    optimal_cost: Option<i64>,
    flows: Vec<i64>,
}

impl FlowSolution {
    pub fn new(status: SolveStatus, optimal_cost: Option<i64>, flows: Vec<i64>) -> Self {
        FlowSolution {
            status,
            optimal_cost,
            flows,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn optimal_cost(&self) -> Option<i64> {
        self.optimal_cost
    }

    pub fn flows(&self) -> &[i64] {
        &self.flows
    }

    pub fn flow(&self, arc: ArcIdx) -> i64 {
        self.flows.get(arc.get()).copied().unwrap_or(0)
    }
}
