use std::{fmt::Display, str::FromStr};

use tracing::{debug, info, instrument, warn};

use crate::{
    flow::{
        flow_solution::FlowSolution,
        solver::{MinCostFlowSolver, SolveStatus},
    },
    network::{flow_arc::FlowArc, flow_network::FlowNetwork},
};

/// What an arc charges per unit of flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcObjective {
    /// Rule penalty only.
    #[default]
    Penalty,
    /// Waypoint cost only.
    Cost,
    /// Waypoint cost plus rule penalty.
    CostAndPenalty,
}

impl ArcObjective {
    pub fn unit_cost(&self, arc: &FlowArc) -> i64 {
        match self {
            ArcObjective::Penalty => arc.penalty(),
            ArcObjective::Cost => arc.cost(),
            ArcObjective::CostAndPenalty => arc.cost().saturating_add(arc.penalty()),
        }
    }
}

impl FromStr for ArcObjective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "penalty" => Ok(ArcObjective::Penalty),
            "cost" => Ok(ArcObjective::Cost),
            "cost-and-penalty" => Ok(ArcObjective::CostAndPenalty),
            _ => Err(format!(
                "unknown objective `{s}`, expected penalty, cost or cost-and-penalty"
            )),
        }
    }
}

impl Display for ArcObjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcObjective::Penalty => write!(f, "penalty"),
            ArcObjective::Cost => write!(f, "cost"),
            ArcObjective::CostAndPenalty => write!(f, "cost-and-penalty"),
        }
    }
}

/// Parallel arrays handed to a [`MinCostFlowSolver`]. Position `i` of the arc
/// arrays is arc `i` of the network.
#[derive(Debug, Clone)]
pub struct FlowModel {
    tails: Vec<usize>,
    heads: Vec<usize>,
    capacities: Vec<i64>,
    unit_costs: Vec<i64>,
    node_indices: Vec<usize>,
    supplies: Vec<i64>,
}

impl FlowModel {
    /// One unit leaves the source and one unit enters the sink; every
    /// waypoint is balanced.
    #[instrument(skip_all, level = "debug")]
    pub fn assemble(network: &FlowNetwork, objective: ArcObjective) -> FlowModel {
        let arcs = network.arcs();

        let tails = arcs.iter().map(|arc| arc.src().get()).collect();
        let heads = arcs.iter().map(|arc| arc.sink().get()).collect();
        let capacities = arcs.iter().map(FlowArc::capacity).collect();
        let unit_costs = arcs.iter().map(|arc| objective.unit_cost(arc)).collect();

        let node_indices = (0..network.node_count()).collect::<Vec<_>>();
        let supplies = node_indices
            .iter()
            .map(|&node| network.supply(node.into()))
            .collect();

        debug!(
            "Assembled {} arcs over {} nodes, objective {}",
            arcs.len(),
            network.node_count(),
            objective
        );

        FlowModel {
            tails,
            heads,
            capacities,
            unit_costs,
            node_indices,
            supplies,
        }
    }

    pub fn tails(&self) -> &[usize] {
        &self.tails
    }

    pub fn heads(&self) -> &[usize] {
        &self.heads
    }

    pub fn capacities(&self) -> &[i64] {
        &self.capacities
    }

    pub fn unit_costs(&self) -> &[i64] {
        &self.unit_costs
    }

    pub fn node_indices(&self) -> &[usize] {
        &self.node_indices
    }

    pub fn supplies(&self) -> &[i64] {
        &self.supplies
    }

    pub fn arc_count(&self) -> usize {
        self.tails.len()
    }

    /// Loads the model into `solver` and solves it.
    #[instrument(skip_all, level = "debug")]
    pub fn solve_with<S: MinCostFlowSolver>(&self, solver: &mut S) -> FlowSolution {
        let arcs = solver.add_arcs_with_capacity_and_unit_cost(
            &self.tails,
            &self.heads,
            &self.capacities,
            &self.unit_costs,
        );
        solver.set_nodes_supplies(&self.node_indices, &self.supplies);

        let status = solver.solve();
        if status != SolveStatus::Optimal {
            warn!("Min cost flow finished with status {}", status);
            return FlowSolution::new(status, None, vec![0; self.arc_count()]);
        }

        let cost = solver.optimal_cost();
        info!("Min cost flow is optimal with cost {}", cost);

        FlowSolution::new(status, Some(cost), solver.flows(&arcs))
    }
}
