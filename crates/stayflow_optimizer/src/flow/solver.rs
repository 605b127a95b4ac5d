use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    NotSolved,
    Optimal,
    Infeasible,
    Unbalanced,
    BadInput,
    BadCostRange,
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::NotSolved => write!(f, "NOT_SOLVED"),
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolveStatus::Unbalanced => write!(f, "UNBALANCED"),
            SolveStatus::BadInput => write!(f, "BAD_INPUT"),
            SolveStatus::BadCostRange => write!(f, "BAD_COST_RANGE"),
        }
    }
}

/// Array-oriented min-cost-flow contract. Arcs are addressed by the index
/// returned from [`MinCostFlowSolver::add_arcs_with_capacity_and_unit_cost`],
/// nodes by any non-negative integer; the node count grows to cover every
/// index used.
pub trait MinCostFlowSolver {
    /// Adds one arc per position of the parallel slices and returns their
    /// indices. Slices of different lengths make the next solve report
    /// [`SolveStatus::BadInput`].
    fn add_arcs_with_capacity_and_unit_cost(
        &mut self,
        tails: &[usize],
        heads: &[usize],
        capacities: &[i64],
        unit_costs: &[i64],
    ) -> Vec<usize>;

    fn set_node_supply(&mut self, node: usize, supply: i64);

    fn set_nodes_supplies(&mut self, nodes: &[usize], supplies: &[i64]);

    /// Routes every unit of supply to demand at minimum total cost.
    fn solve(&mut self) -> SolveStatus;

    /// Total cost of the last optimal solve, 0 otherwise.
    fn optimal_cost(&self) -> i64;

    /// Flow on each requested arc after an optimal solve, 0 otherwise.
    fn flows(&self, arcs: &[usize]) -> Vec<i64>;

    fn num_nodes(&self) -> usize;

    fn num_arcs(&self) -> usize;
}
