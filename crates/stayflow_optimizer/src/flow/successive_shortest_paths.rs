use std::{cmp::Ordering, collections::BinaryHeap};

use tracing::{debug, instrument};

use crate::flow::solver::{MinCostFlowSolver, SolveStatus};

const UNREACHED: i128 = i128::MAX;
const NO_EDGE: usize = usize::MAX;

#[derive(Eq, Copy, Clone, Debug)]
struct HeapItem {
    node: usize,
    distance: i128,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.distance == other.distance && self.node == other.node
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip distance to make this a min-heap
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Residual graph. Edge `2k` is the forward edge of arc `k`, `2k + 1` its
/// reverse; `edge ^ 1` is always the partner.
struct Residual {
    heads: Vec<usize>,
    capacities: Vec<i64>,
    costs: Vec<i64>,
    adjacency: Vec<Vec<usize>>,
}

impl Residual {
    fn new(node_count: usize) -> Self {
        Residual {
            heads: Vec::new(),
            capacities: Vec::new(),
            costs: Vec::new(),
            adjacency: vec![Vec::new(); node_count],
        }
    }

    fn add_edge(&mut self, tail: usize, head: usize, capacity: i64, cost: i64) -> usize {
        let edge = self.heads.len();

        self.heads.push(head);
        self.capacities.push(capacity);
        self.costs.push(cost);
        self.adjacency[tail].push(edge);

        self.heads.push(tail);
        self.capacities.push(0);
        self.costs.push(-cost);
        self.adjacency[head].push(edge + 1);

        edge
    }

    fn push(&mut self, edge: usize, amount: i64) {
        self.capacities[edge] -= amount;
        self.capacities[edge ^ 1] += amount;
    }
}

/// Min-cost flow by successive shortest paths with Dijkstra and node
/// potentials. Negative-cost arcs are saturated up front so that every
/// residual edge starts with a non-negative reduced cost.
#[derive(Debug, Default, Clone)]
pub struct SuccessiveShortestPaths {
    tails: Vec<usize>,
    heads: Vec<usize>,
    capacities: Vec<i64>,
    unit_costs: Vec<i64>,
    supplies: Vec<i64>,
    node_count: usize,
    bad_input: bool,

    flows: Vec<i64>,
    optimal_cost: i64,
    status: Option<SolveStatus>,
}

impl SuccessiveShortestPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SolveStatus {
        self.status.unwrap_or(SolveStatus::NotSolved)
    }

    fn grow_nodes(&mut self, node: usize) {
        self.node_count = self.node_count.max(node + 1);
    }

    fn reset_solution(&mut self) {
        self.flows = vec![0; self.tails.len()];
        self.optimal_cost = 0;
    }

    fn validate(&self) -> Result<(), SolveStatus> {
        if self.bad_input || self.capacities.iter().any(|&capacity| capacity < 0) {
            return Err(SolveStatus::BadInput);
        }

        let total_supply = self
            .supplies
            .iter()
            .try_fold(0_i64, |total, &supply| total.checked_add(supply));
        match total_supply {
            Some(0) => Ok(()),
            _ => Err(SolveStatus::Unbalanced),
        }
    }

    fn run(&mut self) -> SolveStatus {
        if let Err(status) = self.validate() {
            return status;
        }

        let root = self.node_count;
        let terminal = self.node_count + 1;
        let mut residual = Residual::new(self.node_count + 2);
        let mut excess = vec![0_i64; self.node_count];
        for (node, &supply) in self.supplies.iter().enumerate() {
            excess[node] = supply;
        }

        for arc in 0..self.tails.len() {
            let (tail, head) = (self.tails[arc], self.heads[arc]);
            let (capacity, cost) = (self.capacities[arc], self.unit_costs[arc]);

            let edge = residual.add_edge(tail, head, capacity, cost);
            if cost < 0 {
                residual.push(edge, capacity);
                excess[tail] -= capacity;
                excess[head] += capacity;
            }
        }

        let mut required: i64 = 0;
        for (node, &amount) in excess.iter().enumerate() {
            match amount.cmp(&0) {
                Ordering::Greater => {
                    residual.add_edge(root, node, amount, 0);
                    required = match required.checked_add(amount) {
                        Some(required) => required,
                        None => return SolveStatus::BadInput,
                    };
                }
                Ordering::Less => {
                    residual.add_edge(node, terminal, -amount, 0);
                }
                Ordering::Equal => {}
            }
        }

        let routed = augment_all(&mut residual, root, terminal, required);
        debug!("Routed {} of {} units", routed, required);

        if routed < required {
            return SolveStatus::Infeasible;
        }

        let mut total_cost: i128 = 0;
        for arc in 0..self.tails.len() {
            let flow = self.capacities[arc] - residual.capacities[2 * arc];
            self.flows[arc] = flow;
            total_cost += i128::from(flow) * i128::from(self.unit_costs[arc]);
        }

        match i64::try_from(total_cost) {
            Ok(total_cost) => {
                self.optimal_cost = total_cost;
                SolveStatus::Optimal
            }
            Err(_) => SolveStatus::BadCostRange,
        }
    }
}

/// Pushes flow along shortest `root -> terminal` paths until `required`
/// units are routed or no augmenting path is left. Returns the amount
/// routed.
fn augment_all(residual: &mut Residual, root: usize, terminal: usize, required: i64) -> i64 {
    let node_count = residual.adjacency.len();
    let mut potentials = vec![0_i128; node_count];
    let mut distances = vec![UNREACHED; node_count];
    let mut parents = vec![NO_EDGE; node_count];
    let mut heap = BinaryHeap::new();
    let mut routed = 0;

    while routed < required {
        distances.fill(UNREACHED);
        parents.fill(NO_EDGE);
        distances[root] = 0;
        heap.push(HeapItem {
            node: root,
            distance: 0,
        });

        while let Some(HeapItem { node, distance }) = heap.pop() {
            if distance > distances[node] {
                continue;
            }

            for &edge in &residual.adjacency[node] {
                if residual.capacities[edge] <= 0 {
                    continue;
                }

                let head = residual.heads[edge];
                let reduced =
                    i128::from(residual.costs[edge]) + potentials[node] - potentials[head];
                let next = distance + reduced;

                if next < distances[head] {
                    distances[head] = next;
                    parents[head] = edge;
                    heap.push(HeapItem {
                        node: head,
                        distance: next,
                    });
                }
            }
        }

        if distances[terminal] == UNREACHED {
            break;
        }

        // Unreached nodes get the largest settled distance, which keeps every
        // residual reduced cost non-negative.
        let farthest = distances
            .iter()
            .copied()
            .filter(|&distance| distance != UNREACHED)
            .max()
            .unwrap_or(0);
        for (potential, &distance) in potentials.iter_mut().zip(&distances) {
            *potential += if distance == UNREACHED {
                farthest
            } else {
                distance
            };
        }

        let mut bottleneck = required - routed;
        let mut node = terminal;
        while node != root {
            let edge = parents[node];
            bottleneck = bottleneck.min(residual.capacities[edge]);
            node = residual.heads[edge ^ 1];
        }

        let mut node = terminal;
        while node != root {
            let edge = parents[node];
            residual.push(edge, bottleneck);
            node = residual.heads[edge ^ 1];
        }

        routed += bottleneck;
    }

    routed
}

impl MinCostFlowSolver for SuccessiveShortestPaths {
    fn add_arcs_with_capacity_and_unit_cost(
        &mut self,
        tails: &[usize],
        heads: &[usize],
        capacities: &[i64],
        unit_costs: &[i64],
    ) -> Vec<usize> {
        let count = tails.len();
        if heads.len() != count || capacities.len() != count || unit_costs.len() != count {
            self.bad_input = true;
            return Vec::new();
        }

        let first = self.tails.len();
        for arc in 0..count {
            self.grow_nodes(tails[arc].max(heads[arc]));
        }

        self.tails.extend_from_slice(tails);
        self.heads.extend_from_slice(heads);
        self.capacities.extend_from_slice(capacities);
        self.unit_costs.extend_from_slice(unit_costs);
        self.status = None;

        (first..first + count).collect()
    }

    fn set_node_supply(&mut self, node: usize, supply: i64) {
        self.grow_nodes(node);
        if self.supplies.len() <= node {
            self.supplies.resize(node + 1, 0);
        }
        self.supplies[node] = supply;
        self.status = None;
    }

    fn set_nodes_supplies(&mut self, nodes: &[usize], supplies: &[i64]) {
        if nodes.len() != supplies.len() {
            self.bad_input = true;
            return;
        }

        for (&node, &supply) in nodes.iter().zip(supplies) {
            self.set_node_supply(node, supply);
        }
    }

    #[instrument(skip_all, level = "debug")]
    fn solve(&mut self) -> SolveStatus {
        if self.supplies.len() < self.node_count {
            self.supplies.resize(self.node_count, 0);
        }
        self.reset_solution();

        let status = self.run();
        if status != SolveStatus::Optimal {
            self.reset_solution();
        }

        debug!(
            "Solved {} nodes and {} arcs: {}",
            self.node_count,
            self.tails.len(),
            status
        );
        self.status = Some(status);
        status
    }

    fn optimal_cost(&self) -> i64 {
        self.optimal_cost
    }

    fn flows(&self, arcs: &[usize]) -> Vec<i64> {
        arcs.iter()
            .map(|&arc| self.flows.get(arc).copied().unwrap_or(0))
            .collect()
    }

    fn num_nodes(&self) -> usize {
        self.node_count
    }

    fn num_arcs(&self) -> usize {
        self.tails.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_solver(arcs: &[(usize, usize, i64, i64)], supplies: &[(usize, i64)]) -> SuccessiveShortestPaths {
        let mut solver = SuccessiveShortestPaths::new();
        let tails = arcs.iter().map(|arc| arc.0).collect::<Vec<_>>();
        let heads = arcs.iter().map(|arc| arc.1).collect::<Vec<_>>();
        let capacities = arcs.iter().map(|arc| arc.2).collect::<Vec<_>>();
        let costs = arcs.iter().map(|arc| arc.3).collect::<Vec<_>>();
        solver.add_arcs_with_capacity_and_unit_cost(&tails, &heads, &capacities, &costs);

        for &(node, supply) in supplies {
            solver.set_node_supply(node, supply);
        }
        solver
    }

    fn all_flows(solver: &SuccessiveShortestPaths) -> Vec<i64> {
        solver.flows(&(0..solver.num_arcs()).collect::<Vec<_>>())
    }

    #[test]
    fn test_picks_cheapest_path() {
        // 0 -> 1 -> 3 costs 5, 0 -> 2 -> 3 costs 3
        let mut solver = create_solver(
            &[(0, 1, 1, 2), (1, 3, 1, 3), (0, 2, 1, 1), (2, 3, 1, 2)],
            &[(0, 1), (3, -1)],
        );

        assert_eq!(solver.solve(), SolveStatus::Optimal);
        assert_eq!(solver.optimal_cost(), 3);
        assert_eq!(all_flows(&solver), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_splits_flow_over_capacities() {
        let mut solver = create_solver(
            &[(0, 1, 2, 1), (0, 1, 5, 4), (1, 2, 10, 1)],
            &[(0, 4), (2, -4)],
        );

        assert_eq!(solver.solve(), SolveStatus::Optimal);
        assert_eq!(all_flows(&solver), vec![2, 2, 4]);
        assert_eq!(solver.optimal_cost(), 2 + 8 + 4);
    }

    #[test]
    fn test_negative_costs() {
        // The expensive-looking route is cheaper because of the -10 arc.
        let mut solver = create_solver(
            &[(0, 1, 1, 1), (1, 3, 1, 1), (0, 2, 1, 5), (2, 3, 1, -10)],
            &[(0, 1), (3, -1)],
        );

        assert_eq!(solver.solve(), SolveStatus::Optimal);
        assert_eq!(solver.optimal_cost(), -5);
        assert_eq!(all_flows(&solver), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_unreachable_negative_arc_is_left_empty() {
        let mut solver = create_solver(
            &[(0, 1, 1, 1), (2, 3, 1, -7)],
            &[(0, 1), (1, -1)],
        );

        assert_eq!(solver.solve(), SolveStatus::Optimal);
        assert_eq!(all_flows(&solver), vec![1, 0]);
        assert_eq!(solver.optimal_cost(), 1);
    }

    #[test]
    fn test_negative_cycle_is_saturated() {
        let mut solver = create_solver(
            &[(0, 1, 1, 1), (1, 2, 3, -2), (2, 1, 3, 1)],
            &[(0, 1), (1, -1)],
        );

        assert_eq!(solver.solve(), SolveStatus::Optimal);
        assert_eq!(all_flows(&solver), vec![1, 3, 3]);
        assert_eq!(solver.optimal_cost(), 1 - 6 + 3);
    }

    #[test]
    fn test_infeasible() {
        let mut solver = create_solver(&[(0, 1, 1, 1), (2, 3, 1, 1)], &[(0, 1), (3, -1)]);

        assert_eq!(solver.solve(), SolveStatus::Infeasible);
        assert_eq!(solver.optimal_cost(), 0);
        assert_eq!(all_flows(&solver), vec![0, 0]);
    }

    #[test]
    fn test_insufficient_capacity_is_infeasible() {
        let mut solver = create_solver(&[(0, 1, 1, 1)], &[(0, 2), (1, -2)]);

        assert_eq!(solver.solve(), SolveStatus::Infeasible);
    }

    #[test]
    fn test_unbalanced() {
        let mut solver = create_solver(&[(0, 1, 1, 1)], &[(0, 1)]);

        assert_eq!(solver.solve(), SolveStatus::Unbalanced);
    }

    #[test]
    fn test_bad_input() {
        let mut solver = SuccessiveShortestPaths::new();
        let arcs = solver.add_arcs_with_capacity_and_unit_cost(&[0, 1], &[1], &[1, 1], &[0, 0]);
        assert!(arcs.is_empty());
        assert_eq!(solver.solve(), SolveStatus::BadInput);

        let mut solver = create_solver(&[(0, 1, -1, 1)], &[]);
        assert_eq!(solver.solve(), SolveStatus::BadInput);
    }

    #[test]
    fn test_status_before_and_after_solve() {
        let mut solver = create_solver(&[(0, 1, 1, 1)], &[(0, 1), (1, -1)]);
        assert_eq!(solver.status(), SolveStatus::NotSolved);

        solver.solve();
        assert_eq!(solver.status(), SolveStatus::Optimal);
        assert_eq!(solver.num_nodes(), 2);
        assert_eq!(solver.num_arcs(), 1);
        assert_eq!(solver.flows(&[0, 7]), vec![1, 0]);
    }

    #[test]
    fn test_zero_supply_is_optimal_without_flow() {
        let mut solver = create_solver(&[(0, 1, 1, 3)], &[]);

        assert_eq!(solver.solve(), SolveStatus::Optimal);
        assert_eq!(solver.optimal_cost(), 0);
        assert_eq!(all_flows(&solver), vec![0]);
    }

    #[test]
    fn test_total_cost_out_of_range() {
        let mut solver = create_solver(&[(0, 1, 2, i64::MAX)], &[(0, 2), (1, -2)]);

        assert_eq!(solver.solve(), SolveStatus::BadCostRange);
        assert_eq!(solver.optimal_cost(), 0);
        assert_eq!(all_flows(&solver), vec![0]);
    }
}
