use tracing::{info, instrument};

use crate::{
    error::PlannerError,
    flow::{
        flow_model::FlowModel,
        flow_solution::FlowSolution,
        solver::{MinCostFlowSolver, SolveStatus},
        successive_shortest_paths::SuccessiveShortestPaths,
    },
    network::{
        flow_arc::{ArcIdx, FlowArc},
        flow_network::FlowNetwork,
        node::Node,
    },
    planner::planner_params::PlannerParams,
    rules::weight_rule::WeightRules,
    schedule::schedule_table::ScheduleTable,
};

/// The network that was solved together with its solution.
#[derive(Debug, Clone)]
pub struct ItineraryPlan {
    network: FlowNetwork,
    solution: FlowSolution,
}

impl ItineraryPlan {
    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    pub fn status(&self) -> SolveStatus {
        self.solution.status()
    }

    pub fn is_optimal(&self) -> bool {
        self.solution.is_optimal()
    }

    pub fn optimal_cost(&self) -> Option<i64> {
        self.solution.optimal_cost()
    }

    pub fn flow(&self, arc: ArcIdx) -> i64 {
        self.solution.flow(arc)
    }

    /// Arcs carrying flow, in arc order.
    pub fn selected_arcs(&self) -> impl Iterator<Item = &FlowArc> {
        self.network
            .arcs()
            .iter()
            .filter(|arc| self.flow(arc.index()) > 0)
    }

    /// Selected arcs whose penalty is positive.
    pub fn penalized_arcs(&self) -> impl Iterator<Item = &FlowArc> {
        self.selected_arcs().filter(|arc| arc.penalty() > 0)
    }

    /// Waypoints visited by the flow, from the source side to the sink side.
    /// Empty unless the plan is optimal.
    pub fn path(&self) -> Vec<&Node> {
        let mut path = Vec::new();
        if !self.is_optimal() {
            return path;
        }

        let mut current = self.network.source();
        while current != self.network.sink() {
            let Some(arc) = self.selected_arcs().find(|arc| arc.src() == current) else {
                break;
            };
            current = arc.sink();

            if let Some(node) = self.network.node(current) {
                path.push(node);
            }

            if path.len() > self.network.nodes().len() {
                break;
            }
        }

        path
    }
}

/// Builds the flow network for `table` under `rules` and solves it with
/// `solver`.
#[instrument(skip_all, level = "debug")]
pub fn plan_itinerary_with<S: MinCostFlowSolver>(
    table: &ScheduleTable,
    rules: &WeightRules,
    params: &PlannerParams,
    solver: &mut S,
) -> Result<ItineraryPlan, PlannerError> {
    let network = FlowNetwork::build(table, rules, params.stay_days)?;
    info!(
        "Built network with {} waypoints and {} arcs",
        network.nodes().len(),
        network.arcs().len()
    );

    let model = FlowModel::assemble(&network, params.objective);
    let solution = model.solve_with(solver);

    Ok(ItineraryPlan {
        network,
        solution,
    })
}

pub fn plan_itinerary(
    table: &ScheduleTable,
    rules: &WeightRules,
    params: &PlannerParams,
) -> Result<ItineraryPlan, PlannerError> {
    plan_itinerary_with(table, rules, params, &mut SuccessiveShortestPaths::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        flow::flow_model::ArcObjective,
        network::flow_arc::ArcKind,
        rules::weight_rule::WeightRule,
        test_utils::{self, TestWaypoint},
    };

    fn labels(plan: &ItineraryPlan) -> Vec<&str> {
        plan.path().into_iter().map(Node::label).collect()
    }

    #[test]
    fn test_plan_picks_lowest_penalty_pair() {
        let table = test_utils::create_schedule_with_column(
            &[
                TestWaypoint::new("a", 1, "in", 100),
                TestWaypoint::new("b", 5, "in", 50),
                TestWaypoint::new("c", 10, "out", 100),
                TestWaypoint::new("d", 14, "out", 50),
            ],
            "airline",
            &["X", "Y", "X", "Y"],
        );
        let rules = WeightRules::new(vec![WeightRule::categories(
            "airline",
            [("X", "cost"), ("_", "0")],
        )]);

        let plan = plan_itinerary(&table, &rules, &PlannerParams::default()).unwrap();

        assert!(plan.is_optimal());
        assert_eq!(plan.optimal_cost(), Some(0));
        assert_eq!(labels(&plan), vec!["b", "d"]);
        assert_eq!(plan.penalized_arcs().count(), 0);
    }

    #[test]
    fn test_cost_objective_uses_waypoint_cost() {
        let table = test_utils::create_schedule(&[
            TestWaypoint::new("a", 1, "in", 10),
            TestWaypoint::new("b", 5, "in", 50),
            TestWaypoint::new("c", 10, "out", 10),
            TestWaypoint::new("d", 14, "out", 50),
        ]);
        let rules = WeightRules::new(vec![WeightRule::formula("day", "x")]);
        let params = PlannerParams {
            objective: ArcObjective::Cost,
            ..PlannerParams::default()
        };

        let plan = plan_itinerary(&table, &rules, &params).unwrap();

        assert_eq!(plan.optimal_cost(), Some(20));
        assert_eq!(labels(&plan), vec!["a", "c"]);

        let penalized = plan
            .penalized_arcs()
            .map(|arc| (arc.kind(), arc.penalty()))
            .collect::<Vec<_>>();
        assert_eq!(penalized, vec![(ArcKind::Entry, 1), (ArcKind::Exit, 10)]);
    }

    #[test]
    fn test_infeasible_plan_has_no_selection() {
        let table = test_utils::create_schedule(&[
            TestWaypoint::new("a", 1, "in", 10),
            TestWaypoint::new("b", 4, "out", 10),
        ]);

        let plan = plan_itinerary(&table, &WeightRules::default(), &PlannerParams::default())
            .unwrap();

        assert!(!plan.is_optimal());
        assert_eq!(plan.status(), SolveStatus::Infeasible);
        assert_eq!(plan.optimal_cost(), None);
        assert_eq!(plan.selected_arcs().count(), 0);
        assert!(plan.path().is_empty());
    }

    #[test]
    fn test_rule_errors_abort_planning() {
        let table = test_utils::create_schedule(&[TestWaypoint::new("a", 1, "in", 10)]);
        let rules = WeightRules::new(vec![WeightRule::formula("cost", "x * speed")]);

        let error = plan_itinerary(&table, &rules, &PlannerParams::default()).unwrap_err();
        assert!(matches!(error, PlannerError::Rule(_)));
    }
}
