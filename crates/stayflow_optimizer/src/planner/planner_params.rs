use crate::{flow::flow_model::ArcObjective, network::flow_network::DEFAULT_STAY_DAYS};

#[derive(Clone, Debug)]
pub struct PlannerParams {
    /// Exact number of days between an `in` waypoint and its `out` waypoint.
    pub stay_days: i64,
    pub objective: ArcObjective,
}

impl Default for PlannerParams {
    fn default() -> Self {
        PlannerParams {
            stay_days: DEFAULT_STAY_DAYS,
            objective: ArcObjective::default(),
        }
    }
}
