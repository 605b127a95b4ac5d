use std::path::PathBuf;

use clap::Args;
use stayflow_optimizer::{
    flow::flow_model::ArcObjective,
    network::flow_network::DEFAULT_STAY_DAYS,
    planner::{itinerary::plan_itinerary, planner_params::PlannerParams},
    rules::weight_rule::WeightRules,
    schedule::schedule_table::ScheduleTable,
};
use tracing::info;

use crate::{parsers, report};

#[derive(Args)]
pub struct OptimizeArgs {
    /// CSV schedule with waypoint, day, direction and cost columns
    #[arg(short, long)]
    pub(crate) schedule: PathBuf,

    /// Weight document, JSON when the extension is .json, YAML otherwise
    #[arg(short, long)]
    pub(crate) weights: PathBuf,

    #[arg(long, value_parser = parsers::parse_stay_days, default_value_t = DEFAULT_STAY_DAYS)]
    pub(crate) stay_days: i64,

    /// What an arc charges: penalty, cost or cost-and-penalty
    #[arg(long, value_parser = parsers::parse_objective, default_value = "penalty")]
    objective: ArcObjective,
}

pub fn run(args: OptimizeArgs) -> Result<(), anyhow::Error> {
    info!("Loading schedule {:?}", args.schedule);
    let table = ScheduleTable::from_path(&args.schedule)?;

    info!("Loading weights {:?}", args.weights);
    let rules = WeightRules::from_path(&args.weights)?;

    let params = PlannerParams {
        stay_days: args.stay_days,
        objective: args.objective,
    };
    let plan = plan_itinerary(&table, &rules, &params)?;

    println!("{}", report::nodes_table(plan.network()));

    if !plan.is_optimal() {
        println!("There was an issue with the min cost flow input.");
        println!("Status: {}", plan.status());
        return Ok(());
    }

    println!("Total cost = {}", plan.optimal_cost().unwrap_or_default());
    println!("{}", report::path_line(&plan));
    println!("{}", report::penalized_arcs_table(&plan));

    Ok(())
}
