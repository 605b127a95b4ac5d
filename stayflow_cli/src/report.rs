use comfy_table::{Table, presets::UTF8_FULL};
use stayflow_optimizer::{network::flow_network::FlowNetwork, planner::itinerary::ItineraryPlan};

fn create_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

/// Every waypoint with its cost and total rule penalty.
pub fn nodes_table(network: &FlowNetwork) -> Table {
    let mut table = create_table(vec!["waypoint", "day", "direction", "cost", "penalty"]);

    for node in network.nodes() {
        table.add_row(vec![
            node.label().to_owned(),
            node.day().to_string(),
            node.direction().to_string(),
            node.cost().to_string(),
            node.penalty().to_string(),
        ]);
    }

    table
}

pub fn path_line(plan: &ItineraryPlan) -> String {
    let stops = plan
        .path()
        .into_iter()
        .map(|node| format!("{} (day {}, {})", node.label(), node.day(), node.direction()))
        .collect::<Vec<_>>();

    format!("Path: {}", stops.join(" -> "))
}

/// Chosen arcs that carry a positive penalty.
pub fn penalized_arcs_table(plan: &ItineraryPlan) -> Table {
    let network = plan.network();
    let mut table = create_table(vec![
        "index", "direction", "src", "sink", "capacity", "cost", "penalty", "flow",
    ]);

    for arc in plan.penalized_arcs() {
        table.add_row(vec![
            arc.index().to_string(),
            arc.kind().to_string(),
            network.node_label(arc.src()),
            network.node_label(arc.sink()),
            arc.capacity().to_string(),
            arc.cost().to_string(),
            arc.penalty().to_string(),
            plan.flow(arc.index()).to_string(),
        ]);
    }

    table
}
