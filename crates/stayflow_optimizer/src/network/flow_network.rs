use tracing::{debug, instrument};

use crate::{
    error::PlannerError,
    network::{
        flow_arc::{ArcKind, FlowArc},
        node::{Node, NodeIdx, UNIT_CAPACITY},
    },
    rules::{penalty::PenaltyModel, weight_rule::WeightRules},
    schedule::{schedule_table::ScheduleTable, waypoint::Direction},
};

/// Days between an `in` waypoint and the `out` waypoint it can connect to.
pub const DEFAULT_STAY_DAYS: i64 = 9;

/// One node per schedule row, carrying the row's total penalty.
#[instrument(skip_all, level = "debug")]
pub fn build_nodes(table: &ScheduleTable, rules: &WeightRules) -> Result<Vec<Node>, PlannerError> {
    let waypoints = table.waypoints()?;
    let penalties = PenaltyModel::compile(rules, table)?.total_penalty(table)?;

    Ok(waypoints
        .into_iter()
        .zip(penalties)
        .map(|(waypoint, penalty)| Node::new(waypoint, penalty))
        .collect())
}

/// Entry arcs, then exit arcs, then stay arcs, indexed densely in that
/// order. Stay arcs join an `in` node `a` to an `out` node `b` only when
/// `b.day - a.day == stay_days`.
#[instrument(skip_all, level = "debug")]
pub fn build_arcs(nodes: &[Node], stay_days: i64) -> Vec<FlowArc> {
    let source = NodeIdx::new(nodes.len());
    let sink = NodeIdx::new(nodes.len() + 1);

    let entries = nodes.iter().filter(|node| node.direction() == Direction::In);
    let exits = nodes.iter().filter(|node| node.direction() == Direction::Out);

    let mut arcs = Vec::new();

    for node in entries.clone() {
        arcs.push(FlowArc::new(
            arcs.len(),
            ArcKind::Entry,
            source,
            node.index(),
            node.capacity(),
            node.cost(),
            node.penalty(),
        ));
    }

    for node in exits.clone() {
        arcs.push(FlowArc::new(
            arcs.len(),
            ArcKind::Exit,
            node.index(),
            sink,
            node.capacity(),
            node.cost(),
            node.penalty(),
        ));
    }

    for arrival in entries {
        for departure in exits.clone() {
            if departure.day().checked_sub(arrival.day()) != Some(stay_days) {
                continue;
            }

            arcs.push(FlowArc::new(
                arcs.len(),
                ArcKind::Stay,
                arrival.index(),
                departure.index(),
                UNIT_CAPACITY,
                0,
                0,
            ));
        }
    }

    debug!(
        "Built {} arcs for {} nodes with a stay of {} days",
        arcs.len(),
        nodes.len(),
        stay_days
    );

    arcs
}

/// Waypoint nodes plus the super-source (`nodes.len()`) and super-sink
/// (`nodes.len() + 1`).
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    nodes: Vec<Node>,
    arcs: Vec<FlowArc>,
    source: NodeIdx,
    sink: NodeIdx,
}

impl FlowNetwork {
    pub fn build(
        table: &ScheduleTable,
        rules: &WeightRules,
        stay_days: i64,
    ) -> Result<FlowNetwork, PlannerError> {
        let nodes = build_nodes(table, rules)?;
        Ok(Self::from_nodes(nodes, stay_days))
    }

    pub fn from_nodes(nodes: Vec<Node>, stay_days: i64) -> FlowNetwork {
        let arcs = build_arcs(&nodes, stay_days);
        FlowNetwork {
            source: NodeIdx::new(nodes.len()),
            sink: NodeIdx::new(nodes.len() + 1),
            nodes,
            arcs,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn arcs(&self) -> &[FlowArc] {
        &self.arcs
    }

    pub fn source(&self) -> NodeIdx {
        self.source
    }

    pub fn sink(&self) -> NodeIdx {
        self.sink
    }

    /// Waypoints plus the two super-nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() + 2
    }

    /// The waypoint node at `index`, `None` for the super-nodes.
    pub fn node(&self, index: NodeIdx) -> Option<&Node> {
        self.nodes.get(index.get())
    }

    pub fn supply(&self, index: NodeIdx) -> i64 {
        if index == self.source {
            1
        } else if index == self.sink {
            -1
        } else {
            self.node(index).map_or(0, Node::supply)
        }
    }

    pub fn arcs_of_kind(&self, kind: ArcKind) -> impl Iterator<Item = &FlowArc> {
        self.arcs.iter().filter(move |arc| arc.kind() == kind)
    }

    /// Human-readable name of a node, including the super-nodes.
    pub fn node_label(&self, index: NodeIdx) -> String {
        if index == self.source {
            String::from("source")
        } else if index == self.sink {
            String::from("sink")
        } else {
            self.node(index)
                .map_or_else(|| index.to_string(), |node| node.label().to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::waypoint::Waypoint;

    fn create_nodes(legs: &[(Direction, i64)]) -> Vec<Node> {
        legs.iter()
            .enumerate()
            .map(|(index, &(direction, day))| {
                Node::new(
                    Waypoint::new(index, format!("w{index}"), day, direction, 10 * day),
                    day,
                )
            })
            .collect()
    }

    fn endpoints(network: &FlowNetwork, kind: ArcKind) -> Vec<(usize, usize)> {
        network
            .arcs_of_kind(kind)
            .map(|arc| (arc.src().get(), arc.sink().get()))
            .collect()
    }

    #[test]
    fn test_build_arcs_groups_and_indices() {
        let nodes = create_nodes(&[
            (Direction::In, 1),
            (Direction::Out, 10),
            (Direction::In, 5),
            (Direction::Out, 14),
        ]);
        let network = FlowNetwork::from_nodes(nodes, DEFAULT_STAY_DAYS);

        assert_eq!(network.source().get(), 4);
        assert_eq!(network.sink().get(), 5);
        assert_eq!(network.node_count(), 6);

        assert_eq!(endpoints(&network, ArcKind::Entry), vec![(4, 0), (4, 2)]);
        assert_eq!(endpoints(&network, ArcKind::Exit), vec![(1, 5), (3, 5)]);
        assert_eq!(endpoints(&network, ArcKind::Stay), vec![(0, 1), (2, 3)]);

        let kinds = network.arcs().iter().map(FlowArc::kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ArcKind::Entry,
                ArcKind::Entry,
                ArcKind::Exit,
                ArcKind::Exit,
                ArcKind::Stay,
                ArcKind::Stay,
            ]
        );
        for (position, arc) in network.arcs().iter().enumerate() {
            assert_eq!(arc.index().get(), position);
        }
    }

    #[test]
    fn test_entry_and_exit_arcs_carry_node_cost_and_penalty() {
        let nodes = create_nodes(&[(Direction::In, 2), (Direction::Out, 11)]);
        let network = FlowNetwork::from_nodes(nodes, DEFAULT_STAY_DAYS);

        let entry = &network.arcs()[0];
        assert_eq!((entry.cost(), entry.penalty(), entry.capacity()), (20, 2, 1));

        let exit = &network.arcs()[1];
        assert_eq!((exit.cost(), exit.penalty(), exit.capacity()), (110, 11, 1));

        let stay = &network.arcs()[2];
        assert_eq!(stay.kind(), ArcKind::Stay);
        assert_eq!((stay.cost(), stay.penalty(), stay.capacity()), (0, 0, 1));
    }

    #[test]
    fn test_stay_arcs_require_exact_offset() {
        let nodes = create_nodes(&[
            (Direction::In, 1),
            (Direction::Out, 9),
            (Direction::Out, 10),
            (Direction::Out, 11),
            (Direction::In, 2),
        ]);
        let network = FlowNetwork::from_nodes(nodes, DEFAULT_STAY_DAYS);

        assert_eq!(endpoints(&network, ArcKind::Stay), vec![(0, 2), (4, 3)]);
        for arc in network.arcs_of_kind(ArcKind::Stay) {
            let src = network.node(arc.src()).unwrap();
            let sink = network.node(arc.sink()).unwrap();
            assert_eq!(sink.day() - src.day(), DEFAULT_STAY_DAYS);
        }
    }

    #[test]
    fn test_stay_days_is_configurable() {
        let nodes = create_nodes(&[(Direction::In, 1), (Direction::Out, 4), (Direction::Out, 10)]);
        let network = FlowNetwork::from_nodes(nodes, 3);

        assert_eq!(endpoints(&network, ArcKind::Stay), vec![(0, 1)]);
    }

    #[test]
    fn test_supplies() {
        let nodes = create_nodes(&[(Direction::In, 1), (Direction::Out, 10)]);
        let network = FlowNetwork::from_nodes(nodes, DEFAULT_STAY_DAYS);

        assert_eq!(network.supply(network.source()), 1);
        assert_eq!(network.supply(network.sink()), -1);
        assert_eq!(network.supply(NodeIdx::new(0)), 0);
        assert_eq!(network.node_label(network.source()), "source");
        assert_eq!(network.node_label(NodeIdx::new(1)), "w1");
    }

    #[test]
    fn test_empty_network() {
        let network = FlowNetwork::from_nodes(vec![], DEFAULT_STAY_DAYS);

        assert!(network.arcs().is_empty());
        assert_eq!(network.source().get(), 0);
        assert_eq!(network.sink().get(), 1);
    }
}
