use std::fmt::Display;

use crate::{define_index_newtype, network::node::NodeIdx};

define_index_newtype!(ArcIdx, FlowArc);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcKind {
    /// Super-source to an `in` waypoint.
    Entry,
    /// `out` waypoint to the super-sink.
    Exit,
    /// `in` waypoint to an `out` waypoint exactly one stay later.
    Stay,
}

impl Display for ArcKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcKind::Entry => write!(f, "in"),
            ArcKind::Exit => write!(f, "out"),
            ArcKind::Stay => write!(f, "stay"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowArc {
    index: ArcIdx,
    kind: ArcKind,
    src: NodeIdx,
    sink: NodeIdx,
    capacity: i64,
    cost: i64,
    penalty: i64,
}

impl FlowArc {
    pub fn new(
        index: impl Into<ArcIdx>,
        kind: ArcKind,
        src: NodeIdx,
        sink: NodeIdx,
        capacity: i64,
        cost: i64,
        penalty: i64,
    ) -> Self {
        FlowArc {
            index: index.into(),
            kind,
            src,
            sink,
            capacity,
            cost,
            penalty,
        }
    }

    pub fn index(&self) -> ArcIdx {
        self.index
    }

    pub fn kind(&self) -> ArcKind {
        self.kind
    }

    pub fn src(&self) -> NodeIdx {
        self.src
    }

    pub fn sink(&self) -> NodeIdx {
        self.sink
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    pub fn penalty(&self) -> i64 {
        self.penalty
    }
}
