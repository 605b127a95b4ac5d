use crate::{
    define_index_newtype,
    schedule::waypoint::{Direction, Waypoint},
};

define_index_newtype!(NodeIdx, Node);

/// Capacity of every waypoint node and of every arc.
pub const UNIT_CAPACITY: i64 = 1;

/// A waypoint in the flow graph. The super-source and super-sink have no
/// `Node`; they are addressed through [`NodeIdx`] only.
#[derive(Debug, Clone)]
pub struct Node {
    index: NodeIdx,
    waypoint: Waypoint,
    capacity: i64,
    supply: i64,
    penalty: i64,
}

impl Node {
    pub fn new(waypoint: Waypoint, penalty: i64) -> Self {
        Node {
            index: NodeIdx::new(waypoint.index().get()),
            waypoint,
            capacity: UNIT_CAPACITY,
            supply: 0,
            penalty,
        }
    }

    pub fn index(&self) -> NodeIdx {
        self.index
    }

    pub fn label(&self) -> &str {
        self.waypoint.label()
    }

    pub fn day(&self) -> i64 {
        self.waypoint.day()
    }

    pub fn direction(&self) -> Direction {
        self.waypoint.direction()
    }

    pub fn cost(&self) -> i64 {
        self.waypoint.cost()
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn supply(&self) -> i64 {
        self.supply
    }

    pub fn penalty(&self) -> i64 {
        self.penalty
    }
}
