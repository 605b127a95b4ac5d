use std::{fmt::Display, str::FromStr};

use crate::define_index_newtype;

define_index_newtype!(WaypointIdx, Waypoint);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(other.to_owned()),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// One validated row of the schedule table.
#[derive(Debug, Clone)]
pub struct Waypoint {
    index: WaypointIdx,
    label: String,
    day: i64,
    direction: Direction,
    cost: i64,
}

impl Waypoint {
    pub fn new(
        index: impl Into<WaypointIdx>,
        label: impl Into<String>,
        day: i64,
        direction: Direction,
        cost: i64,
    ) -> Self {
        Waypoint {
            index: index.into(),
            label: label.into(),
            day,
            direction,
            cost,
        }
    }

    pub fn index(&self) -> WaypointIdx {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn day(&self) -> i64 {
        self.day
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_str() {
        assert_eq!("in".parse::<Direction>(), Ok(Direction::In));
        assert_eq!("out".parse::<Direction>(), Ok(Direction::Out));
        assert_eq!("IN".parse::<Direction>(), Err(String::from("IN")));
    }
}
