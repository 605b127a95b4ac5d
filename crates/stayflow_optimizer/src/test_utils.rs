use crate::schedule::{
    schedule_table::{ScheduleTable, ScheduleTableBuilder},
    value::Value,
};

pub struct TestWaypoint {
    pub label: &'static str,
    pub day: i64,
    pub direction: &'static str,
    pub cost: i64,
}

impl TestWaypoint {
    pub fn new(label: &'static str, day: i64, direction: &'static str, cost: i64) -> Self {
        TestWaypoint {
            label,
            day,
            direction,
            cost,
        }
    }
}

fn create_builder(waypoints: &[TestWaypoint]) -> ScheduleTableBuilder {
    let mut builder = ScheduleTableBuilder::default();
    builder
        .add_column(
            "waypoint",
            waypoints.iter().map(|w| Value::from(w.label)).collect(),
        )
        .add_column("day", waypoints.iter().map(|w| Value::from(w.day)).collect())
        .add_column(
            "direction",
            waypoints.iter().map(|w| Value::from(w.direction)).collect(),
        )
        .add_column("cost", waypoints.iter().map(|w| Value::from(w.cost)).collect());
    builder
}

pub fn create_schedule(waypoints: &[TestWaypoint]) -> ScheduleTable {
    create_builder(waypoints).build().unwrap()
}

pub fn create_schedule_with_column(
    waypoints: &[TestWaypoint],
    name: &str,
    values: &[&str],
) -> ScheduleTable {
    let mut builder = create_builder(waypoints);
    builder.add_column(name, values.iter().map(|&value| Value::from(value)).collect());
    builder.build().unwrap()
}
