pub mod error;
pub mod schedule_table;
pub mod value;
pub mod waypoint;
