use std::path::PathBuf;

use stayflow_optimizer::{
    rules::weight_rule::WeightRules, schedule::schedule_table::ScheduleTable,
};

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn create_schedule(csv: &str) -> ScheduleTable {
    ScheduleTable::from_reader(csv.as_bytes()).unwrap()
}

pub fn create_rules(yaml: &str) -> WeightRules {
    WeightRules::from_reader(
        yaml.as_bytes(),
        stayflow_optimizer::rules::weight_document::DocumentFormat::Yaml,
    )
    .unwrap()
}

/// Four waypoints with exactly two feasible stays: 0 -> 2 and 1 -> 3.
pub const BASIC_SCHEDULE: &str = "\
waypoint,day,direction,cost,category,value
a,1,in,100,A,3
b,5,in,200,B,4
c,10,out,300,A,5
d,14,out,400,C,6
";
