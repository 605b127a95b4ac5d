use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use stayflow_optimizer::{
    flow::{
        flow_model::{ArcObjective, FlowModel},
        successive_shortest_paths::SuccessiveShortestPaths,
    },
    network::flow_network::{DEFAULT_STAY_DAYS, FlowNetwork},
    planner::{itinerary::plan_itinerary, planner_params::PlannerParams},
    rules::{
        penalty::PenaltyModel,
        weight_rule::{WeightRule, WeightRules},
    },
    schedule::schedule_table::ScheduleTable,
};

const CARRIERS: [&str; 4] = ["TAP", "Ryanair", "easyJet", "Vueling"];

fn create_schedule(rows: usize) -> ScheduleTable {
    let mut csv = String::from("waypoint,day,direction,cost,airline,stops\n");
    for row in 0..rows {
        let direction = if row % 2 == 0 { "in" } else { "out" };
        let day = (row * 7 % 60) as i64;
        let cost = 100 + (row * 37 % 400) as i64;
        csv.push_str(&format!(
            "w{row},{day},{direction},{cost},{},{}\n",
            CARRIERS[row % CARRIERS.len()],
            row % 3
        ));
    }

    ScheduleTable::from_reader(csv.as_bytes()).unwrap()
}

fn create_rules() -> WeightRules {
    WeightRules::new(vec![
        WeightRule::categories(
            "airline",
            [("Ryanair", "cost / 10"), ("easyJet", "cost / 20 + 5"), ("_", "0")],
        ),
        WeightRule::formula("stops", "x * 25 + (x > 1) * 100"),
        WeightRule::formula("day", "(x - 30) * (x - 30) / 10"),
    ])
}

fn penalty_benchmark(c: &mut Criterion) {
    let table = create_schedule(5_000);
    let rules = create_rules();

    c.bench_function("compile rules", |b| {
        b.iter(|| PenaltyModel::compile(black_box(&rules), black_box(&table)).unwrap())
    });

    let model = PenaltyModel::compile(&rules, &table).unwrap();
    c.bench_function("total penalty (5k rows)", |b| {
        b.iter(|| model.total_penalty(black_box(&table)).unwrap())
    });
}

fn flow_benchmark(c: &mut Criterion) {
    let table = create_schedule(2_000);
    let rules = create_rules();
    let network = FlowNetwork::build(&table, &rules, DEFAULT_STAY_DAYS).unwrap();
    let model = FlowModel::assemble(&network, ArcObjective::CostAndPenalty);

    c.bench_function("successive shortest paths (2k rows)", |b| {
        b.iter(|| black_box(&model).solve_with(&mut SuccessiveShortestPaths::new()))
    });

    c.bench_function("plan itinerary (2k rows)", |b| {
        b.iter(|| {
            plan_itinerary(
                black_box(&table),
                black_box(&rules),
                &PlannerParams::default(),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, penalty_benchmark, flow_benchmark);
criterion_main!(benches);
