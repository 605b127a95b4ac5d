pub mod flow_model;
pub mod flow_solution;
pub mod solver;
pub mod successive_shortest_paths;
