pub mod error;
pub mod expression;
pub mod flow;
pub mod network;
pub mod planner;
pub mod rules;
pub mod schedule;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
