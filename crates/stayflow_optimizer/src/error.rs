use thiserror::Error;

use crate::{rules::error::RuleError, schedule::error::ScheduleError};

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Rule(#[from] RuleError),
}
