use ssa_core::{AgentId, CoreError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("cannot schedule {agent} after a delay of {delay}: delay must be finite and non-negative")]
    InvalidDelay { agent: AgentId, delay: f64 },

    #[error(transparent)]
    Time(#[from] CoreError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
