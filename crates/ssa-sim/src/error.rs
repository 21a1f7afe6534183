use ssa_agent::AgentError;
use ssa_core::CoreError;
use ssa_process::ProcessError;
use ssa_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("population error: {0}")]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type SimResult<T> = Result<T, SimError>;
