use ssa_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("{what} length {got} does not match agent count {expected}")]
    CountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("{0} is not part of the population")]
    UnknownAgent(AgentId),

    #[error("{agent} lists unknown contact {contact}")]
    UnknownContact { agent: AgentId, contact: AgentId },

    #[error("{0} lists itself as a contact")]
    SelfContact(AgentId),

    #[error("population of {0} agents exceeds the AgentId range")]
    TooManyAgents(usize),
}

pub type AgentResult<T> = Result<T, AgentError>;
