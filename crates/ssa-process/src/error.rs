use ssa_core::AgentId;
use ssa_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProcessError {
    // ── Model declaration ─────────────────────────────────────────────────
    #[error("model name must not be empty")]
    EmptyModelName,

    #[error("model `{model}` declares no transitions")]
    EmptyModel { model: String },

    #[error("model `{model}` declares {count} transitions; at most {max} are supported")]
    TooManyTransitions { model: String, count: usize, max: usize },

    #[error("transition `{transition}` of model `{model}` has no rate")]
    MissingRate { model: String, transition: String },

    #[error("transition `{transition}` of model `{model}` has no guard")]
    MissingGuard { model: String, transition: String },

    #[error("transition `{transition}` of model `{model}` has no action")]
    MissingAction { model: String, transition: String },

    #[error("unsupported clock kind `{0}`: only exponential (poisson) clocks are available")]
    UnsupportedClock(String),

    #[error("a model named `{0}` is already registered")]
    DuplicateModel(String),

    #[error("no model named `{0}` is registered")]
    UnknownModel(String),

    // ── Runtime ───────────────────────────────────────────────────────────
    #[error("model `{model}`: transition `{transition}` of {agent} has invalid rate {rate}")]
    InvalidRate {
        model:      String,
        agent:      AgentId,
        transition: String,
        rate:       f64,
    },

    #[error("model `{model}`: total rate of {agent} is not finite")]
    RateOverflow { model: String, agent: AgentId },

    #[error(
        "model `{model}`: no transition selected for {agent} \
         (draw {draw}, total {total}, rates {rates:?})"
    )]
    SelectionExhausted {
        model: String,
        agent: AgentId,
        rates: Vec<f64>,
        total: f64,
        draw:  f64,
    },

    #[error("model `{model}`: affected set names {agent}, which is not in the population")]
    UnknownAgent { model: String, agent: AgentId },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type ProcessResult<T> = Result<T, ProcessError>;
