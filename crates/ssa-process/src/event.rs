use std::rc::Rc;

use ssa_core::{AgentId, SimTime, TransitionId};

/// One fired transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionEvent {
    pub time:       SimTime,
    pub agent:      AgentId,
    pub model:      Rc<str>,
    pub transition: TransitionId,
    pub label:      Rc<str>,
}
