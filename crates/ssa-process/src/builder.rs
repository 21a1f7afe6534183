use std::rc::Rc;

use crate::transition::Transition;
use crate::{Process, ProcessError, ProcessResult};

/// Largest transition count a model may declare.  `TransitionId::MAX` is
/// never a valid index.
pub const MAX_TRANSITIONS: usize = u16::MAX as usize - 1;

/// Declares a model's transitions in order, then validates and compiles them.
///
/// ```rust,ignore
/// let model = ProcessBuilder::new("decay")
///     .transition(Transition::new("decay").constant_rate(1.0).always().then(|ctx| {
///         *ctx.state_mut() = false;
///         vec![ctx.agent()]
///     }))
///     .build()?;
/// ```
pub struct ProcessBuilder<S> {
    name:        String,
    transitions: Vec<Transition<S>>,
}

impl<S: 'static> ProcessBuilder<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), transitions: Vec::new() }
    }

    /// Append a transition.  Declaration order fixes the selection scan order.
    pub fn transition(mut self, transition: Transition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition<S>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate every declaration and freeze the model.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::EmptyModelName`] if the name is blank.
    /// - [`ProcessError::EmptyModel`] if no transition was declared.
    /// - [`ProcessError::TooManyTransitions`] past [`MAX_TRANSITIONS`].
    /// - `MissingRate` / `MissingGuard` / `MissingAction` for the first
    ///   incomplete transition.
    pub fn build(self) -> ProcessResult<Rc<Process<S>>> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProcessError::EmptyModelName);
        }
        if self.transitions.is_empty() {
            return Err(ProcessError::EmptyModel { model: name.to_string() });
        }
        if self.transitions.len() > MAX_TRANSITIONS {
            return Err(ProcessError::TooManyTransitions {
                model: name.to_string(),
                count: self.transitions.len(),
                max:   MAX_TRANSITIONS,
            });
        }

        let compiled = self
            .transitions
            .into_iter()
            .map(|t| t.compile(name))
            .collect::<ProcessResult<Vec<_>>>()?;

        Ok(Rc::new(Process::new(Rc::from(name), compiled)))
    }
}
