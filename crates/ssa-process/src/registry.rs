//! Compiled models keyed by name.
//!
//! A registry is filled while a simulation is being configured and read when
//! a driver picks the model to run.  Names are unique: registering a second
//! model under an existing name is an error rather than a silent overwrite.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::{Process, ProcessBuilder, ProcessError, ProcessResult};

pub struct ModelRegistry<S> {
    models: BTreeMap<String, Rc<Process<S>>>,
}

impl<S> Default for ModelRegistry<S> {
    fn default() -> Self {
        Self { models: BTreeMap::new() }
    }
}

impl<S: 'static> ModelRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already compiled model under its own name.
    pub fn register(&mut self, process: Rc<Process<S>>) -> ProcessResult<()> {
        let name = process.name().to_string();
        if self.models.contains_key(&name) {
            return Err(ProcessError::DuplicateModel(name));
        }
        debug!(model = %name, transitions = process.len(), "model registered");
        self.models.insert(name, process);
        Ok(())
    }

    /// Build `builder` and register the result.
    pub fn declare(&mut self, builder: ProcessBuilder<S>) -> ProcessResult<Rc<Process<S>>> {
        let process = builder.build()?;
        self.register(Rc::clone(&process))?;
        Ok(process)
    }

    pub fn get(&self, name: &str) -> ProcessResult<Rc<Process<S>>> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| ProcessError::UnknownModel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
