//! Deferred persistence commands.
//!
//! A [`Command`] is one unit of work queued onto a transaction: a required
//! `execute` step plus optional `rollback` and `complete` hooks. The
//! coordinator (see [`crate::transaction`]) drives the three phases;
//! commands themselves are inert closures over whatever state they need.
//!
//! Invariants the hooks must uphold:
//! - `rollback` restores external store state to exactly what it was
//!   before `execute`, and is only invoked after `execute` succeeded.
//! - `complete` runs only after the whole transaction committed, and is
//!   the place to refresh in-memory baselines (never before).

use crate::error::Result;

type Step = Box<dyn FnMut() -> Result<()> + Send>;

/// A deferred unit of work with execute/rollback/complete slots.
pub struct Command {
    label: &'static str,
    execute: Step,
    rollback: Option<Step>,
    complete: Option<Step>,
}

impl Command {
    /// Create a command from its execute step.
    pub fn new<F>(execute: F) -> Self
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        Self {
            label: "command",
            execute: Box::new(execute),
            rollback: None,
            complete: None,
        }
    }

    /// Attach the rollback hook.
    #[must_use]
    pub fn on_rollback<F>(mut self, rollback: F) -> Self
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        self.rollback = Some(Box::new(rollback));
        self
    }

    /// Attach the complete hook.
    #[must_use]
    pub fn on_complete<F>(mut self, complete: F) -> Self
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        self.complete = Some(Box::new(complete));
        self
    }

    /// Attach a label used in trace output.
    #[must_use]
    pub fn describe(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// The trace label of this command.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Run the execute step.
    pub fn execute(&mut self) -> Result<()> {
        (self.execute)()
    }

    /// Run the rollback hook, if any.
    pub fn rollback(&mut self) -> Result<()> {
        match &mut self.rollback {
            Some(step) => step(),
            None => Ok(()),
        }
    }

    /// Run the complete hook, if any.
    pub fn complete(&mut self) -> Result<()> {
        match &mut self.complete {
            Some(step) => step(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("label", &self.label)
            .field("has_rollback", &self.rollback.is_some())
            .field("has_complete", &self.complete.is_some())
            .finish()
    }
}
