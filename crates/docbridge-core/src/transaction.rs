//! Sequential transaction coordinator.
//!
//! Commands run in queue order. On the first execute failure the
//! coordinator rolls back every already-executed command in reverse order
//! and returns the original error; the failed command itself is never
//! rolled back (its rollback is safe to skip because execute did not
//! complete). Only after every command executed do the complete hooks run.
//!
//! Cross-store atomicity is best-effort: rollback is compensation, not
//! isolation. A crash between stores leaves an inconsistent pair; that is
//! an accepted limitation of this layer, not something it hides.

use crate::command::Command;
use crate::error::Result;

/// An ordered queue of persistence commands run as one unit.
#[derive(Debug, Default)]
pub struct Transaction {
    commands: Vec<Command>,
}

impl Transaction {
    /// Create an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command. Order of queueing is order of execution.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run the transaction to completion or rollback.
    ///
    /// Rollback failures are not caught: they propagate instead of the
    /// original error and must be treated as fatal by the caller.
    pub fn run(&mut self) -> Result<()> {
        let total = self.commands.len();
        tracing::debug!(commands = total, "Running transaction");

        for index in 0..self.commands.len() {
            if let Err(error) = self.commands[index].execute() {
                tracing::warn!(
                    command = self.commands[index].label(),
                    executed = index,
                    error = %error,
                    "Command failed; rolling back executed commands"
                );
                for done in self.commands[..index].iter_mut().rev() {
                    done.rollback()?;
                }
                return Err(error);
            }
        }

        for command in &mut self.commands {
            command.complete()?;
        }

        tracing::debug!(commands = total, "Transaction committed");
        self.commands.clear();
        Ok(())
    }
}
