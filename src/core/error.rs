//! Errors raised by the state-node engine.

use thiserror::Error;

/// Errors that can occur while building or driving a workflow tree.
///
/// Only tree-construction problems and handler failures are errors. An
/// unresolvable transition target or a missing action are ordinary outcomes
/// and are reported through diagnostics instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("State names must be unique: '{parent}' already has a child named '{name}'")]
    NameConflict { parent: String, name: String },

    #[error("State '{child}' is already attached to '{parent}'")]
    AlreadyAttached { child: String, parent: String },

    #[error("Adding '{child}' under '{parent}' would create a cycle")]
    WouldCycle { child: String, parent: String },

    #[error("Transition depth limit ({limit}) exceeded in state '{state}'")]
    DepthExceeded { state: String, limit: usize },

    /// Failure reported by an application listener or action.
    #[error("Handler failed: {0}")]
    Handler(String),
}

impl WorkflowError {
    /// Convenience constructor for handler failures.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}
