//! Injectable diagnostics for the engine.
//!
//! Each node owns a [`DiagnosticSink`]. The default sink forwards to
//! `tracing`, so output is controlled by whatever subscriber the application
//! installs; there is no process-wide switch inside the engine.

use std::fmt;

/// Something noteworthy the engine did, or declined to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    Entered { state: String, depth: usize },
    Left { state: String },
    ScopedEvent { event: String },
    AlreadyActive { state: String },
    UnresolvedTarget { target: String },
    ActionTriggered { action: String, state: String },
    /// `state` is `None` when the workflow had no active child.
    ActionNotFound { action: String, state: Option<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entered { state, depth } => write!(f, "entered state \"{state}\" (depth {depth})"),
            Self::Left { state } => write!(f, "left state \"{state}\""),
            Self::ScopedEvent { event } => write!(f, "{event}"),
            Self::AlreadyActive { state } => write!(f, "state \"{state}\" is already active"),
            Self::UnresolvedTarget { target } => write!(f, "trying to go to no state: \"{target}\""),
            Self::ActionTriggered { action, state } => {
                write!(f, "triggering action \"{action}\" in state \"{state}\"")
            }
            Self::ActionNotFound {
                action,
                state: Some(state),
            } => write!(f, "action \"{action}\" not found in state \"{state}\""),
            Self::ActionNotFound { action, state: None } => {
                write!(f, "action \"{action}\" not found: no active state")
            }
        }
    }
}

/// Receiver for engine diagnostics. `workflow` is the name of the node that
/// reported it.
pub trait DiagnosticSink {
    fn emit(&self, workflow: &str, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, workflow: &str, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::ScopedEvent { .. } => {
                tracing::trace!(workflow, "{diagnostic}");
            }
            Diagnostic::UnresolvedTarget { .. } | Diagnostic::ActionNotFound { .. } => {
                tracing::debug!(workflow, miss = true, "{diagnostic}");
            }
            _ => tracing::debug!(workflow, "{diagnostic}"),
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn emit(&self, _workflow: &str, _diagnostic: &Diagnostic) {}
}
