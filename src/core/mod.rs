//! Core workflow engine.
//!
//! This module contains the hierarchical state-node runtime:
//! - `StateNode`, the tree of named states with one active child per node
//! - The synchronous `EventBus` each node publishes its lifecycle on
//! - Named actions dispatched through the active state
//! - A bounded transition history and injectable diagnostics
//!
//! Everything here is single-threaded and synchronous. Asynchronous
//! application code re-enters the engine through ordinary calls.

mod action;
mod bus;
mod diagnostics;
mod error;
pub mod event;
mod history;
mod node;

pub use action::{Action, ActionMap};
pub use bus::{EventBus, Listener, SubscriptionId};
pub use diagnostics::{Diagnostic, DiagnosticSink, SilentSink, TracingSink};
pub use error::WorkflowError;
pub use event::Event;
pub use history::{TransitionHistory, TransitionRecord, DEFAULT_HISTORY_LIMIT};
pub use node::{StateNode, Target, TransitionOutcome, WeakStateNode};
