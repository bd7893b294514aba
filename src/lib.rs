//! Statewise: a hierarchical state-node runtime for event-driven workflows
//!
//! An application is a tree of named states. Every node has at most one
//! active child, moving between children publishes a fixed cascade of
//! lifecycle events, and behavior is attached as named actions that are
//! dispatched through whichever state is active at the moment.
//!
//! # Core Concepts
//!
//! - **StateNode**: a named state that may itself contain states
//! - **Cascade**: `leave` → `leave <name>` → `leaving` → `enter` → `enter <name>` → `entering`
//! - **Actions**: handlers resolved against the active state at call time, so
//!   callbacks that fire after the workflow moved on are ignored
//! - **EventBus**: the synchronous publish/subscribe primitive each node owns
//!
//! # Example
//!
//! ```rust
//! use statewise::{args, StateNode, WorkflowError};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), WorkflowError> {
//! let app = StateNode::new("app");
//! let login = StateNode::new("login");
//! let home = StateNode::new("home");
//! app.add(&login)?;
//! app.add(&home)?;
//!
//! let rendered = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&rendered);
//! app.on("enter", move |event| {
//!     if let Some(state) = event.node() {
//!         log.borrow_mut().push(state.name().to_string());
//!     }
//!     Ok(())
//! });
//!
//! let next = home.clone();
//! login.define_action("authenticate", move |workflow, args| {
//!     let user = args.first().and_then(|v| v.as_str());
//!     let password = args.get(1).and_then(|v| v.as_str());
//!     if user == Some("admin") && password == Some("password") {
//!         workflow.go_to_state(&next)?;
//!     }
//!     Ok(())
//! });
//!
//! app.go_to_state(&login)?;
//! assert!(app.trigger("authenticate", args!["admin", "password"])?);
//! assert_eq!(app.active(), Some(home));
//! assert_eq!(*rendered.borrow(), vec!["login", "home"]);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateNodeBuilder, WorkflowSettings};
pub use crate::core::{
    Diagnostic, DiagnosticSink, Event, EventBus, StateNode, SubscriptionId, TransitionOutcome,
    WorkflowError,
};
pub use serde_json::Value;
