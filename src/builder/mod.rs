//! Builder API for ergonomic workflow construction.
//!
//! This module provides a fluent node builder, serde-friendly settings and
//! the `args!` macro for assembling event and action arguments.

pub mod error;
pub mod macros;
pub mod node;
pub mod settings;

pub use error::BuildError;
pub use node::StateNodeBuilder;
pub use settings::{WorkflowSettings, DEFAULT_MAX_TRANSITION_DEPTH};

use crate::core::{StateNode, WorkflowError};

/// Build a workflow root with the given children already attached.
///
/// # Example
///
/// ```
/// use statewise::builder::workflow;
/// use statewise::StateNode;
///
/// let app = workflow(
///     "app",
///     [StateNode::new("login"), StateNode::new("home")],
/// )
/// .unwrap();
///
/// assert!(app.find_state("home").is_some());
/// ```
pub fn workflow<I>(name: &str, states: I) -> Result<StateNode, WorkflowError>
where
    I: IntoIterator<Item = StateNode>,
{
    let root = StateNode::new(name);
    for state in states {
        root.add(&state)?;
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_attaches_states() {
        let app = workflow("app", [StateNode::new("login"), StateNode::new("home")]).unwrap();
        assert_eq!(app.children().len(), 2);
        assert!(app.active().is_none());
    }

    #[test]
    fn workflow_rejects_duplicate_states() {
        let result = workflow("app", [StateNode::new("login"), StateNode::new("login")]);
        assert!(matches!(result, Err(WorkflowError::NameConflict { .. })));
    }
}
