//! Named actions attached to states.

use super::error::WorkflowError;
use super::node::StateNode;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Handler invoked by [`StateNode::trigger`].
///
/// The first argument is the workflow the action was triggered on (the
/// parent of the state that owns the action), so the body can drive further
/// transitions or triggers on it.
pub type Action = Rc<dyn Fn(&StateNode, &[Value]) -> Result<(), WorkflowError>>;

/// Registry of actions available while a state is active.
#[derive(Clone, Default)]
pub struct ActionMap {
    actions: HashMap<String, Action>,
}

impl ActionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an action. Returns the previous handler, if any.
    pub fn define(&mut self, name: impl Into<String>, action: Action) -> Option<Action> {
        self.actions.insert(name.into(), action)
    }

    pub fn remove(&mut self, name: &str) -> Option<Action> {
        self.actions.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Action> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Action names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
