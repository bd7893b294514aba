//! Builder for constructing state nodes.

use crate::builder::error::BuildError;
use crate::builder::settings::WorkflowSettings;
use crate::core::{ActionMap, DiagnosticSink, StateNode, TracingSink, WorkflowError};
use serde_json::Value;
use std::rc::Rc;

/// Builder for state nodes with a fluent API.
///
/// # Example
///
/// ```
/// use statewise::builder::StateNodeBuilder;
/// use statewise::StateNode;
///
/// let login = StateNodeBuilder::new("login")
///     .action("forgotPassword", |workflow, _args| {
///         workflow.go_to_state("forgot-password")?;
///         Ok(())
///     })
///     .child(StateNode::new("default"))
///     .child(StateNode::new("loading"))
///     .build()
///     .unwrap();
///
/// assert!(login.has_action("forgotPassword"));
/// assert_eq!(login.children().len(), 2);
/// ```
pub struct StateNodeBuilder {
    name: String,
    settings: WorkflowSettings,
    diagnostics: Option<Rc<dyn DiagnosticSink>>,
    actions: ActionMap,
    children: Vec<StateNode>,
}

impl StateNodeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: WorkflowSettings::default(),
            diagnostics: None,
            actions: ActionMap::new(),
            children: Vec::new(),
        }
    }

    /// Replace all settings at once.
    pub fn settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn max_transition_depth(mut self, depth: usize) -> Self {
        self.settings.max_transition_depth = depth;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.settings.history_limit = limit;
        self
    }

    /// Route this node's diagnostics to `sink` instead of `tracing`.
    pub fn diagnostics(mut self, sink: Rc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Register an action available while the node is active.
    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&StateNode, &[Value]) -> Result<(), WorkflowError> + 'static,
    {
        self.actions.define(name, Rc::new(action));
        self
    }

    /// Attach a child when the node is built, in call order.
    pub fn child(mut self, child: StateNode) -> Self {
        self.children.push(child);
        self
    }

    /// Build the node.
    /// Returns an error if the name is empty, the settings are invalid or a
    /// child cannot be attached.
    pub fn build(self) -> Result<StateNode, BuildError> {
        if self.name.is_empty() {
            return Err(BuildError::EmptyName);
        }
        self.settings.validate()?;

        let diagnostics = self.diagnostics.unwrap_or_else(|| Rc::new(TracingSink));
        let node = StateNode::from_parts(self.name, &self.settings, diagnostics, self.actions);
        for child in &self.children {
            node.add(child)?;
        }
        Ok(node)
    }
}
