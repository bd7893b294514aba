//! Lifecycle events published by state nodes.

use super::node::StateNode;
use serde_json::Value;

/// Published on a parent after a child is attached. Payload: the child.
pub const ADD: &str = "add";
/// Published on a parent when its active child is about to be replaced.
pub const LEAVE: &str = "leave";
/// Published on the outgoing node itself once it has been left.
pub const LEAVING: &str = "leaving";
/// Published on a parent after its active child changed.
pub const ENTER: &str = "enter";
/// Published on the incoming node itself once it has been entered.
pub const ENTERING: &str = "entering";

/// Builds the compound event name `"<kind> <state>"`, e.g. `"enter login"`.
pub fn scoped(kind: &str, state: &str) -> String {
    format!("{kind} {state}")
}

/// Builds the event name published after an action ran, e.g. `"trigger authenticate"`.
pub fn trigger(action: &str) -> String {
    format!("trigger {action}")
}

/// A single publication delivered to listeners.
///
/// `node` carries the state the event is about (the child for `add`,
/// the outgoing/incoming node for the lifecycle events, the state that
/// handled an action for `trigger <action>` on the workflow). Scoped events
/// and `trigger <action>` on the handling state itself carry no node.
#[derive(Clone, Debug)]
pub struct Event {
    name: String,
    node: Option<StateNode>,
    args: Vec<Value>,
}

impl Event {
    pub fn new(name: impl Into<String>, node: Option<StateNode>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            node,
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> Option<&StateNode> {
        self.node.as_ref()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Positional argument, if present.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scoped_names_join_kind_and_state() {
        assert_eq!(scoped(ENTER, "login"), "enter login");
        assert_eq!(scoped(LEAVE, "forgot-password"), "leave forgot-password");
    }

    #[test]
    fn trigger_name_prefixes_action() {
        assert_eq!(trigger("authenticate"), "trigger authenticate");
    }

    #[test]
    fn event_exposes_positional_args() {
        let event = Event::new("enter invalid", None, vec![json!("bad password"), json!(3)]);
        assert_eq!(event.name(), "enter invalid");
        assert!(event.node().is_none());
        assert_eq!(event.arg(0), Some(&json!("bad password")));
        assert_eq!(event.arg(1), Some(&json!(3)));
        assert_eq!(event.arg(2), None);
    }
}
