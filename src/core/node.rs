//! The state node: a named workflow state that can itself be a workflow.
//!
//! A [`StateNode`] owns an ordered list of children, points at (at most) one
//! active child and carries a map of actions that are available while it is
//! the active child of its parent. Every node owns an [`EventBus`] on which
//! it publishes its lifecycle events.
//!
//! # Transition cascade
//!
//! `parent.go_to_state(b)` while `a` is active publishes, in order:
//!
//! 1. `leave` (node `a`) on `parent`
//! 2. `leave a` on `parent`
//! 3. `a` leaves its own active child (same cascade, recursively) and becomes idle
//! 4. `leaving` (node `a`) on `a`
//! 5. `parent`'s active child becomes `b`
//! 6. `enter` (node `b`, extra args) on `parent`
//! 7. `enter b` (extra args) on `parent`
//! 8. `entering` (node `b`, extra args) on `b`
//!
//! Listeners may call back into the engine at any point; nested calls run to
//! completion before the outer call resumes.
//!
//! # Example
//!
//! ```rust
//! use statewise::{args, StateNode, WorkflowError};
//!
//! # fn main() -> Result<(), WorkflowError> {
//! let app = StateNode::new("app");
//! let login = StateNode::new("login");
//! let home = StateNode::new("home");
//! app.add(&login)?;
//! app.add(&home)?;
//!
//! let target = home.clone();
//! login.define_action("authenticate", move |workflow, args| {
//!     if args.first().and_then(|v| v.as_str()) == Some("admin") {
//!         workflow.go_to_state(&target)?;
//!     }
//!     Ok(())
//! });
//!
//! app.go_to_state("login")?;
//! assert!(app.trigger("authenticate", args!["admin"])?);
//! assert!(app.is_active(&home));
//!
//! // `home` has no such action, so nothing runs.
//! assert!(!app.trigger("authenticate", args!["admin"])?);
//! # Ok(())
//! # }
//! ```

use super::action::{Action, ActionMap};
use super::bus::{EventBus, SubscriptionId};
use super::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use super::error::WorkflowError;
use super::event::{self, Event};
use super::history::{TransitionHistory, TransitionRecord};
use crate::builder::{StateNodeBuilder, WorkflowSettings};
use chrono::Utc;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct Inner {
    name: String,
    parent: RefCell<Weak<Inner>>,
    children: RefCell<Vec<StateNode>>,
    active: RefCell<Option<Weak<Inner>>>,
    actions: RefCell<ActionMap>,
    bus: EventBus,
    history: RefCell<TransitionHistory>,
    depth: Cell<usize>,
    max_depth: usize,
    diagnostics: Rc<dyn DiagnosticSink>,
}

/// Shared handle to a node in the workflow tree.
///
/// Cloning the handle does not clone the node; equality is identity.
#[derive(Clone)]
pub struct StateNode {
    inner: Rc<Inner>,
}

/// Non-owning handle, for listeners and actions that refer back to a node
/// that (indirectly) owns them.
#[derive(Clone)]
pub struct WeakStateNode {
    inner: Weak<Inner>,
}

impl WeakStateNode {
    pub fn upgrade(&self) -> Option<StateNode> {
        self.inner.upgrade().map(|inner| StateNode { inner })
    }
}

/// What `go_to_state` should move to: a child name or a node.
#[derive(Clone, Debug)]
pub enum Target {
    Name(String),
    Node(StateNode),
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<StateNode> for Target {
    fn from(node: StateNode) -> Self {
        Self::Node(node)
    }
}

impl From<&StateNode> for Target {
    fn from(node: &StateNode) -> Self {
        Self::Node(node.clone())
    }
}

/// Result of a `go_to_state` call that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The full leave/enter cascade ran and the target is now active.
    Entered,
    /// The target was already the active child; nothing was published.
    AlreadyActive,
    /// No child with the given name exists; nothing changed.
    Unresolved,
}

impl TransitionOutcome {
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

/// Tracks nested `go_to_state` calls on one node; released on drop.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
    level: usize,
}

impl<'a> DepthGuard<'a> {
    fn enter(node: &'a StateNode) -> Result<Self, WorkflowError> {
        let level = node.inner.depth.get() + 1;
        if level > node.inner.max_depth {
            return Err(WorkflowError::DepthExceeded {
                state: node.inner.name.clone(),
                limit: node.inner.max_depth,
            });
        }
        node.inner.depth.set(level);
        Ok(Self {
            depth: &node.inner.depth,
            level,
        })
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

impl StateNode {
    /// Create a detached node with default settings, logging through `tracing`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(
            name.into(),
            &WorkflowSettings::default(),
            Rc::new(TracingSink),
            ActionMap::new(),
        )
    }

    pub fn builder(name: impl Into<String>) -> StateNodeBuilder {
        StateNodeBuilder::new(name)
    }

    pub(crate) fn from_parts(
        name: String,
        settings: &WorkflowSettings,
        diagnostics: Rc<dyn DiagnosticSink>,
        actions: ActionMap,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                name,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                active: RefCell::new(None),
                actions: RefCell::new(actions),
                bus: EventBus::new(),
                history: RefCell::new(TransitionHistory::with_limit(settings.history_limit)),
                depth: Cell::new(0),
                max_depth: settings.max_transition_depth,
                diagnostics,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn ptr_eq(&self, other: &StateNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakStateNode {
        WeakStateNode {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn parent(&self) -> Option<StateNode> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| StateNode { inner })
    }

    /// Children in insertion order.
    pub fn children(&self) -> Vec<StateNode> {
        self.inner.children.borrow().clone()
    }

    pub fn active(&self) -> Option<StateNode> {
        self.inner
            .active
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| StateNode { inner })
    }

    pub fn is_active(&self, node: &StateNode) -> bool {
        self.active().is_some_and(|active| active.ptr_eq(node))
    }

    /// Names along the chain of active children below this node.
    pub fn active_path(&self) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = self.active();
        while let Some(node) = current {
            path.push(node.name().to_string());
            current = node.active();
        }
        path
    }

    /// This node's own transitions, oldest first.
    pub fn history(&self) -> TransitionHistory {
        self.inner.history.borrow().clone()
    }

    /// First child with exactly this name.
    pub fn find_state(&self, name: &str) -> Option<StateNode> {
        self.inner
            .children
            .borrow()
            .iter()
            .find(|child| child.name() == name)
            .cloned()
    }

    /// Attach `child` to this node.
    ///
    /// Returns `Ok(false)` without publishing anything if `child` is already
    /// one of this node's children. Otherwise the child is appended and `add`
    /// is published with the child as payload.
    ///
    /// # Errors
    ///
    /// Fails before modifying the tree when a different child already has the
    /// same name, when `child` belongs to another live parent, or when `child`
    /// is this node or one of its ancestors. A child whose parent has been
    /// dropped is free to be attached again. Errors returned by `add` listeners
    /// are propagated after the child has been attached.
    pub fn add(&self, child: &StateNode) -> Result<bool, WorkflowError> {
        if self.contains(child) {
            return Ok(false);
        }
        if self.find_state(child.name()).is_some() {
            return Err(WorkflowError::NameConflict {
                parent: self.inner.name.clone(),
                name: child.inner.name.clone(),
            });
        }
        if let Some(parent) = child.parent() {
            return Err(WorkflowError::AlreadyAttached {
                child: child.inner.name.clone(),
                parent: parent.inner.name.clone(),
            });
        }
        if self.lineage().any(|node| node.ptr_eq(child)) {
            return Err(WorkflowError::WouldCycle {
                child: child.inner.name.clone(),
                parent: self.inner.name.clone(),
            });
        }

        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child.clone());
        self.inner
            .bus
            .publish(&Event::new(event::ADD, Some(child.clone()), Vec::new()))?;
        Ok(true)
    }

    /// Transition to `target` without extra arguments.
    pub fn go_to_state(&self, target: impl Into<Target>) -> Result<TransitionOutcome, WorkflowError> {
        self.go_to_state_with(target, Vec::new())
    }

    /// Make `target` the active child, passing `args` to the enter events.
    ///
    /// A name is resolved against this node's children; a node is attached
    /// first if needed. Moving to the child that is already active is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::DepthExceeded`] when too many transitions are
    /// nested on this node, any error from attaching the target, and the first
    /// error returned by a listener. A listener error leaves the tree as it
    /// was at that point.
    pub fn go_to_state_with(
        &self,
        target: impl Into<Target>,
        args: Vec<Value>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let target = match target.into() {
            Target::Node(node) => node,
            Target::Name(name) => match self.find_state(&name) {
                Some(node) => node,
                None => {
                    self.diagnose(Diagnostic::UnresolvedTarget { target: name });
                    return Ok(TransitionOutcome::Unresolved);
                }
            },
        };

        let depth = DepthGuard::enter(self)?;
        self.add(&target)?;

        if self.is_active(&target) {
            self.diagnose(Diagnostic::AlreadyActive {
                state: target.inner.name.clone(),
            });
            return Ok(TransitionOutcome::AlreadyActive);
        }

        let previous = self.leave_active()?;
        *self.inner.active.borrow_mut() = Some(Rc::downgrade(&target.inner));
        self.inner.history.borrow_mut().push(TransitionRecord {
            from: previous.map(|node| node.inner.name.clone()),
            to: target.inner.name.clone(),
            timestamp: Utc::now(),
            depth: depth.level,
        });
        self.diagnose(Diagnostic::Entered {
            state: target.inner.name.clone(),
            depth: depth.level,
        });

        self.enter(&target, args)?;
        Ok(TransitionOutcome::Entered)
    }

    /// Run the action `action` of the currently active child.
    ///
    /// The action is looked up at call time, so a completion callback that
    /// triggers an action after the workflow has moved on finds nothing and
    /// does nothing. Once the action returns, `trigger <action>` is published
    /// on this node (with the child active at that point, if any, and `args`)
    /// and on that active child (with `args`).
    ///
    /// Returns `Ok(false)` when there is no active child or it has no such
    /// action.
    pub fn trigger(&self, action: &str, args: Vec<Value>) -> Result<bool, WorkflowError> {
        let Some(state) = self.active() else {
            self.diagnose(Diagnostic::ActionNotFound {
                action: action.to_string(),
                state: None,
            });
            return Ok(false);
        };
        let Some(handler) = state.action(action) else {
            self.diagnose(Diagnostic::ActionNotFound {
                action: action.to_string(),
                state: Some(state.inner.name.clone()),
            });
            return Ok(false);
        };

        self.diagnose(Diagnostic::ActionTriggered {
            action: action.to_string(),
            state: state.inner.name.clone(),
        });
        handler(self, args.as_slice())?;

        // The handler may have moved the workflow on.
        let current = self.active();
        let name = event::trigger(action);
        self.inner
            .bus
            .publish(&Event::new(name.clone(), current.clone(), args.clone()))?;
        if let Some(current) = current {
            current.inner.bus.publish(&Event::new(name, None, args))?;
        }
        Ok(true)
    }

    /// Publish `"<kind> <node name>"` on this node with `args`.
    pub fn split_by_name(
        &self,
        kind: &str,
        node: &StateNode,
        args: &[Value],
    ) -> Result<(), WorkflowError> {
        let name = event::scoped(kind, node.name());
        self.diagnose(Diagnostic::ScopedEvent {
            event: name.clone(),
        });
        self.inner
            .bus
            .publish(&Event::new(name, None, args.to_vec()))
    }

    /// Register (or replace) an action available while this node is active.
    pub fn define_action<F>(&self, name: impl Into<String>, action: F)
    where
        F: Fn(&StateNode, &[Value]) -> Result<(), WorkflowError> + 'static,
    {
        self.inner
            .actions
            .borrow_mut()
            .define(name, Rc::new(action));
    }

    pub fn remove_action(&self, name: &str) -> bool {
        self.inner.actions.borrow_mut().remove(name).is_some()
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.inner.actions.borrow().contains(name)
    }

    pub fn action_names(&self) -> Vec<String> {
        self.inner.actions.borrow().names()
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn on<F>(&self, event: impl Into<String>, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), WorkflowError> + 'static,
    {
        self.inner.bus.subscribe(event, listener)
    }

    pub fn once<F>(&self, event: impl Into<String>, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), WorkflowError> + 'static,
    {
        self.inner.bus.once(event, listener)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.inner.bus.unsubscribe(id)
    }

    /// Publish an application-defined event on this node.
    pub fn emit(&self, event: impl Into<String>, args: Vec<Value>) -> Result<(), WorkflowError> {
        self.inner.bus.publish(&Event::new(event, None, args))
    }

    fn action(&self, name: &str) -> Option<Action> {
        self.inner.actions.borrow().get(name)
    }

    fn contains(&self, node: &StateNode) -> bool {
        self.inner
            .children
            .borrow()
            .iter()
            .any(|child| child.ptr_eq(node))
    }

    /// This node followed by its ancestors up to the root.
    fn lineage(&self) -> impl Iterator<Item = StateNode> {
        std::iter::successors(Some(self.clone()), StateNode::parent)
    }

    /// Leave the active child, if any, and return it.
    ///
    /// The outgoing child leaves its own active child first, so nested
    /// sub-states are torn down innermost-first before `leaving` fires.
    fn leave_active(&self) -> Result<Option<StateNode>, WorkflowError> {
        let Some(outgoing) = self.active() else {
            return Ok(None);
        };

        self.inner.bus.publish(&Event::new(
            event::LEAVE,
            Some(outgoing.clone()),
            Vec::new(),
        ))?;
        self.split_by_name(event::LEAVE, &outgoing, &[])?;

        outgoing.leave_active()?;
        *outgoing.inner.active.borrow_mut() = None;
        self.diagnose(Diagnostic::Left {
            state: outgoing.inner.name.clone(),
        });

        outgoing.inner.bus.publish(&Event::new(
            event::LEAVING,
            Some(outgoing.clone()),
            Vec::new(),
        ))?;
        Ok(Some(outgoing))
    }

    fn enter(&self, incoming: &StateNode, args: Vec<Value>) -> Result<(), WorkflowError> {
        self.inner.bus.publish(&Event::new(
            event::ENTER,
            Some(incoming.clone()),
            args.clone(),
        ))?;
        self.split_by_name(event::ENTER, incoming, &args)?;
        incoming.inner.bus.publish(&Event::new(
            event::ENTERING,
            Some(incoming.clone()),
            args,
        ))
    }

    fn diagnose(&self, diagnostic: Diagnostic) {
        self.inner.diagnostics.emit(&self.inner.name, &diagnostic);
    }
}

impl PartialEq for StateNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for StateNode {}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self
            .inner
            .children
            .borrow()
            .iter()
            .map(|child| child.inner.name.clone())
            .collect();
        f.debug_struct("StateNode")
            .field("name", &self.inner.name)
            .field("active", &self.active().map(|node| node.inner.name.clone()))
            .field("children", &children)
            .finish()
    }
}
