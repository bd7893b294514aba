//! Property-based tests for the state-node engine.
//!
//! These tests use proptest to drive random sequences of additions and
//! transitions and check that tree and cascade invariants always hold.

use proptest::prelude::*;
use statewise::core::event;
use statewise::{StateNode, TransitionOutcome, WorkflowError};
use std::cell::Cell;
use std::rc::Rc;

const NAMES: [&str; 5] = ["login", "home", "forgot-password", "settings", "about"];

prop_compose! {
    fn arbitrary_name()(index in 0..NAMES.len()) -> &'static str {
        NAMES[index]
    }
}

#[derive(Clone, Debug)]
enum Op {
    /// Go to a child by name (may not exist yet)
    GoByName(&'static str),
    /// Go to a freshly created, unregistered node
    GoToFresh(&'static str),
    /// Go to an already registered child by handle
    GoByHandle(usize),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arbitrary_name().prop_map(Op::GoByName),
        arbitrary_name().prop_map(Op::GoToFresh),
        (0..8usize).prop_map(Op::GoByHandle),
    ]
}

fn counter(node: &StateNode, name: &str) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let hits = Rc::clone(&count);
    node.on(name, move |_| {
        hits.set(hits.get() + 1);
        Ok(())
    });
    count
}

proptest! {
    #[test]
    fn duplicate_names_are_rejected(name in arbitrary_name(), others in prop::collection::vec(arbitrary_name(), 0..4)) {
        let parent = StateNode::new("app");
        for other in others.iter().filter(|o| **o != name) {
            let _ = parent.add(&StateNode::new(*other));
        }
        parent.add(&StateNode::new(name)).unwrap();
        let before: Vec<StateNode> = parent.children();

        let result = parent.add(&StateNode::new(name));

        let is_conflict = matches!(result, Err(WorkflowError::NameConflict { .. }));
        prop_assert!(is_conflict);
        prop_assert_eq!(parent.children(), before);
    }

    #[test]
    fn adding_same_node_is_idempotent(repeats in 1..6usize) {
        let parent = StateNode::new("app");
        let adds = counter(&parent, event::ADD);
        let child = StateNode::new("login");

        for _ in 0..repeats {
            parent.add(&child).unwrap();
        }

        prop_assert_eq!(parent.children().len(), 1);
        prop_assert_eq!(adds.get(), 1);
    }

    #[test]
    fn random_transitions_preserve_invariants(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        let root = StateNode::new("app");
        let enters = counter(&root, event::ENTER);
        let leaves = counter(&root, event::LEAVE);
        let mut entered = 0usize;

        for op in ops {
            let outcome = match op {
                Op::GoByName(name) => root.go_to_state(name),
                Op::GoToFresh(name) => root.go_to_state(&StateNode::new(name)),
                Op::GoByHandle(index) => {
                    let children = root.children();
                    if children.is_empty() {
                        continue;
                    }
                    root.go_to_state(&children[index % children.len()])
                }
            };

            match outcome {
                Ok(TransitionOutcome::Entered) => entered += 1,
                Ok(_) => {}
                Err(WorkflowError::NameConflict { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }

            // The active child, when set, is always one of the children.
            if let Some(active) = root.active() {
                prop_assert!(root.children().contains(&active));
            }

            // Every enter except the very first is paired with a leave.
            prop_assert_eq!(enters.get(), entered);
            prop_assert_eq!(leaves.get(), entered.saturating_sub(1));

            // Sibling names stay unique.
            let mut names: Vec<String> = root.children().iter().map(|c| c.name().to_string()).collect();
            let total = names.len();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), total);
        }

        prop_assert_eq!(root.history().len(), entered);
    }

    #[test]
    fn trigger_resolves_against_current_state(path in prop::collection::vec(arbitrary_name(), 1..10)) {
        let root = StateNode::new("app");
        for name in NAMES {
            let state = StateNode::new(name);
            let owner = name.to_string();
            let expected = Rc::new(Cell::new(false));
            state.define_action(format!("only-{name}"), move |workflow, _| {
                let active = workflow.active().expect("active state");
                assert_eq!(active.name(), owner);
                expected.set(true);
                Ok(())
            });
            root.add(&state).unwrap();
        }

        for name in path {
            root.go_to_state(name).unwrap();
            for candidate in NAMES {
                let ran = root.trigger(&format!("only-{candidate}"), Vec::new()).unwrap();
                prop_assert_eq!(ran, candidate == name);
            }
        }
    }
}
