//! Synchronous publish/subscribe bus owned by every state node.
//!
//! Dispatch is in subscription order and runs to completion on the calling
//! thread. The listener list is snapshotted before dispatch, so listeners may
//! subscribe, unsubscribe or publish again while an event is being delivered:
//! additions take effect from the next publication.

use super::error::WorkflowError;
use super::event::Event;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Callback invoked for every matching publication.
pub type Listener = Rc<dyn Fn(&Event) -> Result<(), WorkflowError>>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

struct Subscription {
    id: SubscriptionId,
    event: String,
    once: bool,
    listener: Listener,
}

#[derive(Default)]
pub struct EventBus {
    subscriptions: RefCell<Vec<Subscription>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every publication of `event`.
    pub fn subscribe<F>(&self, event: impl Into<String>, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), WorkflowError> + 'static,
    {
        self.insert(event.into(), false, Rc::new(listener))
    }

    /// Register `listener` for the next publication of `event` only.
    pub fn once<F>(&self, event: impl Into<String>, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), WorkflowError> + 'static,
    {
        self.insert(event.into(), true, Rc::new(listener))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Deliver `event` to every listener subscribed to its name.
    ///
    /// Stops at the first listener error and returns it; listeners after the
    /// failing one are not called.
    pub fn publish(&self, event: &Event) -> Result<(), WorkflowError> {
        let snapshot: Vec<(SubscriptionId, bool, Listener)> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.event == event.name())
            .map(|s| (s.id, s.once, Rc::clone(&s.listener)))
            .collect();

        for (id, once, listener) in snapshot {
            if once {
                self.unsubscribe(id);
            }
            listener(event)?;
        }
        Ok(())
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.event == event)
            .count()
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    fn insert(&self, event: String, once: bool, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            event,
            once,
            listener,
        });
        id
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn named(name: &str) -> Event {
        Event::new(name, None, Vec::new())
    }

    #[test]
    fn publish_reaches_listeners_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            bus.subscribe("ping", move |_| {
                seen.borrow_mut().push(label);
                Ok(())
            });
        }

        bus.publish(&named("ping")).unwrap();
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn publish_ignores_other_event_names() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        bus.subscribe("enter", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        bus.publish(&named("enter login")).unwrap();
        bus.publish(&named("leave")).unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn once_fires_a_single_time() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        bus.once("enter home", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        bus.publish(&named("enter home")).unwrap();
        bus.publish(&named("enter home")).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(!bus.has_listeners("enter home"));
    }

    #[test]
    fn unsubscribe_removes_listener() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = bus.subscribe("add", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&named("add")).unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn listener_error_stops_dispatch() {
        let bus = EventBus::new();
        let reached = Rc::new(Cell::new(false));
        bus.subscribe("leave", |_| Err(WorkflowError::handler("nope")));
        let flag = Rc::clone(&reached);
        bus.subscribe("leave", move |_| {
            flag.set(true);
            Ok(())
        });

        let result = bus.publish(&named("leave"));
        assert_eq!(result, Err(WorkflowError::handler("nope")));
        assert!(!reached.get());
    }

    #[test]
    fn listeners_added_during_publish_wait_for_next_publication() {
        let bus = Rc::new(EventBus::new());
        let late_hits = Rc::new(Cell::new(0));

        let inner_bus = Rc::clone(&bus);
        let counter = Rc::clone(&late_hits);
        bus.once("tick", move |_| {
            let counter = Rc::clone(&counter);
            inner_bus.subscribe("tick", move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            });
            Ok(())
        });

        bus.publish(&named("tick")).unwrap();
        assert_eq!(late_hits.get(), 0);
        bus.publish(&named("tick")).unwrap();
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn listener_count_tracks_subscriptions() {
        let bus = EventBus::new();
        assert_eq!(bus.listener_count("enter"), 0);
        bus.subscribe("enter", |_| Ok(()));
        bus.once("enter", |_| Ok(()));
        assert_eq!(bus.listener_count("enter"), 2);
        assert!(bus.has_listeners("enter"));
    }
}
