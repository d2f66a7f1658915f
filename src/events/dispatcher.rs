//! Per-panel publish/subscribe of named events
//!
//! A [`Dispatcher`] keeps the handlers subscribed on one panel. Handlers receive
//! a mutable context (the [`Root`](crate::root::Root) in practice) so they can
//! change focus, request stop-propagation, or restructure the tree while an
//! event is being delivered. Because the dispatcher lives inside that context,
//! delivery happens in two steps: [`Dispatcher::snapshot`] clones the handler
//! list, then [`Dispatcher::invoke`] runs every handler still subscribed in
//! registration order.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::event::Event;

/// Shared handler callback
pub type Handler<C> = Rc<dyn Fn(&mut C, &Event<'_>)>;

/// Identifies one subscription so it can be removed later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

struct Subscription<C> {
    id: SubscriptionId,
    handler: Handler<C>,
}

/// Named-event subscriptions for one panel
pub struct Dispatcher<C> {
    subscriptions: HashMap<String, Vec<Subscription<C>>>,
    next_id: u64,
}

impl<C> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<_> = self
            .subscriptions
            .iter()
            .map(|(name, subs)| format!("{name}[{}]", subs.len()))
            .collect();
        events.sort();
        f.debug_struct("Dispatcher").field("events", &events).finish()
    }
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Dispatcher<C> {
    /// Create a dispatcher with no subscriptions
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a handler for `name`
    ///
    /// Several handlers may share an event name; all of them run on dispatch.
    pub fn subscribe<F>(&mut self, name: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&mut C, &Event<'_>) + 'static,
    {
        self.subscribe_shared(name, Rc::new(handler))
    }

    /// Register an already shared handler for `name`
    pub fn subscribe_shared(&mut self, name: &str, handler: Handler<C>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions
            .entry(name.to_string())
            .or_default()
            .push(Subscription { id, handler });
        id
    }

    /// Remove one subscription, returning whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.subscriptions.retain(|_, subs| {
            let before = subs.len();
            subs.retain(|s| s.id != id);
            removed |= subs.len() != before;
            !subs.is_empty()
        });
        removed
    }

    /// Remove every handler registered for `name`
    pub fn unsubscribe_all(&mut self, name: &str) -> usize {
        self.subscriptions.remove(name).map_or(0, |subs| subs.len())
    }

    /// Remove all subscriptions
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    /// Whether `id` is still subscribed
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscriptions
            .values()
            .any(|subs| subs.iter().any(|s| s.id == id))
    }

    /// Number of handlers subscribed to `name`
    pub fn handler_count(&self, name: &str) -> usize {
        self.subscriptions.get(name).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Clone the handlers currently subscribed to `name`, in registration order
    pub fn snapshot(&self, name: &str) -> Vec<(SubscriptionId, Handler<C>)> {
        self.subscriptions
            .get(name)
            .map(|subs| subs.iter().map(|s| (s.id, Rc::clone(&s.handler))).collect())
            .unwrap_or_default()
    }

    /// Invoke a snapshot of handlers in order
    ///
    /// `still_subscribed` is asked right before each handler runs, so a
    /// handler removed by an earlier one of the same dispatch is skipped.
    /// Returns the number of handlers invoked; zero means nobody listened.
    pub fn invoke<F>(
        handlers: Vec<(SubscriptionId, Handler<C>)>,
        ctx: &mut C,
        event: &Event<'_>,
        mut still_subscribed: F,
    ) -> usize
    where
        F: FnMut(&C, SubscriptionId) -> bool,
    {
        let mut count = 0;
        for (subscription, handler) in handlers {
            if !still_subscribed(ctx, subscription) {
                continue;
            }
            handler(ctx, event);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event::{EventData, ON_CLICK, ON_CURSOR};
    use crate::panel::PanelId;

    fn panel() -> PanelId {
        PanelId::from_raw(7)
    }

    fn dispatch(dispatcher: &Dispatcher<Vec<String>>, log: &mut Vec<String>, name: &str, data: &EventData) -> usize {
        let event = Event::new(name, panel(), data);
        Dispatcher::invoke(dispatcher.snapshot(name), log, &event, |_, _| true)
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let mut dispatcher = Dispatcher::<Vec<String>>::new();
        dispatcher.subscribe(ON_CLICK, |log, _| log.push("first".to_string()));
        dispatcher.subscribe(ON_CLICK, |log, _| log.push("second".to_string()));
        dispatcher.subscribe(ON_CURSOR, |log, _| log.push("cursor".to_string()));

        let mut log = Vec::new();
        let count = dispatch(&dispatcher, &mut log, ON_CLICK, &EventData::None);

        assert_eq!(count, 2);
        assert_eq!(log, vec!["first", "second"]);
    }

    #[test]
    fn test_dispatch_without_listeners_returns_zero() {
        let dispatcher = Dispatcher::<Vec<String>>::new();
        let mut log = Vec::new();
        assert_eq!(dispatch(&dispatcher, &mut log, ON_CLICK, &EventData::None), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_handler_sees_event_fields() {
        let mut dispatcher = Dispatcher::<Vec<String>>::new();
        dispatcher.subscribe(ON_CURSOR, |log, ev| {
            let pos = ev.position().unwrap_or_default();
            log.push(format!("{} {} {}", ev.name, ev.panel.id(), pos));
        });

        let mut log = Vec::new();
        dispatch(&dispatcher, &mut log, ON_CURSOR, &EventData::Cursor { x: 1.0, y: 2.0 });
        assert_eq!(log, vec!["cursor 7 (1, 2)"]);
    }

    #[test]
    fn test_invoke_skips_rejected_subscriptions() {
        let mut dispatcher = Dispatcher::<Vec<String>>::new();
        dispatcher.subscribe(ON_CLICK, |log, _| log.push("first".to_string()));
        let second = dispatcher.subscribe(ON_CLICK, |log, _| log.push("second".to_string()));
        dispatcher.subscribe(ON_CLICK, |log, _| log.push("third".to_string()));

        let mut log = Vec::new();
        let event = Event::new(ON_CLICK, panel(), &EventData::None);
        // Drop the second handler once the first has run
        let count = Dispatcher::invoke(dispatcher.snapshot(ON_CLICK), &mut log, &event, |log, id| {
            !(id == second && !log.is_empty())
        });

        assert_eq!(count, 2);
        assert_eq!(log, vec!["first", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut dispatcher = Dispatcher::<Vec<String>>::new();
        let first = dispatcher.subscribe(ON_CLICK, |log, _| log.push("first".to_string()));
        dispatcher.subscribe(ON_CLICK, |log, _| log.push("second".to_string()));

        assert!(dispatcher.unsubscribe(first));
        assert!(!dispatcher.unsubscribe(first));
        assert!(!dispatcher.contains(first));
        assert_eq!(dispatcher.handler_count(ON_CLICK), 1);

        assert_eq!(dispatcher.unsubscribe_all(ON_CLICK), 1);
        assert!(dispatcher.is_empty());
    }
}
