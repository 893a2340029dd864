//! Event dispatcher delivering events to subscribers by exact kind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{BoxError, DispatchError, Result};
use crate::event::{DomainEvent, EventVariant};

type Handler<E> = Box<dyn Fn(&E) -> std::result::Result<(), BoxError> + Send + Sync>;
type Condition<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

struct Subscription<E> {
    name: &'static str,
    handler: Handler<E>,
    condition: Option<Condition<E>>,
}

impl<E> Subscription<E> {
    fn accepts(&self, event: &E) -> bool {
        self.condition.as_ref().is_none_or(|condition| condition(event))
    }
}

/// Publish/subscribe bus for one event sum type.
///
/// Subscribers are registered per event kind and are only ever invoked for
/// events of exactly that kind. Registration needs `&mut self`, so once the
/// dispatcher is shared behind an `Arc` its subscriber set is fixed.
///
/// Delivery is synchronous. The first subscriber error aborts the remaining
/// delivery of that `dispatch` call and is returned to the caller.
pub struct EventDispatcher<E: DomainEvent> {
    subscribers: HashMap<E::Kind, Vec<Subscription<E>>>,
    registrations: Vec<(E::Kind, &'static str)>,
    dispatching: AtomicBool,
}

impl<E: DomainEvent> EventDispatcher<E> {
    /// Creates a dispatcher with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            registrations: Vec::new(),
            dispatching: AtomicBool::new(false),
        }
    }

    /// Registers `handler` for every event of `kind`.
    pub fn subscribe<H>(&mut self, kind: E::Kind, name: &'static str, handler: H) -> &mut Self
    where
        H: Fn(&E) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.register(kind, name, Box::new(handler), None)
    }

    /// Registers `handler` for events of `kind` for which `condition` holds.
    ///
    /// The condition is evaluated per event, at delivery time.
    pub fn subscribe_when<H, C>(
        &mut self,
        kind: E::Kind,
        name: &'static str,
        handler: H,
        condition: C,
    ) -> &mut Self
    where
        H: Fn(&E) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
        C: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.register(kind, name, Box::new(handler), Some(Box::new(condition)))
    }

    /// Registers a handler written against the payload type `P`.
    pub fn on<P, H>(&mut self, name: &'static str, handler: H) -> &mut Self
    where
        P: EventVariant<E>,
        H: Fn(&P) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.subscribe(P::KIND, name, move |event: &E| match P::project(event) {
            Some(payload) => handler(payload),
            None => Ok(()),
        })
    }

    /// Registers a handler and condition written against the payload type `P`.
    pub fn on_when<P, H, C>(&mut self, name: &'static str, handler: H, condition: C) -> &mut Self
    where
        P: EventVariant<E>,
        H: Fn(&P) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
        C: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.subscribe_when(
            P::KIND,
            name,
            move |event: &E| match P::project(event) {
                Some(payload) => handler(payload),
                None => Ok(()),
            },
            move |event: &E| P::project(event).is_some_and(|payload| condition(payload)),
        )
    }

    fn register(
        &mut self,
        kind: E::Kind,
        name: &'static str,
        handler: Handler<E>,
        condition: Option<Condition<E>>,
    ) -> &mut Self {
        tracing::debug!(
            %kind,
            subscriber = name,
            conditional = condition.is_some(),
            "subscriber registered"
        );
        self.subscribers.entry(kind).or_default().push(Subscription {
            name,
            handler,
            condition,
        });
        self.registrations.push((kind, name));
        self
    }

    /// Delivers `events` in order to the subscribers of each event's kind.
    ///
    /// Subscribers of one kind run in registration order. A subscriber whose
    /// condition rejects the event is skipped.
    pub fn dispatch(&self, events: &[E]) -> Result<()> {
        let _guard = self.enter()?;

        for event in events {
            let kind = event.kind();
            metrics::counter!("events_dispatched_total").increment(1);

            let Some(subscriptions) = self.subscribers.get(&kind) else {
                continue;
            };

            for subscription in subscriptions.iter().filter(|s| s.accepts(event)) {
                tracing::debug!(
                    %kind,
                    event_id = %event.event_id(),
                    subscriber = subscription.name,
                    "delivering event"
                );

                if let Err(source) = (subscription.handler)(event) {
                    tracing::warn!(
                        %kind,
                        event_id = %event.event_id(),
                        subscriber = subscription.name,
                        error = %source,
                        "subscriber failed, delivery aborted"
                    );
                    return Err(DispatchError::Subscriber {
                        subscriber: subscription.name,
                        kind: kind.to_string(),
                        event_id: event.event_id(),
                        source,
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns the number of subscribers registered for `kind`.
    pub fn subscriber_count(&self, kind: E::Kind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Returns every registration as `(kind, subscriber name)`, in
    /// registration order.
    pub fn subscriptions(&self) -> &[(E::Kind, &'static str)] {
        &self.registrations
    }

    /// Returns true if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn enter(&self) -> Result<DispatchGuard<'_>> {
        self.dispatching
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| DispatchError::Reentrant)?;
        Ok(DispatchGuard(&self.dispatching))
    }
}

impl<E: DomainEvent> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DomainEvent> std::fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscriptions", &self.registrations)
            .finish()
    }
}

/// Marks a dispatch as in progress until dropped, including on unwind.
struct DispatchGuard<'a>(&'a AtomicBool);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
