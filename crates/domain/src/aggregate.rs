//! Core aggregate trait and the pending-event buffer.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use event_bus::DomainEvent;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::RepositoryError;

/// Ordered sequence of events an aggregate has recorded but that have not
/// been delivered yet.
///
/// The buffer only grows through the owning aggregate's business methods and
/// only shrinks through [`Aggregate::clear_events`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventBuffer<E> {
    pending: Vec<E>,
}

impl<E> EventBuffer<E> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, event: impl Into<E>) {
        self.pending.push(event.into());
    }

    /// Returns an owned copy of the pending events.
    pub fn snapshot(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.pending.clone()
    }

    /// Drops every pending event.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Returns the number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for EventBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for identity-bearing domain objects that buffer the events their
/// mutations produce.
///
/// Events here are a delivery mechanism only. State is stored directly and is
/// never rebuilt from events.
pub trait Aggregate: Send + Sync + Sized {
    /// Typed identity of the aggregate.
    type Id: Copy + Eq + Hash + Ord + Debug + Display + Send + Sync + 'static;

    /// The event sum type this aggregate records.
    type Event: DomainEvent + Clone;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's identity.
    fn id(&self) -> Self::Id;

    /// Returns the pending-event buffer.
    fn buffer(&self) -> &EventBuffer<Self::Event>;

    /// Returns the pending-event buffer for mutation.
    fn buffer_mut(&mut self) -> &mut EventBuffer<Self::Event>;

    /// Returns a snapshot of the pending events, oldest first.
    ///
    /// Changing the returned vector does not affect the aggregate.
    fn events(&self) -> Vec<Self::Event> {
        self.buffer().snapshot()
    }

    /// Empties the pending-event buffer.
    fn clear_events(&mut self) {
        self.buffer_mut().clear();
    }
}

/// Conversion between an aggregate and its persisted record.
///
/// Records never carry pending events: aggregates skip their buffer when
/// serialized, so a restored aggregate starts with an empty buffer.
pub trait Record: Sized {
    /// Serializes the aggregate state.
    fn to_record(&self) -> Result<serde_json::Value, RepositoryError>;

    /// Reconstructs an aggregate from a record without recording events.
    fn from_record(record: serde_json::Value) -> Result<Self, RepositoryError>;
}

impl<A> Record for A
where
    A: Aggregate + Serialize + DeserializeOwned,
{
    fn to_record(&self) -> Result<serde_json::Value, RepositoryError> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_record(record: serde_json::Value) -> Result<Self, RepositoryError> {
        Ok(serde_json::from_value(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DeckCreated, GameEvent};
    use common::DeckId;
    use event_bus::EventMeta;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct TestAggregate {
        id: DeckId,
        value: i32,
        #[serde(skip)]
        events: EventBuffer<GameEvent>,
    }

    impl TestAggregate {
        fn touch(&mut self) {
            self.value += 1;
            self.events.record(DeckCreated {
                meta: EventMeta::now(),
                deck_id: self.id,
            });
        }
    }

    impl Aggregate for TestAggregate {
        type Id = DeckId;
        type Event = GameEvent;

        fn aggregate_type() -> &'static str {
            "TestAggregate"
        }

        fn id(&self) -> DeckId {
            self.id
        }

        fn buffer(&self) -> &EventBuffer<GameEvent> {
            &self.events
        }

        fn buffer_mut(&mut self) -> &mut EventBuffer<GameEvent> {
            &mut self.events
        }
    }

    fn aggregate() -> TestAggregate {
        TestAggregate {
            id: DeckId::new(),
            value: 0,
            events: EventBuffer::new(),
        }
    }

    #[test]
    fn events_are_a_snapshot() {
        let mut aggregate = aggregate();
        aggregate.touch();

        let mut snapshot = aggregate.events();
        snapshot.clear();

        assert_eq!(aggregate.events().len(), 1);
    }

    #[test]
    fn events_keep_recording_order() {
        let mut aggregate = aggregate();
        aggregate.touch();
        aggregate.touch();

        let events = aggregate.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].occurred_at() <= events[1].occurred_at());
        assert_ne!(events[0].event_id(), events[1].event_id());
    }

    #[test]
    fn clear_events_is_idempotent() {
        let mut aggregate = aggregate();
        aggregate.touch();

        aggregate.clear_events();
        assert!(aggregate.events().is_empty());

        aggregate.clear_events();
        assert!(aggregate.buffer().is_empty());
    }

    #[test]
    fn records_skip_pending_events() {
        let mut aggregate = aggregate();
        aggregate.touch();

        let record = aggregate.to_record().unwrap();
        assert!(record.get("events").is_none());

        let restored = TestAggregate::from_record(record).unwrap();
        assert_eq!(restored.id, aggregate.id);
        assert_eq!(restored.value, 1);
        assert!(restored.events().is_empty());
    }

    #[test]
    fn from_record_rejects_malformed_state() {
        let result = TestAggregate::from_record(serde_json::json!({ "value": "x" }));
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }
}
