//! Core domain event traits.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use common::EventId;
use serde::{Deserialize, Serialize};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain. They are
/// immutable and named in past tense. Implementors are sum types: every
/// variant maps to exactly one [`DomainEvent::Kind`], and that kind is the
/// only thing the dispatcher routes on.
pub trait DomainEvent: fmt::Debug + Send + Sync + 'static {
    /// Discriminator naming the concrete kind of an event.
    type Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Returns the concrete kind of this event.
    fn kind(&self) -> Self::Kind;

    /// Returns the unique identifier of this event.
    fn event_id(&self) -> EventId;

    /// Returns when this event was created.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// A payload type that is carried by exactly one variant of an event sum type.
///
/// Lets subscribers be written against the payload (`&PlayerCreated`) rather
/// than the whole event enum.
pub trait EventVariant<E: DomainEvent>: Sized + 'static {
    /// The kind of the variant carrying this payload.
    const KIND: E::Kind;

    /// Returns the payload if `event` is the variant carrying it.
    fn project(event: &E) -> Option<&Self>;
}

/// Identity and creation time shared by every event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Unique identifier of the event.
    pub event_id: EventId,

    /// When the event was created.
    pub occurred_at: DateTime<Utc>,
}

impl EventMeta {
    /// Creates metadata for an event happening now.
    pub fn now() -> Self {
        Self {
            event_id: EventId::new(),
            occurred_at: Utc::now(),
        }
    }
}

impl Default for EventMeta {
    fn default() -> Self {
        Self::now()
    }
}
