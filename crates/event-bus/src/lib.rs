//! In-process publish/subscribe for domain events.
//!
//! This crate provides:
//! - [`DomainEvent`] trait every event sum type implements
//! - [`EventVariant`] for subscribing with handlers typed on one payload
//! - [`EventDispatcher`] that routes events by their exact kind
//! - [`Catalog`] of static `emits`/`handles` declarations for tooling

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod event;

pub use catalog::{Catalog, Declaration, Role};
pub use dispatcher::EventDispatcher;
pub use error::{BoxError, DispatchError, Result};
pub use event::{DomainEvent, EventMeta, EventVariant};
