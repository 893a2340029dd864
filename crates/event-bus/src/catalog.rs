//! Static `emits`/`handles` declarations.
//!
//! Declarations document which event kinds an operation records and which
//! kinds a subscriber consumes. They are plain data: the dispatcher never
//! reads them, and routing works identically whether or not an entry exists.
//! Tooling and tests use a [`Catalog`] to check the declarations against each
//! other and against a configured dispatcher.

use std::hash::Hash;

use crate::dispatcher::EventDispatcher;
use crate::event::DomainEvent;

/// What a declaration says about its kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The named operation may record events of these kinds.
    Emits,

    /// The named subscriber consumes events of these kinds.
    Handles,
}

/// One row of a declaration table.
#[derive(Debug, Clone, Copy)]
pub struct Declaration<K: 'static> {
    /// Name of the operation or subscriber.
    pub name: &'static str,

    /// Whether `kinds` are emitted or handled.
    pub role: Role,

    /// The declared event kinds.
    pub kinds: &'static [K],
}

impl<K: 'static> Declaration<K> {
    /// Declares that `name` may emit `kinds`.
    pub const fn emits(name: &'static str, kinds: &'static [K]) -> Self {
        Self {
            name,
            role: Role::Emits,
            kinds,
        }
    }

    /// Declares that `name` handles `kinds`.
    pub const fn handles(name: &'static str, kinds: &'static [K]) -> Self {
        Self {
            name,
            role: Role::Handles,
            kinds,
        }
    }
}

/// Queryable union of declaration tables.
#[derive(Debug, Clone)]
pub struct Catalog<K: 'static> {
    declarations: Vec<Declaration<K>>,
}

impl<K: Copy + Eq + Hash + 'static> Catalog<K> {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Adds every row of `table`.
    pub fn with(mut self, table: &[Declaration<K>]) -> Self {
        self.declarations.extend_from_slice(table);
        self
    }

    /// Returns all declarations in insertion order.
    pub fn declarations(&self) -> &[Declaration<K>] {
        &self.declarations
    }

    /// Returns the kinds declared for `name` under `role`.
    pub fn kinds_of(&self, name: &str, role: Role) -> Option<&'static [K]> {
        self.declarations
            .iter()
            .find(|d| d.role == role && d.name == name)
            .map(|d| d.kinds)
    }

    /// Returns the operations declared to emit `kind`.
    pub fn emitters_of(&self, kind: K) -> Vec<&'static str> {
        self.names_for(kind, Role::Emits)
    }

    /// Returns the subscribers declared to handle `kind`.
    pub fn handlers_of(&self, kind: K) -> Vec<&'static str> {
        self.names_for(kind, Role::Handles)
    }

    /// Returns the kinds in `all` that some operation emits but no
    /// subscriber handles.
    pub fn unhandled_kinds(&self, all: &[K]) -> Vec<K> {
        all.iter()
            .copied()
            .filter(|&kind| !self.emitters_of(kind).is_empty() && self.handlers_of(kind).is_empty())
            .collect()
    }

    /// Returns the subscriptions of `dispatcher` with no matching `handles`
    /// declaration.
    pub fn undeclared_subscriptions<E>(
        &self,
        dispatcher: &EventDispatcher<E>,
    ) -> Vec<(K, &'static str)>
    where
        E: DomainEvent<Kind = K>,
    {
        dispatcher
            .subscriptions()
            .iter()
            .copied()
            .filter(|&(kind, name)| {
                self.kinds_of(name, Role::Handles)
                    .is_none_or(|kinds| !kinds.contains(&kind))
            })
            .collect()
    }

    fn names_for(&self, kind: K, role: Role) -> Vec<&'static str> {
        self.declarations
            .iter()
            .filter(|d| d.role == role && d.kinds.contains(&kind))
            .map(|d| d.name)
            .collect()
    }
}

impl<K: Copy + Eq + Hash + 'static> Default for Catalog<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Opened,
        Closed,
        Audited,
    }

    const EMITTERS: &[Declaration<Kind>] = &[
        Declaration::emits("Door::open", &[Kind::Opened]),
        Declaration::emits("Door::close", &[Kind::Closed, Kind::Audited]),
    ];

    const HANDLERS: &[Declaration<Kind>] = &[
        Declaration::handles("log", &[Kind::Opened, Kind::Closed]),
        Declaration::handles("alarm", &[Kind::Opened]),
    ];

    fn catalog() -> Catalog<Kind> {
        Catalog::new().with(EMITTERS).with(HANDLERS)
    }

    #[test]
    fn finds_emitters_and_handlers_by_kind() {
        let catalog = catalog();
        assert_eq!(catalog.emitters_of(Kind::Closed), vec!["Door::close"]);
        assert_eq!(catalog.handlers_of(Kind::Opened), vec!["log", "alarm"]);
        assert!(catalog.handlers_of(Kind::Audited).is_empty());
    }

    #[test]
    fn looks_up_declared_kinds_by_name() {
        let catalog = catalog();
        assert_eq!(
            catalog.kinds_of("Door::close", Role::Emits),
            Some(&[Kind::Closed, Kind::Audited][..])
        );
        assert_eq!(catalog.kinds_of("Door::close", Role::Handles), None);
    }

    #[test]
    fn reports_emitted_kinds_without_handlers() {
        let catalog = catalog();
        assert_eq!(
            catalog.unhandled_kinds(&[Kind::Opened, Kind::Closed, Kind::Audited]),
            vec![Kind::Audited]
        );
    }

    #[test]
    fn declarations_keep_insertion_order() {
        let catalog = catalog();
        let names: Vec<_> = catalog.declarations().iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Door::open", "Door::close", "log", "alarm"]);
    }
}
