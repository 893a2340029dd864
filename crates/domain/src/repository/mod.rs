//! Repository ports for loading and saving aggregates.
//!
//! Repositories store aggregate state by identity with upsert semantics. They
//! never run business logic and never touch an aggregate's pending events.

mod memory;

pub use memory::InMemoryRepository;

use std::sync::Arc;

use crate::aggregate::Aggregate;
use crate::error::RepositoryError;
use crate::player::Player;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Core trait for repository implementations.
///
/// All implementations must be thread-safe (Send + Sync).
pub trait Repository<A: Aggregate>: Send + Sync {
    /// Loads the aggregate with the given identity.
    ///
    /// An absent aggregate is `Ok(None)`; errors are infrastructure failures.
    fn get(&self, id: A::Id) -> Result<Option<A>>;

    /// Stores the aggregate, replacing any previous state for its identity.
    fn save(&self, aggregate: &A) -> Result<()>;
}

/// Repository over a collection that can be listed as a whole.
pub trait CollectionRepository<A: Aggregate>: Repository<A> {
    /// Returns every stored aggregate.
    fn get_all(&self) -> Result<Vec<A>>;
}

/// Player lookups beyond identity.
pub trait PlayerRepository: Repository<Player> {
    /// Returns the first player with exactly this name.
    fn get_by_name(&self, name: &str) -> Result<Option<Player>>;
}

impl<A: Aggregate, R: Repository<A> + ?Sized> Repository<A> for Arc<R> {
    fn get(&self, id: A::Id) -> Result<Option<A>> {
        (**self).get(id)
    }

    fn save(&self, aggregate: &A) -> Result<()> {
        (**self).save(aggregate)
    }
}

impl<A: Aggregate, R: CollectionRepository<A> + ?Sized> CollectionRepository<A> for Arc<R> {
    fn get_all(&self) -> Result<Vec<A>> {
        (**self).get_all()
    }
}

impl<R: PlayerRepository + ?Sized> PlayerRepository for Arc<R> {
    fn get_by_name(&self, name: &str) -> Result<Option<Player>> {
        (**self).get_by_name(name)
    }
}
