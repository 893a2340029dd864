//! Application services, one per use-case area.
//!
//! Every service is built from injected repositories and the shared
//! dispatcher. Mutating use cases go through a `CommandHandler`, so a
//! rejected command never saves and a saved aggregate always has its events
//! delivered before they are cleared.

pub mod character;
pub mod contract;
pub mod crafting;
pub mod deck;
pub mod matrix_run;
pub mod player;
pub mod project;
pub mod shop;

use std::sync::Arc;

use domain::{CollectionRepository, PlayerRepository, Repository};

pub use character::{CharacterService, CharacterServiceError};
pub use contract::{ContractService, ContractServiceError};
pub use crafting::{CraftingError, CraftingService};
pub use deck::{DeckService, DeckServiceError};
pub use matrix_run::{MatrixLog, MatrixRunError, MatrixRunService};
pub use player::{PlayerService, PlayerServiceError};
pub use project::{ProjectError, ProjectService};
pub use shop::{ShopService, ShopServiceError};

/// Repository handle shared between services.
pub type SharedRepository<A> = Arc<dyn Repository<A>>;

/// Player repository handle shared between services.
pub type SharedPlayerRepository = Arc<dyn PlayerRepository>;

/// Listable repository handle shared between services.
pub type SharedCollectionRepository<A> = Arc<dyn CollectionRepository<A>>;
