//! Domain layer for the game.
//!
//! This crate provides:
//! - Aggregate trait with its pending-event buffer
//! - GameEvent sum type and the static `emits` declarations
//! - Repository ports and an in-memory adapter
//! - CommandHandler orchestrating load, mutate, save, deliver, clear
//! - Player, Character, Deck and Contract aggregates

pub mod aggregate;
pub mod catalog;
pub mod character;
pub mod command;
pub mod contract;
pub mod deck;
pub mod error;
pub mod events;
pub mod player;
pub mod program;
pub mod repository;

pub use aggregate::{Aggregate, EventBuffer, Record};
pub use catalog::{EMITTERS, emitters};
pub use character::{
    ActiveProject, Character, CharacterSheet, ProjectType, RequiredResource, Schematic,
};
pub use command::{CommandError, CommandHandler, CommandResult, CommitError, commit, commit_both};
pub use contract::Contract;
pub use deck::Deck;
pub use error::{RepositoryError, ValidationError};
pub use events::{GameEvent, GameEventKind};
pub use player::Player;
pub use program::Program;
pub use repository::{CollectionRepository, InMemoryRepository, PlayerRepository, Repository};
