//! Application layer for the game.
//!
//! This crate provides:
//! - One service per use-case area, each built on `CommandHandler`
//! - DTOs handed to the presentation layer
//! - Event subscribers and their `handles` declarations
//! - The bounded matrix run log
//! - The dice port used by research skill checks

pub mod dice;
pub mod dto;
pub mod handlers;
pub mod services;

pub use dice::{Dice, LoadedDice, RandomDice};
pub use handlers::HANDLERS;
pub use services::{
    CharacterService, CharacterServiceError, ContractService, ContractServiceError,
    CraftingError, CraftingService, DeckService, DeckServiceError, MatrixLog, MatrixRunError,
    MatrixRunService, PlayerService, PlayerServiceError, ProjectError, ProjectService,
    SharedCollectionRepository,
    SharedPlayerRepository, SharedRepository, ShopService, ShopServiceError,
};
