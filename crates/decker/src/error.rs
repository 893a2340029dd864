//! Session-level error type.

use application::{
    CharacterServiceError, ContractServiceError, CraftingError, DeckServiceError, MatrixRunError,
    PlayerServiceError, ProjectError, ShopServiceError,
};
use domain::RepositoryError;
use thiserror::Error;

/// Any failure surfaced while running a game session.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Player(#[from] PlayerServiceError),

    #[error(transparent)]
    Character(#[from] CharacterServiceError),

    #[error(transparent)]
    Crafting(#[from] CraftingError),

    #[error(transparent)]
    Deck(#[from] DeckServiceError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Shop(#[from] ShopServiceError),

    #[error(transparent)]
    Contract(#[from] ContractServiceError),

    #[error(transparent)]
    Matrix(#[from] MatrixRunError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Session data that should exist was missing.
    #[error("{0}")]
    Missing(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
