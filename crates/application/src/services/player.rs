//! Player use cases.

use std::sync::Arc;

use common::PlayerId;
use domain::{
    CommandError, CommandHandler, GameEvent, Player, PlayerRepository, RepositoryError,
    ValidationError,
};
use event_bus::{DispatchError, EventDispatcher};
use thiserror::Error;

use super::SharedPlayerRepository;
use crate::dto::PlayerStatusDto;

/// Health every new player starts with.
pub const INITIAL_HEALTH: u32 = 100;

#[derive(Debug, Error)]
pub enum PlayerServiceError {
    #[error("Player with ID {0} not found.")]
    NotFound(PlayerId),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl From<CommandError<PlayerId>> for PlayerServiceError {
    fn from(err: CommandError<PlayerId>) -> Self {
        match err {
            CommandError::NotFound { id, .. } => Self::NotFound(id),
            CommandError::Rejected(e) => Self::Validation(e),
            CommandError::Repository(e) => Self::Repository(e),
            CommandError::Delivery(e) => Self::Delivery(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlayerServiceError>;

pub struct PlayerService {
    players: CommandHandler<Player, SharedPlayerRepository>,
}

impl PlayerService {
    pub fn new(
        repository: SharedPlayerRepository,
        dispatcher: Arc<EventDispatcher<GameEvent>>,
    ) -> Self {
        Self {
            players: CommandHandler::new(repository, dispatcher),
        }
    }

    /// Creates a player at full health and returns its identity.
    #[tracing::instrument(skip(self))]
    pub fn create_new_player(&self, name: &str) -> Result<PlayerId> {
        let id = PlayerId::new();
        self.players.create(Player::create(id, name, INITIAL_HEALTH))?;
        tracing::info!(%id, "new player created");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    pub fn get_player_status(&self, id: PlayerId) -> Result<Option<PlayerStatusDto>> {
        Ok(self.players.query(id, status)?)
    }

    /// Looks a player up by exact name.
    #[tracing::instrument(skip(self))]
    pub fn find_by_name(&self, name: &str) -> Result<Option<PlayerStatusDto>> {
        let player = self.players.repository().get_by_name(name)?;
        Ok(player.as_ref().map(status))
    }
}

fn status(player: &Player) -> PlayerStatusDto {
    use domain::Aggregate;

    PlayerStatusDto {
        id: player.id(),
        name: player.name().to_string(),
        current_health: player.health(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::InMemoryRepository;

    fn service() -> PlayerService {
        PlayerService::new(
            Arc::new(InMemoryRepository::<Player>::new()),
            Arc::new(EventDispatcher::new()),
        )
    }

    #[test]
    fn new_player_starts_at_full_health() {
        let service = service();

        let id = service.create_new_player("Rynn").unwrap();
        let status = service.get_player_status(id).unwrap().unwrap();

        assert_eq!(status.id, id);
        assert_eq!(status.name, "Rynn");
        assert_eq!(status.current_health, INITIAL_HEALTH);
    }

    #[test]
    fn status_of_unknown_player_is_none() {
        assert_eq!(service().get_player_status(PlayerId::new()).unwrap(), None);
    }

    #[test]
    fn find_by_name_is_exact() {
        let service = service();
        let id = service.create_new_player("Deckard").unwrap();

        assert_eq!(service.find_by_name("Deckard").unwrap().map(|s| s.id), Some(id));
        assert_eq!(service.find_by_name("deckard").unwrap(), None);
    }
}
