//! Character sheet use cases.

use std::sync::Arc;

use common::{CharacterId, DeckId, PlayerId};
use domain::{
    Character, CharacterSheet, CommandError, CommandHandler, GameEvent, Player,
    Repository, RepositoryError, ValidationError,
};
use event_bus::{DispatchError, EventDispatcher};
use thiserror::Error;

use super::SharedRepository;
use crate::dto::{CharacterDataDto, CharacterViewDto};

#[derive(Debug, Error)]
pub enum CharacterServiceError {
    #[error("Character with ID {0} not found.")]
    NotFound(CharacterId),

    /// The character rejected the change.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl From<CommandError<CharacterId>> for CharacterServiceError {
    fn from(err: CommandError<CharacterId>) -> Self {
        match err {
            CommandError::NotFound { id, .. } => Self::NotFound(id),
            CommandError::Rejected(e) => Self::Validation(e),
            CommandError::Repository(e) => Self::Repository(e),
            CommandError::Delivery(e) => Self::Delivery(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, CharacterServiceError>;

pub struct CharacterService {
    characters: CommandHandler<Character, SharedRepository<Character>>,
    players: SharedRepository<Player>,
}

impl CharacterService {
    pub fn new(
        characters: SharedRepository<Character>,
        players: SharedRepository<Player>,
        dispatcher: Arc<EventDispatcher<GameEvent>>,
    ) -> Self {
        Self {
            characters: CommandHandler::new(characters, dispatcher),
            players,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn create_character(&self, sheet: CharacterSheet) -> Result<CharacterId> {
        let id = CharacterId::new();
        self.characters.create(Character::create(id, sheet))?;
        Ok(id)
    }

    /// Spends skill points on one level of `skill_name`. Returns the new
    /// level.
    #[tracing::instrument(skip(self))]
    pub fn increase_skill(&self, character_id: CharacterId, skill_name: &str) -> Result<u32> {
        let result = self
            .characters
            .execute(character_id, |character| character.increase_skill(skill_name))?;
        Ok(result.output)
    }

    /// Refunds one level of `skill_name`. Returns the new level.
    #[tracing::instrument(skip(self))]
    pub fn decrease_skill(&self, character_id: CharacterId, skill_name: &str) -> Result<u32> {
        let result = self
            .characters
            .execute(character_id, |character| character.decrease_skill(skill_name))?;
        Ok(result.output)
    }

    pub fn get_character_name(&self, character_id: CharacterId) -> Result<Option<String>> {
        Ok(self
            .characters
            .query(character_id, |character| character.name().to_string())?)
    }

    pub fn get_character_data(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CharacterDataDto>> {
        Ok(self.characters.query(character_id, |character| CharacterDataDto {
            name: character.name().to_string(),
            credits: character.credits(),
            skills: character.skills().clone(),
            unused_skill_points: character.unused_skill_points(),
            deck_id: character.deck_id(),
        })?)
    }

    /// Character screen data. `None` unless both the character and the
    /// player exist.
    #[tracing::instrument(skip(self))]
    pub fn get_character_view_data(
        &self,
        character_id: CharacterId,
        player_id: PlayerId,
    ) -> Result<Option<CharacterViewDto>> {
        let Some(character) = self.characters.load(character_id)? else {
            return Ok(None);
        };
        let Some(player) = self.players.get(player_id)? else {
            tracing::debug!(%player_id, "player missing for character view");
            return Ok(None);
        };

        Ok(Some(CharacterViewDto {
            name: character.name().to_string(),
            credits: character.credits(),
            reputation: character.reputation(),
            skills: character.skills().clone(),
            unused_skill_points: character.unused_skill_points(),
            health: player.health(),
        }))
    }

    /// Identity of the player's deck, if the character exists.
    pub fn get_deck_id(&self, character_id: CharacterId) -> Result<Option<DeckId>> {
        Ok(self.characters.query(character_id, Character::deck_id)?)
    }
}
