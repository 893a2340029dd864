//! Crafting items from known schematics.

use std::sync::Arc;

use common::{CharacterId, ProgramId};
use domain::{Character, CommandError, CommandHandler, GameEvent, RepositoryError, Schematic};
use event_bus::{DispatchError, EventDispatcher};
use thiserror::Error;

use super::SharedRepository;

#[derive(Debug, Error)]
pub enum CraftingError {
    #[error("Character with ID {0} not found.")]
    CharacterNotFound(CharacterId),

    #[error("Character does not know schematic '{0}'.")]
    SchematicNotFound(String),

    #[error("{0}")]
    InsufficientResources(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl From<CommandError<CharacterId, CraftingError>> for CraftingError {
    fn from(err: CommandError<CharacterId, CraftingError>) -> Self {
        match err {
            CommandError::NotFound { id, .. } => Self::CharacterNotFound(id),
            CommandError::Rejected(e) => e,
            CommandError::Repository(e) => Self::Repository(e),
            CommandError::Delivery(e) => Self::Delivery(e),
        }
    }
}

pub struct CraftingService {
    characters: CommandHandler<Character, SharedRepository<Character>>,
}

impl CraftingService {
    pub fn new(
        characters: SharedRepository<Character>,
        dispatcher: Arc<EventDispatcher<GameEvent>>,
    ) -> Self {
        Self {
            characters: CommandHandler::new(characters, dispatcher),
        }
    }

    /// Schematics the character knows; empty for an unknown character.
    pub fn get_character_schematics(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Schematic>, CraftingError> {
        let schematics = self
            .characters
            .query(character_id, |character| character.schematics().to_vec())?;
        Ok(schematics.unwrap_or_default())
    }

    /// Crafts the item a known schematic produces and stores it.
    #[tracing::instrument(skip(self))]
    pub fn craft_item(
        &self,
        character_id: CharacterId,
        schematic_name: &str,
    ) -> Result<ProgramId, CraftingError> {
        let result = self.characters.execute(character_id, |character| {
            let schematic = character
                .find_schematic(schematic_name)
                .cloned()
                .ok_or_else(|| CraftingError::SchematicNotFound(schematic_name.to_string()))?;

            character
                .craft(&schematic)
                .map_err(|e| CraftingError::InsufficientResources(e.to_string()))
        })?;

        tracing::info!(item_id = %result.output, "item crafted");
        Ok(result.output)
    }
}
