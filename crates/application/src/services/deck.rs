//! Deck management: loading programs, storage transfers and ordering.

use std::sync::Arc;

use common::{CharacterId, DeckId};
use domain::{
    Character, CommandError, CommandHandler, CommitError, Deck, GameEvent, Repository,
    RepositoryError, ValidationError, commit_both,
};
use event_bus::{DispatchError, EventDispatcher};
use thiserror::Error;

use super::SharedRepository;
use crate::dto::{DEFAULT_DECK_SIZE, DeckProgramDto, DeckViewDto, TransferViewDto};

#[derive(Debug, Error)]
pub enum DeckServiceError {
    #[error("Character with ID {0} not found.")]
    CharacterNotFound(CharacterId),

    #[error("Deck with ID {0} not found.")]
    DeckNotFound(DeckId),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl From<CommandError<DeckId>> for DeckServiceError {
    fn from(err: CommandError<DeckId>) -> Self {
        match err {
            CommandError::NotFound { id, .. } => Self::DeckNotFound(id),
            CommandError::Rejected(e) => Self::Validation(e),
            CommandError::Repository(e) => Self::Repository(e),
            CommandError::Delivery(e) => Self::Delivery(e),
        }
    }
}

impl From<CommitError> for DeckServiceError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::Repository(e) => Self::Repository(e),
            CommitError::Delivery(e) => Self::Delivery(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckServiceError>;

pub struct DeckService {
    decks: CommandHandler<Deck, SharedRepository<Deck>>,
    characters: SharedRepository<Character>,
}

impl DeckService {
    pub fn new(
        decks: SharedRepository<Deck>,
        characters: SharedRepository<Character>,
        dispatcher: Arc<EventDispatcher<GameEvent>>,
    ) -> Self {
        Self {
            decks: CommandHandler::new(decks, dispatcher),
            characters,
        }
    }

    /// Creates an empty deck and returns its identity.
    #[tracing::instrument(skip(self))]
    pub fn create_deck(&self) -> Result<DeckId> {
        let id = DeckId::new();
        self.decks.create(Deck::create(id))?;
        Ok(id)
    }

    pub fn get_deck_view_data(&self, deck_id: DeckId) -> Result<Option<DeckViewDto>> {
        Ok(self.decks.query(deck_id, |deck| DeckViewDto {
            programs: deck.programs().iter().map(DeckProgramDto::from).collect(),
            total_deck_size: DEFAULT_DECK_SIZE,
            used_deck_size: deck.used_size(),
        })?)
    }

    /// Deck and storage contents of a character. `None` if either is missing.
    pub fn get_transfer_view_data(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<TransferViewDto>> {
        let Some(character) = self.characters.get(character_id)? else {
            return Ok(None);
        };
        let Some(deck) = self.decks.load(character.deck_id())? else {
            return Ok(None);
        };

        Ok(Some(TransferViewDto {
            deck_programs: deck.programs().iter().map(DeckProgramDto::from).collect(),
            stored_programs: character
                .stored_programs()
                .iter()
                .map(DeckProgramDto::from)
                .collect(),
        }))
    }

    /// Moves a stored program into the character's deck.
    #[tracing::instrument(skip(self))]
    pub fn move_program_to_deck(
        &self,
        character_id: CharacterId,
        program_name: &str,
    ) -> Result<()> {
        let (mut character, mut deck) = self.load_pair(character_id)?;

        let program = character.remove_stored_program(program_name)?;
        deck.add_program(program);

        self.commit_pair(&mut character, &mut deck)
    }

    /// Moves a program out of the character's deck into storage.
    #[tracing::instrument(skip(self))]
    pub fn move_program_to_storage(
        &self,
        character_id: CharacterId,
        program_name: &str,
    ) -> Result<()> {
        let (mut character, mut deck) = self.load_pair(character_id)?;

        let program = deck.remove_program(program_name)?;
        character.store_program(program);

        self.commit_pair(&mut character, &mut deck)
    }

    #[tracing::instrument(skip(self))]
    pub fn move_program_up(&self, deck_id: DeckId, program_name: &str) -> Result<()> {
        self.decks
            .execute(deck_id, |deck| deck.move_program_up(program_name))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn move_program_down(&self, deck_id: DeckId, program_name: &str) -> Result<()> {
        self.decks
            .execute(deck_id, |deck| deck.move_program_down(program_name))?;
        Ok(())
    }

    fn load_pair(&self, character_id: CharacterId) -> Result<(Character, Deck)> {
        let character = self
            .characters
            .get(character_id)?
            .ok_or(DeckServiceError::CharacterNotFound(character_id))?;
        let deck_id = character.deck_id();
        let deck = self
            .decks
            .load(deck_id)?
            .ok_or(DeckServiceError::DeckNotFound(deck_id))?;
        Ok((character, deck))
    }

    // Both are saved before any event of either is delivered.
    fn commit_pair(&self, character: &mut Character, deck: &mut Deck) -> Result<()> {
        commit_both(
            (&*self.characters, character),
            (&**self.decks.repository(), deck),
            &**self.decks.dispatcher(),
        )?;
        Ok(())
    }
}
