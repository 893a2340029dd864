//! Matrix run log and screen data.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use common::{CharacterId, PlayerId};
use domain::events::MatrixLogEntryCreated;
use domain::{Character, Deck, GameEvent, Player, Repository, RepositoryError};
use event_bus::{BoxError, DispatchError, EventDispatcher};
use thiserror::Error;

use super::SharedRepository;
use super::player::INITIAL_HEALTH;
use crate::dto::MatrixRunViewDto;

/// Messages kept by the matrix log.
pub const MAX_LOG_MESSAGES: usize = 5;

/// Subscriber name of the matrix log.
pub const MATRIX_LOG: &str = "matrix_log";

/// The last [`MAX_LOG_MESSAGES`] matrix messages, oldest first.
///
/// Clones share the same log, so one clone can be subscribed to the
/// dispatcher while another is read by the service.
#[derive(Debug, Clone, Default)]
pub struct MatrixLog {
    messages: Arc<Mutex<VecDeque<String>>>,
}

impl MatrixLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes this log to `MatrixLogEntryCreated`.
    pub fn subscribe(&self, dispatcher: &mut EventDispatcher<GameEvent>) {
        let log = self.clone();
        dispatcher.on::<MatrixLogEntryCreated, _>(MATRIX_LOG, move |event| {
            log.on_entry(event)
        });
    }

    /// Appends the entry's message, dropping the oldest beyond the limit.
    pub fn on_entry(&self, event: &MatrixLogEntryCreated) -> std::result::Result<(), BoxError> {
        self.push(event.message.clone());
        Ok(())
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    fn push(&self, message: String) {
        let mut messages = self.lock();
        messages.push_back(message);
        while messages.len() > MAX_LOG_MESSAGES {
            messages.pop_front();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Error)]
pub enum MatrixRunError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

pub type Result<T> = std::result::Result<T, MatrixRunError>;

pub struct MatrixRunService {
    characters: SharedRepository<Character>,
    decks: SharedRepository<Deck>,
    players: SharedRepository<Player>,
    dispatcher: Arc<EventDispatcher<GameEvent>>,
    log: MatrixLog,
}

impl MatrixRunService {
    /// `log` must be the log subscribed to `dispatcher`.
    pub fn new(
        characters: SharedRepository<Character>,
        decks: SharedRepository<Deck>,
        players: SharedRepository<Player>,
        dispatcher: Arc<EventDispatcher<GameEvent>>,
        log: MatrixLog,
    ) -> Self {
        Self {
            characters,
            decks,
            players,
            dispatcher,
            log,
        }
    }

    /// Posts a message to the matrix log through the dispatcher.
    #[tracing::instrument(skip(self))]
    pub fn log_entry(&self, message: &str) -> Result<()> {
        let event = GameEvent::from(MatrixLogEntryCreated::new(message));
        self.dispatcher.dispatch(std::slice::from_ref(&event))?;
        Ok(())
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.messages()
    }

    /// Matrix screen data. `None` unless the character, their deck and the
    /// player all exist.
    pub fn get_matrix_run_view_data(
        &self,
        character_id: CharacterId,
        player_id: PlayerId,
    ) -> Result<Option<MatrixRunViewDto>> {
        let Some(character) = self.characters.get(character_id)? else {
            return Ok(None);
        };
        let Some(deck) = self.decks.get(character.deck_id())? else {
            return Ok(None);
        };
        let Some(player) = self.players.get(player_id)? else {
            return Ok(None);
        };

        let health = player.health().saturating_mul(100) / INITIAL_HEALTH;
        Ok(Some(MatrixRunViewDto {
            physical_health: health,
            mental_health: health,
            messages: self.log.messages(),
            software: deck.programs().iter().map(|p| p.name.clone()).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{DeckId, ProgramId};
    use domain::{Aggregate, CharacterSheet, InMemoryRepository, Program};

    #[test]
    fn log_keeps_the_last_five_messages() {
        let log = MatrixLog::new();

        for n in 1..=7 {
            log.on_entry(&MatrixLogEntryCreated::new(format!("entry {n}")))
                .unwrap();
        }

        assert_eq!(
            log.messages(),
            ["entry 3", "entry 4", "entry 5", "entry 6", "entry 7"]
        );
    }

    #[test]
    fn clones_share_the_log() {
        let log = MatrixLog::new();
        let reader = log.clone();

        log.on_entry(&MatrixLogEntryCreated::new("ICE detected"))
            .unwrap();

        assert_eq!(reader.messages(), ["ICE detected"]);
    }

    struct Fixture {
        service: MatrixRunService,
        character_id: CharacterId,
        player_id: PlayerId,
    }

    fn fixture() -> Fixture {
        let characters = Arc::new(InMemoryRepository::<Character>::new());
        let decks = Arc::new(InMemoryRepository::<Deck>::new());
        let players = Arc::new(InMemoryRepository::<Player>::new());

        let deck = Deck::new(
            DeckId::new(),
            vec![Program::new(ProgramId::new(), "IcePick v1", 10)],
        );
        decks.save(&deck).unwrap();
        let character =
            Character::new(CharacterId::new(), CharacterSheet::new("Rynn", deck.id()));
        characters.save(&character).unwrap();
        let player = Player::new(PlayerId::new(), "Rynn", 80);
        players.save(&player).unwrap();

        let log = MatrixLog::new();
        let mut dispatcher: EventDispatcher<GameEvent> = EventDispatcher::new();
        log.subscribe(&mut dispatcher);

        Fixture {
            service: MatrixRunService::new(
                characters,
                decks,
                players,
                Arc::new(dispatcher),
                log,
            ),
            character_id: character.id(),
            player_id: player.id(),
        }
    }

    #[test]
    fn entries_arrive_through_dispatch() {
        let f = fixture();

        for n in 1..=6 {
            f.service.log_entry(&format!("node {n} breached")).unwrap();
        }

        let messages = f.service.messages();
        assert_eq!(messages.len(), MAX_LOG_MESSAGES);
        assert_eq!(messages[0], "node 2 breached");
        assert_eq!(messages[4], "node 6 breached");
    }

    #[test]
    fn view_data_joins_player_deck_and_log() {
        let f = fixture();
        f.service.log_entry("Entering the matrix.").unwrap();

        let view = f
            .service
            .get_matrix_run_view_data(f.character_id, f.player_id)
            .unwrap()
            .unwrap();

        assert_eq!(view.physical_health, 80);
        assert_eq!(view.mental_health, 80);
        assert_eq!(view.software, ["IcePick v1"]);
        assert_eq!(view.messages, ["Entering the matrix."]);
    }

    #[test]
    fn view_data_needs_every_part() {
        let f = fixture();

        let missing_player = f
            .service
            .get_matrix_run_view_data(f.character_id, PlayerId::new())
            .unwrap();
        let missing_character = f
            .service
            .get_matrix_run_view_data(CharacterId::new(), f.player_id)
            .unwrap();

        assert_eq!(missing_player, None);
        assert_eq!(missing_character, None);
    }
}
