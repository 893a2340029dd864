//! Player aggregate.

use common::PlayerId;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, EventBuffer};
use crate::events::{GameEvent, PlayerCreated};

/// The person playing the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    health: u32,

    #[serde(skip)]
    events: EventBuffer<GameEvent>,
}

impl Player {
    /// Reconstructs a player without recording anything.
    pub fn new(id: PlayerId, name: impl Into<String>, health: u32) -> Self {
        Self {
            id,
            name: name.into(),
            health,
            events: EventBuffer::new(),
        }
    }

    /// Creates a new player and records `PlayerCreated`.
    pub fn create(id: PlayerId, name: impl Into<String>, initial_health: u32) -> Self {
        let mut player = Self::new(id, name, initial_health);
        player
            .events
            .record(PlayerCreated::new(id, player.name.clone(), initial_health));
        player
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> u32 {
        self.health
    }
}

impl Aggregate for Player {
    type Id = PlayerId;
    type Event = GameEvent;

    fn aggregate_type() -> &'static str {
        "Player"
    }

    fn id(&self) -> PlayerId {
        self.id
    }

    fn buffer(&self) -> &EventBuffer<GameEvent> {
        &self.events
    }

    fn buffer_mut(&mut self) -> &mut EventBuffer<GameEvent> {
        &mut self.events
    }
}
