use common::{AreaId, ContractId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, EventBuffer};
use crate::events::GameEvent;

/// A job a character can take on. Contracts are read-only and record no
/// events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    id: ContractId,
    title: String,
    client: String,
    target_area_id: AreaId,
    description: String,
    reward_credits: u32,

    #[serde(skip)]
    events: EventBuffer<GameEvent>,
}

impl Contract {
    pub fn new(
        id: ContractId,
        title: impl Into<String>,
        client: impl Into<String>,
        target_area_id: AreaId,
        description: impl Into<String>,
        reward_credits: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            client: client.into(),
            target_area_id,
            description: description.into(),
            reward_credits,
            events: EventBuffer::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn target_area_id(&self) -> AreaId {
        self.target_area_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reward_credits(&self) -> u32 {
        self.reward_credits
    }
}

impl Aggregate for Contract {
    type Id = ContractId;
    type Event = GameEvent;

    fn aggregate_type() -> &'static str {
        "Contract"
    }

    fn id(&self) -> ContractId {
        self.id
    }

    fn buffer(&self) -> &EventBuffer<GameEvent> {
        &self.events
    }

    fn buffer_mut(&mut self) -> &mut EventBuffer<GameEvent> {
        &mut self.events
    }
}
