//! Data transfer objects handed to the presentation layer.

use std::collections::BTreeMap;

use common::{ContractId, DeckId, PlayerId};
use domain::{Contract, Program};
use serde::Serialize;

/// Current state of a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatusDto {
    pub id: PlayerId,
    pub name: String,
    pub current_health: u32,
}

/// Character sheet summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterDataDto {
    pub name: String,
    pub credits: u32,
    pub skills: BTreeMap<String, u32>,
    pub unused_skill_points: u32,
    pub deck_id: DeckId,
}

/// Everything the character screen shows, including the player's health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterViewDto {
    pub name: String,
    pub credits: u32,
    pub reputation: i32,
    pub skills: BTreeMap<String, u32>,
    pub unused_skill_points: u32,
    pub health: u32,
}

/// One program as listed in deck views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckProgramDto {
    pub name: String,
    pub size: u32,
}

impl From<&Program> for DeckProgramDto {
    fn from(program: &Program) -> Self {
        Self {
            name: program.name.clone(),
            size: program.size,
        }
    }
}

/// Deck memory available before character stats are modelled.
pub const DEFAULT_DECK_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckViewDto {
    pub programs: Vec<DeckProgramDto>,
    pub total_deck_size: u32,
    pub used_deck_size: u32,
}

/// Deck and storage side by side, for moving programs between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferViewDto {
    pub deck_programs: Vec<DeckProgramDto>,
    pub stored_programs: Vec<DeckProgramDto>,
}

/// Progress of the active research project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDataDto {
    pub item_class: String,
    pub target_rating: u32,
    pub time_required: u32,
    pub time_spent: u32,
}

/// Options for starting a new research project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProjectDto {
    pub programming_skill: u32,
    pub chip_design_skill: u32,
    pub available_software: Vec<String>,
    pub available_chips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopItemDto {
    pub name: String,
    pub cost: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopViewDto {
    pub shop_name: String,
    pub items: Vec<ShopItemDto>,
}

/// A contract as shown in list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSummaryDto {
    pub id: ContractId,
    pub title: String,
    pub client: String,
    pub reward: u32,
}

impl From<&Contract> for ContractSummaryDto {
    fn from(contract: &Contract) -> Self {
        use domain::Aggregate;

        Self {
            id: contract.id(),
            title: contract.title().to_string(),
            client: contract.client().to_string(),
            reward: contract.reward_credits(),
        }
    }
}

/// What the matrix run screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRunViewDto {
    /// Percent of maximum health.
    pub physical_health: u32,
    pub mental_health: u32,

    /// Most recent log messages, oldest first.
    pub messages: Vec<String>,

    /// Names of the programs loaded in the deck.
    pub software: Vec<String>,
}
