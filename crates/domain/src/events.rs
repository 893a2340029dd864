//! Game domain events.

use chrono::{DateTime, Utc};
use common::{CharacterId, DeckId, EventId, PlayerId, ProgramId};
use event_bus::{DomainEvent, EventMeta, EventVariant};
use serde::{Deserialize, Serialize};

/// Generates the event sum type, its kind discriminator, and the glue
/// connecting each payload struct to its variant.
macro_rules! game_events {
    ($( $(#[$doc:meta])* $variant:ident ),* $(,)?) => {
        /// Events that can occur in the game domain.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", content = "data")]
        pub enum GameEvent {
            $( $(#[$doc])* $variant($variant), )*
        }

        /// Discriminator of [`GameEvent`]; subscriptions are keyed on it.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum GameEventKind {
            $( $(#[$doc])* $variant, )*
        }

        impl GameEventKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [GameEventKind] = &[ $( GameEventKind::$variant, )* ];

            /// Returns the kind name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( GameEventKind::$variant => stringify!($variant), )*
                }
            }
        }

        impl GameEvent {
            /// Returns the identity and creation time of this event.
            pub fn meta(&self) -> &EventMeta {
                match self {
                    $( GameEvent::$variant(data) => &data.meta, )*
                }
            }
        }

        impl DomainEvent for GameEvent {
            type Kind = GameEventKind;

            fn kind(&self) -> GameEventKind {
                match self {
                    $( GameEvent::$variant(_) => GameEventKind::$variant, )*
                }
            }

            fn event_id(&self) -> EventId {
                self.meta().event_id
            }

            fn occurred_at(&self) -> DateTime<Utc> {
                self.meta().occurred_at
            }
        }

        $(
            impl EventVariant<GameEvent> for $variant {
                const KIND: GameEventKind = GameEventKind::$variant;

                fn project(event: &GameEvent) -> Option<&Self> {
                    match event {
                        GameEvent::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for GameEvent {
                fn from(data: $variant) -> Self {
                    GameEvent::$variant(data)
                }
            }
        )*
    };
}

game_events! {
    /// A player was created.
    PlayerCreated,
    /// A character was created.
    CharacterCreated,
    /// A character raised a skill by one level.
    SkillIncreased,
    /// A character lowered a skill by one level.
    SkillDecreased,
    /// A character crafted an item from a schematic.
    ItemCrafted,
    /// A character bought an item in a shop.
    ItemPurchased,
    /// A character started a research project.
    ProjectStarted,
    /// Time was spent on a research project.
    ProjectProgressed,
    /// A research project was finished.
    ProjectCompleted,
    /// A program was put into a character's storage.
    ProgramStored,
    /// A program was taken out of a character's storage.
    ProgramUnstored,
    /// A deck was created.
    DeckCreated,
    /// A program was loaded into a deck.
    ProgramAddedToDeck,
    /// A program was unloaded from a deck.
    ProgramRemovedFromDeck,
    /// A program changed position in a deck.
    DeckReordered,
    /// A message was posted to the matrix run log.
    MatrixLogEntryCreated,
}

impl std::fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data for PlayerCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCreated {
    #[serde(flatten)]
    pub meta: EventMeta,

    /// The new player.
    pub player_id: PlayerId,

    /// The player's name.
    pub name: String,

    /// Health the player starts with.
    pub initial_health: u32,
}

impl PlayerCreated {
    pub fn new(player_id: PlayerId, name: impl Into<String>, initial_health: u32) -> Self {
        Self {
            meta: EventMeta::now(),
            player_id,
            name: name.into(),
            initial_health,
        }
    }
}

/// Data for CharacterCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterCreated {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,
    pub name: String,
}

impl CharacterCreated {
    pub fn new(character_id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            meta: EventMeta::now(),
            character_id,
            name: name.into(),
        }
    }
}

/// Data for SkillIncreased event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillIncreased {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,
    pub skill_name: String,

    /// Level after the increase.
    pub new_level: u32,
}

impl SkillIncreased {
    pub fn new(character_id: CharacterId, skill_name: impl Into<String>, new_level: u32) -> Self {
        Self {
            meta: EventMeta::now(),
            character_id,
            skill_name: skill_name.into(),
            new_level,
        }
    }
}

/// Data for SkillDecreased event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDecreased {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,
    pub skill_name: String,

    /// Level after the decrease.
    pub new_level: u32,
}

impl SkillDecreased {
    pub fn new(character_id: CharacterId, skill_name: impl Into<String>, new_level: u32) -> Self {
        Self {
            meta: EventMeta::now(),
            character_id,
            skill_name: skill_name.into(),
            new_level,
        }
    }
}

/// Data for ItemCrafted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCrafted {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,

    /// Schematic the item was built from.
    pub schematic_name: String,

    /// The program that was produced.
    pub item_id: ProgramId,
    pub item_name: String,
}

impl ItemCrafted {
    pub fn new(
        character_id: CharacterId,
        schematic_name: impl Into<String>,
        item_id: ProgramId,
        item_name: impl Into<String>,
    ) -> Self {
        Self {
            meta: EventMeta::now(),
            character_id,
            schematic_name: schematic_name.into(),
            item_id,
            item_name: item_name.into(),
        }
    }
}

/// Data for ItemPurchased event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPurchased {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,
    pub item_name: String,

    /// Credits paid.
    pub cost: u32,
    pub item_id: ProgramId,
}

impl ItemPurchased {
    pub fn new(
        character_id: CharacterId,
        item_name: impl Into<String>,
        cost: u32,
        item_id: ProgramId,
    ) -> Self {
        Self {
            meta: EventMeta::now(),
            character_id,
            item_name: item_name.into(),
            cost,
            item_id,
        }
    }
}

/// Data for ProjectStarted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStarted {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,

    /// "software" or "chip".
    pub item_type: String,
    pub item_class: String,
    pub target_rating: u32,
    pub time_required: u32,
}

/// Data for ProjectProgressed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgressed {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,

    /// Total time spent so far.
    pub time_spent: u32,
    pub time_required: u32,
}

/// Data for ProjectCompleted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCompleted {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,
    pub item_class: String,
    pub target_rating: u32,

    /// Name of the schematic learned; `None` if the skill check failed.
    pub schematic_name: Option<String>,
}

/// Data for ProgramStored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramStored {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,
    pub program_name: String,
}

/// Data for ProgramUnstored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramUnstored {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub character_id: CharacterId,
    pub program_name: String,
}

/// Data for DeckCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCreated {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub deck_id: DeckId,
}

/// Data for ProgramAddedToDeck event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramAddedToDeck {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub deck_id: DeckId,
    pub program_name: String,
}

/// Data for ProgramRemovedFromDeck event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRemovedFromDeck {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub deck_id: DeckId,
    pub program_name: String,
}

/// Data for DeckReordered event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckReordered {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub deck_id: DeckId,
    pub program_name: String,
    pub from_index: usize,
    pub to_index: usize,
}

/// Data for MatrixLogEntryCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixLogEntryCreated {
    #[serde(flatten)]
    pub meta: EventMeta,

    /// Text shown in the matrix view.
    pub message: String,
}

impl MatrixLogEntryCreated {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            meta: EventMeta::now(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let event: GameEvent = PlayerCreated::new(PlayerId::new(), "Ann", 100).into();
        assert_eq!(event.kind(), GameEventKind::PlayerCreated);
        assert_eq!(event.kind().to_string(), "PlayerCreated");
    }

    #[test]
    fn every_kind_is_listed_once() {
        let mut kinds = GameEventKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), GameEventKind::ALL.len());
        assert_eq!(kinds.len(), 16);
    }

    #[test]
    fn payload_projects_only_from_its_variant() {
        let character_id = CharacterId::new();
        let event: GameEvent = SkillIncreased::new(character_id, "Hacking", 3).into();

        let payload = SkillIncreased::project(&event).unwrap();
        assert_eq!(payload.character_id, character_id);
        assert_eq!(payload.new_level, 3);
        assert!(SkillDecreased::project(&event).is_none());
    }

    #[test]
    fn identity_comes_from_payload_meta() {
        let payload = DeckCreated {
            meta: EventMeta::now(),
            deck_id: DeckId::new(),
        };
        let meta = payload.meta;
        let event = GameEvent::from(payload);

        assert_eq!(event.event_id(), meta.event_id);
        assert_eq!(event.occurred_at(), meta.occurred_at);
    }

    #[test]
    fn serializes_with_type_tag_and_flattened_meta() {
        let event: GameEvent = CharacterCreated::new(CharacterId::new(), "Rynn").into();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "CharacterCreated");
        assert_eq!(json["data"]["name"], "Rynn");
        assert!(json["data"]["event_id"].is_string());
        assert!(json["data"]["occurred_at"].is_string());

        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
