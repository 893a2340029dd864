//! Buying programs from shops.

use std::sync::Arc;

use common::{CharacterId, ProgramId};
use domain::{
    Character, CommandError, CommandHandler, GameEvent, RepositoryError, ValidationError,
};
use event_bus::{DispatchError, EventDispatcher};
use thiserror::Error;

use super::SharedRepository;
use crate::dto::{ShopItemDto, ShopViewDto};

/// Identifier of the shop every character can reach.
pub const DEFAULT_SHOP: &str = "DefaultShop";

/// Memory footprint of a purchased program.
pub const PURCHASED_PROGRAM_SIZE: u32 = 10;

struct ShopItem {
    name: &'static str,
    cost: u32,
    description: &'static str,
}

struct Shop {
    id: &'static str,
    name: &'static str,
    items: &'static [ShopItem],
}

static SHOPS: &[Shop] = &[Shop {
    id: DEFAULT_SHOP,
    name: "The Digital Dive",
    items: &[
        ShopItem {
            name: "IcePick v1",
            cost: 500,
            description: "A basic intrusion program.",
        },
        ShopItem {
            name: "Hammer v1",
            cost: 1200,
            description: "A heavy-duty breaker program.",
        },
    ],
}];

fn find_shop(shop_id: &str) -> Option<&'static Shop> {
    SHOPS.iter().find(|shop| shop.id == shop_id)
}

#[derive(Debug, Error)]
pub enum ShopServiceError {
    #[error("Character not found.")]
    CharacterNotFound(CharacterId),

    #[error("Shop not found.")]
    ShopNotFound,

    #[error("Item '{0}' not found in shop.")]
    ItemNotFound(String),

    /// The character cannot afford the item.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl From<CommandError<CharacterId, ShopServiceError>> for ShopServiceError {
    fn from(err: CommandError<CharacterId, ShopServiceError>) -> Self {
        match err {
            CommandError::NotFound { id, .. } => Self::CharacterNotFound(id),
            CommandError::Rejected(e) => e,
            CommandError::Repository(e) => Self::Repository(e),
            CommandError::Delivery(e) => Self::Delivery(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopServiceError>;

pub struct ShopService {
    characters: CommandHandler<Character, SharedRepository<Character>>,
}

impl ShopService {
    pub fn new(
        characters: SharedRepository<Character>,
        dispatcher: Arc<EventDispatcher<GameEvent>>,
    ) -> Self {
        Self {
            characters: CommandHandler::new(characters, dispatcher),
        }
    }

    /// Inventory of a shop, or `None` for an unknown shop.
    pub fn get_shop_view_data(&self, shop_id: &str) -> Option<ShopViewDto> {
        find_shop(shop_id).map(|shop| ShopViewDto {
            shop_name: shop.name.to_string(),
            items: shop
                .items
                .iter()
                .map(|item| ShopItemDto {
                    name: item.name.to_string(),
                    cost: item.cost,
                    description: item.description.to_string(),
                })
                .collect(),
        })
    }

    /// Buys `item_name` from `shop_id`, storing the new program. Returns its
    /// identity.
    #[tracing::instrument(skip(self))]
    pub fn purchase_item(
        &self,
        character_id: CharacterId,
        item_name: &str,
        shop_id: &str,
    ) -> Result<ProgramId> {
        let result = self.characters.execute(character_id, |character| {
            let shop = find_shop(shop_id).ok_or(ShopServiceError::ShopNotFound)?;
            let item = shop
                .items
                .iter()
                .find(|item| item.name == item_name)
                .ok_or_else(|| ShopServiceError::ItemNotFound(item_name.to_string()))?;

            let program_id = character.purchase(item.name, item.cost, PURCHASED_PROGRAM_SIZE)?;
            Ok::<_, ShopServiceError>(program_id)
        })?;

        tracing::info!(program_id = %result.output, "item purchased");
        Ok(result.output)
    }
}
