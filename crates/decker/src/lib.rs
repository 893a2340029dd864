//! Composition root for the game core.
//!
//! Builds the single event dispatcher, registers every subscriber, and hands
//! the shared dispatcher and in-memory repositories to each application
//! service. Also provides the scripted session the binary runs.

pub mod config;
pub mod error;

use std::sync::Arc;

use application::dto::{CharacterViewDto, ContractSummaryDto, DeckViewDto};
use application::services::shop::DEFAULT_SHOP;
use application::{
    CharacterService, ContractService, CraftingService, DeckService, Dice, MatrixLog,
    MatrixRunService, PlayerService, ProjectService, RandomDice, ShopService, handlers,
};
use common::{AreaId, CharacterId, ContractId, DeckId, PlayerId, SchematicId};
use domain::{
    Character, CharacterSheet, Contract, Deck, GameEvent, InMemoryRepository, Player,
    ProjectType, Repository, RequiredResource, Schematic,
};
use event_bus::EventDispatcher;
use serde::Serialize;

pub use config::{Config, LogFormat};
pub use error::{GameError, Result};

/// Skills every new character starts with.
pub const STARTING_SKILLS: &[(&str, u32)] =
    &[("Hacking", 1), ("Programming", 1), ("Chip Design", 0)];

/// Extra credits granted in dev mode.
pub const DEV_BONUS_CREDITS: u32 = 5000;

/// Repositories backing one game.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub players: Arc<InMemoryRepository<Player>>,
    pub characters: Arc<InMemoryRepository<Character>>,
    pub decks: Arc<InMemoryRepository<Deck>>,
    pub contracts: Arc<InMemoryRepository<Contract>>,
}

/// Every service of one game, wired to one dispatcher.
pub struct GameContext {
    config: Config,
    dispatcher: Arc<EventDispatcher<GameEvent>>,
    stores: Stores,
    pub players: PlayerService,
    pub characters: CharacterService,
    pub crafting: CraftingService,
    pub decks: DeckService,
    pub projects: ProjectService,
    pub shop: ShopService,
    pub contracts: ContractService,
    pub matrix: MatrixRunService,
}

impl GameContext {
    /// Builds a game with random dice and the default contracts on offer.
    pub fn build(config: &Config) -> Result<Self> {
        Self::with_dice(config, Arc::new(RandomDice))
    }

    /// Builds a game with the given dice.
    pub fn with_dice(config: &Config, dice: Arc<dyn Dice>) -> Result<Self> {
        let mut dispatcher: EventDispatcher<GameEvent> = EventDispatcher::new();
        handlers::register(&mut dispatcher);
        let matrix_log = MatrixLog::new();
        matrix_log.subscribe(&mut dispatcher);
        let dispatcher = Arc::new(dispatcher);

        let stores = Stores::default();
        for contract in default_contracts() {
            stores.contracts.save(&contract)?;
        }

        tracing::debug!(
            subscriptions = dispatcher.subscriptions().len(),
            contracts = stores.contracts.len(),
            "game context built"
        );

        Ok(Self {
            config: config.clone(),
            players: PlayerService::new(stores.players.clone(), Arc::clone(&dispatcher)),
            characters: CharacterService::new(
                stores.characters.clone(),
                stores.players.clone(),
                Arc::clone(&dispatcher),
            ),
            crafting: CraftingService::new(stores.characters.clone(), Arc::clone(&dispatcher)),
            decks: DeckService::new(
                stores.decks.clone(),
                stores.characters.clone(),
                Arc::clone(&dispatcher),
            ),
            projects: ProjectService::new(stores.characters.clone(), Arc::clone(&dispatcher), dice),
            shop: ShopService::new(stores.characters.clone(), Arc::clone(&dispatcher)),
            contracts: ContractService::new(stores.contracts.clone()),
            matrix: MatrixRunService::new(
                stores.characters.clone(),
                stores.decks.clone(),
                stores.players.clone(),
                Arc::clone(&dispatcher),
                matrix_log,
            ),
            dispatcher,
            stores,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The dispatcher shared by every service.
    pub fn dispatcher(&self) -> &EventDispatcher<GameEvent> {
        &self.dispatcher
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Creates the configured player, a deck and their character.
    #[tracing::instrument(skip(self), fields(player = %self.config.player_name))]
    pub fn start_session(&self) -> Result<Session> {
        let name = self.config.player_name.as_str();
        let player_id = self.players.create_new_player(name)?;
        let deck_id = self.decks.create_deck()?;

        let mut sheet = CharacterSheet::new(name, deck_id)
            .with_credits(self.config.starting_credits)
            .with_skill_points(self.config.skill_points)
            .with_schematic(starter_schematic());
        for (skill, level) in STARTING_SKILLS {
            sheet = sheet.with_skill(*skill, *level);
        }
        if self.config.dev_mode {
            tracing::info!("dev mode enabled");
            sheet.credits = sheet.credits.saturating_add(DEV_BONUS_CREDITS);
            sheet = sheet.with_schematic(debug_schematic());
        }

        let character_id = self.characters.create_character(sheet)?;
        metrics::counter!("sessions_started_total").increment(1);

        Ok(Session {
            player_id,
            character_id,
            deck_id,
        })
    }
}

/// Identities created for one player's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    pub player_id: PlayerId,
    pub character_id: CharacterId,
    pub deck_id: DeckId,
}

/// Outcome of the scripted session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub character: CharacterViewDto,
    pub deck: DeckViewDto,
    pub learned_schematic: Option<String>,
    pub contracts: Vec<ContractSummaryDto>,
    pub matrix_log: Vec<String>,
}

/// Plays a short session: train, shop, load the deck, craft and research.
/// Milestones are posted to the matrix log.
pub fn run_scripted_session(game: &GameContext, session: &Session) -> Result<SessionReport> {
    let character = session.character_id;

    game.characters.increase_skill(character, "Programming")?;

    game.shop.purchase_item(character, "IcePick v1", DEFAULT_SHOP)?;
    game.decks.move_program_to_deck(character, "IcePick v1")?;
    game.matrix.log_entry("IcePick v1 loaded into the deck.")?;

    let starter = starter_schematic();
    if game.crafting.get_character_schematics(character)?.iter().any(|s| s.name == starter.name) {
        game.crafting.craft_item(character, &starter.name)?;
    }

    let time = game.projects.start_new_project(character, "software", "Hammer", 1)?;
    game.projects.work_on_project(character, time)?;
    let learned_schematic = game.projects.complete_project(character)?;
    match &learned_schematic {
        Some(name) => game.matrix.log_entry(&format!("Research complete: {name}."))?,
        None => game.matrix.log_entry("Research failed.")?,
    }

    let view = game
        .characters
        .get_character_view_data(character, session.player_id)?
        .ok_or_else(|| GameError::Missing(format!("Character with ID {character} not found.")))?;
    let deck = game
        .decks
        .get_deck_view_data(session.deck_id)?
        .ok_or_else(|| GameError::Missing(format!("Deck with ID {} not found.", session.deck_id)))?;

    Ok(SessionReport {
        character: view,
        deck,
        learned_schematic,
        contracts: game.contracts.get_available_contracts()?,
        matrix_log: game.matrix.messages(),
    })
}

/// Schematic every character starts out knowing.
pub fn starter_schematic() -> Schematic {
    Schematic {
        id: SchematicId::new(),
        project_type: ProjectType::Software,
        name: "IcePick v1 Schematic".to_string(),
        produces_item_name: "IcePick v1".to_string(),
        produces_item_size: 10,
        rating: 1,
        cost: vec![RequiredResource::credits(250)],
    }
}

fn debug_schematic() -> Schematic {
    Schematic {
        id: SchematicId::new(),
        project_type: ProjectType::Software,
        name: "Debug Blaster".to_string(),
        produces_item_name: "Debug Blaster 9000".to_string(),
        produces_item_size: 50,
        rating: 2,
        cost: vec![RequiredResource::credits(1)],
    }
}

fn default_contracts() -> Vec<Contract> {
    vec![
        Contract::new(
            ContractId::new(),
            "Data Heist",
            "Renraku",
            AreaId::new(),
            "Copy the research files from the corporate datastore.",
            1500,
        ),
        Contract::new(
            ContractId::new(),
            "Wipe Records",
            "Mr. Johnson",
            AreaId::new(),
            "Erase a client's criminal record from the police system.",
            800,
        ),
    ]
}
