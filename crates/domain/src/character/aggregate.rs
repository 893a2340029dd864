//! Character aggregate implementation.

use std::collections::BTreeMap;

use common::{CharacterId, DeckId, ProgramId};
use event_bus::EventMeta;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, EventBuffer};
use crate::error::ValidationError;
use crate::events::{
    CharacterCreated, GameEvent, ItemCrafted, ItemPurchased, ProgramStored, ProgramUnstored,
    ProjectCompleted, ProjectProgressed, ProjectStarted, SkillDecreased, SkillIncreased,
};
use crate::program::Program;

use super::{ActiveProject, Schematic};

type Result<T> = std::result::Result<T, ValidationError>;

/// Starting attributes of a character.
#[derive(Debug, Clone, Default)]
pub struct CharacterSheet {
    pub name: String,
    pub deck_id: DeckId,
    pub skills: BTreeMap<String, u32>,
    pub credits: u32,
    pub unused_skill_points: u32,
    pub schematics: Vec<Schematic>,
}

impl CharacterSheet {
    pub fn new(name: impl Into<String>, deck_id: DeckId) -> Self {
        Self {
            name: name.into(),
            deck_id,
            ..Self::default()
        }
    }

    /// Adds a skill at the given level.
    pub fn with_skill(mut self, name: impl Into<String>, level: u32) -> Self {
        self.skills.insert(name.into(), level);
        self
    }

    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn with_skill_points(mut self, points: u32) -> Self {
        self.unused_skill_points = points;
        self
    }

    /// Adds a schematic the character starts out knowing.
    pub fn with_schematic(mut self, schematic: Schematic) -> Self {
        self.schematics.push(schematic);
        self
    }
}

/// Character aggregate root.
///
/// Owns the character's skills, money, stored programs, known schematics and
/// the research project in progress. The programs loaded into the
/// character's deck belong to the separate `Deck` aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    id: CharacterId,
    name: String,

    /// Skill levels keyed by skill name.
    skills: BTreeMap<String, u32>,

    /// The deck this character uses.
    deck_id: DeckId,

    /// Programs owned but not loaded in the deck.
    stored_programs: Vec<Program>,

    /// Known schematics.
    schematics: Vec<Schematic>,

    credits: u32,

    #[serde(default)]
    reputation: i32,

    /// Points available to spend on skills.
    unused_skill_points: u32,

    #[serde(default)]
    active_project: Option<ActiveProject>,

    #[serde(skip)]
    events: EventBuffer<GameEvent>,
}

impl Aggregate for Character {
    type Id = CharacterId;
    type Event = GameEvent;

    fn aggregate_type() -> &'static str {
        "Character"
    }

    fn id(&self) -> CharacterId {
        self.id
    }

    fn buffer(&self) -> &EventBuffer<GameEvent> {
        &self.events
    }

    fn buffer_mut(&mut self) -> &mut EventBuffer<GameEvent> {
        &mut self.events
    }
}

// Construction
impl Character {
    /// Reconstructs a character without recording anything.
    pub fn new(id: CharacterId, sheet: CharacterSheet) -> Self {
        Self {
            id,
            name: sheet.name,
            skills: sheet.skills,
            deck_id: sheet.deck_id,
            stored_programs: Vec::new(),
            schematics: sheet.schematics,
            credits: sheet.credits,
            reputation: 0,
            unused_skill_points: sheet.unused_skill_points,
            active_project: None,
            events: EventBuffer::new(),
        }
    }

    /// Creates a new character and records `CharacterCreated`.
    pub fn create(id: CharacterId, sheet: CharacterSheet) -> Self {
        let mut character = Self::new(id, sheet);
        character
            .events
            .record(CharacterCreated::new(id, character.name.clone()));
        character
    }

    pub fn with_stored_programs(mut self, programs: Vec<Program>) -> Self {
        self.stored_programs = programs;
        self
    }

    pub fn with_schematics(mut self, schematics: Vec<Schematic>) -> Self {
        self.schematics = schematics;
        self
    }

    pub fn with_reputation(mut self, reputation: i32) -> Self {
        self.reputation = reputation;
        self
    }

    pub fn with_active_project(mut self, project: ActiveProject) -> Self {
        self.active_project = Some(project);
        self
    }
}

// Query methods
impl Character {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skills(&self) -> &BTreeMap<String, u32> {
        &self.skills
    }

    /// Returns the level of a skill, 0 if the character lacks it.
    pub fn skill_level(&self, skill_name: &str) -> u32 {
        self.skills.get(skill_name).copied().unwrap_or(0)
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    pub fn stored_programs(&self) -> &[Program] {
        &self.stored_programs
    }

    pub fn schematics(&self) -> &[Schematic] {
        &self.schematics
    }

    /// Returns the known schematic with exactly this name.
    pub fn find_schematic(&self, name: &str) -> Option<&Schematic> {
        self.schematics.iter().find(|s| s.name == name)
    }

    /// Highest rating among known schematics whose item name contains
    /// `item_class`, or 0.
    pub fn best_known_rating(&self, item_class: &str) -> u32 {
        self.schematics
            .iter()
            .filter(|s| s.produces_item_name.contains(item_class))
            .map(|s| s.rating)
            .max()
            .unwrap_or(0)
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn reputation(&self) -> i32 {
        self.reputation
    }

    pub fn unused_skill_points(&self) -> u32 {
        self.unused_skill_points
    }

    pub fn active_project(&self) -> Option<&ActiveProject> {
        self.active_project.as_ref()
    }
}

// Skills
impl Character {
    /// Raises a skill by one level, spending `current level + 1` points.
    pub fn increase_skill(&mut self, skill_name: &str) -> Result<u32> {
        let current = self.existing_skill(skill_name)?;
        let new_level = current
            .checked_add(1)
            .ok_or_else(|| ValidationError::new("Not enough skill points."))?;

        if self.unused_skill_points < new_level {
            return Err(ValidationError::new("Not enough skill points."));
        }

        self.unused_skill_points -= new_level;
        self.skills.insert(skill_name.to_string(), new_level);
        self.events
            .record(SkillIncreased::new(self.id, skill_name, new_level));
        Ok(new_level)
    }

    /// Lowers a skill by one level, refunding the current level in points.
    pub fn decrease_skill(&mut self, skill_name: &str) -> Result<u32> {
        let current = self.existing_skill(skill_name)?;

        if current == 0 {
            return Err(ValidationError::new("Cannot decrease skill below 0."));
        }

        let new_level = current - 1;
        self.unused_skill_points = self.unused_skill_points.saturating_add(current);
        self.skills.insert(skill_name.to_string(), new_level);
        self.events
            .record(SkillDecreased::new(self.id, skill_name, new_level));
        Ok(new_level)
    }

    fn existing_skill(&self, skill_name: &str) -> Result<u32> {
        self.skills
            .get(skill_name)
            .copied()
            .ok_or_else(|| ValidationError::new(format!("Skill '{skill_name}' does not exist.")))
    }
}

// Programs and money
impl Character {
    /// Builds the item a schematic produces, paying its credit cost.
    pub fn craft(&mut self, schematic: &Schematic) -> Result<ProgramId> {
        let cost = schematic.credit_cost();
        if self.credits < cost {
            return Err(ValidationError::new(format!(
                "Insufficient credits to craft {}.",
                schematic.name
            )));
        }

        self.credits -= cost;
        let program = Program::new(
            ProgramId::new(),
            schematic.produces_item_name.clone(),
            schematic.produces_item_size,
        );
        let program_id = program.id;
        self.events.record(ItemCrafted::new(
            self.id,
            schematic.name.clone(),
            program_id,
            program.name.clone(),
        ));
        self.stored_programs.push(program);
        Ok(program_id)
    }

    /// Buys a program, storing it.
    pub fn purchase(&mut self, item_name: &str, cost: u32, size: u32) -> Result<ProgramId> {
        if self.credits < cost {
            return Err(ValidationError::new("Insufficient credits."));
        }

        self.credits -= cost;
        let program = Program::new(ProgramId::new(), item_name, size);
        let program_id = program.id;
        self.events
            .record(ItemPurchased::new(self.id, item_name, cost, program_id));
        self.stored_programs.push(program);
        Ok(program_id)
    }

    /// Puts a program into storage.
    pub fn store_program(&mut self, program: Program) {
        self.events.record(ProgramStored {
            meta: EventMeta::now(),
            character_id: self.id,
            program_name: program.name.clone(),
        });
        self.stored_programs.push(program);
    }

    /// Takes the first stored program with this name out of storage.
    pub fn remove_stored_program(&mut self, program_name: &str) -> Result<Program> {
        let index = self
            .stored_programs
            .iter()
            .position(|p| p.name == program_name)
            .ok_or_else(|| {
                ValidationError::new(format!("Program '{program_name}' not found in storage."))
            })?;

        let program = self.stored_programs.remove(index);
        self.events.record(ProgramUnstored {
            meta: EventMeta::now(),
            character_id: self.id,
            program_name: program.name.clone(),
        });
        Ok(program)
    }
}

// Research
impl Character {
    /// Begins a research project.
    pub fn start_project(&mut self, project: ActiveProject) -> Result<()> {
        if self.active_project.is_some() {
            return Err(ValidationError::new(
                "Character already has an active project.",
            ));
        }

        self.events.record(ProjectStarted {
            meta: EventMeta::now(),
            character_id: self.id,
            item_type: project.project_type.to_string(),
            item_class: project.item_class.clone(),
            target_rating: project.target_rating,
            time_required: project.time_required,
        });
        self.active_project = Some(project);
        Ok(())
    }

    /// Adds time to the active project. Returns the total time spent.
    pub fn work_on_project(&mut self, time: u32) -> Result<u32> {
        let Some(project) = self.active_project.as_mut() else {
            return Err(ValidationError::new(
                "Character has no active project to work on.",
            ));
        };

        project.time_spent = project.time_spent.saturating_add(time);
        let (time_spent, time_required) = (project.time_spent, project.time_required);
        self.events.record(ProjectProgressed {
            meta: EventMeta::now(),
            character_id: self.id,
            time_spent,
            time_required,
        });
        Ok(time_spent)
    }

    /// Finishes the active project.
    ///
    /// `reward` is the schematic learned on success, `None` on failure. The
    /// project is consumed either way. Returns the learned schematic's name.
    pub fn complete_project(&mut self, reward: Option<Schematic>) -> Result<Option<String>> {
        let project = self.active_project.as_ref().ok_or_else(|| {
            ValidationError::new("Character has no active project to complete.")
        })?;

        if !project.is_complete() {
            return Err(ValidationError::new(
                "Project is not yet complete. More time required.",
            ));
        }

        let (item_class, target_rating) = (project.item_class.clone(), project.target_rating);
        self.active_project = None;

        let schematic_name = reward.map(|schematic| {
            let name = schematic.name.clone();
            self.schematics.push(schematic);
            name
        });

        self.events.record(ProjectCompleted {
            meta: EventMeta::now(),
            character_id: self.id,
            item_class,
            target_rating,
            schematic_name: schematic_name.clone(),
        });
        Ok(schematic_name)
    }
}
