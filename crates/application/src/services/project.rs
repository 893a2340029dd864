//! Research and development projects.

use std::sync::Arc;

use common::CharacterId;
use domain::{
    ActiveProject, Character, CommandError, CommandHandler, GameEvent, ProjectType,
    RepositoryError, ValidationError,
};
use event_bus::{DispatchError, EventDispatcher};
use thiserror::Error;

use super::SharedRepository;
use crate::dice::Dice;
use crate::dto::{NewProjectDto, ProjectDataDto};

/// Software classes that can be researched.
pub const AVAILABLE_SOFTWARE: &[&str] = &["Sentry ICE", "Hammer", "IcePick"];

/// Chip classes that can be researched.
pub const AVAILABLE_CHIPS: &[&str] = &["Cortex Bomb", "Encephalon"];

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Character with ID {0} not found.")]
    CharacterNotFound(CharacterId),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl From<CommandError<CharacterId>> for ProjectError {
    fn from(err: CommandError<CharacterId>) -> Self {
        match err {
            CommandError::NotFound { id, .. } => Self::CharacterNotFound(id),
            CommandError::Rejected(e) => Self::Validation(e),
            CommandError::Repository(e) => Self::Repository(e),
            CommandError::Delivery(e) => Self::Delivery(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectError>;

pub struct ProjectService {
    characters: CommandHandler<Character, SharedRepository<Character>>,
    dice: Arc<dyn Dice>,
}

impl ProjectService {
    pub fn new(
        characters: SharedRepository<Character>,
        dispatcher: Arc<EventDispatcher<GameEvent>>,
        dice: Arc<dyn Dice>,
    ) -> Self {
        Self {
            characters: CommandHandler::new(characters, dispatcher),
            dice,
        }
    }

    /// Progress of the character's active project, if any.
    pub fn get_project_data(&self, character_id: CharacterId) -> Result<Option<ProjectDataDto>> {
        let data = self.characters.query(character_id, |character| {
            character.active_project().map(|project| ProjectDataDto {
                item_class: project.item_class.clone(),
                target_rating: project.target_rating,
                time_required: project.time_required,
                time_spent: project.time_spent,
            })
        })?;
        Ok(data.flatten())
    }

    pub fn get_new_project_data(&self, character_id: CharacterId) -> Result<Option<NewProjectDto>> {
        Ok(self.characters.query(character_id, |character| NewProjectDto {
            programming_skill: character.skill_level(ProjectType::Software.relevant_skill()),
            chip_design_skill: character.skill_level(ProjectType::Chip.relevant_skill()),
            available_software: AVAILABLE_SOFTWARE.iter().map(|s| s.to_string()).collect(),
            available_chips: AVAILABLE_CHIPS.iter().map(|s| s.to_string()).collect(),
        })?)
    }

    /// Starts researching `item_class` at `target_rating`. Returns the time
    /// the project requires.
    ///
    /// `item_type` is `"software"` or `"chip"`.
    #[tracing::instrument(skip(self))]
    pub fn start_new_project(
        &self,
        character_id: CharacterId,
        item_type: &str,
        item_class: &str,
        target_rating: u32,
    ) -> Result<u32> {
        let result = self.characters.execute(character_id, |character| {
            if character.active_project().is_some() {
                return Err(ValidationError::new("Character already has an active project."));
            }

            let project_type: ProjectType = item_type.parse()?;
            let project = ActiveProject::plan(
                project_type,
                item_class,
                target_rating,
                character.best_known_rating(item_class),
                character.skill_level(project_type.relevant_skill()),
            )?;
            let time_required = project.time_required;
            character.start_project(project)?;
            Ok::<_, ValidationError>(time_required)
        })?;

        tracing::info!(time_required = result.output, "project started");
        Ok(result.output)
    }

    /// Adds time to the active project. Returns the total time spent.
    #[tracing::instrument(skip(self))]
    pub fn work_on_project(&self, character_id: CharacterId, time: u32) -> Result<u32> {
        let result = self
            .characters
            .execute(character_id, |character| character.work_on_project(time))?;
        Ok(result.output)
    }

    /// Finishes a completed project with a d10 roll against the relevant
    /// skill. Returns the name of the learned schematic on success.
    ///
    /// The project is consumed whether the roll succeeds or not.
    #[tracing::instrument(skip(self))]
    pub fn complete_project(&self, character_id: CharacterId) -> Result<Option<String>> {
        let result = self.characters.execute(character_id, |character| {
            let reward = match character.active_project() {
                Some(project) if project.is_complete() => {
                    let skill = character.skill_level(project.project_type.relevant_skill());
                    let roll = self.dice.roll(1, 10, 0);
                    tracing::debug!(roll, skill, "research skill check");
                    (i64::from(roll) <= i64::from(skill)).then(|| project.schematic())
                }
                _ => None,
            };
            character.complete_project(reward)
        })?;

        match &result.output {
            Some(name) => tracing::info!(schematic = %name, "research succeeded"),
            None => tracing::info!("research failed"),
        }
        Ok(result.output)
    }
}
