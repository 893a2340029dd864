//! Character aggregate and related value objects.

mod aggregate;
mod crafting;
mod project;

pub use aggregate::{Character, CharacterSheet};
pub use crafting::{CREDITS, RequiredResource, Schematic};
pub use project::{ActiveProject, MIN_PROJECT_TIME, ProjectType};
