//! Research project value objects.

use std::fmt;
use std::str::FromStr;

use common::SchematicId;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::{RequiredResource, Schematic};

/// Minimum research time of any project.
pub const MIN_PROJECT_TIME: u32 = 10;

/// Size of a researched program per point of rating.
const SIZE_PER_RATING: u32 = 20;

/// Crafting cost in credits per point of rating.
const CREDITS_PER_RATING: u32 = 100;

/// What kind of item a project researches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Software,
    Chip,
}

impl ProjectType {
    /// Skill that governs research of this type.
    pub fn relevant_skill(&self) -> &'static str {
        match self {
            ProjectType::Software => "Programming",
            ProjectType::Chip => "Chip Design",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Software => "software",
            ProjectType::Chip => "chip",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "software" => Ok(ProjectType::Software),
            "chip" => Ok(ProjectType::Chip),
            other => Err(ValidationError::new(format!(
                "Invalid item type for project: {other}"
            ))),
        }
    }
}

/// A research project in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProject {
    pub project_type: ProjectType,

    /// Item class being researched, e.g. "Sentry ICE".
    pub item_class: String,
    pub target_rating: u32,
    pub time_required: u32,
    pub time_spent: u32,
}

impl ActiveProject {
    /// Plans a project, deriving the time it will take.
    ///
    /// Time is `rating² * 100 - best² * 25 - skill² * 10`, never below
    /// [`MIN_PROJECT_TIME`], where `best` is the highest rating already known
    /// for the class.
    ///
    /// Rejects a rating whose awarded schematic could not be priced.
    pub fn plan(
        project_type: ProjectType,
        item_class: impl Into<String>,
        target_rating: u32,
        best_known_rating: u32,
        skill_level: u32,
    ) -> Result<Self, ValidationError> {
        if target_rating.checked_mul(CREDITS_PER_RATING).is_none() {
            return Err(ValidationError::new(format!(
                "Target rating {target_rating} is too high."
            )));
        }

        let squared =
            |value: u32, factor: i64| i64::from(value).saturating_pow(2).saturating_mul(factor);
        let time_required = squared(target_rating, 100)
            .saturating_sub(squared(best_known_rating, 25))
            .saturating_sub(squared(skill_level, 10))
            .clamp(i64::from(MIN_PROJECT_TIME), i64::from(u32::MAX));

        Ok(Self {
            project_type,
            item_class: item_class.into(),
            target_rating,
            time_required: u32::try_from(time_required).unwrap_or(u32::MAX),
            time_spent: 0,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.time_spent >= self.time_required
    }

    /// Schematic awarded when this project succeeds.
    pub fn schematic(&self) -> Schematic {
        let item_name = format!("{} v{}", self.item_class, self.target_rating);
        Schematic {
            id: SchematicId::new(),
            project_type: self.project_type,
            name: format!("{item_name} Schematic"),
            produces_item_name: item_name,
            produces_item_size: self.target_rating.saturating_mul(SIZE_PER_RATING),
            rating: self.target_rating,
            cost: vec![RequiredResource::credits(
                self.target_rating.saturating_mul(CREDITS_PER_RATING),
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_types() {
        assert_eq!("software".parse::<ProjectType>().unwrap(), ProjectType::Software);
        assert_eq!("chip".parse::<ProjectType>().unwrap(), ProjectType::Chip);

        let err = "hardware".parse::<ProjectType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid item type for project: hardware");
    }

    #[test]
    fn relevant_skills() {
        assert_eq!(ProjectType::Software.relevant_skill(), "Programming");
        assert_eq!(ProjectType::Chip.relevant_skill(), "Chip Design");
    }

    #[test]
    fn plan_applies_the_time_formula() {
        // 3² * 100 - 1² * 25 - 2² * 10 = 900 - 25 - 40
        let project = ActiveProject::plan(ProjectType::Software, "Hammer", 3, 1, 2).unwrap();
        assert_eq!(project.time_required, 835);
        assert_eq!(project.time_spent, 0);
        assert!(!project.is_complete());
    }

    #[test]
    fn plan_never_goes_below_minimum() {
        let project = ActiveProject::plan(ProjectType::Chip, "Encephalon", 1, 4, 9).unwrap();
        assert_eq!(project.time_required, MIN_PROJECT_TIME);
    }

    #[test]
    fn plan_rejects_ratings_that_cannot_be_priced() {
        let err = ActiveProject::plan(ProjectType::Software, "Hammer", 400_000_000, 0, 0)
            .unwrap_err();
        assert_eq!(err.to_string(), "Target rating 400000000 is too high.");

        let err = ActiveProject::plan(ProjectType::Chip, "Encephalon", u32::MAX, 0, 0)
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Target rating {} is too high.", u32::MAX));
    }

    #[test]
    fn largest_rating_saturates_the_time() {
        let rating = u32::MAX / CREDITS_PER_RATING;
        let project =
            ActiveProject::plan(ProjectType::Software, "Hammer", rating, u32::MAX, u32::MAX)
                .unwrap();

        assert!(project.time_required >= MIN_PROJECT_TIME);
        assert_eq!(project.schematic().credit_cost(), rating * CREDITS_PER_RATING);
    }

    #[test]
    fn awarded_schematic_follows_rating() {
        let project = ActiveProject::plan(ProjectType::Software, "Sentry ICE", 2, 0, 0).unwrap();
        let schematic = project.schematic();

        assert_eq!(schematic.name, "Sentry ICE v2 Schematic");
        assert_eq!(schematic.produces_item_name, "Sentry ICE v2");
        assert_eq!(schematic.produces_item_size, 40);
        assert_eq!(schematic.rating, 2);
        assert_eq!(schematic.credit_cost(), 200);
    }
}
