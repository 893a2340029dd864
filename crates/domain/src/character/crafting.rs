//! Crafting value objects.

use common::SchematicId;
use serde::{Deserialize, Serialize};

use super::ProjectType;

/// Resource name that is paid out of a character's credits.
pub const CREDITS: &str = "credits";

/// A resource consumed when crafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredResource {
    pub name: String,
    pub quantity: u32,
}

impl RequiredResource {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    /// A cost paid in credits.
    pub fn credits(quantity: u32) -> Self {
        Self::new(CREDITS, quantity)
    }
}

/// Blueprint for building one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schematic {
    pub id: SchematicId,
    pub project_type: ProjectType,
    pub name: String,
    pub produces_item_name: String,
    pub produces_item_size: u32,
    pub rating: u32,
    pub cost: Vec<RequiredResource>,
}

impl Schematic {
    /// Total credits needed to craft from this schematic.
    pub fn credit_cost(&self) -> u32 {
        self.cost
            .iter()
            .filter(|resource| resource.name == CREDITS)
            .fold(0u32, |total, resource| total.saturating_add(resource.quantity))
    }
}
