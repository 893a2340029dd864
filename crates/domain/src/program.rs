use common::ProgramId;
use serde::{Deserialize, Serialize};

/// A piece of software a character owns, either in storage or loaded in a
/// deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,

    /// Memory the program occupies.
    pub size: u32,
}

impl Program {
    pub fn new(id: ProgramId, name: impl Into<String>, size: u32) -> Self {
        Self {
            id,
            name: name.into(),
            size,
        }
    }
}
