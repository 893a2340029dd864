//! Shared identifier types for the Decker core.

mod types;

pub use types::{
    AreaId, CharacterId, ContractId, DeckId, EventId, PlayerId, ProgramId, SchematicId,
};
