//! Deck aggregate.

use common::DeckId;
use event_bus::EventMeta;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, EventBuffer};
use crate::error::ValidationError;
use crate::events::{
    DeckCreated, DeckReordered, GameEvent, ProgramAddedToDeck, ProgramRemovedFromDeck,
};
use crate::program::Program;

/// The ordered set of programs a character runs with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    id: DeckId,
    programs: Vec<Program>,

    #[serde(skip)]
    events: EventBuffer<GameEvent>,
}

impl Deck {
    /// Reconstructs a deck without recording anything.
    pub fn new(id: DeckId, programs: Vec<Program>) -> Self {
        Self {
            id,
            programs,
            events: EventBuffer::new(),
        }
    }

    /// Creates an empty deck and records `DeckCreated`.
    pub fn create(id: DeckId) -> Self {
        let mut deck = Self::new(id, Vec::new());
        deck.events.record(DeckCreated {
            meta: EventMeta::now(),
            deck_id: id,
        });
        deck
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Total memory used by the loaded programs.
    pub fn used_size(&self) -> u32 {
        self.programs.iter().map(|p| p.size).sum()
    }

    /// Loads a program at the end of the deck.
    pub fn add_program(&mut self, program: Program) {
        self.events.record(ProgramAddedToDeck {
            meta: EventMeta::now(),
            deck_id: self.id,
            program_name: program.name.clone(),
        });
        self.programs.push(program);
    }

    /// Unloads the first program with this name.
    pub fn remove_program(&mut self, program_name: &str) -> Result<Program, ValidationError> {
        let index = self.position(program_name)?;
        let program = self.programs.remove(index);
        self.events.record(ProgramRemovedFromDeck {
            meta: EventMeta::now(),
            deck_id: self.id,
            program_name: program.name.clone(),
        });
        Ok(program)
    }

    /// Swaps a program with its predecessor. No-op for the first program.
    pub fn move_program_up(&mut self, program_name: &str) -> Result<(), ValidationError> {
        let index = self.position(program_name)?;
        if index > 0 {
            self.swap(program_name, index, index - 1);
        }
        Ok(())
    }

    /// Swaps a program with its successor. No-op for the last program.
    pub fn move_program_down(&mut self, program_name: &str) -> Result<(), ValidationError> {
        let index = self.position(program_name)?;
        if index + 1 < self.programs.len() {
            self.swap(program_name, index, index + 1);
        }
        Ok(())
    }

    fn position(&self, program_name: &str) -> Result<usize, ValidationError> {
        self.programs
            .iter()
            .position(|p| p.name == program_name)
            .ok_or_else(|| {
                ValidationError::new(format!("Program '{program_name}' not found in deck."))
            })
    }

    fn swap(&mut self, program_name: &str, from_index: usize, to_index: usize) {
        self.programs.swap(from_index, to_index);
        self.events.record(DeckReordered {
            meta: EventMeta::now(),
            deck_id: self.id,
            program_name: program_name.to_string(),
            from_index,
            to_index,
        });
    }
}

impl Aggregate for Deck {
    type Id = DeckId;
    type Event = GameEvent;

    fn aggregate_type() -> &'static str {
        "Deck"
    }

    fn id(&self) -> DeckId {
        self.id
    }

    fn buffer(&self) -> &EventBuffer<GameEvent> {
        &self.events
    }

    fn buffer_mut(&mut self) -> &mut EventBuffer<GameEvent> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEventKind;
    use common::ProgramId;
    use event_bus::DomainEvent;

    fn deck(names: &[&str]) -> Deck {
        let programs = names
            .iter()
            .map(|name| Program::new(ProgramId::new(), *name, 10))
            .collect();
        Deck::new(DeckId::new(), programs)
    }

    fn names(deck: &Deck) -> Vec<&str> {
        deck.programs().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn create_records_deck_created() {
        let deck = Deck::create(DeckId::new());
        let kinds: Vec<_> = deck.events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![GameEventKind::DeckCreated]);
        assert!(deck.programs().is_empty());
    }

    #[test]
    fn add_and_remove_programs() {
        let mut deck = deck(&["Hammer v1"]);
        deck.add_program(Program::new(ProgramId::new(), "IcePick v1", 25));

        assert_eq!(deck.used_size(), 35);

        let removed = deck.remove_program("Hammer v1").unwrap();
        assert_eq!(removed.name, "Hammer v1");
        assert_eq!(names(&deck), vec!["IcePick v1"]);
        assert_eq!(deck.events().len(), 2);
    }

    #[test]
    fn removing_a_missing_program_is_rejected() {
        let mut deck = deck(&["Hammer v1"]);

        let err = deck.remove_program("Ghost").unwrap_err();

        assert_eq!(err.to_string(), "Program 'Ghost' not found in deck.");
        assert!(deck.events().is_empty());
    }

    #[test]
    fn moving_swaps_with_the_neighbour() {
        let mut deck = deck(&["A", "B", "C"]);

        deck.move_program_up("C").unwrap();
        assert_eq!(names(&deck), vec!["A", "C", "B"]);

        deck.move_program_down("A").unwrap();
        assert_eq!(names(&deck), vec!["C", "A", "B"]);

        match &deck.events()[0] {
            GameEvent::DeckReordered(data) => {
                assert_eq!(data.program_name, "C");
                assert_eq!((data.from_index, data.to_index), (2, 1));
            }
            other => panic!("unexpected event {:?}", other.kind()),
        }
    }

    #[test]
    fn moving_past_the_boundary_is_a_silent_no_op() {
        let mut deck = deck(&["A", "B"]);

        deck.move_program_up("A").unwrap();
        deck.move_program_down("B").unwrap();

        assert_eq!(names(&deck), vec!["A", "B"]);
        assert!(deck.events().is_empty());
    }

    #[test]
    fn moving_a_missing_program_is_rejected() {
        let mut deck = deck(&["A"]);
        assert_eq!(
            deck.move_program_down("Z").unwrap_err().to_string(),
            "Program 'Z' not found in deck."
        );
    }
}
