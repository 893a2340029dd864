//! Which operations record which events.

use event_bus::{Catalog, Declaration};

use crate::events::GameEventKind;

use GameEventKind::*;

/// One entry per event-recording aggregate operation.
pub const EMITTERS: &[Declaration<GameEventKind>] = &[
    Declaration::emits("Player::create", &[PlayerCreated]),
    Declaration::emits("Character::create", &[CharacterCreated]),
    Declaration::emits("Character::increase_skill", &[SkillIncreased]),
    Declaration::emits("Character::decrease_skill", &[SkillDecreased]),
    Declaration::emits("Character::craft", &[ItemCrafted]),
    Declaration::emits("Character::purchase", &[ItemPurchased]),
    Declaration::emits("Character::store_program", &[ProgramStored]),
    Declaration::emits("Character::remove_stored_program", &[ProgramUnstored]),
    Declaration::emits("Character::start_project", &[ProjectStarted]),
    Declaration::emits("Character::work_on_project", &[ProjectProgressed]),
    Declaration::emits("Character::complete_project", &[ProjectCompleted]),
    Declaration::emits("Deck::create", &[DeckCreated]),
    Declaration::emits("Deck::add_program", &[ProgramAddedToDeck]),
    Declaration::emits("Deck::remove_program", &[ProgramRemovedFromDeck]),
    Declaration::emits("Deck::move_program_up", &[DeckReordered]),
    Declaration::emits("Deck::move_program_down", &[DeckReordered]),
    Declaration::emits("MatrixRunService::log_entry", &[MatrixLogEntryCreated]),
];

/// Catalog of the domain's `emits` declarations.
pub fn emitters() -> Catalog<GameEventKind> {
    Catalog::new().with(EMITTERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregate;
    use crate::character::{ActiveProject, Character, CharacterSheet, ProjectType};
    use crate::deck::Deck;
    use crate::events::GameEvent;
    use crate::player::Player;
    use crate::program::Program;
    use common::{CharacterId, DeckId, PlayerId, ProgramId};
    use event_bus::{DomainEvent, Role};

    /// Runs `operation` and checks every event it records is declared.
    fn assert_declared<A: Aggregate<Event = GameEvent>>(
        name: &str,
        aggregate: &mut A,
        operation: impl FnOnce(&mut A),
    ) {
        aggregate.clear_events();
        operation(aggregate);

        let declared = emitters()
            .kinds_of(name, Role::Emits)
            .unwrap_or_else(|| panic!("{name} has no emits entry"));
        let recorded = aggregate.events();
        assert!(!recorded.is_empty(), "{name} recorded nothing");
        for event in recorded {
            assert!(
                declared.contains(&event.kind()),
                "{name} recorded undeclared {}",
                event.kind()
            );
        }
    }

    #[test]
    fn every_kind_has_an_emitter() {
        let catalog = emitters();
        for kind in GameEventKind::ALL {
            assert!(!catalog.emitters_of(*kind).is_empty(), "{kind} is never emitted");
        }
    }

    #[test]
    fn factories_record_declared_kinds() {
        let mut player = Player::create(PlayerId::new(), "Rynn", 100);
        assert_eq!(player.events()[0].kind(), PlayerCreated);
        assert_declared("Player::create", &mut player, |p| {
            *p = Player::create(PlayerId::new(), "Rynn", 100)
        });

        let mut deck = Deck::create(DeckId::new());
        assert_declared("Deck::create", &mut deck, |d| *d = Deck::create(DeckId::new()));

        let mut character = Character::create(CharacterId::new(), CharacterSheet::default());
        assert_declared("Character::create", &mut character, |c| {
            *c = Character::create(CharacterId::new(), CharacterSheet::default())
        });
    }

    #[test]
    fn character_operations_record_declared_kinds() {
        let sheet = CharacterSheet::new("Rynn", DeckId::new())
            .with_skill("Programming", 1)
            .with_credits(5000)
            .with_skill_points(10);
        let mut character = Character::new(CharacterId::new(), sheet);

        assert_declared("Character::increase_skill", &mut character, |c| {
            c.increase_skill("Programming").unwrap();
        });
        assert_declared("Character::decrease_skill", &mut character, |c| {
            c.decrease_skill("Programming").unwrap();
        });
        assert_declared("Character::purchase", &mut character, |c| {
            c.purchase("IcePick v1", 500, 10).unwrap();
        });
        assert_declared("Character::store_program", &mut character, |c| {
            c.store_program(Program::new(ProgramId::new(), "Hammer v1", 10));
        });
        assert_declared("Character::remove_stored_program", &mut character, |c| {
            c.remove_stored_program("Hammer v1").unwrap();
        });

        let project = ActiveProject::plan(ProjectType::Software, "Hammer", 1, 0, 0).unwrap();
        let reward = project.schematic();
        assert_declared("Character::start_project", &mut character, |c| {
            c.start_project(project).unwrap();
        });
        assert_declared("Character::work_on_project", &mut character, |c| {
            c.work_on_project(500).unwrap();
        });
        assert_declared("Character::complete_project", &mut character, |c| {
            c.complete_project(Some(reward.clone())).unwrap();
        });
        assert_declared("Character::craft", &mut character, |c| {
            c.craft(&reward).unwrap();
        });
    }

    #[test]
    fn deck_operations_record_declared_kinds() {
        let mut deck = Deck::new(DeckId::new(), Vec::new());

        assert_declared("Deck::add_program", &mut deck, |d| {
            d.add_program(Program::new(ProgramId::new(), "A", 10));
            d.add_program(Program::new(ProgramId::new(), "B", 10));
        });
        assert_declared("Deck::move_program_up", &mut deck, |d| {
            d.move_program_up("B").unwrap();
        });
        assert_declared("Deck::move_program_down", &mut deck, |d| {
            d.move_program_down("B").unwrap();
        });
        assert_declared("Deck::remove_program", &mut deck, |d| {
            d.remove_program("A").unwrap();
        });
    }
}
