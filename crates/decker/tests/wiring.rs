//! Integration tests for the composition root.

use std::sync::Arc;

use application::{HANDLERS, LoadedDice};
use decker::{Config, DEV_BONUS_CREDITS, GameContext, run_scripted_session, starter_schematic};
use domain::{EMITTERS, GameEventKind, Repository};
use event_bus::Catalog;

fn game(config: &Config, rolls: &[u32]) -> GameContext {
    GameContext::with_dice(config, Arc::new(LoadedDice::new(rolls.iter().copied()))).unwrap()
}

mod declarations {
    use super::*;

    #[test]
    fn every_subscription_is_declared() {
        let game = game(&Config::default(), &[]);
        let catalog = Catalog::new().with(EMITTERS).with(HANDLERS);

        assert!(catalog.undeclared_subscriptions(game.dispatcher()).is_empty());
    }

    #[test]
    fn every_emitted_kind_has_a_subscriber() {
        let game = game(&Config::default(), &[]);
        let catalog = Catalog::new().with(EMITTERS).with(HANDLERS);

        assert!(catalog.unhandled_kinds(GameEventKind::ALL).is_empty());
        for kind in GameEventKind::ALL {
            assert!(game.dispatcher().subscriber_count(*kind) >= 1, "{kind} has no subscriber");
        }
    }
}

mod session {
    use super::*;

    #[test]
    fn start_creates_player_deck_and_character() {
        let config = Config::default();
        let game = game(&config, &[]);

        let session = game.start_session().unwrap();

        let status = game.players.get_player_status(session.player_id).unwrap().unwrap();
        assert_eq!(status.name, "Rynn");
        let data = game.characters.get_character_data(session.character_id).unwrap().unwrap();
        assert_eq!(data.deck_id, session.deck_id);
        assert_eq!(data.credits, config.starting_credits);
        assert_eq!(data.unused_skill_points, config.skill_points);
        assert_eq!(data.skills["Hacking"], 1);
        assert!(game.stores().decks.get(session.deck_id).unwrap().is_some());
        assert_eq!(
            game.crafting.get_character_schematics(session.character_id).unwrap()[0].name,
            starter_schematic().name
        );
    }

    #[test]
    fn dev_mode_adds_credits_and_a_schematic() {
        let config = Config {
            dev_mode: true,
            ..Config::default()
        };
        let game = game(&config, &[]);

        let session = game.start_session().unwrap();

        let data = game.characters.get_character_data(session.character_id).unwrap().unwrap();
        assert_eq!(data.credits, config.starting_credits + DEV_BONUS_CREDITS);
        assert_eq!(game.crafting.get_character_schematics(session.character_id).unwrap().len(), 2);
    }

    #[test]
    fn scripted_session_runs_to_completion() {
        let game = game(&Config::default(), &[1]);
        let session = game.start_session().unwrap();

        let report = run_scripted_session(&game, &session).unwrap();

        assert_eq!(report.learned_schematic.as_deref(), Some("Hammer v1 Schematic"));
        assert_eq!(report.character.credits, 1000 - 500 - 250);
        assert_eq!(report.character.health, 100);
        assert_eq!(report.character.skills["Programming"], 2);
        assert_eq!(report.deck.programs.len(), 1);
        assert_eq!(report.deck.used_deck_size, 10);
        assert_eq!(report.contracts.len(), 2);
        assert_eq!(
            report.matrix_log,
            ["IcePick v1 loaded into the deck.", "Research complete: Hammer v1 Schematic."]
        );
    }

    #[test]
    fn matrix_log_is_bounded_and_fed_by_the_dispatcher() {
        let game = game(&Config::default(), &[]);
        let session = game.start_session().unwrap();

        for n in 1..=8 {
            game.matrix.log_entry(&format!("trace {n}")).unwrap();
        }

        let view = game
            .matrix
            .get_matrix_run_view_data(session.character_id, session.player_id)
            .unwrap()
            .unwrap();
        assert_eq!(view.messages, ["trace 4", "trace 5", "trace 6", "trace 7", "trace 8"]);
        assert_eq!(view.physical_health, 100);
        assert!(view.software.is_empty());
    }

    #[test]
    fn scripted_session_fails_cleanly_without_credits() {
        let config = Config {
            starting_credits: 100,
            ..Config::default()
        };
        let game = game(&config, &[]);
        let session = game.start_session().unwrap();

        let err = run_scripted_session(&game, &session).unwrap_err();

        assert_eq!(err.to_string(), "Insufficient credits.");
    }
}
