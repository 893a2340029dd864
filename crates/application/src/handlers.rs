//! Event subscribers and their `handles` declarations.

use domain::events::PlayerCreated;
use domain::{GameEvent, GameEventKind};
use event_bus::{BoxError, Declaration, DomainEvent, EventDispatcher};

use crate::services::matrix_run::MATRIX_LOG;

/// Which kinds each game subscriber handles. The matrix log is subscribed
/// by [`MatrixLog::subscribe`](crate::MatrixLog::subscribe), the rest by
/// [`register`].
pub const HANDLERS: &[Declaration<GameEventKind>] = &[
    Declaration::handles("log_domain_event", GameEventKind::ALL),
    Declaration::handles("log_player_created", &[GameEventKind::PlayerCreated]),
    Declaration::handles("log_special_player_created", &[GameEventKind::PlayerCreated]),
    Declaration::handles(MATRIX_LOG, &[GameEventKind::MatrixLogEntryCreated]),
];

/// Subscribes every stateless handler in this module.
pub fn register(dispatcher: &mut EventDispatcher<GameEvent>) {
    for kind in GameEventKind::ALL {
        dispatcher.subscribe(*kind, "log_domain_event", log_domain_event);
    }
    dispatcher
        .on::<PlayerCreated, _>("log_player_created", log_player_created)
        .on_when::<PlayerCreated, _, _>(
            "log_special_player_created",
            log_special_player_created,
            is_special_player,
        );
}

/// Logs any event with its identity and full payload.
pub fn log_domain_event(event: &GameEvent) -> Result<(), BoxError> {
    let payload = serde_json::to_string(event)?;
    tracing::info!(
        kind = %event.kind(),
        event_id = %event.event_id(),
        occurred_at = %event.occurred_at(),
        %payload,
        "domain event"
    );
    Ok(())
}

pub fn log_player_created(event: &PlayerCreated) -> Result<(), BoxError> {
    tracing::info!(player_id = %event.player_id, name = %event.name, "player created");
    Ok(())
}

pub fn log_special_player_created(event: &PlayerCreated) -> Result<(), BoxError> {
    tracing::info!(name = %event.name, "a special player was created");
    Ok(())
}

/// True when the new player is Rynn, ignoring case.
pub fn is_special_player(event: &PlayerCreated) -> bool {
    event.name.to_lowercase() == "rynn"
}
