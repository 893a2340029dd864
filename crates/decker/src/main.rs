//! Scripted session entry point.

use std::process::ExitCode;

use decker::{Config, GameContext, LogFormat};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn run(config: &Config) -> decker::Result<()> {
    let game = GameContext::build(config)?;
    let session = game.start_session()?;
    tracing::info!(
        player_id = %session.player_id,
        character_id = %session.character_id,
        "session started"
    );

    let report = decker::run_scripted_session(&game, &session)?;
    match serde_json::to_string_pretty(&report) {
        Ok(json) => tracing::info!(report = %json, "session finished"),
        Err(e) => tracing::warn!(error = %e, "could not render session report"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = Config::from_env();
    init_tracing(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
    }
}
