//! Session configuration loaded from environment variables.

use std::str::FromStr;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Session configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `DECKER_PLAYER_NAME`: name of the player and their character (default: `"Rynn"`)
/// - `DECKER_STARTING_CREDITS`: credits the character starts with (default: `1000`)
/// - `DECKER_SKILL_POINTS`: unspent skill points at start (default: `10`)
/// - `DECKER_DEV_MODE`: `true` grants extra credits and a debug schematic (default: `false`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub player_name: String,
    pub starting_credits: u32,
    pub skill_points: u32,
    pub dev_mode: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            player_name: lookup("DECKER_PLAYER_NAME").unwrap_or(defaults.player_name),
            starting_credits: lookup("DECKER_STARTING_CREDITS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.starting_credits),
            skill_points: lookup("DECKER_SKILL_POINTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.skill_points),
            dev_mode: lookup("DECKER_DEV_MODE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dev_mode),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_format),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: "Rynn".to_string(),
            starting_credits: 1000,
            skill_points: 10,
            dev_mode: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.player_name, "Rynn");
        assert_eq!(config.starting_credits, 1000);
        assert_eq!(config.skill_points, 10);
        assert!(!config.dev_mode);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DECKER_PLAYER_NAME", "Deckard"),
            ("DECKER_STARTING_CREDITS", "250"),
            ("DECKER_DEV_MODE", "true"),
            ("LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.player_name, "Deckard");
        assert_eq!(config.starting_credits, 250);
        assert!(config.dev_mode);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.skill_points, 10);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("DECKER_SKILL_POINTS", "lots"),
            ("LOG_FORMAT", "xml"),
        ]));
        assert_eq!(config.skill_points, 10);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
