//! Runtime Configuration
//!
//! Protocol parameters are compile-time constants and never configurable.
//! This only configures the local driver binary.

use thiserror::Error;

use crate::core::identity::{Address, GameId, IdentityError};

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default number of moves played after the opening.
pub const DEFAULT_MOVES: u32 = 200;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Player address could not be parsed.
    #[error("invalid TWENTY48_PLAYER: {0}")]
    InvalidPlayer(#[from] IdentityError),

    /// A numeric variable could not be parsed.
    #[error("invalid {name}: {value}")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Driver configuration.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Principal that owns the demo game.
    pub player: Address,
    /// Disambiguator for the game id.
    pub nonce: u64,
    /// Moves to play after the opening (stops early on game over).
    pub moves: u32,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            player: Address::new([0x20; 20]),
            nonce: 1,
            moves: DEFAULT_MOVES,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DemoConfig {
    /// Create config from environment variables.
    ///
    /// - `TWENTY48_PLAYER`: hex address (with or without `0x`)
    /// - `TWENTY48_NONCE`: game id disambiguator
    /// - `TWENTY48_MOVES`: moves after the opening
    /// - `TWENTY48_LOG`: tracing filter, e.g. `twenty48=debug`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(player) = lookup("TWENTY48_PLAYER") {
            config.player = player.parse()?;
        }
        if let Some(nonce) = lookup("TWENTY48_NONCE") {
            config.nonce = parse_number("TWENTY48_NONCE", nonce)?;
        }
        if let Some(moves) = lookup("TWENTY48_MOVES") {
            config.moves = parse_number("TWENTY48_MOVES", moves)?;
        }
        if let Some(filter) = lookup("TWENTY48_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Game id for the configured player and nonce.
    pub fn game_id(&self) -> GameId {
        GameId::new(self.player, self.nonce)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}
