//! Arena configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_grids::{Player, SearchLimits};
use tracing::{debug, info, instrument};

use crate::SessionSettings;

/// Which backend keeps the games.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreKind {
    /// Process memory; games are lost on exit.
    Memory,
    /// A local SQLite file.
    Sqlite,
    /// A remote REST game service.
    Rest,
}

/// Settings for the arena binary.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Backend that keeps games.
    #[serde(default = "default_store")]
    store: StoreKind,

    /// SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Base URL of the REST game service.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// The human's mark.
    #[serde(default = "default_human_player")]
    human_player: Player,

    /// Search depth limit for the computer; absent means exact search.
    #[serde(default)]
    max_depth: Option<usize>,
}

#[instrument]
fn default_store() -> StoreKind {
    StoreKind::Sqlite
}

#[instrument]
fn default_db_path() -> String {
    "strictly_arena.db".to_string()
}

#[instrument]
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

#[instrument]
fn default_human_player() -> Player {
    Player::X
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            db_path: default_db_path(),
            base_url: default_base_url(),
            human_player: default_human_player(),
            max_depth: None,
        }
    }
}

impl ArenaConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Loads configuration from a file if it exists, otherwise returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(store = %config.store, human = %config.human_player, "Config loaded successfully");
        Ok(config)
    }

    /// Overrides the backend.
    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    /// Overrides the SQLite path.
    pub fn with_db_path(mut self, db_path: String) -> Self {
        self.db_path = db_path;
        self
    }

    /// Overrides the REST base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Overrides the human's mark.
    pub fn with_human_player(mut self, human_player: Player) -> Self {
        self.human_player = human_player;
        self
    }

    /// Overrides the search depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Search bounds implied by `max_depth`.
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth,
        }
    }

    /// Session settings implied by this configuration.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::new(self.human_player, self.search_limits())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
