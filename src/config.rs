//! Game configuration: defaults, TOML loading and validation

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board width in cells
pub const BOARD_WIDTH: i32 = 20;

/// Board height in cells
pub const BOARD_HEIGHT: i32 = 20;

/// Head of the starting snake
pub const START_HEAD: [i32; 2] = [5, 5];

/// Segments of the starting snake
pub const START_LENGTH: usize = 4;

/// Shortest starting snake accepted by validation
pub const MIN_START_LENGTH: usize = 4;

/// Score at which a run is force-ended
pub const SCORE_CEILING: u32 = 396;

/// Default listen port, bound on all interfaces
pub const LISTEN_PORT: u16 = 5050;

// =============================================================================
// Anti-cheat
// =============================================================================

/// Apple timestamps used for the cadence average
pub const CADENCE_WINDOW: usize = 5;

/// Average time between apples below which a run is tainted
pub const MIN_APPLE_INTERVAL_MS: u64 = 900;

/// Gap between two move events below which a run is tainted
pub const MIN_EVENT_GAP_MS: u64 = 40;

// =============================================================================
// Storage / audit
// =============================================================================

/// SQLite database URL
pub const DATABASE_URL: &str = "sqlite:scores.db";

/// Rows returned by the leaderboard
pub const LEADERBOARD_SIZE: usize = 10;

/// Audit log file path
pub const EVENT_LOG_FILE: &str = "game_events.log";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub anti_cheat: AntiCheatConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

/// Board geometry and starting position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    /// Head of the starting snake; the body extends to the left of it
    pub start_head: [i32; 2],
    pub start_length: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            start_head: START_HEAD,
            start_length: START_LENGTH,
        }
    }
}

/// How much the server trusts the head position proposed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCheckMode {
    /// Head must be on the board and one orthogonal step (with edge wrap)
    /// away from the current head
    #[default]
    Strict,
    /// Any proposed head is applied as-is
    Trusting,
}

/// Game rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// 396 for the apple-cadence deployment, 390 for the event-rate one
    pub score_ceiling: u32,
    pub move_check: MoveCheckMode,
    /// Push `snake_update` after every accepted move
    pub emit_snake_updates: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            score_ceiling: SCORE_CEILING,
            move_check: MoveCheckMode::default(),
            emit_snake_updates: true,
        }
    }
}

/// Which anti-cheat heuristics run for every session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    /// Apple cadence + run duration
    #[default]
    AppleCadence,
    /// Move event rate + run duration
    EventRate,
    /// Every heuristic
    All,
}

/// Anti-cheat thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntiCheatConfig {
    pub policy: PolicyPreset,
    pub cadence_window: usize,
    pub min_apple_interval_ms: u64,
    pub min_event_gap_ms: u64,
}

impl Default for AntiCheatConfig {
    fn default() -> Self {
        Self {
            policy: PolicyPreset::default(),
            cadence_window: CADENCE_WINDOW,
            min_apple_interval_ms: MIN_APPLE_INTERVAL_MS,
            min_event_gap_ms: MIN_EVENT_GAP_MS,
        }
    }
}

/// Headers set by the authenticating proxy in front of the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub user_header: String,
    pub name_header: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_header: "x-forwarded-user".to_string(),
            name_header: "x-forwarded-preferred-username".to_string(),
        }
    }
}

/// Score store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Score persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: String,
    pub leaderboard_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: DATABASE_URL.to_string(),
            leaderboard_size: LEADERBOARD_SIZE,
        }
    }
}

/// Audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: EVENT_LOG_FILE.to_string(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!("No config file at {}, using defaults", path.display());
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;

        if board.width < 1 || board.height < 1 {
            return Err(ConfigError::Validation(format!(
                "board must be at least 1x1, got {}x{}",
                board.width, board.height
            )));
        }

        if board.start_length < MIN_START_LENGTH {
            return Err(ConfigError::Validation(format!(
                "start_length must be at least {}, got {}",
                MIN_START_LENGTH, board.start_length
            )));
        }

        let [head_x, head_y] = board.start_head;
        let tail_x = i64::from(head_x) - (board.start_length as i64 - 1);
        if tail_x < 0
            || head_x >= board.width
            || head_y < 0
            || head_y >= board.height
        {
            return Err(ConfigError::Validation(format!(
                "starting snake of {} segments at ({}, {}) does not fit a {}x{} board",
                board.start_length, head_x, head_y, board.width, board.height
            )));
        }

        // Every apple must find a free cell until the ceiling ends the run
        let cells = i64::from(board.width) * i64::from(board.height);
        let longest = board.start_length as i64 + i64::from(self.rules.score_ceiling);
        if longest > cells {
            return Err(ConfigError::Validation(format!(
                "score_ceiling {} leaves no room for apples on a {}x{} board",
                self.rules.score_ceiling, board.width, board.height
            )));
        }

        if self.anti_cheat.cadence_window < 2 {
            return Err(ConfigError::Validation(
                "cadence_window must be at least 2".to_string(),
            ));
        }

        if self.storage.leaderboard_size == 0 {
            return Err(ConfigError::Validation(
                "leaderboard_size must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
