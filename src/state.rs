//! Application state shared across all handlers

use std::sync::Arc;

use tracing::info;

use crate::anti_cheat::AntiCheat;
use crate::config::{GameConfig, StorageBackend};
use crate::error::PersistenceError;
use crate::event_logger::EventLogger;
use crate::game::Board;
use crate::identity::{HeaderIdentity, IdentityProvider};
use crate::players::PlayerRegistry;
use crate::scores::{MemoryScoreStore, ScoreStore, SqliteScoreStore};
use crate::validation::MoveCheck;

/// Shared application state. Nothing in here belongs to a single game:
/// sessions live in their connection task.
pub struct AppState {
    pub config: GameConfig,
    pub board: Board,
    pub anti_cheat: AntiCheat,
    pub move_check: MoveCheck,
    pub identity: Arc<dyn IdentityProvider>,
    /// Nicknames registered through `start_session`
    pub players: PlayerRegistry,
    pub scores: Arc<dyn ScoreStore>,
    pub audit: EventLogger,
}

impl AppState {
    /// Build state around an already opened score store
    pub fn new(config: GameConfig, scores: Arc<dyn ScoreStore>, audit: EventLogger) -> Self {
        Self {
            board: Board::new(&config.board),
            anti_cheat: AntiCheat::from_config(&config.anti_cheat),
            move_check: MoveCheck::from(config.rules.move_check),
            identity: Arc::new(HeaderIdentity::new(&config.identity)),
            players: PlayerRegistry::new(),
            scores,
            audit,
            config,
        }
    }

    /// Open the configured score store and audit log
    pub async fn from_config(config: GameConfig) -> Result<Self, PersistenceError> {
        let scores: Arc<dyn ScoreStore> = match config.storage.backend {
            StorageBackend::Sqlite => {
                info!("Opening score database {}", config.storage.database_url);
                Arc::new(SqliteScoreStore::connect(&config.storage.database_url).await?)
            }
            StorageBackend::Memory => {
                info!("Using in-memory score store");
                Arc::new(MemoryScoreStore::new())
            }
        };
        let audit = EventLogger::new(&config.audit);

        Ok(Self::new(config, scores, audit))
    }

    /// Replace the identity provider
    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyPreset;
    use crate::identity::PlayerIdentity;

    struct FixedIdentity;

    impl IdentityProvider for FixedIdentity {
        fn identify(
            &self,
            _headers: &axum::http::HeaderMap,
        ) -> Result<PlayerIdentity, crate::identity::IdentityError> {
            Ok(PlayerIdentity {
                user_id: "fixed".to_string(),
                display_name: None,
            })
        }
    }

    #[test]
    fn test_with_identity() {
        let state = AppState::new(
            GameConfig::default(),
            Arc::new(MemoryScoreStore::new()),
            EventLogger::disabled(),
        )
        .with_identity(Arc::new(FixedIdentity));

        let identity = state.identity.identify(&Default::default()).unwrap();
        assert_eq!(identity.user_id, "fixed");
    }

    #[tokio::test]
    async fn test_from_config_memory() {
        let mut config = GameConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.audit.enabled = false;
        config.anti_cheat.policy = PolicyPreset::EventRate;

        let state = AppState::from_config(config).await.unwrap();
        assert_eq!(state.board.size(), [20, 20]);
        assert_eq!(state.move_check, MoveCheck::Strict);
        assert_eq!(
            state.anti_cheat.policy_names(),
            vec!["event_rate", "run_duration"]
        );
        assert!(state.scores.top_scores(10).await.unwrap().is_empty());
        assert!(state.players.is_empty());
    }
}
