//! Plain HTTP endpoints: nickname registration, leaderboard, health

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::AppError;
use crate::extract::{Authenticated, ClientAddr};
use crate::scores::LeaderboardEntry;
use crate::state::AppState;
use crate::validation::Nickname;

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// A missing nickname is treated as empty
    #[serde(default)]
    pub nickname: String,
}

/// Register the nickname the next game connection plays under
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
    ClientAddr(addr): ClientAddr,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let nickname = Nickname::parse(&request.nickname).map_err(|e| {
        warn!(
            "Invalid nickname attempt: {:?} from {} ({}): {}",
            request.nickname, identity.user_id, addr, e
        );
        e
    })?;

    info!(
        "Session started for nickname: {} ({}, {})",
        nickname, identity.user_id, addr
    );
    state.players.register(&identity.user_id, nickname);

    Ok(Json(json!({ "status": "success" })))
}

/// Best score per nickname, best first
pub async fn highscores(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let scores = state
        .scores
        .top_scores(state.config.storage.leaderboard_size)
        .await?;
    Ok(Json(scores))
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}
