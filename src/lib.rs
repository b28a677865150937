//! Server-authoritative Snake
//!
//! Each WebSocket connection owns one game session. The browser proposes
//! every new head position; the server checks it, detects collisions and
//! apples, runs the anti-cheat heuristics and persists honest high scores.

pub mod anti_cheat;
pub mod config;
pub mod controller;
pub mod error;
pub mod event_logger;
pub mod extract;
pub mod game;
pub mod http;
pub mod identity;
pub mod players;
pub mod protocol;
pub mod scores;
pub mod session;
pub mod state;
pub mod validation;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::GameConfig;
pub use state::AppState;

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/start_session", post(http::start_session))
        .route("/ws", get(ws::ws_handler))
        .route("/highscores", get(http::highscores))
        .route("/health", get(http::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
