//! Protocol messages for WebSocket communication
//!
//! Every frame is a JSON text frame `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::game::{Direction, Location, Snake};
use crate::session::Session;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    GameEvent(GameEvent),
}

/// Payload of a `game_event` message
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Client-proposed new head
    #[serde(rename = "MOVE")]
    Move { head: Location },
}

impl ClientMessage {
    /// Parse a client message from a text frame
    pub fn parse(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Full state pushed on connect and after every reset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub valid_nickname: String,
    pub snake_init: Snake,
    pub direction_init: Direction,
    pub apple_init: Location,
    pub score_init: u32,
    pub tile_map_size_init: [i32; 2],
}

impl GameSnapshot {
    pub fn new(nickname: &str, session: &Session, board_size: [i32; 2]) -> Self {
        Self {
            valid_nickname: nickname.to_string(),
            snake_init: session.snake.clone(),
            direction_init: session.direction,
            apple_init: session.apple,
            score_init: session.score,
            tile_map_size_init: board_size,
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    InitialState(GameSnapshot),
    /// Run ended; carries the fresh session
    Lost(GameSnapshot),
    AppleEaten {
        #[serde(rename = "appleUpdate")]
        apple_update: Location,
        #[serde(rename = "newScore")]
        new_score: u32,
    },
    SnakeUpdate {
        #[serde(rename = "snakeHeadUpdate")]
        snake_head_update: Location,
    },
}

impl ServerMessage {
    /// Event name on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::InitialState(_) => "initial_state",
            ServerMessage::Lost(_) => "lost",
            ServerMessage::AppleEaten { .. } => "apple_eaten",
            ServerMessage::SnakeUpdate { .. } => "snake_update",
        }
    }

    /// Serialize message to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
