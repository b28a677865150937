//! WebSocket handler for game connections

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};

use crate::controller::{GameController, PlayerContext};
use crate::extract::{ClientAddr, RegisteredPlayer};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// WebSocket upgrade handler. Refused before the upgrade when the caller is
/// unauthenticated or has no nickname yet.
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    RegisteredPlayer { identity, nickname }: RegisteredPlayer,
    ClientAddr(addr): ClientAddr,
    ws: WebSocketUpgrade,
) -> Response {
    let player = PlayerContext::new(identity, nickname, addr);
    ws.on_upgrade(move |socket| handle_socket(socket, state, player))
}

/// Drive one game connection until the client goes away
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, player: PlayerContext) {
    let (mut sender, mut receiver) = socket.split();
    let mut controller = GameController::new(state, player, Instant::now());

    info!("Client {} connected", controller.player());

    if send(&mut sender, &controller.start()).await.is_err() {
        error!("Failed to send initial state to {}", controller.player());
        controller.close();
        return;
    }

    'connection: while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let message = match ClientMessage::parse(&text) {
                    Ok(message) => message,
                    Err(e) => {
                        debug!("Ignoring malformed message from {}: {}", controller.player(), e);
                        continue;
                    }
                };

                for reply in controller.handle(message, Instant::now()).await {
                    debug!("Sending {} to {}", reply.event_name(), controller.player());
                    if send(&mut sender, &reply).await.is_err() {
                        break 'connection;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                debug!("Client {} sent close frame", controller.player());
                break;
            }
            Ok(_) => {
                // Ignore binary, ping, pong frames
            }
            Err(e) => {
                warn!("WebSocket error for {}: {}", controller.player(), e);
                break;
            }
        }
    }

    info!("Client {} disconnected", controller.player());
    controller.close();
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    sender.send(Message::Text(message.to_json().into())).await
}
