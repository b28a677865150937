//! Game session controller
//!
//! One controller per game connection. It owns the [`Session`] and the RNG,
//! consumes client messages strictly in arrival order and decides whether a
//! run continues, ends on a collision or ends at the score ceiling. Ended
//! runs are reviewed by the anti-cheat evaluator, accepted ones go to the
//! score store, and the player immediately gets a fresh session.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::anti_cheat::{RunSummary, RunVerdict, Violation};
use crate::event_logger::{AuditEvent, RunOutcome};
use crate::game::apple::is_apple_eaten;
use crate::game::Location;
use crate::identity::PlayerIdentity;
use crate::protocol::{ClientMessage, GameEvent, GameSnapshot, ServerMessage};
use crate::scores::ScoreRecord;
use crate::session::Session;
use crate::state::AppState;
use crate::validation::Nickname;

/// Who is playing, for logs and the audit trail
#[derive(Debug, Clone)]
pub struct PlayerContext {
    pub connection_id: Uuid,
    pub identity: PlayerIdentity,
    pub nickname: Nickname,
    pub client_addr: SocketAddr,
}

impl PlayerContext {
    pub fn new(identity: PlayerIdentity, nickname: Nickname, client_addr: SocketAddr) -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            identity,
            nickname,
            client_addr,
        }
    }
}

impl fmt::Display for PlayerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.nickname, self.identity.user_id)?;
        if let Some(name) = &self.identity.display_name {
            write!(f, " - {}", name)?;
        }
        write!(f, ", {})", self.client_addr)
    }
}

pub struct GameController {
    state: Arc<AppState>,
    player: PlayerContext,
    session: Session,
    rng: StdRng,
}

impl GameController {
    pub fn new(state: Arc<AppState>, player: PlayerContext, now: Instant) -> Self {
        Self::with_rng(state, player, StdRng::from_entropy(), now)
    }

    /// Controller with a caller-supplied RNG, for reproducible apple placement
    pub fn with_rng(
        state: Arc<AppState>,
        player: PlayerContext,
        mut rng: StdRng,
        now: Instant,
    ) -> Self {
        let session = Session::new(&state.board, &mut rng, now);
        Self {
            state,
            player,
            session,
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn player(&self) -> &PlayerContext {
        &self.player
    }

    /// Message sent right after the connection opens
    pub fn start(&self) -> ServerMessage {
        info!("Game setup for {}", self.player);
        self.state.audit.log(AuditEvent::SessionStarted {
            connection_id: self.player.connection_id.to_string(),
            user_id: self.player.identity.user_id.clone(),
            nickname: self.player.nickname.to_string(),
            client_addr: self.player.client_addr.to_string(),
        });
        ServerMessage::InitialState(self.snapshot())
    }

    /// Connection is gone; the session is dropped without a review
    pub fn close(&self) {
        self.state.audit.log(AuditEvent::SessionClosed {
            connection_id: self.player.connection_id.to_string(),
            user_id: self.player.identity.user_id.clone(),
        });
    }

    /// Process one client message and return what to send back, in order
    pub async fn handle(&mut self, message: ClientMessage, now: Instant) -> Vec<ServerMessage> {
        match message {
            ClientMessage::GameEvent(GameEvent::Move { head }) => self.on_move(head, now).await,
        }
    }

    async fn on_move(&mut self, head: Location, now: Instant) -> Vec<ServerMessage> {
        if let Some(violation) = self
            .state
            .anti_cheat
            .on_move(self.session.last_move_at, now)
        {
            self.flag(violation);
        }
        self.session.last_move_at = Some(now);

        if self.session.snake.detect_collision() {
            return vec![self.end_run(RunOutcome::Collision, now).await];
        }

        let current = self.session.snake.head();
        if let Err(illegal) = self.state.move_check.check(&self.state.board, current, head) {
            self.flag(Violation::IllegalMove(illegal));
            return vec![self.end_run(RunOutcome::IllegalMove, now).await];
        }

        self.session.snake.apply_move(head);
        debug!("{} moved to {}", self.player.nickname, head);

        if self.session.snake.detect_collision() {
            return vec![self.end_run(RunOutcome::Collision, now).await];
        }

        let mut out = Vec::new();

        if is_apple_eaten(head, self.session.apple) {
            self.session
                .record_apple(now, self.state.anti_cheat.cadence_window());
            if let Some(violation) = self.state.anti_cheat.on_apple(&self.session.apple_times) {
                self.flag(violation);
            }
            self.session.score += 1;

            info!(
                "Apple eaten by {}, new score: {}",
                self.player, self.session.score
            );
            self.state.audit.log(AuditEvent::AppleEaten {
                connection_id: self.player.connection_id.to_string(),
                score: self.session.score,
                location: head,
            });

            if self.session.score >= self.state.config.rules.score_ceiling {
                // Apple stays put, the run ends on this event
                out.push(ServerMessage::AppleEaten {
                    apple_update: self.session.apple,
                    new_score: self.session.score,
                });
                out.push(self.end_run(RunOutcome::ScoreCeiling, now).await);
                return out;
            }

            let apple = self
                .state
                .board
                .grow_and_relocate_apple(&mut self.session.snake, &mut self.rng);
            self.session.apple = apple;
            out.push(ServerMessage::AppleEaten {
                apple_update: apple,
                new_score: self.session.score,
            });
        }

        if self.state.config.rules.emit_snake_updates {
            out.push(ServerMessage::SnakeUpdate {
                snake_head_update: head,
            });
        }

        out
    }

    /// Taint the session; only the first violation of a run is reported loudly
    fn flag(&mut self, violation: Violation) {
        if !self.session.taint(violation) {
            debug!("{} flagged again: {}", self.player, violation);
            return;
        }

        warn!(
            "Possible cheating detected for {}: {}",
            self.player, violation
        );
        self.state.audit.log(AuditEvent::IntegrityViolation {
            connection_id: self.player.connection_id.to_string(),
            user_id: self.player.identity.user_id.clone(),
            nickname: self.player.nickname.to_string(),
            client_addr: self.player.client_addr.to_string(),
            kind: violation.kind().to_string(),
            detail: violation.to_string(),
        });
    }

    /// Review and maybe persist the run, then start a fresh session
    async fn end_run(&mut self, outcome: RunOutcome, now: Instant) -> ServerMessage {
        let run = RunSummary {
            score: self.session.score,
            duration: self.session.duration(now),
            taint: self.session.taint,
        };

        let verdict = self.state.anti_cheat.review_run(&run);
        let mut persisted = false;
        let mut rejection = None;

        match verdict {
            RunVerdict::Accepted => {
                let record = ScoreRecord {
                    nickname: self.player.nickname.to_string(),
                    points: run.score,
                };
                match self.state.scores.submit(&record).await {
                    Ok(()) => persisted = true,
                    Err(e) => error!(
                        "Failed to save score {} for {}: {}",
                        run.score, self.player, e
                    ),
                }
            }
            RunVerdict::Rejected(reason) => {
                warn!(
                    "Score rejected for {}. Score: {}, Duration: {:.2}s, Reason: {}",
                    self.player,
                    run.score,
                    run.duration.as_secs_f64(),
                    reason
                );
                rejection = Some(reason.to_string());
            }
        }

        info!(
            "Run ended ({:?}) for {}, score: {}",
            outcome, self.player, run.score
        );
        self.state.audit.log(AuditEvent::RunEnded {
            connection_id: self.player.connection_id.to_string(),
            user_id: self.player.identity.user_id.clone(),
            nickname: self.player.nickname.to_string(),
            client_addr: self.player.client_addr.to_string(),
            score: run.score,
            duration_ms: run.duration.as_millis(),
            outcome,
            persisted,
            rejection,
        });

        // Event spacing is measured per connection, not per run
        let last_move_at = self.session.last_move_at;
        self.session = Session::new(&self.state.board, &mut self.rng, now);
        self.session.last_move_at = last_move_at;
        ServerMessage::Lost(self.snapshot())
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::new(
            self.player.nickname.as_str(),
            &self.session,
            self.state.board.size(),
        )
    }
}
