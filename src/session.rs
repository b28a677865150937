//! Per-connection game state

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::anti_cheat::Violation;
use crate::game::{Board, Direction, Location, Snake};

/// Authoritative state of one player's run, owned by the connection task
#[derive(Debug, Clone)]
pub struct Session {
    pub snake: Snake,
    pub direction: Direction,
    pub apple: Location,
    pub score: u32,
    pub started_at: Instant,
    /// Most recent apple instants, oldest first
    pub apple_times: VecDeque<Instant>,
    pub last_move_at: Option<Instant>,
    /// First violation observed; never cleared for the lifetime of the run
    pub taint: Option<Violation>,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(board: &Board, rng: &mut R, now: Instant) -> Self {
        let game = board.new_game(rng);
        Self {
            snake: game.snake,
            direction: game.direction,
            apple: game.apple,
            score: game.score,
            started_at: now,
            apple_times: VecDeque::new(),
            last_move_at: None,
            taint: None,
        }
    }

    /// Remember an apple instant, keeping only the last `window`
    pub fn record_apple(&mut self, now: Instant, window: usize) {
        self.apple_times.push_back(now);
        while self.apple_times.len() > window {
            self.apple_times.pop_front();
        }
    }

    /// Store a violation; returns true if it is the first one
    pub fn taint(&mut self, violation: Violation) -> bool {
        if self.taint.is_some() {
            return false;
        }
        self.taint = Some(violation);
        true
    }

    pub fn is_tainted(&self) -> bool {
        self.taint.is_some()
    }

    pub fn duration(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(now: Instant) -> Session {
        let board = Board::new(&BoardConfig::default());
        Session::new(&board, &mut StdRng::seed_from_u64(3), now)
    }

    #[test]
    fn test_fresh_session() {
        let now = Instant::now();
        let session = session(now);
        assert_eq!(session.score, 0);
        assert_eq!(session.snake.head(), Location::new(5, 5));
        assert_eq!(session.started_at, now);
        assert!(session.apple_times.is_empty());
        assert!(!session.is_tainted());
    }

    #[test]
    fn test_apple_times_bounded() {
        let start = Instant::now();
        let mut session = session(start);
        for i in 0..8 {
            session.record_apple(start + Duration::from_secs(i), 5);
        }
        assert_eq!(session.apple_times.len(), 5);
        assert_eq!(session.apple_times[0], start + Duration::from_secs(3));
    }

    #[test]
    fn test_first_taint_wins() {
        let mut session = session(Instant::now());
        let first = Violation::EventRate {
            gap: Duration::from_millis(1),
        };
        let second = Violation::AppleCadence {
            average: Duration::from_millis(100),
        };

        assert!(session.taint(first));
        assert!(!session.taint(second));
        assert_eq!(session.taint, Some(first));
    }
}
