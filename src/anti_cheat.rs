//! Anti-cheat heuristics
//!
//! The client is untrusted: it proposes every head position itself. These
//! heuristics flag runs that a human could not have played. A flag observed
//! during play taints the session; the run is then reviewed once when it ends
//! and only accepted runs are persisted.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{AntiCheatConfig, PolicyPreset};
use crate::validation::IllegalMove;

/// An integrity violation observed during play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Apples collected faster than the minimum average interval
    AppleCadence { average: Duration },
    /// Two move events closer together than the minimum gap
    EventRate { gap: Duration },
    /// Proposed head refused by the move check
    IllegalMove(IllegalMove),
}

impl Violation {
    /// Short machine-friendly name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::AppleCadence { .. } => "apple_cadence",
            Violation::EventRate { .. } => "event_rate",
            Violation::IllegalMove(_) => "illegal_move",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::AppleCadence { average } => {
                write!(f, "apples every {} ms on average", average.as_millis())
            }
            Violation::EventRate { gap } => {
                write!(f, "move events {} ms apart", gap.as_millis())
            }
            Violation::IllegalMove(illegal) => write!(f, "{}", illegal),
        }
    }
}

/// Why a finished run was not persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Tainted(Violation),
    /// Fewer seconds played than points scored
    TooFast { score: u32, duration: Duration },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Tainted(violation) => write!(f, "tainted: {}", violation),
            RejectReason::TooFast { score, duration } => write!(
                f,
                "score {} in {:.1} s",
                score,
                duration.as_secs_f64()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunVerdict {
    Accepted,
    Rejected(RejectReason),
}

impl RunVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RunVerdict::Accepted)
    }
}

/// What the evaluator sees of a finished run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub score: u32,
    pub duration: Duration,
    pub taint: Option<Violation>,
}

/// A single heuristic. Every hook defaults to "nothing to report".
pub trait AntiCheatPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called for every move event, before the move is applied
    fn on_move(&self, _last_move: Option<Instant>, _now: Instant) -> Option<Violation> {
        None
    }

    /// Called after an apple instant was recorded; oldest first
    fn on_apple(&self, _apple_times: &VecDeque<Instant>) -> Option<Violation> {
        None
    }

    /// Called once when a run ends
    fn review_run(&self, _run: &RunSummary) -> Option<RejectReason> {
        None
    }
}

/// Average interval over a full window of apple instants
#[derive(Debug, Clone)]
pub struct AppleCadence {
    window: usize,
    min_interval: Duration,
}

impl AppleCadence {
    pub fn new(window: usize, min_interval: Duration) -> Self {
        Self { window, min_interval }
    }
}

impl AntiCheatPolicy for AppleCadence {
    fn name(&self) -> &'static str {
        "apple_cadence"
    }

    fn on_apple(&self, apple_times: &VecDeque<Instant>) -> Option<Violation> {
        if apple_times.len() < self.window || self.window < 2 {
            return None;
        }

        let first = apple_times[apple_times.len() - self.window];
        let last = apple_times[apple_times.len() - 1];

        let average = last.saturating_duration_since(first) / (self.window as u32 - 1);
        (average < self.min_interval).then_some(Violation::AppleCadence { average })
    }
}

/// Minimum gap between consecutive move events
#[derive(Debug, Clone)]
pub struct EventRate {
    min_gap: Duration,
}

impl EventRate {
    pub fn new(min_gap: Duration) -> Self {
        Self { min_gap }
    }
}

impl AntiCheatPolicy for EventRate {
    fn name(&self) -> &'static str {
        "event_rate"
    }

    fn on_move(&self, last_move: Option<Instant>, now: Instant) -> Option<Violation> {
        let gap = now.saturating_duration_since(last_move?);
        (gap < self.min_gap).then_some(Violation::EventRate { gap })
    }
}

/// At least one second of play per point
#[derive(Debug, Clone, Default)]
pub struct RunDuration;

impl AntiCheatPolicy for RunDuration {
    fn name(&self) -> &'static str {
        "run_duration"
    }

    fn review_run(&self, run: &RunSummary) -> Option<RejectReason> {
        (run.duration.as_secs_f64() < f64::from(run.score)).then_some(RejectReason::TooFast {
            score: run.score,
            duration: run.duration,
        })
    }
}

/// The set of heuristics applied to every session
pub struct AntiCheat {
    policies: Vec<Box<dyn AntiCheatPolicy>>,
    cadence_window: usize,
}

impl AntiCheat {
    pub fn new(policies: Vec<Box<dyn AntiCheatPolicy>>, cadence_window: usize) -> Self {
        Self {
            policies,
            cadence_window,
        }
    }

    pub fn from_config(config: &AntiCheatConfig) -> Self {
        let cadence = || -> Box<dyn AntiCheatPolicy> {
            Box::new(AppleCadence::new(
                config.cadence_window,
                Duration::from_millis(config.min_apple_interval_ms),
            ))
        };
        let event_rate = || -> Box<dyn AntiCheatPolicy> {
            Box::new(EventRate::new(Duration::from_millis(config.min_event_gap_ms)))
        };

        let policies = match config.policy {
            PolicyPreset::AppleCadence => vec![cadence(), Box::new(RunDuration)],
            PolicyPreset::EventRate => vec![event_rate(), Box::new(RunDuration)],
            PolicyPreset::All => vec![cadence(), Box::new(RunDuration), event_rate()],
        };

        Self::new(policies, config.cadence_window)
    }

    /// How many apple instants a session has to keep
    pub fn cadence_window(&self) -> usize {
        self.cadence_window
    }

    pub fn policy_names(&self) -> Vec<&'static str> {
        self.policies.iter().map(|p| p.name()).collect()
    }

    pub fn on_move(&self, last_move: Option<Instant>, now: Instant) -> Option<Violation> {
        self.policies.iter().find_map(|p| p.on_move(last_move, now))
    }

    pub fn on_apple(&self, apple_times: &VecDeque<Instant>) -> Option<Violation> {
        self.policies.iter().find_map(|p| p.on_apple(apple_times))
    }

    /// A tainted run is always rejected; otherwise the first policy with an
    /// objection decides
    pub fn review_run(&self, run: &RunSummary) -> RunVerdict {
        if let Some(violation) = run.taint {
            return RunVerdict::Rejected(RejectReason::Tainted(violation));
        }

        match self.policies.iter().find_map(|p| p.review_run(run)) {
            Some(reason) => RunVerdict::Rejected(reason),
            None => RunVerdict::Accepted,
        }
    }
}

impl fmt::Debug for AntiCheat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AntiCheat")
            .field("policies", &self.policy_names())
            .field("cadence_window", &self.cadence_window)
            .finish()
    }
}
