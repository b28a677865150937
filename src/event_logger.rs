//! Audit log of sessions, runs and integrity violations, one JSON object per
//! line, for offline review

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{error, info};

use crate::config::AuditConfig;
use crate::game::Location;

/// Types of events that can be logged
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Game connection opened
    SessionStarted {
        connection_id: String,
        user_id: String,
        nickname: String,
        client_addr: String,
    },
    /// Game connection closed
    SessionClosed {
        connection_id: String,
        user_id: String,
    },
    AppleEaten {
        connection_id: String,
        score: u32,
        location: Location,
    },
    /// First violation of a run
    IntegrityViolation {
        connection_id: String,
        user_id: String,
        nickname: String,
        client_addr: String,
        kind: String,
        detail: String,
    },
    /// Run finished, whether or not its score was kept
    RunEnded {
        connection_id: String,
        user_id: String,
        nickname: String,
        client_addr: String,
        score: u32,
        duration_ms: u128,
        outcome: RunOutcome,
        persisted: bool,
        rejection: Option<String>,
    },
}

/// How a run came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Collision,
    ScoreCeiling,
    IllegalMove,
}

/// Logged event with timestamp
#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    /// Unix timestamp in milliseconds
    timestamp_ms: u128,
    #[serde(flatten)]
    event: &'a AuditEvent,
}

/// Append-only JSON-lines writer. Disabled loggers swallow every event.
pub struct EventLogger {
    writer: Option<Mutex<BufWriter<File>>>,
}

impl EventLogger {
    pub fn new(config: &AuditConfig) -> Self {
        if !config.enabled {
            info!("Audit logging is disabled");
            return Self::disabled();
        }
        Self::open(&config.path)
    }

    /// Open `path` for appending; on failure the logger is disabled
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                info!("Audit logging enabled, writing to {}", path.display());
                Self {
                    writer: Some(Mutex::new(BufWriter::new(file))),
                }
            }
            Err(e) => {
                error!("Failed to open audit log {}: {}", path.display(), e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn log(&self, event: AuditEvent) {
        let Some(writer) = &self.writer else {
            return;
        };

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let entry = LogEntry {
            timestamp_ms,
            event: &event,
        };

        if let Ok(mut w) = writer.lock() {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }
}
