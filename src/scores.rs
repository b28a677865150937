//! High score persistence

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use crate::error::PersistenceError;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One finished, accepted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub nickname: String,
    pub points: u32,
}

/// Best score of one nickname
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub nickname: String,
    pub score: i64,
}

/// Append-only score store
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Append a record; the same nickname may appear any number of times
    async fn submit(&self, record: &ScoreRecord) -> PersistenceResult<()>;

    /// One row per nickname with its best score, best first, ties by
    /// nickname, at most `limit` rows
    async fn top_scores(&self, limit: usize) -> PersistenceResult<Vec<LeaderboardEntry>>;
}

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    /// Open (creating the file if needed) and migrate
    pub async fn connect(database_url: &str) -> PersistenceResult<Self> {
        let options = database_url
            .parse::<SqliteConnectOptions>()?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and run migrations on it
    pub async fn from_pool(pool: SqlitePool) -> PersistenceResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn submit(&self, record: &ScoreRecord) -> PersistenceResult<()> {
        sqlx::query("INSERT INTO scores (nickname, points) VALUES (?, ?)")
            .bind(&record.nickname)
            .bind(i64::from(record.points))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> PersistenceResult<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT nickname, MAX(points) AS score FROM scores \
             GROUP BY nickname ORDER BY score DESC, nickname ASC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// In-process store for tests and throwaway deployments
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record submitted so far, in order
    pub fn records(&self) -> Vec<ScoreRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn submit(&self, record: &ScoreRecord) -> PersistenceResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> PersistenceResult<Vec<LeaderboardEntry>> {
        let mut best: Vec<LeaderboardEntry> = Vec::new();
        for record in self.records() {
            let points = i64::from(record.points);
            match best.iter_mut().find(|e| e.nickname == record.nickname) {
                Some(entry) => entry.score = entry.score.max(points),
                None => best.push(LeaderboardEntry {
                    nickname: record.nickname,
                    score: points,
                }),
            }
        }

        best.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.nickname.cmp(&b.nickname)));
        best.truncate(limit);
        Ok(best)
    }
}
