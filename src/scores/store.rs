use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    models::{GameScore, NewGameScore},
};

/// Generic persistence failure. The wrapped detail is for logs only.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("error in insert: {0}")]
    Insert(#[source] sqlx::Error),
    #[error("error in query: {0}")]
    Query(#[source] sqlx::Error),
}

/// Append-only storage of game scores
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persist a new score, assigning it a fresh unique id and a creation timestamp
    async fn save(&self, score: NewGameScore) -> Result<GameScore, StoreError>;

    /// At most `count` scores for the game, highest first unless `ascending`
    async fn get_by_game(
        &self,
        game_title: &str,
        count: u32,
        ascending: bool,
    ) -> Result<Vec<GameScore>, StoreError>;
}

/// [`ScoreStore`] backed by the `game_scores` table
pub struct PgScoreStore {
    pool: PgPool,
}

impl PgScoreStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn save(&self, score: NewGameScore) -> Result<GameScore, StoreError> {
        let record = GameScore::from_new(Uuid::new_v4().to_string(), Utc::now(), score);

        db::queries::insert_game_score(&self.pool, &record)
            .await
            .map_err(StoreError::Insert)
    }

    async fn get_by_game(
        &self,
        game_title: &str,
        count: u32,
        ascending: bool,
    ) -> Result<Vec<GameScore>, StoreError> {
        db::queries::get_scores_by_game(&self.pool, game_title, i64::from(count), ascending)
            .await
            .map_err(StoreError::Query)
    }
}
