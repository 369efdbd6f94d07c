use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A score sent by a player. Not persisted, carries no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreSubmission {
    pub game_title: String,
    pub player_id: String,
    pub score: f64,
}

/// A validated score waiting for the store to assign `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewGameScore {
    pub game_title: String,
    pub player_id: String,
    pub player_username: String,
    pub score: f64,
}

/// A recorded score. Immutable once created; a player may own many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct GameScore {
    pub id: String,
    pub game_title: String,
    pub player_id: String,
    pub player_username: String,
    pub score: f64,
    #[serde(rename = "CreatedDateTime")]
    pub created_at: DateTime<Utc>,
}

impl GameScore {
    pub fn from_new(id: String, created_at: DateTime<Utc>, score: NewGameScore) -> Self {
        Self {
            id,
            game_title: score.game_title,
            player_id: score.player_id,
            player_username: score.player_username,
            score: score.score,
            created_at,
        }
    }
}
