use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A game known to the catalog. Only `title` matters to score submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Game {
    pub title: String,
    #[serde(rename = "AddedDateTime")]
    pub added_at: DateTime<Utc>,
    pub times_played: i64,
}
