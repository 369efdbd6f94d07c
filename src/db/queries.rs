use sqlx::{PgPool, Result};

use crate::models::{Game, GameScore};

// Game queries
pub async fn find_game_by_title(pool: &PgPool, title: &str) -> Result<Option<Game>> {
    sqlx::query_as::<_, Game>(
        "SELECT title, added_at, times_played FROM games WHERE title = $1",
    )
    .bind(title)
    .fetch_optional(pool)
    .await
}

// Score queries
pub async fn insert_game_score(pool: &PgPool, score: &GameScore) -> Result<GameScore> {
    sqlx::query_as::<_, GameScore>(
        r#"
        INSERT INTO game_scores (id, game_title, player_id, player_username, score, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, game_title, player_id, player_username, score, created_at
        "#,
    )
    .bind(&score.id)
    .bind(&score.game_title)
    .bind(&score.player_id)
    .bind(&score.player_username)
    .bind(score.score)
    .bind(score.created_at)
    .fetch_one(pool)
    .await
}

/// Scores for a game, best first unless `ascending`
pub async fn get_scores_by_game(
    pool: &PgPool,
    game_title: &str,
    count: i64,
    ascending: bool,
) -> Result<Vec<GameScore>> {
    sqlx::query_as::<_, GameScore>(scores_by_game_sql(ascending))
        .bind(game_title)
        .bind(count)
        .fetch_all(pool)
        .await
}

fn scores_by_game_sql(ascending: bool) -> &'static str {
    if ascending {
        r#"
        SELECT id, game_title, player_id, player_username, score, created_at
        FROM game_scores
        WHERE game_title = $1
        ORDER BY score ASC, created_at ASC
        LIMIT $2
        "#
    } else {
        r#"
        SELECT id, game_title, player_id, player_username, score, created_at
        FROM game_scores
        WHERE game_title = $1
        ORDER BY score DESC, created_at ASC
        LIMIT $2
        "#
    }
}
