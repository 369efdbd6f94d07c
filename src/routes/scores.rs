use crate::{
    auth::AuthenticatedUser,
    models::{GameScore, ScoreSubmission},
    result::{Failure, FieldError, ServiceResult},
    AppState,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct TopScoresQuery {
    pub game: Option<String>,
    pub count: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopScoresResponse {
    pub data: Vec<GameScore>,
}

/// Record a score for the authenticated player
pub async fn submit_score(
    user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json || body.is_empty() {
        return bad_request();
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Rejected unparseable score body: {}", e);
            return bad_request();
        }
    };
    if !payload.is_object() {
        return bad_request();
    }

    let submission = match validate_body(&payload, &user.user_id).into_result() {
        Ok(submission) => submission,
        Err(failure) => return failure.into_response(),
    };

    tracing::info!(
        "Player {} submitting score {} for '{}'",
        submission.player_id,
        submission.score,
        submission.game_title
    );

    let result = state
        .scores
        .submit_score_within(submission, state.config.submit_timeout())
        .await;
    if !result.is_success() {
        tracing::warn!(
            "Score submission for player {} failed with status {}",
            user.user_id,
            result.status()
        );
    }
    result.into_response()
}

/// Highest scores for a game: `?game=<title>&count=<n>`
pub async fn get_top_scores(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopScoresQuery>,
) -> Response {
    let Some(game) = query.game else {
        return Failure::new(400, "Query parameter 'game' is required").into_response();
    };
    tracing::debug!("Requested scores for game: {}", game);

    let count = match parse_count(query.count.as_deref(), state.config.scores.default_count) {
        Some(count) => count,
        None => {
            return Failure::new(400, "Query parameter 'count' must be a positive number")
                .into_response()
        }
    };

    match state
        .scores
        .get_top_scores_for_game(&game, count)
        .await
        .into_result()
    {
        Ok(scores) => (StatusCode::OK, Json(TopScoresResponse { data: scores })).into_response(),
        Err(failure) => failure.into_response(),
    }
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "Bad request").into_response()
}

/// Check the body fields and build a submission for `player_id`
fn validate_body(body: &Value, player_id: &str) -> ServiceResult<ScoreSubmission> {
    let mut errors = Vec::new();

    let game_title = body.get("GameTitle").and_then(Value::as_str);
    if game_title.is_none() {
        errors.push(FieldError::new("GameTitle", "GameTitle is required."));
    }
    let score = body.get("Score").and_then(Value::as_f64);
    if score.is_none() {
        errors.push(FieldError::new("Score", "Score is required."));
    }

    match (game_title, score) {
        (Some(game_title), Some(score)) => ServiceResult::ok(ScoreSubmission {
            game_title: game_title.to_string(),
            player_id: player_id.to_string(),
            score,
        }),
        _ => ServiceResult::invalid(400, "Invalid request", errors),
    }
}

/// `None` when `raw` is present but not a positive integer
fn parse_count(raw: Option<&str>, default: u32) -> Option<u32> {
    match raw {
        None => Some(default),
        Some(raw) => raw.trim().parse::<u32>().ok().filter(|count| *count > 0),
    }
}
