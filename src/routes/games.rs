use crate::{result::Failure, AppState};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct GameQuery {
    pub title: Option<String>,
}

/// Look up a single game by exact title: `?title=<title>`
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Response {
    let Some(title) = query.title else {
        return Failure::new(400, "Query parameter 'title' is required").into_response();
    };

    state.games.get_game_by_title(&title).await.into_response()
}
