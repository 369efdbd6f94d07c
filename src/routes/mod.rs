pub mod games;
pub mod health;
pub mod scores;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scores", post(scores::submit_score).get(scores::get_top_scores))
        .route("/games", get(games::get_game))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{
        clients::{GameCatalog, UserDirectory},
        config::Config,
        scores::{GameScoreService, ScoreStore},
    };
    use axum::{body::Body, http::Request, http::StatusCode, response::Response};
    use tower::ServiceExt;

    /// Full router over the given collaborators; the game catalog serves both
    /// the orchestrator and the games endpoint.
    pub fn test_app(
        jwt_secret: &str,
        store: impl ScoreStore + 'static,
        users: impl UserDirectory + 'static,
        games: impl GameCatalog + 'static,
    ) -> Router {
        let games: Arc<dyn GameCatalog> = Arc::new(games);
        let state = Arc::new(AppState {
            config: Config::for_tests(jwt_secret),
            scores: GameScoreService::new(Arc::new(store), Arc::new(users), games.clone()),
            games,
        });

        create_routes().with_state(state)
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app(
            "secret",
            crate::scores::store::MockScoreStore::new(),
            crate::clients::users::MockUserDirectory::new(),
            crate::clients::games::MockGameCatalog::new(),
        );

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "game-scores-backend");
    }
}
