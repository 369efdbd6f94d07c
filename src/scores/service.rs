use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::Instant;

use crate::{
    clients::{GameCatalog, UserDirectory},
    models::{GameScore, NewGameScore, ScoreSubmission},
    result::{Failure, ServiceResult},
};

use super::store::ScoreStore;

pub const USER_NOT_FOUND: &str = "User with the given Id does not exist.";
pub const GAME_NOT_FOUND: &str = "Game with the given Title does not exist.";
/// Returned when the deadline expires while the insert is in flight
pub const SAVE_OUTCOME_UNKNOWN: &str =
    "Score submission timed out while saving; the score may have been recorded.";

/// Records new scores after validating them against the user directory and
/// the game catalog, and serves top-score queries.
///
/// Every collaborator fault is translated into a [`ServiceResult`] at its
/// call site; nothing is raised past this type.
#[derive(Clone)]
pub struct GameScoreService {
    store: Arc<dyn ScoreStore>,
    users: Arc<dyn UserDirectory>,
    games: Arc<dyn GameCatalog>,
}

impl GameScoreService {
    pub fn new(
        store: Arc<dyn ScoreStore>,
        users: Arc<dyn UserDirectory>,
        games: Arc<dyn GameCatalog>,
    ) -> Self {
        Self {
            store,
            users,
            games,
        }
    }

    /// Save a new score, assigning it a unique id and filling in
    /// `player_username` and the catalog's canonical game title.
    ///
    /// Unknown player or game yields a 400 failure; any other collaborator
    /// fault yields a 500 "Internal error". Identical submissions create
    /// distinct records.
    pub async fn submit_score(&self, submission: ScoreSubmission) -> ServiceResult<GameScore> {
        self.submit(submission, None).await
    }

    /// Same as [`GameScoreService::submit_score`], abandoning the in-flight
    /// collaborator call once `timeout` has elapsed.
    pub async fn submit_score_within(
        &self,
        submission: ScoreSubmission,
        timeout: Duration,
    ) -> ServiceResult<GameScore> {
        self.submit(submission, Some(Instant::now() + timeout)).await
    }

    async fn submit(
        &self,
        submission: ScoreSubmission,
        deadline: Option<Instant>,
    ) -> ServiceResult<GameScore> {
        // Step 1: the player must exist
        let Some(user_result) =
            within(deadline, self.users.get_user_by_id(&submission.player_id)).await
        else {
            tracing::warn!("Timed out looking up player {}", submission.player_id);
            return ServiceResult::internal_error();
        };
        let user = match user_result.into_result() {
            Ok(user) => user,
            Err(failure) => return reject_lookup(failure, "player", USER_NOT_FOUND),
        };

        // Step 2: the game must exist
        let Some(game_result) =
            within(deadline, self.games.get_game_by_title(&submission.game_title)).await
        else {
            tracing::warn!("Timed out looking up game '{}'", submission.game_title);
            return ServiceResult::internal_error();
        };
        let game = match game_result.into_result() {
            Ok(game) => game,
            Err(failure) => return reject_lookup(failure, "game", GAME_NOT_FOUND),
        };

        // Step 3: the catalog's title is canonical
        let new_score = NewGameScore {
            game_title: game.title,
            player_id: user.id,
            player_username: user.username,
            score: submission.score,
        };

        // Step 4: persist
        match within(deadline, self.store.save(new_score)).await {
            Some(Ok(saved)) => {
                tracing::info!(
                    "Saved score {} for player {} on '{}'",
                    saved.id,
                    saved.player_id,
                    saved.game_title
                );
                ServiceResult::ok(saved)
            }
            Some(Err(e)) => {
                tracing::error!("Failed to save score: {}", e);
                ServiceResult::internal_error()
            }
            None => {
                tracing::error!(
                    "Timed out saving score for player {}; write may have landed",
                    submission.player_id
                );
                ServiceResult::failure(500, SAVE_OUTCOME_UNKNOWN)
            }
        }
    }

    /// The `count` highest scores recorded for a game
    pub async fn get_top_scores_for_game(
        &self,
        game_title: &str,
        count: u32,
    ) -> ServiceResult<Vec<GameScore>> {
        match self.store.get_by_game(game_title, count, false).await {
            Ok(scores) => ServiceResult::ok(scores),
            Err(e) => {
                tracing::error!("Failed to query scores for '{}': {}", game_title, e);
                ServiceResult::internal_error()
            }
        }
    }
}

/// A missing reference inside a write is a bad request, anything else is
/// reported as an internal error without the upstream message.
fn reject_lookup<T>(failure: Failure, what: &str, not_found_message: &str) -> ServiceResult<T> {
    if failure.status == 404 {
        tracing::warn!("Rejected score submission: {} not found", what);
        ServiceResult::failure(400, not_found_message)
    } else {
        tracing::error!(
            "{} lookup failed with status {}: {}",
            what,
            failure.status,
            failure.message
        );
        ServiceResult::internal_error()
    }
}

async fn within<F: Future>(deadline: Option<Instant>, future: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}
