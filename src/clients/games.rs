use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use sqlx::PgPool;

use crate::{db, models::Game, result::ServiceResult};

/// Read-only access to the game catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameCatalog: Send + Sync {
    /// Find the game with exactly this title.
    ///
    /// Returns a 404 failure when there is no such game.
    async fn get_game_by_title(&self, title: &str) -> ServiceResult<Game>;
}

/// [`GameCatalog`] that queries a remote games service (`GET <url>?title=...`)
pub struct HttpGameCatalog {
    http_client: reqwest::Client,
    service_url: Url,
}

impl HttpGameCatalog {
    pub fn new(http_client: reqwest::Client, service_url: &str) -> Result<Self> {
        let service_url =
            Url::parse(service_url).context("GAME_SERVICE_URL must be a valid URL")?;

        Ok(Self {
            http_client,
            service_url,
        })
    }
}

#[async_trait]
impl GameCatalog for HttpGameCatalog {
    async fn get_game_by_title(&self, title: &str) -> ServiceResult<Game> {
        let response = match self
            .http_client
            .get(self.service_url.clone())
            .query(&[("title", title)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("HttpGameCatalog: get_game_by_title request error: {}", e);
                return ServiceResult::internal_error();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Game service lookup for '{}' failed: {}", title, status);
            return ServiceResult::failure(status.as_u16(), "Bad request");
        }

        match response.json::<Game>().await {
            Ok(game) => ServiceResult::ok(game),
            Err(e) => {
                tracing::error!("HttpGameCatalog: failed to decode game '{}': {}", title, e);
                ServiceResult::internal_error()
            }
        }
    }
}

/// Lookup failure in the local `games` table
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no game titled '{0}'")]
    NotFound(String),
    #[error("error in query: {0}")]
    Query(#[source] sqlx::Error),
}

impl CatalogError {
    fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Query(_) => 500,
        }
    }
}

/// [`GameCatalog`] reading the local `games` table
pub struct PgGameCatalog {
    pool: PgPool,
}

impl PgGameCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find(&self, title: &str) -> Result<Game, CatalogError> {
        db::queries::find_game_by_title(&self.pool, title)
            .await
            .map_err(CatalogError::Query)?
            .ok_or_else(|| CatalogError::NotFound(title.to_string()))
    }
}

#[async_trait]
impl GameCatalog for PgGameCatalog {
    async fn get_game_by_title(&self, title: &str) -> ServiceResult<Game> {
        match self.find(title).await {
            Ok(game) => ServiceResult::ok(game),
            Err(e @ CatalogError::NotFound(_)) => {
                tracing::debug!("PgGameCatalog: {}", e);
                ServiceResult::failure(e.status(), "Not found")
            }
            Err(e) => {
                tracing::error!("PgGameCatalog get_game_by_title error: {}", e);
                ServiceResult::failure(e.status(), crate::result::INTERNAL_ERROR)
            }
        }
    }
}
