use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::{models::BasicUserData, result::ServiceResult};

/// Read-only access to the players known to the user directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a player by id.
    ///
    /// A missing player is reported as a 404 failure, distinct from transport
    /// or auth errors which carry a 5xx (or the directory's own) status.
    async fn get_user_by_id(&self, id: &str) -> ServiceResult<BasicUserData>;
}

/// User record as returned by the directory's management API
#[derive(Debug, Deserialize)]
struct DirectoryUser {
    username: Option<String>,
}

/// Error body returned by the directory on non-success responses
#[derive(Debug, Deserialize)]
struct DirectoryError {
    message: Option<String>,
}

/// [`UserDirectory`] backed by a management REST API (`GET /api/v2/users/{id}`)
pub struct HttpUserDirectory {
    http_client: reqwest::Client,
    base_url: Url,
    api_token: String,
}

impl HttpUserDirectory {
    pub fn new(http_client: reqwest::Client, base_url: &str, api_token: String) -> Result<Self> {
        let base_url = Url::parse(base_url).context("USER_DIRECTORY_URL must be a valid URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("USER_DIRECTORY_URL must be a base URL, got {}", base_url);
        }

        Ok(Self {
            http_client,
            base_url,
            api_token,
        })
    }

    fn user_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "v2", "users", id]);
        }
        url
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user_by_id(&self, id: &str) -> ServiceResult<BasicUserData> {
        let response = match self
            .http_client
            .get(self.user_url(id))
            .bearer_auth(&self.api_token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("HttpUserDirectory: get_user_by_id request error: {}", e);
                return ServiceResult::internal_error();
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "User directory lookup failed: {} - {}",
                status,
                error_text
            );
            let message = serde_json::from_str::<DirectoryError>(&error_text)
                .ok()
                .and_then(|e| e.message)
                .or_else(|| status.canonical_reason().map(String::from))
                .unwrap_or_else(|| "Unknown error".to_string());
            return ServiceResult::failure(status.as_u16(), message);
        }

        match response.json::<DirectoryUser>().await {
            Ok(DirectoryUser {
                username: Some(username),
            }) => ServiceResult::ok(BasicUserData {
                id: id.to_string(),
                username,
            }),
            Ok(_) => ServiceResult::failure(500, "user did not have username field"),
            Err(e) => {
                tracing::error!("HttpUserDirectory: failed to decode user {}: {}", id, e);
                ServiceResult::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::spawn_stub_server;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    async fn lookup(id: &str) -> ServiceResult<BasicUserData> {
        let app = Router::new().route(
            "/api/v2/users/{id}",
            get(|Path(id): Path<String>, headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|h| h.to_str().ok())
                    == Some("Bearer directory-token");
                if !authorized {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "bad token" })));
                }
                match id.as_str() {
                    "user-alice" => (
                        StatusCode::OK,
                        Json(json!({ "user_id": "user-alice", "username": "alice" })),
                    ),
                    "nameless" => (StatusCode::OK, Json(json!({ "user_id": "nameless" }))),
                    "broken" => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(json!({ "message": "directory is down" })),
                    ),
                    _ => (
                        StatusCode::NOT_FOUND,
                        Json(json!({
                            "statusCode": 404,
                            "error": "Not Found",
                            "message": "The user does not exist.",
                            "errorCode": "inexistent_user"
                        })),
                    ),
                }
            }),
        );
        let base_url = spawn_stub_server(app).await;
        let directory = HttpUserDirectory::new(
            reqwest::Client::new(),
            &base_url,
            "directory-token".to_string(),
        )
        .unwrap();

        directory.get_user_by_id(id).await
    }

    #[tokio::test]
    async fn test_returns_basic_user_data_for_existing_user() {
        let result = lookup("user-alice").await;
        assert_eq!(
            result,
            ServiceResult::ok(BasicUserData {
                id: "user-alice".to_string(),
                username: "alice".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_returns_directory_status_and_message_when_missing() {
        let result = lookup("ghost").await;
        assert_eq!(
            result,
            ServiceResult::failure(404, "The user does not exist.")
        );
    }

    #[tokio::test]
    async fn test_returns_500_when_username_missing() {
        let result = lookup("nameless").await;
        assert_eq!(
            result,
            ServiceResult::failure(500, "user did not have username field")
        );
    }

    #[tokio::test]
    async fn test_passes_through_upstream_failure_status() {
        let result = lookup("broken").await;
        assert_eq!(result.status(), 503);
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_returns_internal_error_when_unreachable() {
        let directory = HttpUserDirectory::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1",
            "directory-token".to_string(),
        )
        .unwrap();

        let result = directory.get_user_by_id("anyone").await;
        assert_eq!(result, ServiceResult::internal_error());
    }

    #[test]
    fn test_user_url_escapes_id() {
        let directory = HttpUserDirectory::new(
            reqwest::Client::new(),
            "https://tenant.example.com/",
            String::new(),
        )
        .unwrap();

        assert_eq!(
            directory.user_url("team a/b").as_str(),
            "https://tenant.example.com/api/v2/users/team%20a%2Fb"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(HttpUserDirectory::new(reqwest::Client::new(), "not a url", String::new()).is_err());
    }
}
