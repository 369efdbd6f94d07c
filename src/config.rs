use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, str::FromStr, time::Duration};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub users: UserDirectoryConfig,
    pub games: GameServiceConfig,
    pub scores: ScoresConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDirectoryConfig {
    pub url: String,
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameServiceConfig {
    /// Remote games service; the local `games` table is used when unset
    pub service_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoresConfig {
    pub submit_timeout_secs: u64,
    pub default_count: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        };

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a number")?,
        };

        let security = SecurityConfig {
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
        };

        let users = UserDirectoryConfig {
            url: env::var("USER_DIRECTORY_URL")
                .context("USER_DIRECTORY_URL must be set")?,
            api_token: env::var("USER_DIRECTORY_TOKEN")
                .context("USER_DIRECTORY_TOKEN must be set")?,
        };

        let games = GameServiceConfig {
            service_url: env::var("GAME_SERVICE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        };

        let scores = ScoresConfig {
            submit_timeout_secs: parse_positive(
                "SUBMIT_TIMEOUT_SECS",
                env::var("SUBMIT_TIMEOUT_SECS").ok(),
                10,
            )?,
            default_count: parse_positive(
                "DEFAULT_SCORE_COUNT",
                env::var("DEFAULT_SCORE_COUNT").ok(),
                10,
            )?,
        };

        Ok(Config {
            database,
            server,
            security,
            users,
            games,
            scores,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.server.http_timeout_secs)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.scores.submit_timeout_secs)
    }
}

/// Parse `raw` as a number greater than zero, falling back to `default` when unset
fn parse_positive<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: T = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a number", name))?;
    if value == T::default() {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(value)
}

#[cfg(test)]
impl Config {
    /// Configuration for in-process tests; nothing here is dialed
    pub fn for_tests(jwt_secret: &str) -> Self {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/game_scores_test".to_string(),
                max_connections: 1,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                http_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: jwt_secret.to_string(),
            },
            users: UserDirectoryConfig {
                url: "http://127.0.0.1:1".to_string(),
                api_token: String::new(),
            },
            games: GameServiceConfig { service_url: None },
            scores: ScoresConfig {
                submit_timeout_secs: 5,
                default_count: 10,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr() {
        let mut config = Config::for_tests("secret");
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_timeouts() {
        let config = Config::for_tests("secret");

        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.submit_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_positive_uses_default_when_unset() {
        let value: u32 = parse_positive("DEFAULT_SCORE_COUNT", None, 10).unwrap();
        assert_eq!(value, 10);
    }

    #[test]
    fn test_parse_positive_reads_value() {
        let value: u64 = parse_positive("SUBMIT_TIMEOUT_SECS", Some(" 3 ".to_string()), 10).unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_parse_positive_rejects_malformed_value() {
        let err = parse_positive::<u64>("SUBMIT_TIMEOUT_SECS", Some("ten".to_string()), 10)
            .unwrap_err();
        assert_eq!(err.to_string(), "SUBMIT_TIMEOUT_SECS must be a number");
    }

    #[test]
    fn test_parse_positive_rejects_zero() {
        let err = parse_positive::<u32>("DEFAULT_SCORE_COUNT", Some("0".to_string()), 10)
            .unwrap_err();
        assert_eq!(err.to_string(), "DEFAULT_SCORE_COUNT must be greater than zero");
    }

    #[test]
    fn test_parse_positive_rejects_negative() {
        assert!(parse_positive::<u32>("DEFAULT_SCORE_COUNT", Some("-5".to_string()), 10).is_err());
    }
}
