use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Player ID in the user directory
    pub exp: usize,  // Expiration time
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Extractor for authenticated players from bearer JWT tokens
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = (StatusCode, &'static str);

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let app_state = Arc::<AppState>::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(String::from);

        async move {
            let unauthorized = (StatusCode::UNAUTHORIZED, "Unauthorized");
            let token = token.ok_or(unauthorized)?;

            let claims = decode_claims(&token, &app_state.config.security.jwt_secret)
                .map_err(|e| {
                    tracing::debug!("Rejected bearer token: {}", e);
                    unauthorized
                })?;

            if claims.sub.is_empty() {
                return Err(unauthorized);
            }

            Ok(AuthenticatedUser {
                user_id: claims.sub,
            })
        }
    }
}

/// Validate a token's signature and expiry and return its claims
pub fn decode_claims(token: &str, jwt_secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
