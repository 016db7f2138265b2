//! # Authenticated Owner Extraction
//!
//! Sign-up, sign-in and token issuance live in the hosted auth provider; the
//! backend only *verifies* the HS256 bearer token it is handed and pulls the
//! owner id out of the `sub` claim. Every protected handler takes an
//! [`AuthUser`] parameter, so requests without a valid token are rejected
//! with 401 before any domain code runs.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::AppState;

/// Claims expected in every access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the owner's user id.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// The authenticated owner of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = DomainError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                DomainError::Unauthenticated("missing authorization header".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            DomainError::Unauthenticated("authorization header must be a bearer token".to_string())
        })?;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            DomainError::Unauthenticated("invalid or expired token".to_string())
        })?;

        if token_data.claims.sub.is_empty() {
            return Err(DomainError::Unauthenticated(
                "token is missing a subject".to_string(),
            ));
        }

        Ok(AuthUser {
            user_id: token_data.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(sub: &str, secret: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = make_token("user-1", "secret", exp);

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, "user-1");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = make_token("user-1", "secret", exp);

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = make_token("user-1", "secret", exp);

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
