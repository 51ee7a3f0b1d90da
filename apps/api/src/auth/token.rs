//! HS256 access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::INVALID_CREDENTIALS;
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}

pub fn issue_token(
    user_id: Uuid,
    role: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign access token: {e}")))
}

/// Bad signature, malformed token or expiry all map to the same 401.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected access token: {e}");
        AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_and_verify() {
        let id = Uuid::new_v4();
        let token = issue_token(id, "administrator", SECRET, 30).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), id);
        assert_eq!(claims.role, "administrator");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = issue_token(Uuid::new_v4(), "organization", SECRET, 30).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        // well past the default 60s leeway
        let token = issue_token(Uuid::new_v4(), "course_creator", SECRET, -10).unwrap();
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert!(verify_token("not.a.token", SECRET).is_err());
    }
}
