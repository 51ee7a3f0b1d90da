// Accounts: registration per role, password login, bearer-token identity.

pub mod handlers;
pub mod password;
pub mod token;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};

use crate::errors::AppError;
use crate::models::user::UserResponse;
use crate::state::AppState;

pub(crate) const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// The account behind a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserResponse);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        let token = bearer_token(header_value)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = token::verify_token(token, &state.config.jwt_secret)?;
        let user = users::find_by_id(&state.db, claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        Ok(AuthUser(user.into()))
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer  abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
