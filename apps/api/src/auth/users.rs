use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::issue_token;
use crate::config::Config;
use crate::errors::{conflict_on_unique, require_non_empty, AppError};
use crate::models::user::{Role, UserResponse, UserRow};

const EMAIL_TAKEN: &str = "User with this email already exists";
const BAD_LOGIN: &str = "Incorrect email or password";

const USER_COLUMNS: &str =
    "id, email, password_hash, role, full_name, organization_name, created_at";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PersonRegistration {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationRegistration {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub organization_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

/// A validated registration, ready to store.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub email: String,
    pub password: &'a str,
    pub role: Role,
    pub full_name: Option<&'a str>,
    pub organization_name: Option<&'a str>,
}

impl<'a> NewUser<'a> {
    pub fn person(req: &'a PersonRegistration, role: Role) -> Result<Self, AppError> {
        require_non_empty("full_name", &req.full_name)?;
        Ok(Self {
            email: check_credentials(&req.credentials)?,
            password: &req.credentials.password,
            role,
            full_name: Some(req.full_name.trim()),
            organization_name: None,
        })
    }

    pub fn organization(req: &'a OrganizationRegistration) -> Result<Self, AppError> {
        require_non_empty("organization_name", &req.organization_name)?;
        Ok(Self {
            email: check_credentials(&req.credentials)?,
            password: &req.credentials.password,
            role: Role::Organization,
            full_name: None,
            organization_name: Some(req.organization_name.trim()),
        })
    }
}

/// Returns the normalised email.
fn check_credentials(credentials: &Credentials) -> Result<String, AppError> {
    let email = normalize_email(&credentials.email);
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    require_non_empty("password", &credentials.password)?;
    if credentials.password != credentials.confirm_password {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }
    Ok(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(pool: &PgPool, user: NewUser<'_>) -> Result<UserResponse, AppError> {
    let password_hash = hash_password(user.password).await?;

    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (id, email, password_hash, role, full_name, organization_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&user.email)
    .bind(&password_hash)
    .bind(user.role.as_str())
    .bind(user.full_name)
    .bind(user.organization_name)
    .fetch_one(pool)
    .await
    .map_err(|e| match conflict_on_unique(e, EMAIL_TAKEN) {
        AppError::Conflict(msg) => AppError::Validation(msg),
        other => other,
    })?;

    info!("Registered {} account {}", row.role, row.id);
    Ok(row.into())
}

/// Unknown email and wrong password fail identically.
pub async fn login(pool: &PgPool, config: &Config, req: &LoginRequest) -> Result<TokenResponse, AppError> {
    let user = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(normalize_email(&req.email))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized(BAD_LOGIN.to_string()))?;

    if !verify_password(&req.password, &user.password_hash).await? {
        return Err(AppError::Unauthorized(BAD_LOGIN.to_string()));
    }

    let access_token = issue_token(
        user.id,
        &user.role,
        &config.jwt_secret,
        config.access_token_expire_minutes,
    )?;
    info!("User {} logged in", user.id);

    Ok(TokenResponse {
        access_token,
        token_type: "bearer",
        user: user.into(),
    })
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, AppError> {
    Ok(sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(email: &str, password: &str, confirm: &str, name: &str) -> PersonRegistration {
        PersonRegistration {
            credentials: Credentials {
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm.to_string(),
            },
            full_name: name.to_string(),
        }
    }

    #[test]
    fn test_registration_normalises_email() {
        let req = person("  Ada@Example.COM ", "pw123456", "pw123456", "Ada Lovelace");
        let user = NewUser::person(&req, Role::CourseCreator).unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.full_name, Some("Ada Lovelace"));
        assert_eq!(user.role, Role::CourseCreator);
    }

    #[test]
    fn test_password_mismatch_is_rejected() {
        let req = person("ada@example.com", "pw123456", "pw654321", "Ada");
        let err = NewUser::person(&req, Role::Administrator).unwrap_err();
        assert!(err.to_string().contains("Passwords do not match"));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let req = person("not-an-email", "pw", "pw", "Ada");
        assert!(matches!(
            NewUser::person(&req, Role::Administrator),
            Err(AppError::Validation(_))
        ));

        let req = person("ada@example.com", "pw", "pw", "  ");
        assert!(NewUser::person(&req, Role::Administrator).is_err());
    }

    #[test]
    fn test_organization_registration_from_json() {
        let req: OrganizationRegistration = serde_json::from_str(
            r#"{"email": "ops@acme.io", "password": "x1", "confirm_password": "x1",
                "organization_name": "Acme"}"#,
        )
        .unwrap();
        let user = NewUser::organization(&req).unwrap();
        assert_eq!(user.role, Role::Organization);
        assert_eq!(user.organization_name, Some("Acme"));
        assert!(user.full_name.is_none());
    }
}
