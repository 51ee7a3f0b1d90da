use axum::{extract::State, http::StatusCode, Json};

use crate::auth::users::{
    self, LoginRequest, NewUser, OrganizationRegistration, PersonRegistration, TokenResponse,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{Role, UserResponse};
use crate::state::AppState;

/// POST /api/v1/auth/register/administrator
pub async fn handle_register_administrator(
    State(state): State<AppState>,
    Json(req): Json<PersonRegistration>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = users::register(&state.db, NewUser::person(&req, Role::Administrator)?).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/register/course-creator
pub async fn handle_register_course_creator(
    State(state): State<AppState>,
    Json(req): Json<PersonRegistration>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = users::register(&state.db, NewUser::person(&req, Role::CourseCreator)?).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/register/organization
pub async fn handle_register_organization(
    State(state): State<AppState>,
    Json(req): Json<OrganizationRegistration>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = users::register(&state.db, NewUser::organization(&req)?).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    Ok(Json(users::login(&state.db, &state.config, &req).await?))
}

/// GET /api/v1/auth/me
pub async fn handle_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user)
}
