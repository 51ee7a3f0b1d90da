//! Axum route handlers for the AI endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::generation::chatbot::{answer_question, LessonBotRequest, LessonBotResponse};
use crate::generation::pipeline::{generate_course, AddCourseRequest, CourseGenerationResponse};
use crate::state::AppState;

/// POST /api/v1/courses/ai/add-course
pub async fn handle_add_course(
    State(state): State<AppState>,
    Json(req): Json<AddCourseRequest>,
) -> Result<(StatusCode, Json<CourseGenerationResponse>), AppError> {
    let response = generate_course(&state.db, state.llm.as_ref(), &req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/lessons/ai/bot
pub async fn handle_lesson_bot(
    State(state): State<AppState>,
    Json(req): Json<LessonBotRequest>,
) -> Result<Json<LessonBotResponse>, AppError> {
    Ok(Json(answer_question(state.llm.as_ref(), &req).await?))
}
