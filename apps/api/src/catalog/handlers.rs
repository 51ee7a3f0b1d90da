use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::combined::{
    self, CombineCoursesRequest, CombinedTrendingRequest, EditCombinedCourseRequest,
};
use crate::catalog::courses::{
    self, CourseIdRequest, CourseSegmentsRequest, EditCourseRequest, EditTrendingRequest,
};
use crate::catalog::domains::{
    self, AddDomainRequest, DomainCoursesRequest, DomainSegmentsRequest, UpdateDemandRequest,
    UpdateDomainRequest,
};
use crate::catalog::modules::{
    self, CourseModules, UpdateModuleContentRequest, UpdateOutlineRequest,
};
use crate::catalog::segments::{
    self, AddSegmentRequest, DeleteSegmentRequest, SegmentCreated, UpdateSegmentRequest,
};
use crate::catalog::{lessons, MessageResponse};
use crate::errors::AppError;
use crate::models::combined_course::CombinedCourseRow;
use crate::models::course::{CourseRow, CourseSummaryRow};
use crate::models::domain::DomainRow;
use crate::models::lesson::LessonRow;
use crate::models::module::CourseOutlineRow;
use crate::models::segment::SegmentRow;
use crate::state::AppState;

// Missing query parameters arrive as empty strings and are rejected with 400
// by the operations themselves.

#[derive(Deserialize)]
pub struct SegmentQuery {
    #[serde(default)]
    pub segment_id: String,
}

#[derive(Deserialize)]
pub struct CourseQuery {
    #[serde(default)]
    pub course_id: String,
}

#[derive(Deserialize)]
pub struct DomainQuery {
    #[serde(default)]
    pub domain_id: String,
}

#[derive(Deserialize)]
pub struct DomainCourseQuery {
    #[serde(default)]
    pub domain_id: String,
    #[serde(default)]
    pub course_id: String,
}

#[derive(Deserialize)]
pub struct LessonsQuery {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub module_id: String,
}

#[derive(Serialize)]
pub struct CombinedCourseCreated {
    pub message: &'static str,
    pub combined_course: CombinedCourseRow,
}

// ──────────────────────────────────────────────
// Courses
// ──────────────────────────────────────────────

/// GET /api/v1/courses/get-courses
pub async fn handle_list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseSummaryRow>>, AppError> {
    Ok(Json(courses::list_courses(&state.db).await?))
}

/// GET /api/v1/courses/get-courses-by-segments
pub async fn handle_courses_by_segment(
    State(state): State<AppState>,
    Query(params): Query<SegmentQuery>,
) -> Result<Json<Vec<CourseRow>>, AppError> {
    Ok(Json(
        courses::courses_by_segment(&state.db, &params.segment_id).await?,
    ))
}

/// PUT /api/v1/courses/edit-trending
pub async fn handle_edit_trending(
    State(state): State<AppState>,
    Json(req): Json<EditTrendingRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    courses::set_trending(&state.db, &req).await?;
    Ok(Json(MessageResponse::new("Course updated successfully")))
}

/// PUT /api/v1/courses/update-courses
pub async fn handle_update_course(
    State(state): State<AppState>,
    Json(req): Json<EditCourseRequest>,
) -> Result<Json<CourseRow>, AppError> {
    Ok(Json(courses::update_course(&state.db, &req).await?))
}

/// DELETE /api/v1/courses/delete-courses
pub async fn handle_delete_course(
    State(state): State<AppState>,
    Json(req): Json<CourseIdRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    courses::delete_course(&state.db, &req.course_id).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

/// POST /api/v1/courses/add-segment-to-course
pub async fn handle_add_course_segments(
    State(state): State<AppState>,
    Json(req): Json<CourseSegmentsRequest>,
) -> Result<Json<CourseRow>, AppError> {
    Ok(Json(courses::add_segments(&state.db, &req).await?))
}

/// POST /api/v1/courses/remove-segment-from-course
pub async fn handle_remove_course_segments(
    State(state): State<AppState>,
    Json(req): Json<CourseSegmentsRequest>,
) -> Result<Json<CourseRow>, AppError> {
    Ok(Json(courses::remove_segments(&state.db, &req).await?))
}

// ──────────────────────────────────────────────
// Combined courses
// ──────────────────────────────────────────────

/// POST /api/v1/courses/combine-courses
pub async fn handle_combine_courses(
    State(state): State<AppState>,
    Json(req): Json<CombineCoursesRequest>,
) -> Result<(StatusCode, Json<CombinedCourseCreated>), AppError> {
    let combined_course = combined::create_combined_course(&state.db, &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CombinedCourseCreated {
            message: "Courses combined successfully",
            combined_course,
        }),
    ))
}

/// GET /api/v1/courses/combined-courses
pub async fn handle_list_combined(
    State(state): State<AppState>,
) -> Result<Json<Vec<CombinedCourseRow>>, AppError> {
    Ok(Json(combined::list_combined_courses(&state.db).await?))
}

/// GET /api/v1/courses/combined-courses/:id
pub async fn handle_get_combined(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CombinedCourseRow>, AppError> {
    Ok(Json(combined::get_combined_course(&state.db, &id).await?))
}

/// PUT /api/v1/courses/combined-courses
pub async fn handle_update_combined(
    State(state): State<AppState>,
    Json(req): Json<EditCombinedCourseRequest>,
) -> Result<Json<CombinedCourseRow>, AppError> {
    Ok(Json(combined::update_combined_course(&state.db, &req).await?))
}

/// PUT /api/v1/courses/combined-courses/trending-popular
pub async fn handle_combined_trending(
    State(state): State<AppState>,
    Json(req): Json<CombinedTrendingRequest>,
) -> Result<Json<CombinedCourseRow>, AppError> {
    Ok(Json(combined::set_combined_trending(&state.db, &req).await?))
}

/// DELETE /api/v1/courses/combined-courses/:id
pub async fn handle_delete_combined(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    combined::delete_combined_course(&state.db, &id).await?;
    Ok(Json(MessageResponse::new(
        "Combined course deleted successfully",
    )))
}

// ──────────────────────────────────────────────
// Domains
// ──────────────────────────────────────────────

/// POST /api/v1/domain/add-domain
pub async fn handle_add_domain(
    State(state): State<AppState>,
    Json(req): Json<AddDomainRequest>,
) -> Result<(StatusCode, Json<DomainRow>), AppError> {
    let domain = domains::add_domain(&state.db, state.llm.as_ref(), &req).await?;
    Ok((StatusCode::CREATED, Json(domain)))
}

/// GET /api/v1/domain/get-domains
pub async fn handle_list_domains(
    State(state): State<AppState>,
) -> Result<Json<Vec<DomainRow>>, AppError> {
    Ok(Json(domains::list_domains(&state.db).await?))
}

/// PUT /api/v1/domain/update-demand
pub async fn handle_update_demand(
    State(state): State<AppState>,
    Json(req): Json<UpdateDemandRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    domains::set_on_demand(&state.db, &req).await?;
    Ok(Json(MessageResponse::new("Domain updated successfully")))
}

/// GET /api/v1/domain/demand/get-domains
pub async fn handle_list_on_demand(
    State(state): State<AppState>,
) -> Result<Json<Vec<DomainRow>>, AppError> {
    Ok(Json(domains::list_on_demand(&state.db).await?))
}

/// POST /api/v1/domain/add-courses
pub async fn handle_add_domain_courses(
    State(state): State<AppState>,
    Json(req): Json<DomainCoursesRequest>,
) -> Result<Json<DomainRow>, AppError> {
    Ok(Json(domains::add_courses(&state.db, &req).await?))
}

/// GET /api/v1/domain/get-courses?course_id=..&course_id=..
pub async fn handle_domain_courses(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<CourseRow>>, AppError> {
    let course_ids = repeated_param(params, "course_id");
    if course_ids.is_empty() {
        return Err(AppError::Validation(
            "course_id cannot be empty".to_string(),
        ));
    }
    Ok(Json(courses::courses_by_ids(&state.db, &course_ids).await?))
}

/// DELETE /api/v1/domain/delete-domain
pub async fn handle_delete_domain(
    State(state): State<AppState>,
    Query(params): Query<DomainQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    domains::delete_domain(&state.db, &params.domain_id).await?;
    Ok(Json(MessageResponse::new("Domain deleted successfully")))
}

/// PUT /api/v1/domain/update-domain
pub async fn handle_update_domain(
    State(state): State<AppState>,
    Json(req): Json<UpdateDomainRequest>,
) -> Result<Json<DomainRow>, AppError> {
    Ok(Json(domains::update_domain(&state.db, &req).await?))
}

/// DELETE /api/v1/domain/delete-course
pub async fn handle_remove_domain_course(
    State(state): State<AppState>,
    Query(params): Query<DomainCourseQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    domains::remove_course(&state.db, &params.domain_id, &params.course_id).await?;
    Ok(Json(MessageResponse::new(
        "Course removed from domain successfully",
    )))
}

/// POST /api/v1/domain/add-segments-to-domain
pub async fn handle_add_domain_segments(
    State(state): State<AppState>,
    Json(req): Json<DomainSegmentsRequest>,
) -> Result<Json<DomainRow>, AppError> {
    Ok(Json(domains::add_segments(&state.db, &req).await?))
}

/// POST /api/v1/domain/remove-segments-from-domain
pub async fn handle_remove_domain_segments(
    State(state): State<AppState>,
    Json(req): Json<DomainSegmentsRequest>,
) -> Result<Json<DomainRow>, AppError> {
    Ok(Json(domains::remove_segments(&state.db, &req).await?))
}

// ──────────────────────────────────────────────
// Modules and lessons
// ──────────────────────────────────────────────

/// GET /api/v1/modules/get-modules
pub async fn handle_get_modules(
    State(state): State<AppState>,
    Query(params): Query<CourseQuery>,
) -> Result<Json<CourseModules>, AppError> {
    Ok(Json(
        modules::get_course_modules(&state.db, &params.course_id).await?,
    ))
}

/// PUT /api/v1/modules/update/module
pub async fn handle_update_outline(
    State(state): State<AppState>,
    Json(req): Json<UpdateOutlineRequest>,
) -> Result<Json<CourseOutlineRow>, AppError> {
    Ok(Json(modules::update_outline(&state.db, &req).await?))
}

/// PUT /api/v1/modules/update/module-content
pub async fn handle_update_module_content(
    State(state): State<AppState>,
    Json(req): Json<UpdateModuleContentRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    modules::update_module_content(&state.db, &req).await?;
    Ok(Json(MessageResponse::new("Module updated successfully")))
}

/// GET /api/v1/lessons/get-lessons
pub async fn handle_get_lessons(
    State(state): State<AppState>,
    Query(params): Query<LessonsQuery>,
) -> Result<Json<Vec<LessonRow>>, AppError> {
    Ok(Json(
        lessons::get_lessons(&state.db, &params.course_id, &params.module_id).await?,
    ))
}

// ──────────────────────────────────────────────
// Segments
// ──────────────────────────────────────────────

/// POST /api/v1/segments/add-segments
pub async fn handle_add_segment(
    State(state): State<AppState>,
    Json(req): Json<AddSegmentRequest>,
) -> Result<(StatusCode, Json<SegmentCreated>), AppError> {
    let created = segments::add_segment(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/segments/update-segment
pub async fn handle_update_segment(
    State(state): State<AppState>,
    Json(req): Json<UpdateSegmentRequest>,
) -> Result<Json<SegmentRow>, AppError> {
    Ok(Json(segments::update_segment(&state.db, &req).await?))
}

/// DELETE /api/v1/segments/delete-segment
pub async fn handle_delete_segment(
    State(state): State<AppState>,
    Json(req): Json<DeleteSegmentRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    segments::delete_segment(&state.db, &req.segment_id).await?;
    Ok(Json(MessageResponse::new(
        "Segment and references deleted successfully",
    )))
}

/// GET /api/v1/segments/get-segment
pub async fn handle_get_segment(
    State(state): State<AppState>,
    Query(params): Query<SegmentQuery>,
) -> Result<Json<SegmentRow>, AppError> {
    Ok(Json(segments::get_segment(&state.db, &params.segment_id).await?))
}

/// GET /api/v1/segments/get-all-segments
pub async fn handle_list_segments(
    State(state): State<AppState>,
) -> Result<Json<Vec<SegmentRow>>, AppError> {
    Ok(Json(segments::list_segments(&state.db).await?))
}

/// Values of every occurrence of `key`, blanks dropped.
fn repeated_param(params: Vec<(String, String)>, key: &str) -> Vec<String> {
    params
        .into_iter()
        .filter(|(k, v)| k == key && !v.trim().is_empty())
        .map(|(_, v)| v)
        .collect()
}
