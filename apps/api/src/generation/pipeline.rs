//! Course generation pipeline.
//!
//! description → curriculum → lessons per module → lesson quality passes,
//! all sequential. Nothing is written until generation has finished; the
//! whole course is then inserted in a single transaction.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::errors::{conflict_on_unique, require_non_empty, AppError};
use crate::generation::curriculum::{generate_curriculum, Curriculum};
use crate::generation::description::generate_course_description;
use crate::generation::lesson_quality::{
    check_course_lessons, check_module_lessons, improve_module_lessons, CourseLessonReport,
};
use crate::generation::lessons::{generate_module_lessons, LessonDraft, ModuleContext};
use crate::ids::unique_id;
use crate::llm_client::TextGenerator;

#[derive(Debug, Clone, Deserialize)]
pub struct AddCourseRequest {
    pub course_name: String,
    pub level: String,
    #[serde(default)]
    pub image_uri: String,
    /// Optional creator-written description; generated when blank.
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseGenerationResponse {
    pub course_id: String,
    pub course_name: String,
    pub num_modules: usize,
    pub num_lessons: usize,
    pub course_quality_score: f64,
}

/// Everything produced for one course, before it is stored.
#[derive(Debug)]
pub struct GeneratedCourse {
    pub course_id: String,
    pub course_name: String,
    pub level: String,
    pub image_uri: String,
    pub description: String,
    pub curriculum: Curriculum,
    /// Lessons per module, in module order.
    pub lessons: Vec<Vec<LessonDraft>>,
    pub quality: CourseLessonReport,
}

impl GeneratedCourse {
    pub fn num_lessons(&self) -> usize {
        self.lessons.iter().map(Vec::len).sum()
    }
}

/// Validates, generates and stores a complete course.
pub async fn generate_course(
    pool: &PgPool,
    llm: &dyn TextGenerator,
    request: &AddCourseRequest,
) -> Result<CourseGenerationResponse, AppError> {
    require_non_empty("course_name", &request.course_name)?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM courses WHERE course_name = $1)")
            .bind(request.course_name.trim())
            .fetch_one(pool)
            .await?;
    if exists {
        return Err(AppError::Conflict(format!(
            "Course '{}' already exists",
            request.course_name.trim()
        )));
    }

    let course = build_course(llm, request).await?;
    persist_course(pool, &course).await?;

    info!(
        "Stored course {} with {} modules and {} lessons",
        course.course_id,
        course.curriculum.num_modules(),
        course.num_lessons()
    );

    Ok(CourseGenerationResponse {
        num_modules: course.curriculum.num_modules(),
        num_lessons: course.num_lessons(),
        course_quality_score: course.quality.overall_quality_score,
        course_id: course.course_id,
        course_name: course.course_name,
    })
}

/// Runs every LLM stage for one course. Does not touch the database.
pub async fn build_course(
    llm: &dyn TextGenerator,
    request: &AddCourseRequest,
) -> Result<GeneratedCourse, AppError> {
    let course_name = request.course_name.trim().to_string();
    let course_id = unique_id("COURSE");
    info!("Generating course {course_id}: {course_name} ({})", request.level);

    let description =
        generate_course_description(llm, &course_name, request.description.as_deref()).await?;
    let curriculum = generate_curriculum(llm, &course_name).await?;

    let mut lessons = Vec::with_capacity(curriculum.modules.len());
    let mut reports = Vec::with_capacity(curriculum.modules.len());
    for module in &curriculum.modules {
        let ctx = ModuleContext::new(module, &request.level);
        info!("Generating lessons for module: {}", module.title);

        let drafts = generate_module_lessons(llm, &ctx).await?;
        let report = check_module_lessons(&drafts, &ctx);
        info!(
            "Module {} lesson quality score: {:.2}/100",
            module.module_id, report.average_quality_score
        );

        let improved = improve_module_lessons(llm, drafts, &report, &ctx).await;
        reports.push(check_module_lessons(&improved, &ctx));
        lessons.push(improved);
    }

    let quality = check_course_lessons(&reports);
    info!(
        "Course quality score: {:.2}/100",
        quality.overall_quality_score
    );
    for suggestion in &quality.improvement_suggestions {
        info!("Course quality note: {suggestion}");
    }

    Ok(GeneratedCourse {
        course_id,
        course_name,
        level: request.level.clone(),
        image_uri: request.image_uri.clone(),
        description,
        curriculum,
        lessons,
        quality,
    })
}

/// Inserts the course, its outline, modules and lessons atomically.
pub async fn persist_course(pool: &PgPool, course: &GeneratedCourse) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO courses (course_id, course_name, level, description, image_uri)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&course.course_id)
    .bind(&course.course_name)
    .bind(&course.level)
    .bind(&course.description)
    .bind(&course.image_uri)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        conflict_on_unique(e, format!("Course '{}' already exists", course.course_name))
    })?;

    let curriculum = &course.curriculum;
    sqlx::query(
        r#"
        INSERT INTO course_outlines (course_id, course, level, duration, num_modules, tools)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&course.course_id)
    .bind(&curriculum.course)
    .bind(&course.level)
    .bind(&curriculum.duration)
    .bind(curriculum.num_modules() as i32)
    .bind(&curriculum.tools)
    .execute(&mut *tx)
    .await?;

    for (position, (module, lessons)) in curriculum.modules.iter().zip(&course.lessons).enumerate() {
        sqlx::query(
            r#"
            INSERT INTO course_modules
                (module_id, course_id, position, title, description, estimated_completion_time,
                 prerequisites, learning_objectives, key_topics, practical_applications)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&module.module_id)
        .bind(&course.course_id)
        .bind(position as i32)
        .bind(&module.title)
        .bind(&module.description)
        .bind(&module.estimated_completion_time)
        .bind(Json(&module.prerequisites))
        .bind(&module.learning_objectives)
        .bind(&module.key_topics)
        .bind(&module.practical_applications)
        .execute(&mut *tx)
        .await?;

        for (lesson_position, lesson) in lessons.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO lessons
                    (lesson_id, course_id, module_id, position, title, lesson_type,
                     content, instruction, expected_output, answer, outline)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(&lesson.lesson_id)
            .bind(&course.course_id)
            .bind(&module.module_id)
            .bind(lesson_position as i32)
            .bind(&lesson.title)
            .bind(lesson.lesson_type.as_str())
            .bind(&lesson.content)
            .bind(&lesson.instruction)
            .bind(&lesson.expected_output)
            .bind(&lesson.answer)
            .bind(&lesson.outline)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}
