use sqlx::PgPool;

use crate::errors::{require_non_empty, AppError};
use crate::models::lesson::LessonRow;

/// Lessons of one module in generation order. Unknown ids yield an empty list.
pub async fn get_lessons(
    pool: &PgPool,
    course_id: &str,
    module_id: &str,
) -> Result<Vec<LessonRow>, AppError> {
    require_non_empty("course_id", course_id)?;
    require_non_empty("module_id", module_id)?;

    Ok(sqlx::query_as::<_, LessonRow>(
        r#"
        SELECT lesson_id, course_id, module_id, position, title, lesson_type, content,
               instruction, expected_output, answer, outline
        FROM lessons
        WHERE course_id = $1 AND module_id = $2
        ORDER BY position
        "#,
    )
    .bind(course_id)
    .bind(module_id)
    .fetch_all(pool)
    .await?)
}
