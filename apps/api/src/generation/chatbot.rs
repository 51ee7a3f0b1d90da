//! Context-bound Q&A over a single lesson.

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_empty, AppError};
use crate::generation::prompts::{LESSON_BOT_PROMPT, LESSON_BOT_REFUSAL};
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::TextGenerator;

#[derive(Debug, Deserialize)]
pub struct LessonBotRequest {
    /// Lesson text the answer must stay within.
    #[serde(default)]
    pub context: String,
    pub question: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LessonBotResponse {
    pub response: String,
}

pub async fn answer_question(
    llm: &dyn TextGenerator,
    request: &LessonBotRequest,
) -> Result<LessonBotResponse, AppError> {
    require_non_empty("question", &request.question)?;

    let prompt = LESSON_BOT_PROMPT
        .replace("{refusal}", LESSON_BOT_REFUSAL)
        .replace("{context}", &request.context)
        .replace("{question}", request.question.trim());

    let response = llm.complete(&prompt, PLAIN_TEXT_SYSTEM).await?;

    Ok(LessonBotResponse { response })
}
