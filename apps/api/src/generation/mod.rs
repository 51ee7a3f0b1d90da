// Course generation: descriptions, curriculum, lessons, quality passes and
// the lesson Q&A bot. All model calls go through `llm_client::TextGenerator`.

pub mod chatbot;
pub mod curriculum;
pub mod description;
pub mod handlers;
pub mod lesson_quality;
pub mod lessons;
pub mod markdown;
pub mod pipeline;
pub mod prompts;
pub mod quality;
