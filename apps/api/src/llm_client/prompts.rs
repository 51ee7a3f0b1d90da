// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for free-text replies (descriptions, lesson bodies, chat).
pub const PLAIN_TEXT_SYSTEM: &str = "You are an expert educational content creator. \
    Follow the formatting instructions in the request exactly and return only the requested text.";

/// Appended to any prompt that returns a module object, to stop the model
/// from wrapping the fields in a nested `module` key.
pub const FLAT_MODULE_INSTRUCTION: &str = r#"IMPORTANT: Do NOT create a nested 'module' structure inside the module. Keep all properties at the top level.
For example, DO NOT structure your response like this:
{"title": "Title", "description": "Description", "module": {...}}

Instead, keep all properties at the top level like this:
{"title": "Title", "description": "Description", "learning_objectives": [...], ...}"#;
