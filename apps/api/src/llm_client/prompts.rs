// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to every user prompt that expects a structured reply.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY JSON, no markdown.";

/// Placeholder for optional prompt fields the caller did not supply.
pub const NOT_PROVIDED: &str = "N/A";
