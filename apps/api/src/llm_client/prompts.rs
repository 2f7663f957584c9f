// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every generation prompt that rewrites candidate material.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Keep the candidate's genuine experience and skills. \
    Do NOT invent employers, titles, dates, degrees, or achievements. \
    If the source does not support a claim, omit it entirely. \
    Leave a field out rather than guessing its value.";
