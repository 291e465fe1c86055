// Resume screening: interview-kit generation and project deep dives.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
