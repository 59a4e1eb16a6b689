pub mod gemini;
pub mod json_store;
