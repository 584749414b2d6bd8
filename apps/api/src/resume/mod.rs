// Resume service: heuristic + LLM analysis, tailoring, file upload and
// text extraction, and the per-user resume store.

pub mod analysis;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod store;
pub mod tailoring;
pub mod tips;
