// Matching core: keyword extraction, ATS scoring, job matching and search.
// Everything here except the LLM overlay in `ats::analyze_ats` is pure and
// synchronous; handlers wrap it with validation and the job repository.

pub mod ats;
pub mod catalog;
pub mod handlers;
pub mod insights;
pub mod job_match;
pub mod keywords;
pub mod prompts;
pub mod search;

/// Score reported when there is nothing to compare against.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
