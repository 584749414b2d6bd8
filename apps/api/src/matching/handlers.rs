use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::matching::ats::{analyze_ats, AtsReport};
use crate::matching::insights::{job_market_insights, JobCategories, JOB_CATEGORIES};
use crate::matching::job_match::{find_matching_jobs, JobMatchRequest, JobMatchResponse};
use crate::matching::search::{find_jobs, JobSearchRequest, JobSearchResponse, MAX_LIMIT, MIN_QUERY_CHARS};
use crate::state::AppState;
use crate::validation::{require_min_chars, require_non_blank_items, require_text};

#[derive(Debug, Deserialize)]
pub struct AtsAnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
    pub ats_system: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AtsAnalysisResponse {
    #[serde(flatten)]
    pub report: AtsReport,
    pub analysis_timestamp: String,
}

/// POST /api/v1/match-jobs
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(req): Json<JobMatchRequest>,
) -> Result<Json<JobMatchResponse>, AppError> {
    require_non_blank_items(&req.skills, "At least one skill must be provided")?;
    Ok(Json(find_matching_jobs(state.jobs.as_ref(), &req).await))
}

/// POST /api/v1/search-jobs
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Json(req): Json<JobSearchRequest>,
) -> Result<Json<JobSearchResponse>, AppError> {
    require_min_chars(
        &req.query,
        MIN_QUERY_CHARS,
        "Search query must be at least 2 characters long",
    )?;
    if !(1..=MAX_LIMIT).contains(&req.limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(Json(find_jobs(state.jobs.as_ref(), &req).await))
}

/// GET /api/v1/job-categories
pub async fn handle_job_categories() -> Json<&'static JobCategories> {
    Json(&JOB_CATEGORIES)
}

/// GET /api/v1/job-market-insights
pub async fn handle_job_market_insights() -> Json<Value> {
    Json(job_market_insights())
}

/// POST /api/v1/ats-analysis
pub async fn handle_ats_analysis(
    State(state): State<AppState>,
    Json(req): Json<AtsAnalysisRequest>,
) -> Result<Json<AtsAnalysisResponse>, AppError> {
    require_text(&req.resume_text, "Resume text")?;
    require_text(&req.job_description, "Job description")?;

    let report = analyze_ats(
        &state.llm,
        &req.resume_text,
        &req.job_description,
        req.ats_system.as_deref(),
    )
    .await;

    Ok(Json(AtsAnalysisResponse {
        report,
        analysis_timestamp: Utc::now().to_rfc3339(),
    }))
}
