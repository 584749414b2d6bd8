pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::chat::handlers as chat;
use crate::matching::handlers as jobs;
use crate::resume::extract::MAX_UPLOAD_BYTES;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself; the handler enforces
/// the exact file limit.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/logout", post(auth::handle_logout))
        .route("/api/auth/me", get(auth::handle_me))
        // Resume
        .route("/api/v1/analyze-resume", post(resume::handle_analyze_resume))
        .route("/api/v1/tailor-resume", post(resume::handle_tailor_resume))
        .route(
            "/api/v1/upload-resume",
            post(resume::handle_upload_resume).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/resume-tips", get(resume::handle_resume_tips))
        .route("/api/v1/resumes", get(resume::handle_list_resumes))
        .route("/api/v1/analysis/:resume_id", get(resume::handle_get_analysis))
        // Jobs
        .route("/api/v1/match-jobs", post(jobs::handle_match_jobs))
        .route("/api/v1/search-jobs", post(jobs::handle_search_jobs))
        .route("/api/v1/job-categories", get(jobs::handle_job_categories))
        .route(
            "/api/v1/job-market-insights",
            get(jobs::handle_job_market_insights),
        )
        // Chat
        .route("/api/v1/chat", post(chat::handle_chat))
        .route("/api/v1/career-counseling", post(chat::handle_career_counseling))
        .route("/api/v1/ats-analysis", post(jobs::handle_ats_analysis))
        .route("/api/v1/chat-suggestions", get(chat::handle_chat_suggestions))
        .route("/api/v1/career-resources", get(chat::handle_career_resources))
        .with_state(state)
}
