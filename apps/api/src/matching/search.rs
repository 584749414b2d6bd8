//! Job Search Filter: case-insensitive substring search over title, company
//! and description, after the shared criteria filter.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::matching::catalog::{JobFilter, JobRecord, JobRepository};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;
pub const MIN_QUERY_CHARS: usize = 2;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Body of `POST /api/v1/search-jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchRequest {
    pub query: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSearchResponse {
    pub jobs: Vec<JobRecord>,
    pub total_results: usize,
    pub search_timestamp: String,
}

/// Returns matching jobs in catalog order, truncated to `request.limit`.
/// `total_results` is the number returned.
pub fn search_jobs(jobs: Vec<JobRecord>, request: &JobSearchRequest) -> JobSearchResponse {
    let filter = JobFilter {
        experience_level: request.experience_level.clone(),
        location: request.location.clone(),
        job_type: request.job_type.clone(),
    };
    let query = request.query.trim().to_lowercase();

    let found: Vec<JobRecord> = filter
        .apply(jobs)
        .into_iter()
        .filter(|job| {
            job.title.to_lowercase().contains(&query)
                || job.company.to_lowercase().contains(&query)
                || job.description.to_lowercase().contains(&query)
        })
        .take(request.limit)
        .collect();

    JobSearchResponse {
        total_results: found.len(),
        jobs: found,
        search_timestamp: Utc::now().to_rfc3339(),
    }
}

/// Loads the catalog from `repo` and searches it. Repository failures
/// degrade to an empty result.
pub async fn find_jobs(repo: &dyn JobRepository, request: &JobSearchRequest) -> JobSearchResponse {
    match repo.list_jobs().await {
        Ok(jobs) => search_jobs(jobs, request),
        Err(e) => {
            warn!("Job repository unavailable, returning no search results: {e}");
            JobSearchResponse {
                jobs: Vec::new(),
                total_results: 0,
                search_timestamp: Utc::now().to_rfc3339(),
            }
        }
    }
}
