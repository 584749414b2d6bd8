//! Job Match Engine.
//!
//! Each job's skill set comes from a fixed vocabulary lookup over its
//! requirements and description, not from the generic keyword extractor.
//! A job skill counts as matched when it and some user skill contain one
//! another as a substring, so "java" also matches "javascript".

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matching::catalog::{JobFilter, JobRecord, JobRepository};
use crate::matching::{round1, NEUTRAL_SCORE};

const MIN_MATCH_SCORE: f64 = 30.0;
const MAX_MATCHES: usize = 20;
const SKILL_LIST_CAP: usize = 10;
const STRONG_ALIGNMENT: f64 = 70.0;
const GOOD_OVERLAP: f64 = 50.0;

pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "javascript",
    "java",
    "react",
    "node.js",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "linux",
    "html",
    "css",
    "typescript",
    "angular",
    "vue.js",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "elasticsearch",
    "machine learning",
    "ai",
    "data science",
    "analytics",
    "tableau",
    "power bi",
    "agile",
    "scrum",
    "devops",
    "ci/cd",
    "microservices",
    "api",
    "rest",
    "graphql",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "scikit-learn",
];

/// Criteria for `POST /api/v1/match-jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobMatchRequest {
    pub skills: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    /// Accepted for compatibility; not used for filtering.
    pub salary_range: Option<String>,
}

impl JobMatchRequest {
    fn filter(&self) -> JobFilter {
        JobFilter {
            experience_level: self.experience_level.clone(),
            location: self.location.clone(),
            job_type: self.job_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatch {
    pub job: JobRecord,
    pub match_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatchResponse {
    pub matches: Vec<JobMatch>,
    pub total_matches: usize,
    pub search_timestamp: String,
}

impl JobMatchResponse {
    fn empty() -> Self {
        Self {
            matches: Vec::new(),
            total_matches: 0,
            search_timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Vocabulary terms found in the job's requirements or description,
/// deduplicated, in vocabulary order.
pub fn extract_job_skills(job: &JobRecord) -> Vec<String> {
    let mut haystacks: Vec<String> = job.requirements.iter().map(|r| r.to_lowercase()).collect();
    haystacks.push(job.description.to_lowercase());

    SKILL_VOCABULARY
        .iter()
        .filter(|term| haystacks.iter().any(|h| h.contains(*term)))
        .map(|term| term.to_string())
        .collect()
}

/// Scores one job against the user's skills. Blank user skills are ignored.
pub fn score_job(job: &JobRecord, user_skills: &[String]) -> JobMatch {
    let user_skills: Vec<String> = user_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    let job_skills = extract_job_skills(job);

    let (matched, missing): (Vec<String>, Vec<String>) =
        job_skills.iter().cloned().partition(|job_skill| {
            user_skills
                .iter()
                .any(|user| job_skill.contains(user.as_str()) || user.contains(job_skill.as_str()))
        });

    let raw_score = if job_skills.is_empty() {
        NEUTRAL_SCORE
    } else {
        matched.len() as f64 / job_skills.len() as f64 * 100.0
    };

    JobMatch {
        job: job.clone(),
        match_score: round1(raw_score),
        match_reasons: match_reasons(matched.len(), raw_score),
        matched_skills: matched.into_iter().take(SKILL_LIST_CAP).collect(),
        missing_skills: missing.into_iter().take(SKILL_LIST_CAP).collect(),
    }
}

fn match_reasons(matched: usize, score: f64) -> Vec<String> {
    let mut reasons = Vec::with_capacity(2);
    if matched > 0 {
        reasons.push(format!("Matched {matched} required skills"));
    }
    let band = if score > STRONG_ALIGNMENT {
        "Strong skill alignment"
    } else if score > GOOD_OVERLAP {
        "Good skill overlap"
    } else {
        "Some relevant skills"
    };
    reasons.push(band.to_string());
    reasons
}

/// Filters, scores, keeps scores above 30, ranks descending (stable) and
/// returns the top 20. `total_matches` counts every retained job.
pub fn match_jobs(jobs: Vec<JobRecord>, request: &JobMatchRequest) -> JobMatchResponse {
    if let Some(salary) = request.salary_range.as_deref() {
        debug!("salary_range '{salary}' supplied; salary filtering is not applied");
    }

    let mut matches: Vec<JobMatch> = request
        .filter()
        .apply(jobs)
        .iter()
        .map(|job| score_job(job, &request.skills))
        .filter(|m| m.match_score > MIN_MATCH_SCORE)
        .collect();

    matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    let total_matches = matches.len();
    matches.truncate(MAX_MATCHES);

    JobMatchResponse {
        matches,
        total_matches,
        search_timestamp: Utc::now().to_rfc3339(),
    }
}

/// Loads the catalog from `repo` and matches against it.
/// A repository failure yields an empty, well-formed response.
pub async fn find_matching_jobs(
    repo: &dyn JobRepository,
    request: &JobMatchRequest,
) -> JobMatchResponse {
    match repo.list_jobs().await {
        Ok(jobs) => match_jobs(jobs, request),
        Err(e) => {
            warn!("Job repository unavailable, returning no matches: {e}");
            JobMatchResponse::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::matching::catalog::sample_jobs;
    use async_trait::async_trait;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn request(list: &[&str]) -> JobMatchRequest {
        JobMatchRequest {
            skills: skills(list),
            ..Default::default()
        }
    }

    fn sample(title: &str) -> JobRecord {
        sample_jobs()
            .into_iter()
            .find(|j| j.title == title)
            .unwrap()
    }

    fn titles(response: &JobMatchResponse) -> Vec<&str> {
        response
            .matches
            .iter()
            .map(|m| m.job.title.as_str())
            .collect()
    }

    fn synthetic(title: &str, requirement: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            requirements: vec![requirement.to_string()],
            benefits: Vec::new(),
            salary_range: None,
            job_type: "full-time".to_string(),
            experience_level: "mid".to_string(),
        }
    }

    #[test]
    fn test_vocabulary_extraction_per_job() {
        assert_eq!(
            extract_job_skills(&sample("Senior Python Developer")),
            vec!["python", "sql", "aws", "api"]
        );
        assert_eq!(
            extract_job_skills(&sample("Data Scientist")),
            vec!["python", "sql", "machine learning", "data science"]
        );
        assert_eq!(
            extract_job_skills(&sample("DevOps Engineer")),
            vec!["aws", "docker", "kubernetes", "devops", "ci/cd"]
        );
        assert!(extract_job_skills(&sample("Junior Software Engineer")).is_empty());
    }

    #[test]
    fn test_python_sql_matches_expected_jobs() {
        let response = match_jobs(sample_jobs(), &request(&["python", "sql"]));

        assert_eq!(
            titles(&response),
            vec![
                "Senior Python Developer",
                "Data Scientist",
                "Junior Software Engineer"
            ]
        );
        assert_eq!(response.total_matches, 3);
        assert!(response.matches.iter().all(|m| m.match_score > 30.0));

        let senior = &response.matches[0];
        assert_eq!(senior.match_score, 50.0);
        assert_eq!(senior.matched_skills, vec!["python", "sql"]);
        assert_eq!(senior.missing_skills, vec!["aws", "api"]);
        assert_eq!(
            senior.match_reasons,
            vec!["Matched 2 required skills", "Some relevant skills"]
        );
    }

    #[test]
    fn test_job_without_vocabulary_skills_scores_neutral() {
        let m = score_job(&sample("Junior Software Engineer"), &skills(&["rust"]));
        assert_eq!(m.match_score, NEUTRAL_SCORE);
        assert!(m.matched_skills.is_empty());
        assert_eq!(m.match_reasons, vec!["Some relevant skills"]);
    }

    #[test]
    fn test_good_overlap_band() {
        let m = score_job(
            &sample("Frontend Developer"),
            &skills(&["JavaScript", "React", "CSS"]),
        );
        assert_eq!(m.match_score, 57.1);
        assert_eq!(m.matched_skills, vec!["javascript", "java", "react", "css"]);
        assert_eq!(m.missing_skills, vec!["git", "html", "typescript"]);
        assert_eq!(
            m.match_reasons,
            vec!["Matched 4 required skills", "Good skill overlap"]
        );
    }

    #[test]
    fn test_strong_alignment_ranks_first() {
        let response = match_jobs(
            sample_jobs(),
            &request(&["aws", "docker", "kubernetes", "devops", "ci/cd"]),
        );
        assert_eq!(
            titles(&response),
            vec!["DevOps Engineer", "Junior Software Engineer"]
        );
        assert_eq!(response.matches[0].match_score, 100.0);
        assert_eq!(
            response.matches[0].match_reasons,
            vec!["Matched 5 required skills", "Strong skill alignment"]
        );
    }

    #[test]
    fn test_substring_match_is_bidirectional() {
        // "java" is contained in "javascript", so both vocabulary terms match.
        let m = score_job(&sample("Frontend Developer"), &skills(&["java"]));
        assert_eq!(m.matched_skills, vec!["javascript", "java"]);
        assert_eq!(m.match_score, 28.6);

        // And a longer user skill swallows the shorter job term.
        let m = score_job(&synthetic("Backend", "REST API design"), &skills(&["restful apis"]));
        assert_eq!(m.matched_skills, vec!["api", "rest"]);
    }

    #[test]
    fn test_scores_at_or_below_thirty_are_dropped() {
        let response = match_jobs(sample_jobs(), &request(&["java"]));
        assert!(!titles(&response).contains(&"Frontend Developer"));
        assert_eq!(titles(&response), vec!["Junior Software Engineer"]);
    }

    #[test]
    fn test_matched_and_missing_partition_job_skills() {
        let job = sample("Frontend Developer");
        let m = score_job(&job, &skills(&["react", "git"]));
        let mut union: Vec<String> = m
            .matched_skills
            .iter()
            .chain(m.missing_skills.iter())
            .cloned()
            .collect();
        union.sort();
        let mut expected = extract_job_skills(&job);
        expected.sort();
        assert_eq!(union, expected);
        assert!(m.matched_skills.iter().all(|s| !m.missing_skills.contains(s)));
    }

    #[test]
    fn test_blank_user_skills_match_nothing() {
        let m = score_job(&sample("DevOps Engineer"), &skills(&["", "   "]));
        assert!(m.matched_skills.is_empty());
        assert_eq!(m.match_score, 0.0);
    }

    #[test]
    fn test_filters_apply_before_scoring() {
        let mut req = request(&["python", "sql"]);
        req.experience_level = Some("entry".to_string());
        let response = match_jobs(sample_jobs(), &req);
        assert_eq!(titles(&response), vec!["Junior Software Engineer"]);
    }

    #[test]
    fn test_salary_range_is_not_applied() {
        let mut req = request(&["python", "sql"]);
        req.salary_range = Some("$1 - $2".to_string());
        assert_eq!(match_jobs(sample_jobs(), &req).total_matches, 3);
    }

    #[test]
    fn test_results_truncated_to_twenty_but_counted() {
        let jobs: Vec<JobRecord> = (0..25)
            .map(|i| synthetic(&format!("Job {i}"), "Docker and Kubernetes"))
            .collect();
        let response = match_jobs(jobs, &request(&["docker"]));
        assert_eq!(response.matches.len(), 20);
        assert_eq!(response.total_matches, 25);
        assert_eq!(response.matches[0].job.title, "Job 0");
    }

    #[test]
    fn test_results_sorted_non_increasing() {
        let response = match_jobs(sample_jobs(), &request(&["python", "sql", "machine learning"]));
        let scores: Vec<f64> = response.matches.iter().map(|m| m.match_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(response.matches[0].job.title, "Data Scientist");
    }

    struct BrokenRepository;

    #[async_trait]
    impl JobRepository for BrokenRepository {
        async fn list_jobs(&self) -> Result<Vec<JobRecord>, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("catalog offline")))
        }
    }

    #[tokio::test]
    async fn test_repository_failure_yields_empty_response() {
        let response = find_matching_jobs(&BrokenRepository, &request(&["python"])).await;
        assert!(response.matches.is_empty());
        assert_eq!(response.total_matches, 0);
        assert!(!response.search_timestamp.is_empty());
    }
}
