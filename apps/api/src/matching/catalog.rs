//! Job catalog: the `JobRecord` shape, the repository seam, and the built-in
//! five-posting sample catalog served by default.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A job posting. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub salary_range: Option<String>,
    pub job_type: String,
    pub experience_level: String,
}

/// Source of job postings. Carried in `AppState` as `Arc<dyn JobRepository>`.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>, AppError>;
}

/// In-process catalog. Never mutated after construction.
pub struct StaticJobCatalog {
    jobs: Vec<JobRecord>,
}

impl StaticJobCatalog {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self { jobs }
    }

    pub fn sample() -> Self {
        Self::new(sample_jobs())
    }
}

#[async_trait]
impl JobRepository for StaticJobCatalog {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>, AppError> {
        Ok(self.jobs.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Criteria filter (shared by match and search)
// ────────────────────────────────────────────────────────────────────────────

/// Optional criteria. Each supplied value must appear, case-insensitively,
/// inside the corresponding job field. Blank values are ignored.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &JobRecord) -> bool {
        field_contains(&job.experience_level, self.experience_level.as_deref())
            && field_contains(&job.location, self.location.as_deref())
            && field_contains(&job.job_type, self.job_type.as_deref())
    }

    pub fn apply(&self, jobs: Vec<JobRecord>) -> Vec<JobRecord> {
        jobs.into_iter().filter(|job| self.matches(job)).collect()
    }
}

fn field_contains(field: &str, criterion: Option<&str>) -> bool {
    match criterion {
        Some(c) if !c.is_empty() => field.to_lowercase().contains(&c.to_lowercase()),
        _ => true,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sample data
// ────────────────────────────────────────────────────────────────────────────

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn job(
    title: &str,
    company: &str,
    location: &str,
    description: &str,
    requirements: &[&str],
    benefits: &[&str],
    salary_range: &str,
    job_type: &str,
    experience_level: &str,
) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        requirements: owned(requirements),
        benefits: owned(benefits),
        salary_range: Some(salary_range.to_string()),
        job_type: job_type.to_string(),
        experience_level: experience_level.to_string(),
    }
}

pub fn sample_jobs() -> Vec<JobRecord> {
    vec![
        job(
            "Senior Python Developer",
            "TechCorp Inc.",
            "San Francisco, CA",
            "We are looking for a senior Python developer to join our team. \
             You will work on building scalable web applications and APIs.",
            &[
                "5+ years Python experience",
                "Experience with Django or Flask",
                "Knowledge of SQL databases",
                "Experience with AWS",
                "Strong problem-solving skills",
            ],
            &["Health insurance", "401k", "Flexible hours", "Remote work"],
            "$120,000 - $150,000",
            "full-time",
            "senior",
        ),
        job(
            "Frontend Developer",
            "StartupXYZ",
            "New York, NY",
            "Join our growing startup as a frontend developer. \
             You'll work with React and modern JavaScript frameworks.",
            &[
                "3+ years React experience",
                "JavaScript/TypeScript proficiency",
                "CSS/HTML expertise",
                "Experience with state management",
                "Git version control",
            ],
            &["Equity", "Health insurance", "Unlimited PTO"],
            "$90,000 - $120,000",
            "full-time",
            "mid",
        ),
        job(
            "Data Scientist",
            "DataCorp",
            "Seattle, WA",
            "We're seeking a data scientist to analyze large datasets \
             and build machine learning models.",
            &[
                "PhD or Master's in Data Science",
                "Python/R programming",
                "Machine learning experience",
                "SQL and database knowledge",
                "Statistical analysis skills",
            ],
            &["Health insurance", "401k", "Learning budget"],
            "$110,000 - $140,000",
            "full-time",
            "senior",
        ),
        job(
            "Junior Software Engineer",
            "InnovateTech",
            "Austin, TX",
            "Entry-level position for recent graduates. \
             You'll work on various projects and learn from experienced developers.",
            &[
                "Computer Science degree",
                "Programming experience (any language)",
                "Strong communication skills",
                "Eagerness to learn",
                "Problem-solving ability",
            ],
            &["Mentorship program", "Health insurance", "401k"],
            "$60,000 - $80,000",
            "full-time",
            "entry",
        ),
        job(
            "DevOps Engineer",
            "CloudScale",
            "Remote",
            "Remote DevOps engineer position. \
             You'll manage cloud infrastructure and CI/CD pipelines.",
            &[
                "3+ years DevOps experience",
                "AWS/Azure/GCP knowledge",
                "Docker and Kubernetes",
                "CI/CD pipeline experience",
                "Infrastructure as Code",
            ],
            &["Remote work", "Health insurance", "401k", "Equipment budget"],
            "$100,000 - $130,000",
            "full-time",
            "mid",
        ),
    ]
}
