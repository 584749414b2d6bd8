use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub s3_key: Option<String>,
    pub extracted_text: String,
    pub analysis_json: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Listing view: metadata only, no text or analysis.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Values for a new `resumes` row.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub s3_key: Option<String>,
    pub extracted_text: String,
}
