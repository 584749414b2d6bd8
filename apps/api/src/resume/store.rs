use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRecord, ResumeRow};

pub async fn create_resume(pool: &PgPool, new: &NewResume) -> Result<ResumeRow, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, file_name, file_type, file_size, s3_key, extracted_text)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(new.id)
    .bind(new.user_id)
    .bind(&new.file_name)
    .bind(&new.file_type)
    .bind(new.file_size)
    .bind(&new.s3_key)
    .bind(&new.extracted_text)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn get_resume(pool: &PgPool, resume_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Newest first.
pub async fn list_resumes_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ResumeRecord>, AppError> {
    let rows = sqlx::query_as::<_, ResumeRecord>(
        r#"
        SELECT id, user_id, file_name, file_type, file_size, created_at
        FROM resumes
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn save_analysis(pool: &PgPool, resume_id: Uuid, analysis: &Value) -> Result<(), AppError> {
    sqlx::query("UPDATE resumes SET analysis_json = $1 WHERE id = $2")
        .bind(analysis)
        .bind(resume_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Ownership and presence checks for a stored analysis lookup.
pub fn stored_analysis(resume: Option<ResumeRow>, user_id: Uuid) -> Result<Value, AppError> {
    let resume = resume.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    if resume.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    resume
        .analysis_json
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn row(owner: Uuid, analysis: Option<Value>) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: owner,
            file_name: None,
            file_type: None,
            file_size: None,
            s3_key: None,
            extracted_text: "Experience: ten years".to_string(),
            analysis_json: analysis,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_resume_is_not_found() {
        let err = stored_analysis(None, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Resume not found"));
    }

    #[test]
    fn test_other_users_resume_is_forbidden() {
        let owner = Uuid::new_v4();
        let err = stored_analysis(Some(row(owner, Some(json!({})))), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn test_resume_without_analysis_is_not_found() {
        let owner = Uuid::new_v4();
        let err = stored_analysis(Some(row(owner, None)), owner).unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Analysis not found"));
    }

    #[test]
    fn test_owner_gets_analysis() {
        let owner = Uuid::new_v4();
        let analysis = json!({"overall_score": 72.5});
        assert_eq!(
            stored_analysis(Some(row(owner, Some(analysis.clone()))), owner).unwrap(),
            analysis
        );
    }
}
