use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRecord};
use crate::resume::analysis::{analyze_resume, ResumeAnalysis};
use crate::resume::extract::{extract_document, file_extension, DocumentKind, MAX_UPLOAD_BYTES};
use crate::resume::store::{create_resume, get_resume, list_resumes_for_user, save_analysis, stored_analysis};
use crate::resume::tailoring::{tailor_resume, TailorRequest, TailorResponse};
use crate::resume::tips::{ResumeTips, RESUME_TIPS};
use crate::state::AppState;
use crate::validation::require_text;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub resume_id: Uuid,
    #[serde(flatten)]
    pub analysis: ResumeAnalysis,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume_id: Uuid,
    pub extracted_text: String,
    pub file_name: String,
    pub file_size: usize,
    pub file_type: String,
    pub extraction_timestamp: String,
    pub word_count: usize,
    pub character_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeRecord>,
}

#[derive(Debug, Serialize)]
pub struct StoredAnalysisResponse {
    pub resume_id: Uuid,
    pub analysis: Value,
}

/// POST /api/v1/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_text(&req.resume_text, "Resume text")?;

    let saved = create_resume(
        &state.db,
        &NewResume {
            id: Uuid::new_v4(),
            user_id: user.id,
            file_name: None,
            file_type: None,
            file_size: None,
            s3_key: None,
            extracted_text: req.resume_text.clone(),
        },
    )
    .await?;

    let analysis = analyze_resume(&state.llm, &req.resume_text, req.job_title.as_deref()).await;
    let response = AnalyzeResponse {
        resume_id: saved.id,
        analysis,
    };

    match serde_json::to_value(&response) {
        Ok(value) => {
            if let Err(e) = save_analysis(&state.db, saved.id, &value).await {
                warn!("Failed to persist analysis for resume {}: {e}", saved.id);
            }
        }
        Err(e) => warn!("Failed to serialize analysis for resume {}: {e}", saved.id),
    }

    Ok(Json(response))
}

/// POST /api/v1/tailor-resume
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    require_text(&req.resume_text, "Resume text")?;
    require_text(&req.job_description, "Job description")?;
    Ok(Json(tailor_resume(&state.llm, &req).await))
}

fn content_type(ext: &str) -> &'static str {
    match ext {
        ".pdf" => "application/pdf",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/msword",
    }
}

/// Best-effort removal of an uploaded object that no resume row will reference.
async fn discard_upload(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) -> bool {
    match s3.delete_object().bucket(bucket).key(key).send().await {
        Ok(_) => {
            info!("Removed orphaned upload s3://{bucket}/{key}");
            true
        }
        Err(e) => {
            warn!("Failed to remove orphaned upload s3://{bucket}/{key}: {e}");
            false
        }
    }
}

/// POST /api/v1/upload-resume
/// Multipart form with a single `file` field (.pdf, .docx or .doc, at most 10 MiB).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let bad_multipart = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("Invalid multipart body: {e}"))
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
        let bytes = field.bytes().await.map_err(bad_multipart)?;
        upload = Some((file_name, bytes));
        break;
    }
    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let ext = file_extension(&file_name).unwrap_or_default();
    let kind = DocumentKind::from_extension(&ext).ok_or_else(|| {
        AppError::Validation("Unsupported file format. Please upload a PDF or DOCX file.".to_string())
    })?;
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "File size too large. Please upload a file smaller than 10MB.".to_string(),
        ));
    }

    let file_size = bytes.len();
    let extracted_text = extract_document(bytes.to_vec(), kind).await?;

    let resume_id = Uuid::new_v4();
    let s3_key = format!("resumes/{}/{}{}", user.id, resume_id, ext);
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(bytes))
        .content_type(content_type(&ext))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {s3_key} failed: {e}")))?;

    let saved = create_resume(
        &state.db,
        &NewResume {
            id: resume_id,
            user_id: user.id,
            file_name: Some(file_name.clone()),
            file_type: Some(ext.clone()),
            file_size: Some(file_size as i64),
            s3_key: Some(s3_key.clone()),
            extracted_text: extracted_text.clone(),
        },
    )
    .await;
    if let Err(e) = saved {
        discard_upload(&state.s3, &state.config.s3_bucket, &s3_key).await;
        return Err(e);
    }

    info!("Stored upload {file_name} as s3://{}/{s3_key}", state.config.s3_bucket);

    Ok(Json(UploadResponse {
        resume_id,
        word_count: extracted_text.split_whitespace().count(),
        character_count: extracted_text.chars().count(),
        extracted_text,
        file_name,
        file_size,
        file_type: ext,
        extraction_timestamp: Utc::now().to_rfc3339(),
    }))
}

/// GET /api/v1/resume-tips
pub async fn handle_resume_tips() -> Json<&'static ResumeTips> {
    Json(&RESUME_TIPS)
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = list_resumes_for_user(&state.db, user.id).await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// GET /api/v1/analysis/:resume_id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<StoredAnalysisResponse>, AppError> {
    let resume = get_resume(&state.db, resume_id).await?;
    let analysis = stored_analysis(resume, user.id)?;
    Ok(Json(StoredAnalysisResponse {
        resume_id,
        analysis,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_discard_upload_failure_is_not_fatal() {
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

        // Nothing listens on the discard port, so the delete fails fast.
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "handler-test"))
            .endpoint_url("http://127.0.0.1:9")
            .force_path_style(true)
            .retry_config(aws_sdk_s3::config::retry::RetryConfig::disabled())
            .build();
        let s3 = aws_sdk_s3::Client::from_conf(config);

        assert!(!discard_upload(&s3, "careerleap-test", "resumes/u/r.pdf").await);
    }

    #[test]
    fn test_content_type_per_extension() {
        assert_eq!(content_type(".pdf"), "application/pdf");
        assert!(content_type(".docx").ends_with("wordprocessingml.document"));
        assert_eq!(content_type(".doc"), "application/msword");
    }
}
