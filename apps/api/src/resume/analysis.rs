//! Resume analysis.
//!
//! `basic_analysis` is a deterministic heuristic (sections present, length).
//! `analyze_resume` asks the LLM for a richer analysis and blends the two;
//! if the LLM answer is unusable the heuristic result is returned alone.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NOT_PROVIDED};
use crate::llm_client::{ChatMessage, ChatOptions, LlmClient, LlmError};
use crate::matching::round1;
use crate::resume::prompts::{ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};

const BASE_SCORE: f64 = 50.0;
const DEFAULT_AI_SCORE: f64 = 65.0;
const LIST_CAP: usize = 10;
const DETAILED_WORD_COUNT: usize = 300;

pub const DEFAULT_SUMMARY: &str = "Resume analysis completed.";
pub const BASIC_ONLY_SUMMARY: &str = "Basic analysis completed. AI analysis unavailable.";

static SECTION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("Experience", r"(?i)experience|work history|employment"),
        ("Education", r"(?i)education|degree|university|college"),
        ("Skills", r"(?i)skills|technical skills|competencies"),
        ("Summary", r"(?i)summary|objective|profile"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("section pattern is valid")))
    .collect()
});

fn default_category() -> String {
    "General".to_string()
}

fn default_impact() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthWeakness {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// "high" | "medium" | "low"
    #[serde(default = "default_impact")]
    pub impact: String,
}

impl StrengthWeakness {
    fn new(category: &str, description: &str, impact: &str) -> Self {
        Self {
            category: category.to_string(),
            description: description.to_string(),
            impact: impact.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicAnalysis {
    pub score: f64,
    pub sections_found: Vec<&'static str>,
    pub strengths: Vec<StrengthWeakness>,
    pub weaknesses: Vec<StrengthWeakness>,
    pub recommendations: Vec<String>,
}

/// Analysis as returned to clients and persisted with the resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub overall_score: f64,
    pub strengths: Vec<StrengthWeakness>,
    pub weaknesses: Vec<StrengthWeakness>,
    pub recommendations: Vec<String>,
    pub summary: String,
    pub analysis_timestamp: String,
}

/// Raw LLM reply. Strength/weakness entries that are not objects are skipped.
#[derive(Debug, Default, Deserialize)]
pub struct AiResumeAnalysis {
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<Value>,
    #[serde(default)]
    pub weaknesses: Vec<Value>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub summary: Option<String>,
}

pub fn basic_analysis(resume_text: &str) -> BasicAnalysis {
    let word_count = resume_text.split_whitespace().count();
    let sections_found: Vec<&'static str> = SECTION_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(resume_text))
        .map(|(name, _)| *name)
        .collect();

    let mut score = BASE_SCORE;
    if word_count > 200 {
        score += 10.0;
    }
    if word_count > 400 {
        score += 10.0;
    }
    if sections_found.len() >= 3 {
        score += 15.0;
    }
    if sections_found.len() >= 4 {
        score += 15.0;
    }

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();

    if word_count > DETAILED_WORD_COUNT {
        strengths.push(StrengthWeakness::new(
            "Length",
            "Resume has adequate length and detail",
            "medium",
        ));
    } else {
        weaknesses.push(StrengthWeakness::new("Length", "Resume may be too short", "medium"));
        recommendations.push("Add more detail to your experience and achievements".to_string());
    }

    if sections_found.contains(&"Skills") {
        strengths.push(StrengthWeakness::new("Structure", "Skills section is present", "high"));
    } else {
        weaknesses.push(StrengthWeakness::new("Structure", "Skills section is missing", "high"));
        recommendations.push("Add a dedicated skills section".to_string());
    }

    if sections_found.contains(&"Summary") {
        strengths.push(StrengthWeakness::new(
            "Structure",
            "Professional summary is present",
            "medium",
        ));
    } else {
        recommendations.push("Consider adding a professional summary".to_string());
    }

    BasicAnalysis {
        score: score.min(100.0),
        sections_found,
        strengths,
        weaknesses,
        recommendations,
    }
}

fn object_entries(values: Vec<Value>) -> impl Iterator<Item = StrengthWeakness> {
    values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
}

/// Blends the LLM analysis with the heuristic one. LLM entries come first.
pub fn combine(ai: AiResumeAnalysis, basic: BasicAnalysis) -> ResumeAnalysis {
    let ai_score = ai
        .overall_score
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_AI_SCORE)
        .clamp(0.0, 100.0);

    let strengths = object_entries(ai.strengths)
        .chain(basic.strengths)
        .take(LIST_CAP)
        .collect();
    let weaknesses = object_entries(ai.weaknesses)
        .chain(basic.weaknesses)
        .take(LIST_CAP)
        .collect();

    let mut recommendations: Vec<String> = Vec::new();
    for rec in ai.recommendations.into_iter().chain(basic.recommendations) {
        if !recommendations.contains(&rec) {
            recommendations.push(rec);
        }
    }
    recommendations.truncate(LIST_CAP);

    ResumeAnalysis {
        overall_score: round1((ai_score + basic.score) / 2.0),
        strengths,
        weaknesses,
        recommendations,
        summary: ai
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        analysis_timestamp: Utc::now().to_rfc3339(),
    }
}

/// Heuristic result alone, used when the LLM is unavailable.
pub fn basic_only(basic: BasicAnalysis) -> ResumeAnalysis {
    ResumeAnalysis {
        overall_score: basic.score,
        strengths: basic.strengths,
        weaknesses: basic.weaknesses,
        recommendations: basic.recommendations,
        summary: BASIC_ONLY_SUMMARY.to_string(),
        analysis_timestamp: Utc::now().to_rfc3339(),
    }
}

pub async fn request_ai_analysis(
    llm: &LlmClient,
    resume_text: &str,
    job_title: Option<&str>,
) -> Result<AiResumeAnalysis, LlmError> {
    let prompt = ANALYZE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_title}", job_title.unwrap_or(NOT_PROVIDED))
        .replace("{resume_text}", resume_text);

    let messages = [ChatMessage::system(ANALYZE_SYSTEM), ChatMessage::user(prompt)];
    llm.call_json(&messages, ChatOptions::with_max_tokens(800))
        .await
}

pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_title: Option<&str>,
) -> ResumeAnalysis {
    let basic = basic_analysis(resume_text);
    match request_ai_analysis(llm, resume_text, job_title).await {
        Ok(ai) => combine(ai, basic),
        Err(e) => {
            warn!("AI resume analysis unavailable, serving basic analysis: {e}");
            basic_only(basic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_three_sections_short_resume() {
        let basic = basic_analysis("Experience at Acme. Education: BSc. Skills: Rust.");
        assert_eq!(basic.sections_found, vec!["Experience", "Education", "Skills"]);
        assert_eq!(basic.score, 65.0);
        assert_eq!(basic.weaknesses[0].description, "Resume may be too short");
        assert_eq!(
            basic.recommendations,
            vec![
                "Add more detail to your experience and achievements",
                "Consider adding a professional summary",
            ]
        );
        assert_eq!(basic.strengths[0].description, "Skills section is present");
    }

    #[test]
    fn test_full_long_resume_caps_at_hundred() {
        let text = format!(
            "Summary\nWork history\nUniversity degree\nTechnical skills\n{}",
            words(450)
        );
        let basic = basic_analysis(&text);
        assert_eq!(basic.sections_found.len(), 4);
        assert_eq!(basic.score, 100.0);
        assert!(basic.weaknesses.is_empty());
        assert!(basic.recommendations.is_empty());
        assert_eq!(basic.strengths.len(), 3);
    }

    #[test]
    fn test_no_sections_is_base_score() {
        let basic = basic_analysis("just a few plain words");
        assert!(basic.sections_found.is_empty());
        assert_eq!(basic.score, BASE_SCORE);
        assert_eq!(basic.weaknesses.len(), 2);
        assert_eq!(basic.recommendations.len(), 3);
    }

    #[test]
    fn test_section_match_is_case_insensitive() {
        let basic = basic_analysis("PROFILE and EMPLOYMENT");
        assert_eq!(basic.sections_found, vec!["Experience", "Summary"]);
    }

    #[test]
    fn test_combine_averages_and_orders_ai_first() {
        let basic = basic_analysis("Experience at Acme. Education: BSc. Skills: Rust.");
        let ai = AiResumeAnalysis {
            overall_score: Some(80.0),
            strengths: vec![
                json!({"category": "Impact", "description": "Quantified results", "impact": "high"}),
                json!("not an object"),
                json!({"description": "Clear layout"}),
            ],
            weaknesses: vec![],
            recommendations: vec![
                "Consider adding a professional summary".to_string(),
                "Lead with metrics".to_string(),
            ],
            summary: Some("Solid base.".to_string()),
        };

        let analysis = combine(ai, basic);

        assert_eq!(analysis.overall_score, 72.5);
        assert_eq!(analysis.strengths[0].category, "Impact");
        assert_eq!(analysis.strengths[1].category, "General");
        assert_eq!(analysis.strengths[1].impact, "medium");
        assert_eq!(analysis.strengths[2].description, "Skills section is present");
        assert_eq!(
            analysis.recommendations,
            vec![
                "Consider adding a professional summary",
                "Lead with metrics",
                "Add more detail to your experience and achievements",
            ]
        );
        assert_eq!(analysis.summary, "Solid base.");
    }

    #[test]
    fn test_combine_defaults_missing_ai_fields() {
        let basic = basic_analysis("just a few plain words");
        let analysis = combine(AiResumeAnalysis::default(), basic);
        assert_eq!(analysis.overall_score, 57.5);
        assert_eq!(analysis.summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn test_combine_caps_lists_at_ten() {
        let ai = AiResumeAnalysis {
            overall_score: Some(90.0),
            weaknesses: (0..12)
                .map(|i| json!({"category": "Gap", "description": format!("gap {i}")}))
                .collect(),
            recommendations: (0..12).map(|i| format!("rec {i}")).collect(),
            ..Default::default()
        };
        let analysis = combine(ai, basic_analysis("plain"));
        assert_eq!(analysis.weaknesses.len(), 10);
        assert_eq!(analysis.recommendations.len(), 10);
        assert_eq!(analysis.recommendations[0], "rec 0");
    }

    #[tokio::test]
    async fn test_stub_llm_yields_basic_only() {
        let analysis = analyze_resume(&LlmClient::stub_only(), "Skills: Rust, SQL", None).await;
        assert_eq!(analysis.summary, BASIC_ONLY_SUMMARY);
        assert_eq!(analysis.overall_score, BASE_SCORE);
    }
}
