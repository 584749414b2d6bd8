//! ATS compatibility scoring.
//!
//! `score_ats` is the deterministic local scorer. It always runs and is the
//! floor for every response. `analyze_ats` additionally asks the LLM for
//! feedback and overlays whatever fields the model actually returned.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{ChatMessage, ChatOptions, LlmClient, LlmError};
use crate::matching::keywords::extract_keywords;
use crate::matching::prompts::{ATS_FEEDBACK_PROMPT_TEMPLATE, ATS_FEEDBACK_SYSTEM};
use crate::matching::{round1, NEUTRAL_SCORE};

const KEYWORD_LIST_CAP: usize = 10;
const MIN_RESUME_CHARS: usize = 200;
const KEY_SECTIONS: &[&str] = &["experience", "education", "skills"];
const LOW_SCORE_THRESHOLD: f64 = 70.0;
const SUGGESTED_KEYWORDS: usize = 5;

pub const ISSUE_TOO_SHORT: &str = "Resume may be too short";
pub const ISSUE_MISSING_SECTIONS: &str = "Missing key sections";

/// Result of ATS scoring. Also the persisted/serialized shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    pub ats_score: f64,
    pub keyword_matches: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub formatting_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Feedback returned by the LLM. Every field is optional; absent or empty
/// fields leave the local value in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AtsFeedback {
    pub ats_score: Option<f64>,
    pub keyword_matches: Option<Vec<String>>,
    pub missing_keywords: Option<Vec<String>>,
    pub formatting_issues: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
}

/// Scores `resume_text` against `job_description` by keyword overlap.
///
/// Tolerates empty input: an empty job description scores the neutral 50.
pub fn score_ats(resume_text: &str, job_description: &str) -> AtsReport {
    let job_keywords = extract_keywords(job_description);
    let resume_keywords = extract_keywords(resume_text);

    let (matches, missing): (Vec<String>, Vec<String>) = job_keywords
        .iter()
        .cloned()
        .partition(|kw| resume_keywords.contains(kw));

    let score = if job_keywords.is_empty() {
        NEUTRAL_SCORE
    } else {
        round1(matches.len() as f64 / job_keywords.len() as f64 * 100.0)
    };

    AtsReport {
        ats_score: score,
        formatting_issues: formatting_issues(resume_text),
        recommendations: recommendations(score, &missing),
        keyword_matches: cap(matches),
        missing_keywords: cap(missing),
    }
}

fn formatting_issues(resume_text: &str) -> Vec<String> {
    let mut issues = Vec::new();
    if resume_text.chars().count() < MIN_RESUME_CHARS {
        issues.push(ISSUE_TOO_SHORT.to_string());
    }
    let lower = resume_text.to_lowercase();
    if !KEY_SECTIONS.iter().any(|s| lower.contains(s)) {
        issues.push(ISSUE_MISSING_SECTIONS.to_string());
    }
    issues
}

fn recommendations(score: f64, missing: &[String]) -> Vec<String> {
    let mut recs = Vec::new();
    if score < LOW_SCORE_THRESHOLD {
        recs.push("Add more relevant keywords from the job description".to_string());
    }
    if !missing.is_empty() {
        let top: Vec<&str> = missing
            .iter()
            .take(SUGGESTED_KEYWORDS)
            .map(String::as_str)
            .collect();
        recs.push(format!("Consider adding these keywords: {}", top.join(", ")));
    }
    recs.push("Use standard section headers (Experience, Education, Skills)".to_string());
    recs.push("Avoid complex formatting and graphics".to_string());
    recs
}

fn cap(mut list: Vec<String>) -> Vec<String> {
    list.truncate(KEYWORD_LIST_CAP);
    list
}

impl AtsReport {
    /// Overlays LLM feedback field by field. Present, non-empty values win.
    pub fn merge_feedback(self, feedback: AtsFeedback) -> AtsReport {
        fn pick(local: Vec<String>, remote: Option<Vec<String>>) -> Vec<String> {
            match remote {
                Some(list) if !list.is_empty() => list,
                _ => local,
            }
        }

        let ats_score = feedback
            .ats_score
            .filter(|s| s.is_finite())
            .map(|s| round1(s.clamp(0.0, 100.0)))
            .unwrap_or(self.ats_score);

        AtsReport {
            ats_score,
            keyword_matches: cap(pick(self.keyword_matches, feedback.keyword_matches)),
            missing_keywords: cap(pick(self.missing_keywords, feedback.missing_keywords)),
            formatting_issues: pick(self.formatting_issues, feedback.formatting_issues),
            recommendations: pick(self.recommendations, feedback.recommendations),
        }
    }
}

/// Asks the LLM for ATS feedback.
pub async fn request_ats_feedback(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
    ats_system: Option<&str>,
) -> Result<AtsFeedback, LlmError> {
    let prompt = ATS_FEEDBACK_PROMPT_TEMPLATE
        .replace("{ats_system}", ats_system.unwrap_or("generic"))
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text);

    let messages = [ChatMessage::system(ATS_FEEDBACK_SYSTEM), ChatMessage::user(prompt)];
    llm.call_json(&messages, ChatOptions::with_max_tokens(900))
        .await
}

/// Local score, enriched by the LLM when it answers with usable JSON.
/// Never fails: any LLM problem degrades to the local report.
pub async fn analyze_ats(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
    ats_system: Option<&str>,
) -> AtsReport {
    let local = score_ats(resume_text, job_description);

    match request_ats_feedback(llm, resume_text, job_description, ats_system).await {
        Ok(feedback) => local.merge_feedback(feedback),
        Err(e) => {
            warn!("ATS feedback unavailable, serving local score: {e}");
            local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_RESUME: &str = "Experience: Senior backend engineer building Python services on AWS \
        for eight years. Education: BSc Computer Science. Skills: Python, SQL, AWS, Docker, \
        Terraform, observability, incident response, mentoring, system design and code review.";

    #[test]
    fn test_half_overlap_scores_fifty() {
        let report = score_ats(
            "Python developer with SQL and AWS experience, 5 years",
            "Python, AWS, Docker, Kubernetes",
        );
        assert_eq!(report.ats_score, 50.0);
        assert_eq!(report.keyword_matches, vec!["python", "aws"]);
        assert_eq!(report.missing_keywords, vec!["docker", "kubernetes"]);
    }

    #[test]
    fn test_empty_job_description_is_neutral() {
        let report = score_ats("short and plain", "");
        assert_eq!(report.ats_score, NEUTRAL_SCORE);
        assert!(report.keyword_matches.is_empty());
        assert!(report.missing_keywords.is_empty());
        assert!(report
            .formatting_issues
            .contains(&ISSUE_MISSING_SECTIONS.to_string()));
        assert!(report.formatting_issues.contains(&ISSUE_TOO_SHORT.to_string()));
    }

    #[test]
    fn test_all_stop_word_job_description_is_neutral() {
        let report = score_ats(LONG_RESUME, "the and with these those");
        assert_eq!(report.ats_score, NEUTRAL_SCORE);
    }

    #[test]
    fn test_full_overlap_scores_hundred() {
        let report = score_ats(LONG_RESUME, "Python AWS Docker");
        assert_eq!(report.ats_score, 100.0);
        assert!(report.missing_keywords.is_empty());
    }

    #[test]
    fn test_score_rounded_to_one_decimal() {
        // 1 of 3 job keywords present → 33.333… → 33.3
        let report = score_ats("rust only here", "rust golang haskell");
        assert_eq!(report.ats_score, 33.3);
    }

    #[test]
    fn test_long_resume_with_sections_has_no_formatting_issues() {
        assert!(LONG_RESUME.len() >= MIN_RESUME_CHARS);
        let report = score_ats(LONG_RESUME, "Python");
        assert!(report.formatting_issues.is_empty());
    }

    #[test]
    fn test_section_detection_is_case_insensitive() {
        let report = score_ats("SKILLS: rust", "rust");
        assert!(!report
            .formatting_issues
            .contains(&ISSUE_MISSING_SECTIONS.to_string()));
    }

    #[test]
    fn test_recommendation_order_for_low_score() {
        let report = score_ats("nothing relevant", "kafka spark flink airflow dbt snowflake");
        assert_eq!(report.ats_score, 0.0);
        assert_eq!(
            report.recommendations,
            vec![
                "Add more relevant keywords from the job description".to_string(),
                "Consider adding these keywords: kafka, spark, flink, airflow, dbt"
                    .to_string(),
                "Use standard section headers (Experience, Education, Skills)".to_string(),
                "Avoid complex formatting and graphics".to_string(),
            ]
        );
    }

    #[test]
    fn test_high_score_only_boilerplate_recommendations() {
        let report = score_ats(LONG_RESUME, "Python SQL");
        assert_eq!(report.recommendations.len(), 2);
    }

    #[test]
    fn test_keyword_lists_capped_at_ten() {
        let jd = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike";
        let report = score_ats("", jd);
        assert_eq!(report.missing_keywords.len(), KEYWORD_LIST_CAP);
        assert_eq!(report.ats_score, 0.0);
    }

    #[test]
    fn test_score_always_in_range() {
        for (resume, jd) in [
            ("", ""),
            (LONG_RESUME, "python"),
            ("x", "lorem ipsum dolor sit amet"),
        ] {
            let s = score_ats(resume, jd).ats_score;
            assert!((0.0..=100.0).contains(&s), "{s} out of range");
        }
    }

    #[test]
    fn test_merge_prefers_present_ai_fields() {
        let local = score_ats("Python developer", "Python, AWS, Docker, Kubernetes");
        let merged = local.clone().merge_feedback(AtsFeedback {
            ats_score: Some(72.46),
            keyword_matches: Some(vec!["python".to_string()]),
            missing_keywords: Some(vec![]),
            formatting_issues: None,
            recommendations: Some(vec!["Quantify impact".to_string()]),
        });

        assert_eq!(merged.ats_score, 72.5);
        assert_eq!(merged.keyword_matches, vec!["python"]);
        // Empty AI list falls back to local.
        assert_eq!(merged.missing_keywords, local.missing_keywords);
        assert_eq!(merged.formatting_issues, local.formatting_issues);
        assert_eq!(merged.recommendations, vec!["Quantify impact"]);
    }

    #[test]
    fn test_merge_clamps_out_of_range_ai_score() {
        let merged = score_ats("", "").merge_feedback(AtsFeedback {
            ats_score: Some(140.0),
            ..AtsFeedback::default()
        });
        assert_eq!(merged.ats_score, 100.0);
    }

    #[test]
    fn test_merge_with_empty_feedback_is_identity() {
        let local = score_ats(LONG_RESUME, "python kubernetes");
        assert_eq!(local.clone().merge_feedback(AtsFeedback::default()), local);
    }

    #[test]
    fn test_feedback_deserializes_partial_json() {
        let fb: AtsFeedback = serde_json::from_str(r#"{"ats_score": 64}"#).unwrap();
        assert_eq!(fb.ats_score, Some(64.0));
        assert!(fb.keyword_matches.is_none());
    }

    #[tokio::test]
    async fn test_analyze_falls_back_to_local_when_llm_is_stub() {
        let llm = LlmClient::stub_only();
        let report = analyze_ats(
            &llm,
            "Python developer with SQL and AWS experience, 5 years",
            "Python, AWS, Docker, Kubernetes",
            None,
        )
        .await;
        assert_eq!(report.ats_score, 50.0);
        assert_eq!(report.keyword_matches, vec!["python", "aws"]);
    }
}
