// LLM prompt constants for ATS feedback.

pub const ATS_FEEDBACK_SYSTEM: &str = "You are an ATS optimization expert. \
    Compare the resume to the job description. \
    Return JSON with: ats_score (0-100), keyword_matches (list), missing_keywords (list), \
    formatting_issues (list), recommendations (list). Be specific.";

/// Replace `{ats_system}`, `{job_description}`, `{resume_text}` and `{json_only}` before sending.
pub const ATS_FEEDBACK_PROMPT_TEMPLATE: &str = "ATS: {ats_system}

Job Description:
{job_description}

Resume:
{resume_text}

{json_only}
";
