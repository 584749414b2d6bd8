// LLM prompt constants for resume analysis and tailoring.
// Output schemas live in the system prompts; user prompts carry only the data.

pub const ANALYZE_SYSTEM: &str = "You are an expert resume analyst. Return a concise JSON object with keys: \
    overall_score (0-100), strengths (list of objects with category, description, impact), \
    weaknesses (list of objects with category, description, impact), recommendations (list of strings), \
    summary (string). Be practical, specific, and ATS-aware.";

/// Replace `{resume_text}`, `{job_title}` and `{json_only}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = "Resume:
{resume_text}

Target role: {job_title}

{json_only}
";

pub const TAILOR_SYSTEM: &str = "You are a resume rewriting assistant. \
    Rewrite the resume to target the job while preserving truthfulness. \
    Return JSON with: tailored_resume (string), changes_made (list of strings), \
    keyword_matches (list of strings). Keep formatting clean and ATS-friendly.";

/// Replace `{job_title}`, `{company_name}`, `{job_description}`, `{resume_text}`
/// and `{json_only}` before sending.
pub const TAILOR_PROMPT_TEMPLATE: &str = "Job Title: {job_title}
Company: {company_name}

Job Description:
{job_description}

Original Resume:
{resume_text}

{json_only}
";
