use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ResumeTips {
    pub general_tips: &'static [&'static str],
    pub ats_optimization: &'static [&'static str],
    pub content_guidelines: &'static [&'static str],
}

pub static RESUME_TIPS: ResumeTips = ResumeTips {
    general_tips: &[
        "Use a clean, professional format with clear section headers",
        "Include relevant keywords from job descriptions",
        "Quantify your achievements with specific numbers and metrics",
        "Keep your resume to 1-2 pages maximum",
        "Use action verbs to start each bullet point",
        "Include a professional summary or objective",
        "Proofread carefully for spelling and grammar errors",
    ],
    ats_optimization: &[
        "Use standard section headers (Experience, Education, Skills)",
        "Avoid graphics, images, or complex formatting",
        "Use common fonts like Arial, Calibri, or Times New Roman",
        "Save as a .docx or .pdf file",
        "Include relevant keywords naturally throughout",
        "Use full words instead of abbreviations where possible",
    ],
    content_guidelines: &[
        "Focus on achievements rather than just job duties",
        "Use the STAR method (Situation, Task, Action, Result) for accomplishments",
        "Include relevant skills and certifications",
        "List education in reverse chronological order",
        "Include contact information and professional links",
        "Customize your resume for each job application",
    ],
};
