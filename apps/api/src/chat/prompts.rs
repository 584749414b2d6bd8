// LLM prompt constants for chat and career counseling.

pub const COUNSELING_SYSTEM: &str = "You are an expert career counselor. Based on the provided context, \
    give personalized career advice. Structure your response with:
1. Overall advice
2. Action plan (3-5 steps)
3. Skill recommendations
4. Career paths to consider
5. Resources to explore

Be encouraging, specific, and actionable.";

/// Replace `{current_role}`, `{experience_years}`, `{skills}`, `{career_goals}`,
/// `{challenges}` and `{industry}` before sending.
pub const COUNSELING_PROMPT_TEMPLATE: &str = "Current role: {current_role}
Experience: {experience_years} years
Skills: {skills}
Career goals: {career_goals}
Challenges: {challenges}
Industry: {industry}

Please provide personalized career counseling advice.
";

/// Prefixed to the caller's `context` object when one is supplied with a chat message.
pub const CHAT_CONTEXT_PREFIX: &str = "Additional context about the user: ";

pub const NOT_SPECIFIED: &str = "Not specified";
