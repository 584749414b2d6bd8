use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::history::ConversationStore;
use crate::chat::prompts::{
    CHAT_CONTEXT_PREFIX, COUNSELING_PROMPT_TEMPLATE, COUNSELING_SYSTEM, NOT_SPECIFIED,
};
use crate::llm_client::{ChatMessage, ChatOptions, LlmClient};

const CHAT_MAX_TOKENS: u32 = 400;
const COUNSELING_MAX_TOKENS: u32 = 1500;

pub const FALLBACK_REPLY: &str =
    "I apologize, but I'm experiencing technical difficulties. Please try again in a moment.";
const FALLBACK_SUGGESTIONS: [&str; 2] = [
    "Try asking about resume tips",
    "Ask about job search strategies",
];

// ────────────────────────────────────────────────────────────────────────────
// Chat
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Replayed verbatim when present; takes precedence over stored history.
    pub conversation_history: Option<Vec<ChatMessage>>,
    pub context: Option<Value>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub conversation_id: String,
    pub suggestions: Vec<String>,
    pub response_timestamp: String,
}

/// Three follow-up questions keyed on the topic of the user's message.
pub fn suggestions_for(message: &str) -> Vec<String> {
    let message = message.to_lowercase();
    let picks: [&str; 3] = if message.contains("resume") {
        [
            "How can I improve my resume formatting?",
            "What keywords should I include?",
            "How do I optimize for ATS systems?",
        ]
    } else if message.contains("job") || message.contains("career") {
        [
            "What skills should I develop?",
            "How do I prepare for interviews?",
            "What career paths are available?",
        ]
    } else if message.contains("interview") {
        [
            "What are common interview questions?",
            "How do I answer behavioral questions?",
            "What should I research about the company?",
        ]
    } else {
        [
            "Tell me about resume optimization",
            "Help me with job search strategies",
            "What career development resources do you recommend?",
        ]
    };
    picks.iter().map(|s| s.to_string()).collect()
}

async fn prior_turns(
    store: &dyn ConversationStore,
    req: &ChatRequest,
    conversation_id: &str,
) -> Vec<ChatMessage> {
    if let Some(history) = &req.conversation_history {
        return history.clone();
    }
    if req.conversation_id.is_none() {
        return Vec::new();
    }
    store.load(conversation_id).await.unwrap_or_else(|e| {
        warn!("Chat history unavailable for {conversation_id}, continuing without it: {e}");
        Vec::new()
    })
}

/// Answers one chat message. Never fails: provider exhaustion yields an
/// apology with fixed suggestions, and history persistence is best-effort.
pub async fn chat(
    llm: &LlmClient,
    store: &dyn ConversationStore,
    req: &ChatRequest,
) -> ChatResponse {
    let conversation_id = req
        .conversation_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut messages = Vec::new();
    if let Some(context) = req.context.as_ref().filter(|c| !c.is_null()) {
        messages.push(ChatMessage::system(format!("{CHAT_CONTEXT_PREFIX}{context}")));
    }
    messages.extend(prior_turns(store, req, &conversation_id).await);
    let user_turn = ChatMessage::user(req.message.trim());
    messages.push(user_turn.clone());

    let reply = match llm
        .chat(&messages, ChatOptions::with_max_tokens(CHAT_MAX_TOKENS))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Chat reply unavailable for {conversation_id}: {e}");
            return ChatResponse {
                reply: FALLBACK_REPLY.to_string(),
                conversation_id,
                suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
                response_timestamp: Utc::now().to_rfc3339(),
            };
        }
    };

    if let Err(e) = store
        .append(&conversation_id, &[user_turn, ChatMessage::assistant(reply.clone())])
        .await
    {
        warn!("Failed to persist chat turns for {conversation_id}: {e}");
    }

    ChatResponse {
        suggestions: suggestions_for(&req.message),
        reply,
        conversation_id,
        response_timestamp: Utc::now().to_rfc3339(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Career counseling
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CareerCounselingRequest {
    pub current_role: Option<String>,
    pub experience_years: Option<u32>,
    pub skills: Option<Vec<String>>,
    pub career_goals: String,
    pub challenges: Option<Vec<String>>,
    pub industry: Option<String>,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CounselingSections {
    pub advice: String,
    pub action_plan: Vec<String>,
    pub skill_recommendations: Vec<String>,
    pub career_paths: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CareerCounselingResponse {
    #[serde(flatten)]
    pub sections: CounselingSections,
    pub counseling_timestamp: String,
}

fn specified(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_SPECIFIED)
}

fn counseling_prompt(req: &CareerCounselingRequest) -> String {
    let join = |items: &Option<Vec<String>>| items.as_deref().unwrap_or_default().join(", ");

    COUNSELING_PROMPT_TEMPLATE
        .replace("{experience_years}", &req.experience_years.unwrap_or(0).to_string())
        .replace("{current_role}", specified(req.current_role.as_deref()))
        .replace("{industry}", specified(req.industry.as_deref()))
        .replace("{skills}", &join(&req.skills))
        .replace("{challenges}", &join(&req.challenges))
        .replace("{career_goals}", specified(Some(req.career_goals.as_str())))
}

/// Sorts the reply's lines into sections by keyword; the first matching rule
/// wins. The whole reply is kept as `advice`.
pub fn parse_counseling_reply(reply: &str) -> CounselingSections {
    let mut sections = CounselingSections {
        advice: reply.to_string(),
        ..CounselingSections::default()
    };

    for line in reply.lines() {
        let item = line.trim();
        if item.is_empty() || line.starts_with('#') {
            continue;
        }
        let lower = item.to_lowercase();
        let bucket = if lower.contains("action") || lower.contains("step") {
            &mut sections.action_plan
        } else if lower.contains("skill") {
            &mut sections.skill_recommendations
        } else if lower.contains("career") || lower.contains("path") {
            &mut sections.career_paths
        } else if lower.contains("resource") || lower.contains("recommend") {
            &mut sections.resources
        } else {
            continue;
        };
        bucket.push(item.to_string());
    }
    sections
}

fn fallback_counseling() -> CounselingSections {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    CounselingSections {
        advice: "I'd be happy to help with your career development. Could you provide more details about your current situation and goals?".to_string(),
        action_plan: owned(&["Schedule a follow-up consultation", "Complete skills assessment"]),
        skill_recommendations: owned(&["Communication skills", "Technical skills relevant to your field"]),
        career_paths: owned(&["Consider your current role progression", "Explore lateral moves"]),
        resources: owned(&["LinkedIn Learning", "Industry conferences", "Professional networking"]),
    }
}

/// Structured career advice. Falls back to generic guidance when no provider replies.
pub async fn career_counseling(
    llm: &LlmClient,
    req: &CareerCounselingRequest,
) -> CareerCounselingResponse {
    let messages = [
        ChatMessage::system(COUNSELING_SYSTEM),
        ChatMessage::user(counseling_prompt(req)),
    ];

    let sections = match llm
        .chat(&messages, ChatOptions::with_max_tokens(COUNSELING_MAX_TOKENS))
        .await
    {
        Ok(reply) => {
            let sections = parse_counseling_reply(&reply);
            info!(
                "Counseling reply parsed: {} actions, {} skills, {} paths, {} resources",
                sections.action_plan.len(),
                sections.skill_recommendations.len(),
                sections.career_paths.len(),
                sections.resources.len()
            );
            sections
        }
        Err(e) => {
            warn!("Counseling reply unavailable, serving generic guidance: {e}");
            fallback_counseling()
        }
    };

    CareerCounselingResponse {
        sections,
        counseling_timestamp: Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::history::testing::{MemoryConversationStore, UnavailableConversationStore};
    use crate::llm_client::providers::STUB_PREFIX;
    use crate::llm_client::testing::exhausted_client;

    #[test]
    fn test_suggestions_first_topic_wins() {
        assert_eq!(
            suggestions_for("Can you review my RESUME for this job?")[0],
            "How can I improve my resume formatting?"
        );
        assert_eq!(
            suggestions_for("Thinking about a career change")[2],
            "What career paths are available?"
        );
        assert_eq!(
            suggestions_for("Nervous about an interview")[0],
            "What are common interview questions?"
        );
        let default = suggestions_for("hello");
        assert_eq!(default.len(), 3);
        assert_eq!(default[0], "Tell me about resume optimization");
    }

    #[test]
    fn test_parse_counseling_reply_buckets_lines() {
        let reply = "\
## Action plan
1. Take one small step each week
- Build SQL skills through daily practice
Consider a data engineering path
Check the resources listed below
I recommend joining a study group
Keep going!

# Career paths heading is skipped
";
        let sections = parse_counseling_reply(reply);
        assert_eq!(sections.advice, reply);
        assert_eq!(sections.action_plan, vec!["1. Take one small step each week"]);
        assert_eq!(
            sections.skill_recommendations,
            vec!["- Build SQL skills through daily practice"]
        );
        assert_eq!(sections.career_paths, vec!["Consider a data engineering path"]);
        assert_eq!(
            sections.resources,
            vec![
                "Check the resources listed below",
                "I recommend joining a study group"
            ]
        );
    }

    #[test]
    fn test_action_rule_takes_precedence_over_skill() {
        let sections = parse_counseling_reply("Step 2: improve your skills");
        assert_eq!(sections.action_plan.len(), 1);
        assert!(sections.skill_recommendations.is_empty());
    }

    #[test]
    fn test_counseling_prompt_defaults() {
        let prompt = counseling_prompt(&CareerCounselingRequest {
            career_goals: "Become a staff engineer".to_string(),
            skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
            ..CareerCounselingRequest::default()
        });
        assert!(prompt.contains("Current role: Not specified"));
        assert!(prompt.contains("Experience: 0 years"));
        assert!(prompt.contains("Skills: Rust, SQL"));
        assert!(prompt.contains("Challenges: \n"));
        assert!(prompt.contains("Industry: Not specified"));
    }

    #[test]
    fn test_user_text_is_substituted_last() {
        let prompt = counseling_prompt(&CareerCounselingRequest {
            career_goals: "Learn what {industry} means".to_string(),
            industry: Some("Finance".to_string()),
            ..CareerCounselingRequest::default()
        });
        assert!(prompt.contains("Career goals: Learn what {industry} means"));
        assert!(prompt.contains("Industry: Finance"));
    }

    #[test]
    fn test_fallback_counseling_is_populated() {
        let fallback = fallback_counseling();
        assert_eq!(fallback.action_plan.len(), 2);
        assert_eq!(fallback.resources.len(), 3);
    }

    #[tokio::test]
    async fn test_chat_persists_exchange_under_new_id() {
        let store = MemoryConversationStore::default();
        let req = ChatRequest {
            message: "How do I prepare for an interview?".to_string(),
            ..ChatRequest::default()
        };
        let response = chat(&LlmClient::stub_only(), &store, &req).await;

        assert!(Uuid::parse_str(&response.conversation_id).is_ok());
        assert_eq!(
            response.reply,
            format!("{STUB_PREFIX}How do I prepare for an interview?")
        );
        assert_eq!(response.suggestions[0], "What are common interview questions?");

        let stored = store.load(&response.conversation_id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].role, "user");
        assert_eq!(stored[1].content, response.reply);
    }

    #[tokio::test]
    async fn test_chat_continues_stored_conversation() {
        let store = MemoryConversationStore::default();
        let llm = LlmClient::stub_only();
        let first = chat(
            &llm,
            &store,
            &ChatRequest {
                message: "first".to_string(),
                conversation_id: Some("c-42".to_string()),
                ..ChatRequest::default()
            },
        )
        .await;
        assert_eq!(first.conversation_id, "c-42");

        chat(
            &llm,
            &store,
            &ChatRequest {
                message: "second".to_string(),
                conversation_id: Some("c-42".to_string()),
                ..ChatRequest::default()
            },
        )
        .await;
        assert_eq!(store.load("c-42").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_chat_survives_unavailable_store() {
        let req = ChatRequest {
            message: "career advice please".to_string(),
            conversation_id: Some("c-1".to_string()),
            ..ChatRequest::default()
        };
        let response = chat(&LlmClient::stub_only(), &UnavailableConversationStore, &req).await;
        assert_eq!(response.conversation_id, "c-1");
        assert!(response.reply.starts_with(STUB_PREFIX));
        assert_eq!(response.suggestions[0], "What skills should I develop?");
    }

    #[tokio::test]
    async fn test_chat_apologizes_when_every_provider_fails() {
        let store = MemoryConversationStore::default();
        let req = ChatRequest {
            message: "Help with my resume".to_string(),
            conversation_id: Some("c-down".to_string()),
            ..ChatRequest::default()
        };
        let response = chat(&exhausted_client(), &store, &req).await;

        assert_eq!(response.reply, FALLBACK_REPLY);
        assert_eq!(response.conversation_id, "c-down");
        assert_eq!(
            response.suggestions,
            vec!["Try asking about resume tips", "Ask about job search strategies"]
        );
        assert!(store.load("c-down").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_counseling_serves_generic_guidance_when_every_provider_fails() {
        let req = CareerCounselingRequest {
            career_goals: "Move into platform engineering".to_string(),
            ..CareerCounselingRequest::default()
        };
        let response = career_counseling(&exhausted_client(), &req).await;
        assert_eq!(response.sections, fallback_counseling());
        assert!(response.sections.advice.starts_with("I'd be happy to help"));
    }

    #[tokio::test]
    async fn test_counseling_with_stub_parses_echoed_prompt() {
        let req = CareerCounselingRequest {
            career_goals: "Move into platform engineering".to_string(),
            skills: Some(vec!["Docker".to_string()]),
            ..CareerCounselingRequest::default()
        };
        let response = career_counseling(&LlmClient::stub_only(), &req).await;
        assert!(response.sections.advice.contains("Career goals: Move into platform engineering"));
        assert_eq!(response.sections.skill_recommendations, vec!["Skills: Docker"]);
        assert!(response
            .sections
            .career_paths
            .contains(&"Career goals: Move into platform engineering".to_string()));
    }
}
