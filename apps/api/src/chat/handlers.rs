use axum::{extract::State, Json};

use crate::chat::resources::{CareerResources, ChatSuggestions, CAREER_RESOURCES, CHAT_SUGGESTIONS};
use crate::chat::service::{
    career_counseling, chat, CareerCounselingRequest, CareerCounselingResponse, ChatRequest,
    ChatResponse,
};
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::{require_min_chars, MIN_TEXT_CHARS};

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    require_min_chars(&req.message, 1, "Message cannot be empty")?;
    Ok(Json(chat(&state.llm, state.conversations.as_ref(), &req).await))
}

/// POST /api/v1/career-counseling
pub async fn handle_career_counseling(
    State(state): State<AppState>,
    Json(req): Json<CareerCounselingRequest>,
) -> Result<Json<CareerCounselingResponse>, AppError> {
    require_min_chars(
        &req.career_goals,
        MIN_TEXT_CHARS,
        "Career goals must be at least 10 characters long",
    )?;
    Ok(Json(career_counseling(&state.llm, &req).await))
}

/// GET /api/v1/chat-suggestions
pub async fn handle_chat_suggestions() -> Json<&'static ChatSuggestions> {
    Json(&CHAT_SUGGESTIONS)
}

/// GET /api/v1/career-resources
pub async fn handle_career_resources() -> Json<&'static CareerResources> {
    Json(&CAREER_RESOURCES)
}
