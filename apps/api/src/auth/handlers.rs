use axum::{extract::State, http::StatusCode, Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::auth::token::{encode_token, hash_password, verify_password};
use crate::auth::users::{create_user, get_user_by_email};
use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::state::AppState;

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// OAuth2 password-form shape: the email goes in `username`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::Validation("A valid email address is required".to_string())),
    }
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let email = normalize_email(&req.email)?;
    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters long"
        )));
    }

    if get_user_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed hashing password: {e}")))??;

    let user = create_user(&state.db, &email, &password_hash, req.name.as_deref()).await?;
    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let email = normalize_email(&form.username).map_err(|_| invalid())?;
    let user = get_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(invalid)?;

    let password = form.password;
    let stored_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed verifying password: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let access_token = encode_token(
        user.id,
        &user.email,
        &state.config.auth_secret_key,
        state.config.auth_token_ttl_minutes,
    )?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// GET /api/auth/me
pub async fn handle_me(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(user.into())
}

/// POST /api/auth/logout
/// Tokens are stateless; the client discards its copy.
pub async fn handle_logout() -> Json<Value> {
    Json(json!({ "detail": "Logged out" }))
}
