use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::auth::token::decode_token;
use crate::auth::users::get_user_by_id;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The caller, resolved from `Authorization: Bearer <jwt>`.
/// The token must verify and its email must still match the stored user.
pub struct AuthUser(pub User);

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let not_authenticated = || AppError::Unauthorized("Not authenticated".to_string());

    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(not_authenticated)?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(not_authenticated()),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = decode_token(token, &state.config.auth_secret_key)?;
        let user_id = claims.user_id()?;

        match get_user_by_id(&state.db, user_id).await? {
            Some(user) if user.email == claims.email => Ok(AuthUser(user)),
            _ => {
                warn!("Token for user {user_id} no longer matches a stored account");
                Err(AppError::Unauthorized("User not found".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_missing_or_malformed_header_is_unauthorized() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer")).is_err());
        assert!(bearer_token(&headers("Bearer a b")).is_err());
    }
}
