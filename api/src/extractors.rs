use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{error::AppError, models::user::User, store::UserStore, AppState};

/// The enabled account behind a valid bearer token.
///
/// Handlers that take this extractor are protected: the request is rejected
/// before the handler runs if the token is missing, invalid or expired, if
/// its subject no longer exists, or if the account is disabled.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// `Json` whose rejections go through [`AppError`], so a malformed body is a
/// 400 with a `detail` like every other error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            tracing::debug!("Request without bearer token");
            AppError::Unauthorized("Not authenticated".to_string())
        })?;

        let claims = state.keys.verify(token)?;

        let user = UserStore::get_by_username(&state.db, &claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(subject = %claims.sub, "Token subject has no account");
                AppError::invalid_token()
            })?;

        if user.disabled {
            tracing::debug!(username = %user.username, "Rejected disabled account");
            return Err(AppError::Forbidden("Inactive user".to_string()));
        }

        Ok(CurrentUser(user))
    }
}
