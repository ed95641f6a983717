use axum::{extract::State, Json};
use sqlx::SqlitePool;

use crate::{
    auth::{hash_password, verify_against_dummy, verify_password, MIN_PASSWORD_LEN},
    error::{AppError, AppResult},
    extractors::{CurrentUser, JsonBody},
    models::user::{CreateUser, LoginPayload, RegisterResponse, TokenResponse, User, UserProfile},
    store::UserStore,
    AppState,
};

/// Validates and inserts a new account.
///
/// Checks run in a fixed order: username taken, email taken, password too
/// short. A duplicate that races past the checks is still rejected by the
/// table and surfaces as a conflict.
pub async fn create_account(pool: &SqlitePool, payload: &CreateUser) -> AppResult<User> {
    if UserStore::username_exists(pool, &payload.username).await? {
        return Err(AppError::Conflict("Username already registered".to_string()));
    }
    if UserStore::email_exists(pool, &payload.email).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash_password(&payload.password)?;
    UserStore::create(
        pool,
        &payload.username,
        &payload.email,
        &payload.full_name,
        &password_hash,
    )
    .await
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> AppResult<Json<RegisterResponse>> {
    let user = create_account(&state.db, &payload).await?;
    tracing::info!(username = %user.username, id = user.id, "Registered account");

    Ok(Json(RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        message: "User registered successfully".to_string(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> AppResult<Json<TokenResponse>> {
    let Some(user) = UserStore::get_by_username(&state.db, &payload.username).await? else {
        verify_against_dummy(&payload.password);
        tracing::info!(username = %payload.username, "Login failed");
        return Err(AppError::login_failed());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::info!(username = %payload.username, "Login failed");
        return Err(AppError::login_failed());
    }

    let token = state.keys.issue(&user.username)?;
    tracing::info!(username = %user.username, "Issued access token");

    Ok(Json(TokenResponse::bearer(token)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}
