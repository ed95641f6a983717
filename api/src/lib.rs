pub mod auth;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod rest;
pub mod store;

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

use crate::{
    auth::TokenKeys,
    classifier::Classifier,
    config::InitialUser,
    error::AppResult,
    models::user::CreateUser,
    store::UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub keys: TokenKeys,
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(db: SqlitePool, keys: TokenKeys, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            db,
            keys,
            classifier,
        }
    }
}

/// Create the configured initial account unless it already exists.
pub async fn seed_initial_user(pool: &SqlitePool, user: &InitialUser) -> AppResult<()> {
    if UserStore::username_exists(pool, &user.username).await? {
        tracing::info!(username = %user.username, "Initial user already present");
        return Ok(());
    }

    let payload = CreateUser {
        username: user.username.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        password: user.password.clone(),
    };
    handlers::auth::create_account(pool, &payload).await?;
    tracing::info!(username = %user.username, "Created initial user");
    Ok(())
}
