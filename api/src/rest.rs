use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{auth, health, predict},
    AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route("/register", post(auth::register))
        .route("/token", post(auth::login))
        .route("/users/me", get(auth::me))
        .route("/predict", post(predict::predict))
        .route("/predict/batch", post(predict::predict_batch))
        .with_state(state)
}
