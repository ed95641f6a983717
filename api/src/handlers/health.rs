use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{models::prediction::HealthResponse, AppState};

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the SMS Spam Classification API",
        "endpoints": {
            "/register": "POST - Create an account",
            "/token": "POST - Obtain a bearer token",
            "/users/me": "GET - Current account (auth required)",
            "/predict": "POST - Classify one SMS message (auth required)",
            "/predict/batch": "POST - Classify a list of SMS messages (auth required)",
            "/health": "GET - Service health",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.classifier.status();
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: status.model_loaded,
        tokenizer_loaded: status.tokenizer_loaded,
    })
}
