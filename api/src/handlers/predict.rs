use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    classifier::Classifier,
    error::{AppError, AppResult},
    extractors::{CurrentUser, JsonBody},
    models::prediction::{BatchPredictions, PredictRequest, Prediction},
    AppState,
};

/// Runs inference off the async workers.
async fn run_classifier<T, F>(classifier: Arc<dyn Classifier>, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn Classifier) -> Result<T, crate::classifier::ClassifierError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(classifier.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("classifier task failed: {}", e)))?
        .map_err(AppError::from)
}

pub async fn predict(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(req): JsonBody<PredictRequest>,
) -> AppResult<Json<Prediction>> {
    let prediction =
        run_classifier(state.classifier.clone(), move |c| c.classify(&req.message)).await?;
    tracing::debug!(
        username = %user.username,
        score = prediction.prediction,
        "Classified message as {}",
        prediction.classification
    );
    Ok(Json(prediction))
}

/// Classifies every message in order. One failure fails the whole batch.
pub async fn predict_batch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(messages): JsonBody<Vec<String>>,
) -> AppResult<Json<BatchPredictions>> {
    let count = messages.len();
    let results = run_classifier(state.classifier.clone(), move |c| {
        messages.iter().map(|m| c.classify(m)).collect::<Result<Vec<_>, _>>()
    })
    .await?;
    tracing::debug!(username = %user.username, count, "Classified batch");
    Ok(Json(BatchPredictions { results }))
}
