//! SMS spam classification.
//!
//! The model and tokenizer are pre-trained artifacts loaded from JSON. The
//! service depends only on the [`Classifier`] trait so handlers can be
//! exercised with a stub.

mod model;
mod text;
mod tokenizer;

use std::path::Path;

use thiserror::Error;

use crate::models::prediction::Prediction;

pub use model::SequenceModel;
pub use text::{clean_text, pad_sequence};
pub use tokenizer::Tokenizer;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model or tokenizer is not loaded")]
    Unavailable,
    #[error("{0}")]
    Inference(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model shape: {0}")]
    Shape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierStatus {
    pub model_loaded: bool,
    pub tokenizer_loaded: bool,
}

pub trait Classifier: Send + Sync {
    /// Spam probability in `[0, 1]` for a raw message.
    fn score(&self, message: &str) -> Result<f32, ClassifierError>;

    fn status(&self) -> ClassifierStatus;

    fn classify(&self, message: &str) -> Result<Prediction, ClassifierError> {
        let score = self.score(message)?;
        Ok(Prediction::from_score(message, score))
    }
}

/// Tokenizer + sequence model, either of which may have failed to load.
#[derive(Debug, Default)]
pub struct SpamClassifier {
    model: Option<SequenceModel>,
    tokenizer: Option<Tokenizer>,
}

impl SpamClassifier {
    pub fn new(model: Option<SequenceModel>, tokenizer: Option<Tokenizer>) -> Self {
        Self { model, tokenizer }
    }

    /// Loads both artifacts. A missing or corrupt artifact is logged and left
    /// unloaded so the rest of the service can still start.
    pub fn load(model_path: &Path, tokenizer_path: &Path) -> Self {
        let model = match SequenceModel::from_file(model_path) {
            Ok(model) => {
                tracing::info!(
                    path = %model_path.display(),
                    sequence_length = model.sequence_length(),
                    "Model loaded"
                );
                Some(model)
            }
            Err(e) => {
                tracing::error!(path = %model_path.display(), "Model load failed: {}", e);
                None
            }
        };

        let tokenizer = match Tokenizer::from_file(tokenizer_path) {
            Ok(tokenizer) => {
                tracing::info!(
                    path = %tokenizer_path.display(),
                    vocab = tokenizer.vocab_len(),
                    "Tokenizer loaded"
                );
                Some(tokenizer)
            }
            Err(e) => {
                tracing::error!(path = %tokenizer_path.display(), "Tokenizer load failed: {}", e);
                None
            }
        };

        if model.is_none() || tokenizer.is_none() {
            tracing::warn!("Prediction endpoints will return errors until the artifacts are fixed");
        }

        Self::new(model, tokenizer)
    }
}

impl Classifier for SpamClassifier {
    fn score(&self, message: &str) -> Result<f32, ClassifierError> {
        let (Some(model), Some(tokenizer)) = (&self.model, &self.tokenizer) else {
            return Err(ClassifierError::Unavailable);
        };

        let cleaned = clean_text(message);
        let sequence = tokenizer.texts_to_sequence(&cleaned);
        let padded = pad_sequence(sequence, model.sequence_length());
        model.predict(&padded)
    }

    fn status(&self) -> ClassifierStatus {
        ClassifierStatus {
            model_loaded: self.model.is_some(),
            tokenizer_loaded: self.tokenizer.is_some(),
        }
    }
}
